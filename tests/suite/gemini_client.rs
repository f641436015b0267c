//! Gemini client against a mocked `generateContent` endpoint.

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use authease_core::{ANALYSIS_FAILURE_HEADLINE, format_failure_notice};
use authease_providers::{
    ChallengeGenerator, ContentClassifier, MediaPayload, ProviderError, VisualGenerator,
};
use authease_types::{Choice, Difficulty, MediaType, Verdict};

use crate::common::{
    IMAGE_MODEL, TEXT_MODEL, challenge_json, client, endpoint, mount_error, mount_image_for,
    mount_text, mount_textual_image_for, report_json, start_gemini_mock, text_envelope,
};

#[tokio::test]
async fn classify_text_returns_report() {
    let server = start_gemini_mock().await;
    mount_text(&server, TEXT_MODEL, &report_json(0.82)).await;

    let report = client(&server, 0)
        .classify(MediaPayload::text("Scientists confirm the moon is hollow"))
        .await
        .expect("report");

    assert_eq!(report.verdict(), Verdict::AiGenerated);
    assert_eq!(report.findings().len(), 2);
    assert_eq!(report.explanation(), "Reads like templated copy.");
    assert!(report.metadata().contains_key("forensicDetails"));

    let requests = server.received_requests().await.expect("recording on");
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body).expect("json body");
    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .expect("text part");
    assert!(prompt.ends_with("Scientists confirm the moon is hollow"));
    assert_eq!(
        body["generationConfig"]["responseMimeType"],
        "application/json"
    );
}

#[tokio::test]
async fn classify_inline_media_sends_data_part() {
    let server = start_gemini_mock().await;
    mount_text(&server, TEXT_MODEL, &report_json(0.1)).await;

    let report = client(&server, 0)
        .classify(MediaPayload::inline(MediaType::Audio, "audio/mpeg", "SUQz"))
        .await
        .expect("report");
    assert_eq!(report.verdict(), Verdict::RealContent);

    let requests = server.received_requests().await.expect("recording on");
    let body: Value = serde_json::from_slice(&requests[0].body).expect("json body");
    assert_eq!(body["contents"][0]["parts"][0]["inlineData"]["mimeType"], "audio/mpeg");
    assert_eq!(body["contents"][0]["parts"][0]["inlineData"]["data"], "SUQz");
}

#[tokio::test]
async fn fenced_json_is_accepted() {
    let server = start_gemini_mock().await;
    let fenced = format!("```json\n{}\n```", report_json(0.4));
    mount_text(&server, TEXT_MODEL, &fenced).await;

    let report = client(&server, 0)
        .classify(MediaPayload::url("https://example.com/story"))
        .await
        .expect("report");
    assert_eq!(report.verdict(), Verdict::LikelyReal);
}

#[tokio::test]
async fn non_json_answer_is_malformed() {
    let server = start_gemini_mock().await;
    mount_text(&server, TEXT_MODEL, "I think this text is probably fine.").await;

    let err = client(&server, 0)
        .classify(MediaPayload::text("hello"))
        .await
        .expect_err("prose is not a report");
    assert!(matches!(err, ProviderError::Malformed { .. }), "{err:?}");
}

#[tokio::test]
async fn out_of_range_probability_is_malformed() {
    let server = start_gemini_mock().await;
    mount_text(&server, TEXT_MODEL, &report_json(1.7)).await;

    let err = client(&server, 0)
        .classify(MediaPayload::text("hello"))
        .await
        .expect_err("probability above one");
    assert!(matches!(err, ProviderError::Malformed { .. }), "{err:?}");
}

#[tokio::test]
async fn rejected_key_surfaces_api_error_with_fix_hint() {
    let server = start_gemini_mock().await;
    mount_error(
        &server,
        TEXT_MODEL,
        400,
        "API key not valid. Please pass a valid API key.",
        "API_KEY_INVALID",
    )
    .await;

    let err = client(&server, 2)
        .classify(MediaPayload::text("hello"))
        .await
        .expect_err("bad key");
    let ProviderError::Api { status, .. } = &err else {
        panic!("expected Api error, got {err:?}");
    };
    assert_eq!(*status, 400);

    // 400 is not retried.
    assert_eq!(server.received_requests().await.expect("recording on").len(), 1);

    let notice = format_failure_notice(ANALYSIS_FAILURE_HEADLINE, &err);
    assert!(notice.starts_with(ANALYSIS_FAILURE_HEADLINE));
    assert!(notice.contains("API key not valid"));
    assert!(notice.contains("GEMINI_API_KEY"));
}

#[tokio::test]
async fn unavailable_is_retried_then_succeeds() {
    let server = start_gemini_mock().await;
    Mock::given(method("POST"))
        .and(path(endpoint(TEXT_MODEL)))
        .respond_with(ResponseTemplate::new(503).insert_header("retry-after-ms", "10"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_text(&server, TEXT_MODEL, &report_json(0.6)).await;

    let report = client(&server, 2)
        .classify(MediaPayload::text("hello"))
        .await
        .expect("second attempt succeeds");
    assert_eq!(report.verdict(), Verdict::LikelyAiGenerated);
    assert_eq!(server.received_requests().await.expect("recording on").len(), 2);
}

#[tokio::test]
async fn retries_exhausted_reports_last_status() {
    let server = start_gemini_mock().await;
    Mock::given(method("POST"))
        .and(path(endpoint(TEXT_MODEL)))
        .respond_with(ResponseTemplate::new(503).insert_header("retry-after-ms", "10"))
        .mount(&server)
        .await;

    let err = client(&server, 1)
        .classify(MediaPayload::text("hello"))
        .await
        .expect_err("always unavailable");
    assert!(matches!(err, ProviderError::Api { status: 503, .. }), "{err:?}");
    assert_eq!(server.received_requests().await.expect("recording on").len(), 2);
}

#[tokio::test]
async fn blocked_prompt_is_reported() {
    let server = start_gemini_mock().await;
    Mock::given(method("POST"))
        .and(path(endpoint(TEXT_MODEL)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let err = client(&server, 0)
        .classify(MediaPayload::text("hello"))
        .await
        .expect_err("blocked");
    assert!(matches!(err, ProviderError::Blocked { .. }), "{err:?}");
}

#[tokio::test]
async fn challenge_keeps_requested_media_and_difficulty() {
    let server = start_gemini_mock().await;
    mount_text(
        &server,
        TEXT_MODEL,
        &challenge_json("omg the sunset tho", "A breathtaking sunset paints the sky.", false),
    )
    .await;

    let challenge = client(&server, 0)
        .generate_challenge(MediaType::Text, Difficulty::Advanced)
        .await
        .expect("challenge");

    assert_eq!(challenge.id().as_str(), "ch-1");
    assert_eq!(challenge.media(), MediaType::Text);
    assert_eq!(challenge.difficulty(), Difficulty::Advanced);
    assert!(!challenge.option(Choice::A).is_ai());
    assert!(challenge.option(Choice::B).is_ai());
    assert_eq!(
        challenge.option(Choice::A).content().as_text(),
        Some("omg the sunset tho")
    );
}

#[tokio::test]
async fn empty_answer_is_reported() {
    let server = start_gemini_mock().await;
    Mock::given(method("POST"))
        .and(path(endpoint(TEXT_MODEL)))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_envelope("   ")))
        .mount(&server)
        .await;

    let err = client(&server, 0)
        .generate_challenge(MediaType::Url, Difficulty::Beginner)
        .await
        .expect_err("blank text");
    assert!(matches!(err, ProviderError::EmptyResponse), "{err:?}");
}

#[tokio::test]
async fn visual_returns_inline_image() {
    let server = start_gemini_mock().await;
    mount_image_for(&server, "foggy harbor", b"\x89PNG fake").await;

    let image = client(&server, 0)
        .generate_visual("a foggy harbor at dawn")
        .await
        .expect("image");
    assert_eq!(image.mime_type, "image/png");
    assert!(image.data_url().starts_with("data:image/png;base64,"));

    let requests = server.received_requests().await.expect("recording on");
    assert_eq!(requests[0].url.path(), endpoint(IMAGE_MODEL));
}

#[tokio::test]
async fn visual_without_image_part_is_no_image() {
    let server = start_gemini_mock().await;
    mount_textual_image_for(&server, "harbor").await;

    let err = client(&server, 0)
        .generate_visual("a foggy harbor at dawn")
        .await
        .expect_err("text only");
    assert!(matches!(err, ProviderError::NoImage), "{err:?}");
    assert_eq!(err.to_string(), "No image generated");
}
