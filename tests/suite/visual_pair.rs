//! Image challenges: both option prompts are rendered concurrently.

use authease_providers::{ChallengeGenerator, ProviderError, resolve_visual_pair};
use authease_types::{Choice, Difficulty, MediaType};

use crate::common::{
    IMAGE_MODEL, TEXT_MODEL, challenge_json, client, endpoint, mount_image_for, mount_text,
    mount_textual_image_for, start_gemini_mock,
};

const HUMAN_PROMPT: &str = "lighthouse-human: overcast pier, slight motion blur";
const AI_PROMPT: &str = "lighthouse-ai: flawless pier, six-fingered fisherman";

#[tokio::test]
async fn both_prompts_become_images() {
    let server = start_gemini_mock().await;
    mount_text(&server, TEXT_MODEL, &challenge_json(HUMAN_PROMPT, AI_PROMPT, false)).await;
    mount_image_for(&server, "lighthouse-human", b"human pixels").await;
    mount_image_for(&server, "lighthouse-ai", b"ai pixels").await;

    let client = client(&server, 0);
    let challenge = client
        .generate_challenge(MediaType::Image, Difficulty::Expert)
        .await
        .expect("challenge");
    let resolved = resolve_visual_pair(&client, challenge)
        .await
        .expect("both renders");

    assert_eq!(resolved.media(), MediaType::Image);
    assert_eq!(resolved.narrative(), "Two captions for the same photo. One was written by a model.");
    for (_, option) in resolved.options() {
        assert!(option.content().as_image().is_some());
    }
    assert!(resolved.option(Choice::B).is_ai());
    assert_eq!(resolved.option(Choice::B).explanation(), "Too polished.");

    let image_calls = server
        .received_requests()
        .await
        .expect("recording on")
        .into_iter()
        .filter(|request| request.url.path() == endpoint(IMAGE_MODEL))
        .count();
    assert_eq!(image_calls, 2);
}

#[tokio::test]
async fn one_missing_render_fails_the_pair() {
    let server = start_gemini_mock().await;
    mount_text(&server, TEXT_MODEL, &challenge_json(HUMAN_PROMPT, AI_PROMPT, false)).await;
    mount_image_for(&server, "lighthouse-human", b"human pixels").await;
    mount_textual_image_for(&server, "lighthouse-ai").await;

    let client = client(&server, 0);
    let challenge = client
        .generate_challenge(MediaType::Image, Difficulty::Beginner)
        .await
        .expect("challenge");
    let err = resolve_visual_pair(&client, challenge)
        .await
        .expect_err("second render has no image");
    assert!(matches!(err, ProviderError::NoImage), "{err:?}");
}

#[tokio::test]
async fn non_image_challenges_skip_rendering() {
    let server = start_gemini_mock().await;
    mount_text(&server, TEXT_MODEL, &challenge_json("a", "b", true)).await;

    let client = client(&server, 0);
    let challenge = client
        .generate_challenge(MediaType::Video, Difficulty::Intermediate)
        .await
        .expect("challenge");
    let resolved = resolve_visual_pair(&client, challenge)
        .await
        .expect("unchanged");
    assert_eq!(resolved.option(Choice::A).content().as_text(), Some("a"));
    assert_eq!(server.received_requests().await.expect("recording on").len(), 1);
}
