//! The engine driven end to end through the Gemini client.

use std::fs;

use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use authease_core::{ANALYSIS_FAILURE_HEADLINE, GAME_FAILURE_HEADLINE};
use authease_engine::{AnalysisState, App, AppOptions, GamePhase, Submission};
use authease_types::{Choice, Difficulty, MediaType, Verdict};

use crate::common::{
    TEXT_MODEL, challenge_json, client, endpoint, mount_error, mount_image_for, mount_text,
    report_json, start_gemini_mock,
};

#[tokio::test]
async fn text_round_scores_and_continues() {
    let server = start_gemini_mock().await;
    mount_text(
        &server,
        TEXT_MODEL,
        &challenge_json("lol my cat ate my homework again", "Embrace the journey of growth.", false),
    )
    .await;

    let mut app = App::new(client(&server, 0), AppOptions::default());
    assert!(app.game_begin());
    let round = app.pick_difficulty(Difficulty::Intermediate).expect("round started");
    assert_eq!(app.game().loading_round(), Some(round));

    assert!(app.process_next_completion().await);
    let GamePhase::Presenting(live) = app.game().phase() else {
        panic!("expected a round on screen, got {}", app.game().phase().name());
    };
    assert_eq!(live.challenge.difficulty(), Difficulty::Intermediate);

    let outcome = app.choose(Choice::B).expect("scored");
    assert!(outcome.is_correct);
    assert!(outcome.xp_gained > 0);
    assert!(matches!(app.game().phase(), GamePhase::Feedback(_)));
    assert!(app.choose(Choice::A).is_none(), "first choice is final");

    let stats = app.game().stats();
    assert_eq!(stats.total_rounds(), 1);
    assert_eq!(stats.correct_rounds(), 1);
    assert_eq!(stats.streak(), 1);

    app.next_round().expect("next round");
    assert!(matches!(app.game().phase(), GamePhase::Loading { .. }));
    assert!(app.process_next_completion().await);
    assert!(matches!(app.game().phase(), GamePhase::Presenting(_)));
}

#[tokio::test]
async fn image_round_saves_both_renders() {
    let server = start_gemini_mock().await;
    mount_text(
        &server,
        TEXT_MODEL,
        &challenge_json("street-human: rainy crosswalk", "street-ai: glossy crosswalk", false),
    )
    .await;
    mount_image_for(&server, "street-human", b"human png").await;
    mount_image_for(&server, "street-ai", b"ai png").await;

    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = App::new(
        client(&server, 0),
        AppOptions {
            game_media: MediaType::Image,
            game_difficulty: Difficulty::Beginner,
            renders_dir: Some(dir.path().to_path_buf()),
        },
    );
    app.game_begin();
    app.pick_difficulty(Difficulty::Advanced).expect("round started");
    assert!(app.process_next_completion().await);

    let GamePhase::Presenting(live) = app.game().phase() else {
        panic!("expected a round on screen, got {}", app.game().phase().name());
    };
    let a = live.renders.get(Choice::A).expect("A saved");
    let b = live.renders.get(Choice::B).expect("B saved");
    assert_eq!(fs::read(a).expect("read A"), b"human png");
    assert_eq!(fs::read(b).expect("read B"), b"ai png");
    assert!(a.extension().is_some_and(|ext| ext == "png"));
}

#[tokio::test]
async fn failed_round_returns_to_start_with_notice() {
    let server = start_gemini_mock().await;
    Mock::given(method("POST"))
        .and(path(endpoint(TEXT_MODEL)))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let mut app = App::new(client(&server, 0), AppOptions::default());
    app.game_begin();
    app.pick_difficulty(Difficulty::Expert).expect("round started");
    assert!(app.process_next_completion().await);

    assert!(matches!(app.game().phase(), GamePhase::Start));
    let notice = app.notice().expect("notice shown");
    assert!(notice.starts_with(GAME_FAILURE_HEADLINE));
    assert!(notice.contains("HTTP 500"));
    assert_eq!(app.game().stats().total_rounds(), 0);
}

#[tokio::test]
async fn analysis_round_trip_through_client() {
    let server = start_gemini_mock().await;
    mount_text(&server, TEXT_MODEL, &report_json(0.9)).await;

    let mut app = App::new(client(&server, 0), AppOptions::default());
    app.analysis_input_mut()
        .enter_str("  You won't BELIEVE what this senator said  ");
    let Submission::Started(_) = app.submit_analysis() else {
        panic!("submission should start");
    };
    assert!(app.analysis().is_analyzing());

    assert!(app.process_next_completion().await);
    let AnalysisState::Done(report) = app.analysis().state() else {
        panic!("expected a report");
    };
    assert_eq!(report.verdict(), Verdict::AiGenerated);
    assert!(app.notice().is_none());
}

#[tokio::test]
async fn analysis_failure_keeps_input_and_shows_notice() {
    let server = start_gemini_mock().await;
    mount_error(
        &server,
        TEXT_MODEL,
        403,
        "Method doesn't allow unregistered callers.",
        "PERMISSION_DENIED",
    )
    .await;

    let mut app = App::new(client(&server, 0), AppOptions::default());
    app.analysis_input_mut().enter_str("suspicious headline");
    let _ = app.submit_analysis();
    assert!(app.process_next_completion().await);

    assert!(matches!(app.analysis().state(), AnalysisState::Idle));
    assert_eq!(app.analysis().input().text(), "suspicious headline");
    let notice = app.notice().expect("notice shown");
    assert!(notice.starts_with(ANALYSIS_FAILURE_HEADLINE));
    assert!(notice.contains("Fix:"));
}
