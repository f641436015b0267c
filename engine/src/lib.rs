//! Core engine for AuthEase: analysis and game state machines.
//!
//! This crate owns all application state without TUI dependencies. Model
//! calls run on spawned tasks and report back through a bounded channel; the
//! UI loop drains it in [`App::tick`]. Each result carries the id of the
//! request that produced it and is dropped if that request is no longer the
//! current one.

mod analysis;
mod draft;
mod game;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use authease_core::{
    ANALYSIS_FAILURE_HEADLINE, GAME_FAILURE_HEADLINE, export_image, format_error_notice,
    format_failure_notice,
};
use authease_providers::{
    ChallengeGenerator, ContentClassifier, MediaPayload, ProviderError, VisualGenerator,
    resolve_visual_pair,
};
use authease_types::{
    Challenge, Choice, Difficulty, MediaType, RequestId, RoundId, RoundOutcome, ScoreReport,
    Sequence,
};

pub use analysis::{AnalysisFlow, AnalysisState, SubmitRejection};
pub use draft::DraftInput;
pub use game::{GamePhase, GameSession, LiveRound, Renders, RoundRequest, ScoredRound};

/// Everything the engine needs from the model side.
pub trait Capabilities:
    ContentClassifier + ChallengeGenerator + VisualGenerator + 'static
{
}

impl<T> Capabilities for T where
    T: ContentClassifier + ChallengeGenerator + VisualGenerator + 'static
{
}

const COMPLETION_CHANNEL_CAPACITY: usize = 16;
const SPINNER_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Analysis,
    Game,
}

#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub game_media: MediaType,
    pub game_difficulty: Difficulty,
    /// Where image challenge options are saved. `None` skips saving.
    pub renders_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Started(RequestId),
    NotStarted,
}

/// How a finished request landed.
#[derive(Debug)]
pub(crate) enum Delivery {
    Applied,
    Stale,
    Failed(ProviderError),
}

#[derive(Debug)]
enum Completion {
    Analysis {
        request: RequestId,
        result: Result<ScoreReport, ProviderError>,
    },
    Round {
        round: RoundId,
        result: Result<Challenge, ProviderError>,
    },
}

pub struct App<C> {
    capabilities: Arc<C>,
    view: View,
    analysis: AnalysisFlow,
    game: GameSession,
    notice: Option<String>,
    ids: Sequence,
    completions_tx: mpsc::Sender<Completion>,
    completions_rx: mpsc::Receiver<Completion>,
    renders_dir: Option<PathBuf>,
    spinner_tick: usize,
    last_spinner_tick: Instant,
    exit_requested: bool,
}

impl<C: Capabilities> App<C> {
    pub fn new(capabilities: C, options: AppOptions) -> Self {
        let (completions_tx, completions_rx) = mpsc::channel(COMPLETION_CHANNEL_CAPACITY);
        Self {
            capabilities: Arc::new(capabilities),
            view: View::default(),
            analysis: AnalysisFlow::default(),
            game: GameSession::new(options.game_media, options.game_difficulty),
            notice: None,
            ids: Sequence::new(),
            completions_tx,
            completions_rx,
            renders_dir: options.renders_dir,
            spinner_tick: 0,
            last_spinner_tick: Instant::now(),
            exit_requested: false,
        }
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        if self.view != view {
            tracing::debug!(?view, "Switched view");
            self.view = view;
        }
    }

    /// Current user-facing notice, if any. Multi-line, already sanitized.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }

    #[must_use]
    pub fn spinner_tick(&self) -> usize {
        self.spinner_tick
    }

    /// Whether any request is outstanding for the current state.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.analysis.is_analyzing() || self.game.loading_round().is_some()
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    #[must_use]
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    // Analysis

    #[must_use]
    pub fn analysis(&self) -> &AnalysisFlow {
        &self.analysis
    }

    pub fn analysis_input_mut(&mut self) -> &mut DraftInput {
        self.analysis.input_mut()
    }

    pub fn set_analysis_media(&mut self, media: MediaType) {
        self.analysis.set_media(media);
    }

    pub fn cycle_analysis_media(&mut self, forward: bool) {
        let current = self.analysis.media();
        let media = if forward {
            current.next()
        } else {
            current.prev()
        };
        self.analysis.set_media(media);
    }

    /// Submit the current input. Blank input or a running request is a no-op.
    pub fn submit_analysis(&mut self) -> Submission {
        let request = self.ids.next_request();
        match self.analysis.begin(request) {
            Ok(payload) => {
                tracing::info!(
                    %request,
                    media = %payload.media(),
                    "Analysis requested"
                );
                self.notice = None;
                self.spawn_analysis(request, payload);
                Submission::Started(request)
            }
            Err(SubmitRejection::NotReady) => Submission::NotStarted,
            Err(SubmitRejection::Load(err)) => {
                tracing::warn!(error = %err, "Could not load media for analysis");
                self.notice = Some(format_error_notice(ANALYSIS_FAILURE_HEADLINE, &err));
                Submission::NotStarted
            }
        }
    }

    fn spawn_analysis(&self, request: RequestId, payload: MediaPayload) {
        let capabilities = Arc::clone(&self.capabilities);
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = capabilities.classify(payload).await;
            if tx
                .send(Completion::Analysis { request, result })
                .await
                .is_err()
            {
                tracing::debug!(%request, "Analysis result dropped; receiver closed");
            }
        });
    }

    // Game

    #[must_use]
    pub fn game(&self) -> &GameSession {
        &self.game
    }

    pub fn game_begin(&mut self) -> bool {
        self.game.begin()
    }

    pub fn cycle_game_media(&mut self, forward: bool) -> bool {
        let current = self.game.media();
        let media = if forward {
            current.next()
        } else {
            current.prev()
        };
        self.game.set_media(media)
    }

    /// Pick a difficulty from the settings screen and request a round.
    pub fn pick_difficulty(&mut self, difficulty: Difficulty) -> Option<RoundId> {
        let round = self.ids.next_round();
        let request = self.game.start_round(difficulty, round)?;
        self.notice = None;
        self.spawn_round(request);
        Some(round)
    }

    pub fn choose(&mut self, choice: Choice) -> Option<RoundOutcome> {
        let outcome = self.game.choose(choice)?;
        tracing::info!(
            %choice,
            correct = outcome.is_correct,
            xp_gained = outcome.xp_gained,
            streak = outcome.stats.streak(),
            "Round scored"
        );
        Some(outcome)
    }

    pub fn next_round(&mut self) -> Option<RoundId> {
        let round = self.ids.next_round();
        let request = self.game.next_round(round)?;
        self.spawn_round(request);
        Some(round)
    }

    pub fn main_menu(&mut self) -> bool {
        self.game.main_menu()
    }

    pub fn abandon_round(&mut self) -> Option<RoundId> {
        let round = self.game.abandon()?;
        tracing::info!(%round, "Round abandoned while loading");
        Some(round)
    }

    fn spawn_round(&self, request: RoundRequest) {
        tracing::info!(
            round = %request.round,
            media = %request.media,
            difficulty = %request.difficulty,
            "Challenge requested"
        );
        let capabilities = Arc::clone(&self.capabilities);
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let RoundRequest {
                round,
                media,
                difficulty,
            } = request;
            let result = match capabilities.generate_challenge(media, difficulty).await {
                Ok(challenge) => resolve_visual_pair(capabilities.as_ref(), challenge).await,
                Err(err) => Err(err),
            };
            if tx.send(Completion::Round { round, result }).await.is_err() {
                tracing::debug!(%round, "Round result dropped; receiver closed");
            }
        });
    }

    // Completions

    /// Apply finished requests and advance the spinner.
    pub fn tick(&mut self) {
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply(completion);
        }

        let now = Instant::now();
        if now.duration_since(self.last_spinner_tick) >= SPINNER_INTERVAL {
            self.last_spinner_tick = now;
            self.spinner_tick = self.spinner_tick.wrapping_add(1);
        }
    }

    /// Wait for the next finished request and apply it.
    pub async fn process_next_completion(&mut self) -> bool {
        match self.completions_rx.recv().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Analysis { request, result } => self.apply_analysis(request, result),
            Completion::Round { round, result } => self.apply_round(round, result),
        }
    }

    fn apply_analysis(&mut self, request: RequestId, result: Result<ScoreReport, ProviderError>) {
        match self.analysis.complete(request, result) {
            Delivery::Applied => {
                tracing::info!(%request, "Analysis complete");
            }
            Delivery::Stale => {
                tracing::debug!(%request, "Dropping stale analysis result");
            }
            Delivery::Failed(err) => {
                tracing::warn!(%request, error = %err, "Analysis failed");
                self.notice = Some(format_failure_notice(ANALYSIS_FAILURE_HEADLINE, &err));
            }
        }
    }

    fn apply_round(&mut self, round: RoundId, result: Result<Challenge, ProviderError>) {
        if !self.game.is_awaiting(round) {
            tracing::debug!(%round, "Dropping stale challenge");
            return;
        }

        let result = result.map(|challenge| {
            let renders = self.save_renders(&challenge);
            (challenge, renders)
        });
        match self.game.complete_round(round, result) {
            Delivery::Applied => {
                tracing::info!(%round, "Challenge ready");
            }
            Delivery::Stale => {
                tracing::debug!(%round, "Dropping stale challenge");
            }
            Delivery::Failed(err) => {
                tracing::warn!(%round, error = %err, "Challenge generation failed");
                self.notice = Some(format_failure_notice(GAME_FAILURE_HEADLINE, &err));
            }
        }
    }

    fn save_renders(&self, challenge: &Challenge) -> Renders {
        let Some(dir) = self.renders_dir.as_deref() else {
            return Renders::default();
        };
        if challenge.media() != MediaType::Image {
            return Renders::default();
        }

        let [a, b] = challenge.options().map(|(choice, option)| {
            let image = option.content().as_image()?;
            let stem = format!("{}-{}", challenge.id(), choice.as_str().to_ascii_lowercase());
            match export_image(image, dir, &stem) {
                Ok(path) => Some(path),
                Err(err) => {
                    tracing::warn!(%choice, error = %err, "Could not save challenge image");
                    None
                }
            }
        });
        Renders::new(a, b)
    }
}
