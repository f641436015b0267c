//! "Spot the AI" round progression.
//!
//! ```text
//! Start -> DifficultySelect -> Loading{round} -> Presenting -> Feedback
//!              ^                  |                               |
//!              +---- abandon -----+                               |
//!              +-------------------- main menu -------------------+
//!                                 Loading <------ next round -----+
//! Loading --failure--> Start
//! ```
//!
//! A response only lands if its [`RoundId`] is the one currently loading.
//! Stats survive every transition for the life of the session.

use std::mem;
use std::path::PathBuf;

use authease_providers::ProviderError;
use authease_types::{
    Challenge, Choice, Difficulty, MediaType, ProgressionStats, RoundId, RoundOutcome, score,
};

use crate::Delivery;

/// Saved image files for the two options of an image round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Renders {
    a: Option<PathBuf>,
    b: Option<PathBuf>,
}

impl Renders {
    #[must_use]
    pub fn new(a: Option<PathBuf>, b: Option<PathBuf>) -> Self {
        Self { a, b }
    }

    #[must_use]
    pub fn get(&self, choice: Choice) -> Option<&PathBuf> {
        match choice {
            Choice::A => self.a.as_ref(),
            Choice::B => self.b.as_ref(),
        }
    }
}

/// A challenge on screen.
#[derive(Debug, Clone)]
pub struct LiveRound {
    pub challenge: Challenge,
    pub renders: Renders,
}

/// A scored round.
#[derive(Debug, Clone)]
pub struct ScoredRound {
    pub round: LiveRound,
    pub choice: Choice,
    pub outcome: RoundOutcome,
}

#[derive(Debug, Clone, Default)]
pub enum GamePhase {
    #[default]
    Start,
    DifficultySelect,
    Loading {
        round: RoundId,
    },
    Presenting(Box<LiveRound>),
    Feedback(Box<ScoredRound>),
}

impl GamePhase {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            GamePhase::Start => "start",
            GamePhase::DifficultySelect => "difficulty_select",
            GamePhase::Loading { .. } => "loading",
            GamePhase::Presenting(_) => "presenting",
            GamePhase::Feedback(_) => "feedback",
        }
    }
}

/// What to ask the generator for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRequest {
    pub round: RoundId,
    pub media: MediaType,
    pub difficulty: Difficulty,
}

#[derive(Debug, Default)]
pub struct GameSession {
    phase: GamePhase,
    media: MediaType,
    difficulty: Difficulty,
    stats: ProgressionStats,
}

impl GameSession {
    #[must_use]
    pub fn new(media: MediaType, difficulty: Difficulty) -> Self {
        Self {
            media,
            difficulty,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    #[must_use]
    pub fn media(&self) -> MediaType {
        self.media
    }

    /// Last difficulty picked, reused by "next round".
    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn stats(&self) -> &ProgressionStats {
        &self.stats
    }

    #[must_use]
    pub fn loading_round(&self) -> Option<RoundId> {
        match self.phase {
            GamePhase::Loading { round } => Some(round),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_awaiting(&self, round: RoundId) -> bool {
        self.loading_round() == Some(round)
    }

    /// Start screen to settings. Returns whether the phase changed.
    pub fn begin(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Start) {
            return false;
        }
        self.phase = GamePhase::DifficultySelect;
        true
    }

    /// Media type is sticky across rounds; only changeable from the menus.
    pub fn set_media(&mut self, media: MediaType) -> bool {
        if !matches!(self.phase, GamePhase::Start | GamePhase::DifficultySelect) {
            return false;
        }
        self.media = media;
        true
    }

    /// Pick a difficulty and enter `Loading`.
    pub(crate) fn start_round(
        &mut self,
        difficulty: Difficulty,
        round: RoundId,
    ) -> Option<RoundRequest> {
        if !matches!(self.phase, GamePhase::DifficultySelect) {
            return None;
        }
        self.difficulty = difficulty;
        Some(self.enter_loading(round))
    }

    /// Feedback straight to another round with the same settings.
    pub(crate) fn next_round(&mut self, round: RoundId) -> Option<RoundRequest> {
        if !matches!(self.phase, GamePhase::Feedback(_)) {
            return None;
        }
        Some(self.enter_loading(round))
    }

    fn enter_loading(&mut self, round: RoundId) -> RoundRequest {
        self.phase = GamePhase::Loading { round };
        RoundRequest {
            round,
            media: self.media,
            difficulty: self.difficulty,
        }
    }

    pub(crate) fn complete_round(
        &mut self,
        round: RoundId,
        result: Result<(Challenge, Renders), ProviderError>,
    ) -> Delivery {
        if !self.is_awaiting(round) {
            return Delivery::Stale;
        }

        match result {
            Ok((challenge, renders)) => {
                self.phase = GamePhase::Presenting(Box::new(LiveRound { challenge, renders }));
                Delivery::Applied
            }
            Err(err) => {
                self.phase = GamePhase::Start;
                Delivery::Failed(err)
            }
        }
    }

    /// Lock in a choice. Only the first choice of a round counts.
    pub fn choose(&mut self, choice: Choice) -> Option<RoundOutcome> {
        let GamePhase::Presenting(_) = self.phase else {
            return None;
        };
        let GamePhase::Presenting(live) = mem::take(&mut self.phase) else {
            return None;
        };

        let outcome = score(live.challenge.option(choice), &self.stats);
        self.stats = outcome.stats;
        self.phase = GamePhase::Feedback(Box::new(ScoredRound {
            round: *live,
            choice,
            outcome,
        }));
        Some(outcome)
    }

    /// Feedback back to settings; stats are kept.
    pub fn main_menu(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Feedback(_)) {
            return false;
        }
        self.phase = GamePhase::DifficultySelect;
        true
    }

    /// Leave `Loading` without waiting. The late response becomes stale.
    pub fn abandon(&mut self) -> Option<RoundId> {
        let round = self.loading_round()?;
        self.phase = GamePhase::DifficultySelect;
        Some(round)
    }
}
