//! Analysis flow: one piece of content in, one [`ScoreReport`] out.
//!
//! ```text
//! Idle --submit--> Analyzing{request} --ok--> Done(report)
//!                                     --err-> Idle (+ notice)
//! ```
//!
//! Switching the media tab clears any result and supersedes an in-flight
//! request; its late response is dropped by the [`RequestId`] check.

use authease_core::{MediaLoadError, load_media_file, resolve_input_path};
use authease_providers::{MediaPayload, ProviderError};
use authease_types::{MediaType, RequestId, ScoreReport};

use crate::Delivery;
use crate::draft::DraftInput;

#[derive(Debug, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Analyzing {
        request: RequestId,
    },
    Done(Box<ScoreReport>),
}

/// Why a submit did not start a request.
#[derive(Debug)]
pub enum SubmitRejection {
    /// Input is blank or a request is already running.
    NotReady,
    /// The media file could not be loaded.
    Load(MediaLoadError),
}

#[derive(Debug, Default)]
pub struct AnalysisFlow {
    media: MediaType,
    input: DraftInput,
    state: AnalysisState,
}

impl AnalysisFlow {
    #[must_use]
    pub fn media(&self) -> MediaType {
        self.media
    }

    #[must_use]
    pub fn input(&self) -> &DraftInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut DraftInput {
        &mut self.input
    }

    #[must_use]
    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    #[must_use]
    pub fn report(&self) -> Option<&ScoreReport> {
        match &self.state {
            AnalysisState::Done(report) => Some(report.as_ref()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_analyzing(&self) -> bool {
        matches!(self.state, AnalysisState::Analyzing { .. })
    }

    /// Whether submit would do anything right now.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.is_analyzing() && !self.input.is_blank()
    }

    /// Select a media tab. A different tab clears the result and input.
    pub fn set_media(&mut self, media: MediaType) {
        if media == self.media {
            return;
        }
        if let AnalysisState::Analyzing { request } = self.state {
            tracing::debug!(%request, "Analysis superseded by media switch");
        }
        self.media = media;
        self.input.clear();
        self.state = AnalysisState::Idle;
    }

    /// Build the payload for `request` and enter `Analyzing`.
    pub(crate) fn begin(&mut self, request: RequestId) -> Result<MediaPayload, SubmitRejection> {
        if !self.can_submit() {
            return Err(SubmitRejection::NotReady);
        }

        let raw = self.input.text().trim();
        let payload = if self.media.takes_typed_input() {
            MediaPayload::Typed {
                media: self.media,
                content: raw.to_string(),
            }
        } else {
            let path = resolve_input_path(raw);
            match load_media_file(self.media, &path) {
                Ok(payload) => payload,
                Err(err) => {
                    self.state = AnalysisState::Idle;
                    return Err(SubmitRejection::Load(err));
                }
            }
        };

        self.state = AnalysisState::Analyzing { request };
        Ok(payload)
    }

    pub(crate) fn complete(
        &mut self,
        request: RequestId,
        result: Result<ScoreReport, ProviderError>,
    ) -> Delivery {
        match self.state {
            AnalysisState::Analyzing { request: current } if current == request => {}
            _ => return Delivery::Stale,
        }

        match result {
            Ok(report) => {
                self.state = AnalysisState::Done(Box::new(report));
                Delivery::Applied
            }
            Err(err) => {
                self.state = AnalysisState::Idle;
                Delivery::Failed(err)
            }
        }
    }
}
