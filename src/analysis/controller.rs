//! Analysis flow and its status surface.
//!
//! The controller owns the file session and walks one analysis through
//! `Idle -> Ready -> Loading -> Succeeded | Failed`. Whatever goes wrong, the
//! user only ever sees [`GENERIC_ERROR_MESSAGE`]; the detail goes to the log.

use crate::analysis::prompt::build_prompt;
use crate::intake::{SelectedFile, Session};
use crate::llm::client::AnalysisError;
use crate::llm::{response_schema, AnalysisBackend, AnalysisRequest};
use crate::models::{AnalysisResult, Period};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{error, info, warn};

/// The only failure text shown to the user.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred during analysis. Please check the logs for details and ensure your API key is configured correctly.";

const LOADING_MESSAGE: &str = "AI is analyzing... this may take a moment.";

/// Where the flow currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisState {
    /// At least one file is missing.
    Idle,
    /// Both files are selected; analysis can start.
    Ready,
    /// The request is in flight.
    Loading,
    /// The last run produced a result.
    Succeeded(AnalysisResult),
    /// The last run failed.
    Failed { message: String },
}

/// Terminal spinner; cleared when dropped so every exit path ends loading.
struct LoadingIndicator(Option<ProgressBar>);

impl LoadingIndicator {
    fn start(visible: bool) -> Self {
        if !visible {
            return Self(None);
        }

        let pb = ProgressBar::new_spinner();
        let template = "{spinner:.cyan} {msg} [{elapsed}]";
        if let Ok(style) = ProgressStyle::default_spinner().template(template) {
            pb.set_style(style);
        }
        pb.set_message(LOADING_MESSAGE);
        pb.enable_steady_tick(Duration::from_millis(120));
        Self(Some(pb))
    }
}

impl Drop for LoadingIndicator {
    fn drop(&mut self) {
        if let Some(pb) = self.0.take() {
            pb.finish_and_clear();
        }
    }
}

/// Drives one session's analyses.
pub struct AnalysisController {
    session: Session,
    state: AnalysisState,
    show_progress: bool,
}

impl AnalysisController {
    pub fn new(show_progress: bool) -> Self {
        Self {
            session: Session::new(),
            state: AnalysisState::Idle,
            show_progress,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    /// Select a file for a period and return that slot's label.
    ///
    /// Before any run this moves between `Idle` and `Ready`; afterwards the
    /// last outcome stays visible until the next run replaces it.
    pub fn select(&mut self, period: Period, file: SelectedFile) -> &str {
        self.session.select(period, file);

        if matches!(self.state, AnalysisState::Idle | AnalysisState::Ready) {
            self.state = if self.session.can_analyze() {
                AnalysisState::Ready
            } else {
                AnalysisState::Idle
            };
        }

        self.session.label(period)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, AnalysisState::Loading)
    }

    /// Whether the Analyze action is available.
    pub fn is_action_enabled(&self) -> bool {
        self.session.can_analyze() && !self.is_loading()
    }

    /// The last successful result, if the last run succeeded.
    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            AnalysisState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// The user-facing error message, if the last run failed.
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            AnalysisState::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Build the request for the current session, if both files are present.
    pub fn request(&self) -> Option<AnalysisRequest> {
        let (period1, period2) = self.session.files()?;
        Some(AnalysisRequest {
            prompt: build_prompt(&period1.text, &period2.text),
            schema: response_schema(),
        })
    }

    /// Run one analysis against `backend`.
    ///
    /// Does nothing while the action is disabled. Any previous result or
    /// error is cleared before the call.
    pub async fn run<B: AnalysisBackend>(&mut self, backend: &B) -> &AnalysisState {
        if !self.is_action_enabled() {
            warn!("Analysis requested before both feedback files were selected");
            return &self.state;
        }

        let Some(request) = self.request() else {
            return &self.state;
        };

        self.state = AnalysisState::Loading;
        info!("Requesting analysis ({} prompt bytes)", request.prompt.len());

        let outcome = {
            let _loading = LoadingIndicator::start(self.show_progress);
            backend.analyze(&request).await
        };

        match outcome {
            Ok(result) => {
                info!(
                    "Analysis complete: {} action points",
                    result.action_points.len()
                );
                self.state = AnalysisState::Succeeded(result);
            }
            Err(e) => self.fail(e),
        }

        &self.state
    }

    /// Record a failed analysis. The detail is logged; the user only gets
    /// [`GENERIC_ERROR_MESSAGE`].
    pub fn fail(&mut self, err: AnalysisError) {
        error!(kind = err.kind(), "Analysis failed: {}", err);
        self.state = AnalysisState::Failed {
            message: GENERIC_ERROR_MESSAGE.to_string(),
        };
    }
}
