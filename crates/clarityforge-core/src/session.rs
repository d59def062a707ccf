//! Application state controller.
//!
//! Owns the single analysis session: the user's inputs and the lifecycle
//! `Idle -> Loading -> Success | Error`. At most one gateway call is in
//! flight, and every call is keyed by a [`RequestToken`] so a response
//! that arrives after a reset or a newer submit is dropped.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{AnalysisError, ProviderError};
use crate::gateway::AnalysisGateway;
use crate::model::{AnalysisRequest, ClarityAnalysis};

/// Shown when the user submits without an explanation.
pub const EMPTY_EXPLANATION_MESSAGE: &str = "Please provide an explanation to analyze.";

/// Default upper bound on a single gateway call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Identifies one submitted request. Strictly increasing within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Lifecycle phase with its phase-specific payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading {
        token: RequestToken,
    },
    Success(ClarityAnalysis),
    Error(String),
}

/// Payload-free view of [`Phase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Success,
    Error,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Idle => "idle",
            Status::Loading => "loading",
            Status::Success => "success",
            Status::Error => "error",
        };
        f.write_str(s)
    }
}

/// Everything the presentation layer reads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    topic: String,
    explanation: String,
    submitted: Option<AnalysisRequest>,
    phase: Phase,
}

impl SessionState {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// The inputs of the last launched request, unaffected by later edits.
    pub fn submitted(&self) -> Option<&AnalysisRequest> {
        self.submitted.as_ref()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn status(&self) -> Status {
        match self.phase {
            Phase::Idle => Status::Idle,
            Phase::Loading { .. } => Status::Loading,
            Phase::Success(_) => Status::Success,
            Phase::Error(_) => Status::Error,
        }
    }

    /// The analysis, present only in `Success`.
    pub fn result(&self) -> Option<&ClarityAnalysis> {
        match &self.phase {
            Phase::Success(analysis) => Some(analysis),
            _ => None,
        }
    }

    /// The error message, present only in `Error`.
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Error(message) => Some(message),
            _ => None,
        }
    }

    fn in_flight_token(&self) -> Option<RequestToken> {
        match self.phase {
            Phase::Loading { token } => Some(token),
            _ => None,
        }
    }
}

/// What a call to [`SessionController::submit`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A gateway call was launched.
    Started(RequestToken),
    /// Input was invalid; the session is now in `Error` with this message.
    Rejected(String),
    /// A request is already in flight; nothing changed.
    Ignored,
}

struct InFlight {
    token: RequestToken,
    handle: JoinHandle<Result<ClarityAnalysis, AnalysisError>>,
}

/// Drives one session through its lifecycle.
pub struct SessionController {
    id: Uuid,
    gateway: AnalysisGateway,
    timeout: Duration,
    state: SessionState,
    last_token: u64,
    in_flight: Option<InFlight>,
}

impl SessionController {
    pub fn new(gateway: AnalysisGateway) -> Self {
        Self {
            id: Uuid::new_v4(),
            gateway,
            timeout: DEFAULT_TIMEOUT,
            state: SessionState::default(),
            last_token: 0,
            in_flight: None,
        }
    }

    /// Bound each gateway call; expiry is reported as a transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.status() == Status::Loading
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.state.topic = topic.into();
    }

    pub fn set_explanation(&mut self, explanation: impl Into<String>) {
        self.state.explanation = explanation.into();
    }

    /// Validate the current inputs and, if they pass, launch the gateway call.
    ///
    /// Returns before the call resolves; the session is already `Loading`
    /// when this returns [`SubmitOutcome::Started`]. Must be called from
    /// within a tokio runtime.
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.is_loading() {
            debug!(session = %self.id, "submit ignored, request already in flight");
            return SubmitOutcome::Ignored;
        }

        let request = AnalysisRequest::new(self.state.topic.clone(), self.state.explanation.clone());
        if !request.has_explanation() {
            self.state.phase = Phase::Error(EMPTY_EXPLANATION_MESSAGE.to_string());
            return SubmitOutcome::Rejected(EMPTY_EXPLANATION_MESSAGE.to_string());
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                let err = AnalysisError::Configuration(format!("no async runtime: {e}"));
                self.state.phase = Phase::Error(err.to_string());
                return SubmitOutcome::Rejected(err.to_string());
            }
        };

        self.last_token += 1;
        let token = RequestToken(self.last_token);
        self.state.phase = Phase::Loading { token };
        self.state.submitted = Some(request.clone());

        let gateway = self.gateway.clone();
        let timeout = self.timeout;
        let handle = runtime.spawn(async move {
            match tokio::time::timeout(timeout, gateway.analyze(&request)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(ProviderError::Timeout(timeout.as_secs()).into()),
            }
        });
        self.in_flight = Some(InFlight { token, handle });

        info!(session = %self.id, token = token.0, "analysis submitted");
        SubmitOutcome::Started(token)
    }

    /// Wait for the in-flight call, if any, and apply its outcome.
    ///
    /// Cancel-safe: dropping this future leaves the call in flight, so a
    /// following [`SessionController::reset`] can still abort it.
    pub async fn settle(&mut self) -> &SessionState {
        if let Some(in_flight) = self.in_flight.as_mut() {
            let token = in_flight.token;
            let outcome = match (&mut in_flight.handle).await {
                Ok(outcome) => outcome,
                Err(e) => Err(ProviderError::NetworkError(format!("analysis task failed: {e}")).into()),
            };
            self.complete(token, outcome);
        }
        &self.state
    }

    /// Apply the outcome of request `token`.
    ///
    /// Returns `false` and leaves the state untouched when `token` is not
    /// the request the session is currently waiting on.
    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: Result<ClarityAnalysis, AnalysisError>,
    ) -> bool {
        if self.state.in_flight_token() != Some(token) {
            debug!(session = %self.id, token = token.0, "discarding stale response");
            return false;
        }
        if self.in_flight.as_ref().is_some_and(|f| f.token == token) {
            if let Some(in_flight) = self.in_flight.take() {
                in_flight.handle.abort();
            }
        }

        self.state.phase = match outcome {
            Ok(analysis) => {
                info!(session = %self.id, token = token.0, score = analysis.score, "analysis succeeded");
                Phase::Success(analysis)
            }
            Err(e) => {
                warn!(session = %self.id, token = token.0, kind = e.kind(), error = %e, "analysis failed");
                Phase::Error(e.to_string())
            }
        };
        true
    }

    /// Drop any in-flight call and clear inputs, result and error.
    pub fn reset(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.handle.abort();
            debug!(session = %self.id, token = in_flight.token.0, "aborted in-flight request");
        }
        self.state = SessionState::default();
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.handle.abort();
        }
    }
}
