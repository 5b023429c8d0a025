use std::fmt;

use crate::Phase;

/// The remote calls a client makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCall {
    RedeemCode,
    ListQuestions,
    SubmitAnswer,
}

impl RemoteCall {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RedeemCode => "redeem code",
            Self::ListQuestions => "list questions",
            Self::SubmitAnswer => "submit answer",
        }
    }

    /// The message shown when this call fails below the application layer.
    pub fn network_message(self) -> &'static str {
        match self {
            Self::RedeemCode => "An error occurred while fetching the survey.",
            Self::ListQuestions => "An error occurred while fetching questions. Please try again.",
            Self::SubmitAnswer => {
                "An error occurred while submitting your answer. Please try again."
            }
        }
    }
}

impl fmt::Display for RemoteCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for client operations.
///
/// The `Display` output is the message shown to the user. Server details and
/// transport causes are kept in `reason` for logging only.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server rejected the access code. The message is the server's own.
    #[error("{0}")]
    InvalidCode(String),

    /// The question list could not be fetched or was malformed.
    #[error("Failed to fetch questions. Please try again.")]
    SurveyFetchFailed { reason: String },

    /// The server did not accept the answer.
    #[error("Failed to submit your answer. Please try again.")]
    SubmitFailed { reason: String },

    /// Transport or parse failure on a remote call.
    #[error("{}", .call.network_message())]
    NetworkError { call: RemoteCall, reason: String },

    /// A transition was requested from a phase that does not offer it.
    #[error("Cannot {action} while the survey is {phase}")]
    OutOfPhase { action: &'static str, phase: Phase },
}

impl ClientError {
    /// Create a network error for the given call.
    pub fn network(call: RemoteCall, reason: impl fmt::Display) -> Self {
        Self::NetworkError {
            call,
            reason: reason.to_string(),
        }
    }

    /// The hidden detail behind a generic message, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::SurveyFetchFailed { reason }
            | Self::SubmitFailed { reason }
            | Self::NetworkError { reason, .. } => Some(reason),
            Self::InvalidCode(_) | Self::OutOfPhase { .. } => None,
        }
    }

    /// Check if repeating the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::SurveyFetchFailed { .. } | Self::SubmitFailed { .. } | Self::NetworkError { .. }
        )
    }
}

/// Error type for key-value store backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store contents are not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
