use serde::{Deserialize, Serialize};

/// Identifier of a survey on the remote service.
pub type SurveyId = u64;

/// A survey definition as returned by the remote service when a code is redeemed.
///
/// Immutable once fetched. The question list is fetched separately, keyed by
/// [`Survey::survey_id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survey {
    pub survey_id: SurveyId,
    pub title: String,
    pub description: String,
}

impl Survey {
    /// Create a new survey definition.
    pub fn new(survey_id: SurveyId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            survey_id,
            title: title.into(),
            description: description.into(),
        }
    }
}
