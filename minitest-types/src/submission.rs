use serde::Serialize;

use crate::{QuestionId, SurveyId};

/// The payload posted to the remote service for one answered question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerSubmission {
    /// Access code the survey was redeemed with. Sent as `null` when absent.
    pub token: Option<String>,
    pub survey_id: SurveyId,
    pub question_id: QuestionId,
    pub answer_text: String,
    /// 1-based position of the question being answered.
    pub current_round: usize,
    /// Reserved by the server's scoring logic; always an empty object.
    pub weight_adjustment: serde_json::Map<String, serde_json::Value>,
}

impl AnswerSubmission {
    pub fn new(
        token: Option<String>,
        survey_id: SurveyId,
        question_id: QuestionId,
        answer_text: impl Into<String>,
        current_round: usize,
    ) -> Self {
        Self {
            token,
            survey_id,
            question_id,
            answer_text: answer_text.into(),
            current_round,
            weight_adjustment: serde_json::Map::new(),
        }
    }
}
