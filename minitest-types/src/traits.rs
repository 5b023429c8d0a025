use crate::{AnswerSubmission, ClientError, Question, StoreError, Survey, SurveyId};

/// The remote survey service.
///
/// Implementations map the service's responses onto [`ClientError`]:
/// a rejected code becomes `InvalidCode`, a non-success status becomes
/// `SurveyFetchFailed` or `SubmitFailed`, and a transport or parse failure
/// becomes `NetworkError`.
#[async_trait::async_trait]
pub trait SurveyService: Send + Sync {
    /// Exchange an access code for a survey definition.
    async fn redeem_code(&self, code: &str) -> Result<Survey, ClientError>;

    /// Fetch the question batch for a survey, in whatever order the server
    /// returns it.
    async fn list_questions(&self, survey_id: SurveyId) -> Result<Vec<Question>, ClientError>;

    /// Record one answer. Returns `Ok` only on an explicit success status.
    async fn submit_answer(&self, submission: &AnswerSubmission) -> Result<(), ClientError>;
}

/// A durable string key-value store, the persistence behind a session.
///
/// Methods take `&self`; backends use interior mutability.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
