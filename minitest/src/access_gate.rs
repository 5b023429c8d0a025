use minitest_types::{ClientError, Survey, SurveyService};
use tracing::{debug, info};

use crate::{SessionStore, SessionUpdate};

/// Exchanges an access code for a survey.
///
/// On success the code becomes the session's token and is persisted, so a
/// reload can keep talking to the service on the same authorization.
pub struct AccessGate<'a, S: ?Sized> {
    service: &'a S,
    store: &'a SessionStore,
}

impl<'a, S: SurveyService + ?Sized> AccessGate<'a, S> {
    pub fn new(service: &'a S, store: &'a SessionStore) -> Self {
        Self { service, store }
    }

    /// Redeem `code`.
    ///
    /// A rejected code fails with [`ClientError::InvalidCode`] carrying the
    /// server's message. Nothing is persisted on failure and there is no retry.
    pub async fn submit_code(&self, code: &str) -> Result<Survey, ClientError> {
        debug!("redeeming access code");
        let survey = self.service.redeem_code(code).await?;

        self.store.save(&SessionUpdate::new().token(code));
        info!(survey_id = survey.survey_id, title = %survey.title, "access code accepted");
        Ok(survey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, TestService};

    #[tokio::test]
    async fn accepted_code_is_persisted_as_token() {
        let service = TestService::new().with_survey("ABC123", Survey::new(1, "T", "D"));
        let store = SessionStore::new(MemoryStore::new());

        let survey = AccessGate::new(&service, &store)
            .submit_code("ABC123")
            .await
            .unwrap();

        assert_eq!(survey, Survey::new(1, "T", "D"));
        assert_eq!(store.load().token.as_deref(), Some("ABC123"));
    }

    #[tokio::test]
    async fn rejected_code_persists_nothing() {
        let service = TestService::new().with_rejection("NOPE", "Invalid token");
        let store = SessionStore::new(MemoryStore::new());

        let err = AccessGate::new(&service, &store)
            .submit_code("NOPE")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid token");
        assert!(store.load().is_empty());
    }
}
