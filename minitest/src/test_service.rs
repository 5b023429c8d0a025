//! Test service for driving a runner without a network.
//!
//! `TestService` answers the three remote calls from pre-scripted data and
//! records every call it receives, so tests can assert on what was sent.
//!
//! # Example
//!
//! ```rust,ignore
//! use minitest::{MemoryStore, SessionStore, SurveyRunner, TestService};
//! use minitest::{AnswerOption, Question, Survey};
//!
//! let service = TestService::new()
//!     .with_survey("ABC123", Survey::new(1, "T", "D"))
//!     .with_questions(1, vec![
//!         Question::new(3, 1, "Tea?").with_option(AnswerOption::text("Yes", 1)),
//!     ]);
//!
//! let mut runner = SurveyRunner::restore(service, SessionStore::new(MemoryStore::new()));
//! runner.enter_code("ABC123").await?;
//! runner.start().await?;
//! runner.select(3, "Yes")?;
//! runner.advance().await?;
//!
//! assert!(runner.is_completed());
//! assert_eq!(runner.service().submissions().len(), 1);
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::{AnswerSubmission, ClientError, Question, RemoteCall, Survey, SurveyId, SurveyService};

/// How a scripted call should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedFailure {
    /// The server answers with a non-success status.
    Status,

    /// The request never gets a usable answer.
    Network,
}

/// A service that returns pre-configured responses.
#[derive(Debug, Default)]
pub struct TestService {
    surveys: HashMap<String, Survey>,
    rejections: HashMap<String, String>,
    questions: HashMap<SurveyId, Vec<Question>>,
    list_failures: Mutex<VecDeque<ScriptedFailure>>,
    submit_failures: Mutex<VecDeque<ScriptedFailure>>,
    calls: Mutex<Vec<RemoteCall>>,
    submissions: Mutex<Vec<AnswerSubmission>>,
}

impl TestService {
    /// Create a service that knows no codes and no surveys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `code` and hand out `survey` for it.
    pub fn with_survey(mut self, code: impl Into<String>, survey: Survey) -> Self {
        self.surveys.insert(code.into(), survey);
        self
    }

    /// Reject `code` with the given server message.
    pub fn with_rejection(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.rejections.insert(code.into(), message.into());
        self
    }

    /// Serve `questions`, in this order, for `survey_id`.
    pub fn with_questions(mut self, survey_id: SurveyId, questions: Vec<Question>) -> Self {
        self.questions.insert(survey_id, questions);
        self
    }

    /// Fail the next question list request.
    pub fn fail_next_list(self, failure: ScriptedFailure) -> Self {
        lock(&self.list_failures).push_back(failure);
        self
    }

    /// Fail the next answer submission.
    pub fn fail_next_submit(self, failure: ScriptedFailure) -> Self {
        lock(&self.submit_failures).push_back(failure);
        self
    }

    /// Every call received, in order.
    pub fn calls(&self) -> Vec<RemoteCall> {
        lock(&self.calls).clone()
    }

    /// Number of calls of one kind.
    pub fn call_count(&self, call: RemoteCall) -> usize {
        lock(&self.calls).iter().filter(|c| **c == call).count()
    }

    /// Every submission received, including failed ones.
    pub fn submissions(&self) -> Vec<AnswerSubmission> {
        lock(&self.submissions).clone()
    }

    fn record(&self, call: RemoteCall) {
        lock(&self.calls).push(call);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl SurveyService for TestService {
    async fn redeem_code(&self, code: &str) -> Result<Survey, ClientError> {
        self.record(RemoteCall::RedeemCode);

        if let Some(message) = self.rejections.get(code) {
            return Err(ClientError::InvalidCode(message.clone()));
        }
        self.surveys
            .get(code)
            .cloned()
            .ok_or_else(|| ClientError::InvalidCode(format!("Unknown code: {code}")))
    }

    async fn list_questions(&self, survey_id: SurveyId) -> Result<Vec<Question>, ClientError> {
        self.record(RemoteCall::ListQuestions);

        match lock(&self.list_failures).pop_front() {
            Some(ScriptedFailure::Status) => {
                return Err(ClientError::SurveyFetchFailed {
                    reason: "scripted failure".into(),
                });
            }
            Some(ScriptedFailure::Network) => {
                return Err(ClientError::network(RemoteCall::ListQuestions, "scripted failure"));
            }
            None => {}
        }

        self.questions
            .get(&survey_id)
            .cloned()
            .ok_or_else(|| ClientError::SurveyFetchFailed {
                reason: format!("no questions scripted for survey {survey_id}"),
            })
    }

    async fn submit_answer(&self, submission: &AnswerSubmission) -> Result<(), ClientError> {
        self.record(RemoteCall::SubmitAnswer);
        lock(&self.submissions).push(submission.clone());

        match lock(&self.submit_failures).pop_front() {
            Some(ScriptedFailure::Status) => Err(ClientError::SubmitFailed {
                reason: "scripted failure".into(),
            }),
            Some(ScriptedFailure::Network) => Err(ClientError::network(
                RemoteCall::SubmitAnswer,
                "scripted failure",
            )),
            None => Ok(()),
        }
    }
}
