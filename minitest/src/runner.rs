//! The survey runner: one session, four phases.
//!
//! ```text
//! CodeEntry --enter_code--> Intro --start/resume--> InProgress --advance--> Completed
//!     ^                                              |    ^                    |
//!     |                                              +----+ (advance)          |
//!     +------------------------------ restart ------------------------------- +
//! ```
//!
//! Every successful transition ends with a single `persist()`
//! call, so the store always reflects the last completed transition. A failed
//! transition leaves the session untouched and sets the banner.

use minitest_types::{
    AnswerSubmission, ClientError, Phase, Question, QuestionId, Selections, Session, Survey,
    SurveyService, sort_questions,
};
use tracing::{debug, info, warn};

use crate::{AccessGate, QuestionView, SessionStore, SessionUpdate};

/// Outcome of [`SurveyRunner::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Nothing happened: the current question has no selection yet.
    AwaitingSelection,

    /// The answer was accepted and the pointer moved to the next question.
    Advanced,

    /// The answer to the last question was accepted.
    Completed,
}

/// Owns the session and drives it through its phases.
pub struct SurveyRunner<S> {
    service: S,
    store: SessionStore,
    session: Session,
    banner: Option<String>,
}

impl<S: SurveyService> SurveyRunner<S> {
    /// Create a runner, rehydrating whatever the store holds.
    ///
    /// Only a cached survey together with a cached token is trusted; anything
    /// less starts at code entry.
    pub fn restore(service: S, store: SessionStore) -> Self {
        let session = store.load().into_session();
        info!(phase = %session.phase(), "session restored");
        Self {
            service,
            store,
            session,
            banner: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn survey(&self) -> Option<&Survey> {
        self.session.survey.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    /// Questions in navigation order.
    pub fn questions(&self) -> &[Question] {
        &self.session.questions
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    pub fn current_index(&self) -> usize {
        self.session.current_index
    }

    pub fn current_round(&self) -> usize {
        self.session.current_round()
    }

    pub fn total_questions(&self) -> usize {
        self.session.questions.len()
    }

    pub fn selections(&self) -> &Selections {
        &self.session.selections
    }

    pub fn is_completed(&self) -> bool {
        self.session.completed
    }

    /// Check if a restored run can be picked up where it left off.
    pub fn has_saved_progress(&self) -> bool {
        self.phase() == Phase::Intro && self.session.has_saved_progress()
    }

    /// The message of the last failed action, until the next action runs.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    /// The current question laid out for display, while the loop is running.
    pub fn view(&self) -> Option<QuestionView<'_>> {
        if self.phase() != Phase::InProgress {
            return None;
        }
        let question = self.session.current_question()?;
        Some(QuestionView::new(
            question,
            self.session.selections.get(question.id()),
            self.session.current_round(),
            self.session.questions.len(),
        ))
    }

    /// CodeEntry -> Intro.
    pub async fn enter_code(&mut self, code: &str) -> Result<(), ClientError> {
        self.banner = None;
        self.require("enter a code", Phase::CodeEntry)?;

        let redeemed = AccessGate::new(&self.service, &self.store)
            .submit_code(code)
            .await;
        let survey = match redeemed {
            Ok(survey) => survey,
            Err(err) => return Err(self.fail(err)),
        };

        self.session.survey = Some(survey);
        self.session.token = Some(code.to_string());
        self.persist();
        info!(phase = %self.phase(), "survey redeemed");
        Ok(())
    }

    /// Intro -> InProgress, starting a fresh run.
    ///
    /// Previous selections, index and completion flag are discarded, in memory
    /// and in the store, even when they were just restored from a reload.
    pub async fn start(&mut self) -> Result<(), ClientError> {
        self.banner = None;
        self.require("start the survey", Phase::Intro)?;

        let fetched = self.fetch_questions().await;
        let questions = match fetched {
            Ok(questions) => questions,
            Err(err) => return Err(self.fail(err)),
        };

        self.session.questions = questions;
        self.session.reset_progress();
        self.persist();
        info!(questions = self.session.questions.len(), "survey started");
        Ok(())
    }

    /// Intro -> InProgress, keeping restored selections and position.
    ///
    /// The restored index is clamped into the freshly fetched list.
    pub async fn resume(&mut self) -> Result<(), ClientError> {
        self.banner = None;
        self.require("resume the survey", Phase::Intro)?;

        let fetched = self.fetch_questions().await;
        let questions = match fetched {
            Ok(questions) => questions,
            Err(err) => return Err(self.fail(err)),
        };

        let last = questions.len() - 1;
        if self.session.current_index > last {
            warn!(
                restored = self.session.current_index,
                last, "restored index past the end of the survey, clamping"
            );
            self.session.current_index = last;
        }
        self.session.questions = questions;
        self.persist();
        info!(
            round = self.session.current_round(),
            questions = self.session.questions.len(),
            "survey resumed"
        );
        Ok(())
    }

    /// Record the user's choice for a question. Last write wins.
    pub fn select(
        &mut self,
        question_id: QuestionId,
        option_text: impl Into<String>,
    ) -> Result<(), ClientError> {
        self.banner = None;
        self.require("select an answer", Phase::InProgress)?;

        let option_text = option_text.into();
        debug!(question_id, answer = %option_text, "selection recorded");
        self.session.selections.insert(question_id, option_text);
        self.persist();
        Ok(())
    }

    /// Submit the current answer, then move on.
    ///
    /// Without a selection for the current question this does nothing: no
    /// remote call, no index change. The pointer only moves once the service
    /// reports success; on failure the user stays on the same question.
    pub async fn advance(&mut self) -> Result<Progress, ClientError> {
        self.banner = None;
        self.require("submit an answer", Phase::InProgress)?;

        let Some(submission) = self.pending_submission() else {
            debug!("advance ignored, no selection for the current question");
            return Ok(Progress::AwaitingSelection);
        };

        debug!(
            question_id = submission.question_id,
            round = submission.current_round,
            "submitting answer"
        );
        let submitted = self.service.submit_answer(&submission).await;
        if let Err(err) = submitted {
            return Err(self.fail(err));
        }

        let progress = if self.session.current_index + 1 < self.session.questions.len() {
            self.session.current_index += 1;
            Progress::Advanced
        } else {
            self.session.completed = true;
            Progress::Completed
        };
        self.persist();

        if progress == Progress::Completed {
            info!("survey completed");
        }
        Ok(progress)
    }

    /// Back to code entry, forgetting everything including the token.
    pub fn restart(&mut self) {
        self.banner = None;
        self.session = Session::new();
        self.store.clear_all();
        info!("session cleared");
    }

    /// Mirror the session into the store.
    fn persist(&self) {
        self.store.save(&SessionUpdate::snapshot(&self.session));
    }

    fn require(&self, action: &'static str, expected: Phase) -> Result<(), ClientError> {
        let phase = self.phase();
        if phase == expected {
            Ok(())
        } else {
            Err(ClientError::OutOfPhase { action, phase })
        }
    }

    fn fail(&mut self, err: ClientError) -> ClientError {
        match err.reason() {
            Some(reason) => warn!(%reason, "{err}"),
            None => warn!("{err}"),
        }
        self.banner = Some(err.to_string());
        err
    }

    /// Fetch and sort the question list. All or nothing.
    async fn fetch_questions(&self) -> Result<Vec<Question>, ClientError> {
        let Some(survey_id) = self.session.survey.as_ref().map(|s| s.survey_id) else {
            return Err(ClientError::OutOfPhase {
                action: "fetch questions",
                phase: self.phase(),
            });
        };

        let mut questions = self.service.list_questions(survey_id).await?;
        if questions.is_empty() {
            return Err(ClientError::SurveyFetchFailed {
                reason: format!("survey {survey_id} has no questions"),
            });
        }
        sort_questions(&mut questions);
        Ok(questions)
    }

    fn pending_submission(&self) -> Option<AnswerSubmission> {
        let survey = self.session.survey.as_ref()?;
        let question = self.session.current_question()?;
        let answer = self.session.selections.get(question.id())?;

        Some(AnswerSubmission::new(
            self.session.token.clone(),
            survey.survey_id,
            question.id(),
            answer,
            self.session.current_round(),
        ))
    }
}

impl<S> std::fmt::Debug for SurveyRunner<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurveyRunner")
            .field("session", &self.session)
            .field("banner", &self.banner)
            .finish_non_exhaustive()
    }
}
