use std::fmt;

use crate::{Question, Selections, Survey};

/// The in-memory state of one survey-taking session.
///
/// There is only ever one session per process. Its phase is derived from the
/// fields, see [`Session::phase`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// The redeemed survey, absent until a code is accepted.
    pub survey: Option<Survey>,

    /// The access code the survey was redeemed with.
    pub token: Option<String>,

    /// Questions in navigation order. Empty until the survey is started.
    pub questions: Vec<Question>,

    /// 0-based pointer into `questions`.
    pub current_index: usize,

    pub selections: Selections,

    /// Set once the last question has been answered.
    pub completed: bool,
}

impl Session {
    /// Create an empty session (code entry).
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the current phase.
    pub fn phase(&self) -> Phase {
        if self.survey.is_none() {
            Phase::CodeEntry
        } else if self.completed {
            Phase::Completed
        } else if self.questions.is_empty() {
            Phase::Intro
        } else {
            Phase::InProgress
        }
    }

    /// The question the pointer is on, if the question loop is running.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// The 1-based position of the current question.
    pub fn current_round(&self) -> usize {
        self.current_index + 1
    }

    /// Check if the current question has a recorded selection.
    pub fn has_current_selection(&self) -> bool {
        self.current_question()
            .is_some_and(|q| self.selections.contains(q.id()))
    }

    /// Check if a restored run carries progress worth resuming.
    pub fn has_saved_progress(&self) -> bool {
        !self.completed && (self.current_index > 0 || !self.selections.is_empty())
    }

    /// Reset the question loop to a fresh run.
    pub fn reset_progress(&mut self) {
        self.current_index = 0;
        self.selections.clear();
        self.completed = false;
    }
}

/// The four phases of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No survey yet; waiting for an access code.
    CodeEntry,

    /// Survey redeemed, questions not loaded.
    Intro,

    /// Walking the question list.
    InProgress,

    /// Every question answered.
    Completed,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CodeEntry => "code entry",
            Self::Intro => "intro",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redeemed() -> Session {
        Session {
            survey: Some(Survey::new(1, "T", "D")),
            token: Some("ABC123".into()),
            ..Session::default()
        }
    }

    #[test]
    fn phase_follows_fields() {
        let mut session = Session::new();
        assert_eq!(session.phase(), Phase::CodeEntry);

        session = redeemed();
        assert_eq!(session.phase(), Phase::Intro);

        session.questions.push(Question::new(3, 1, "Q"));
        assert_eq!(session.phase(), Phase::InProgress);

        session.completed = true;
        assert_eq!(session.phase(), Phase::Completed);
    }

    #[test]
    fn completed_without_questions_is_completed() {
        let mut session = redeemed();
        session.completed = true;
        assert_eq!(session.phase(), Phase::Completed);
    }

    #[test]
    fn saved_progress() {
        let mut session = redeemed();
        assert!(!session.has_saved_progress());

        session.selections.insert(3, "Yes");
        assert!(session.has_saved_progress());

        session.reset_progress();
        session.current_index = 2;
        assert!(session.has_saved_progress());

        session.completed = true;
        assert!(!session.has_saved_progress());
    }
}
