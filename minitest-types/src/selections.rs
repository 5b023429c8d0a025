use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::QuestionId;

/// The user's chosen answers, keyed by question.
///
/// At most one entry per question; the last write wins. Serializes as a JSON
/// object whose keys are the stringified question ids, e.g. `{"3":"Yes"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selections {
    values: BTreeMap<QuestionId, String>,
}

impl Selections {
    /// Create an empty selection map.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Record a choice, returning the one it replaced.
    pub fn insert(&mut self, question_id: QuestionId, option_text: impl Into<String>) -> Option<String> {
        self.values.insert(question_id, option_text.into())
    }

    /// Get the choice recorded for a question.
    pub fn get(&self, question_id: QuestionId) -> Option<&str> {
        self.values.get(&question_id).map(String::as_str)
    }

    pub fn contains(&self, question_id: QuestionId) -> bool {
        self.values.contains_key(&question_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &str)> {
        self.values.iter().map(|(id, text)| (*id, text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl FromIterator<(QuestionId, String)> for Selections {
    fn from_iter<I: IntoIterator<Item = (QuestionId, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
