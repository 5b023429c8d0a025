//! Durable mirror of the session.
//!
//! Five fixed keys, each independently optional. Every read and write is
//! best-effort: a failing backend is logged and otherwise ignored, so the
//! worst case is a cold start with nothing to resume.

use minitest_types::{KeyValueStore, Selections, Session, Survey};
use tracing::{debug, warn};

/// The persisted keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    Survey,
    Token,
    Selections,
    CurrentIndex,
    Completed,
}

impl SessionKey {
    /// All keys, in the order they are written.
    pub const ALL: [SessionKey; 5] = [
        Self::Survey,
        Self::Token,
        Self::Selections,
        Self::CurrentIndex,
        Self::Completed,
    ];

    /// The storage key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Survey => "cachedSurvey",
            Self::Token => "cachedToken",
            Self::Selections => "userSelections",
            Self::CurrentIndex => "currentQuestionIndex",
            Self::Completed => "isCompleted",
        }
    }
}

/// A partial write. Only the fields that are set are stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionUpdate<'a> {
    pub survey: Option<&'a Survey>,
    pub token: Option<&'a str>,
    pub selections: Option<&'a Selections>,
    pub current_index: Option<usize>,
    pub completed: Option<bool>,
}

impl<'a> SessionUpdate<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything a transition changes: survey, selections, index and flag.
    ///
    /// The token is left out; it is written by the access gate alone.
    pub fn snapshot(session: &'a Session) -> Self {
        Self {
            survey: session.survey.as_ref(),
            token: None,
            selections: Some(&session.selections),
            current_index: Some(session.current_index),
            completed: Some(session.completed),
        }
    }

    pub fn survey(mut self, survey: &'a Survey) -> Self {
        self.survey = Some(survey);
        self
    }

    pub fn token(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    pub fn selections(mut self, selections: &'a Selections) -> Self {
        self.selections = Some(selections);
        self
    }

    pub fn current_index(mut self, index: usize) -> Self {
        self.current_index = Some(index);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}

/// Whatever the store held at load time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CachedSession {
    pub survey: Option<Survey>,
    pub token: Option<String>,
    pub selections: Option<Selections>,
    pub current_index: Option<usize>,
    pub completed: Option<bool>,
}

impl CachedSession {
    /// Check if nothing was cached.
    pub fn is_empty(&self) -> bool {
        self.survey.is_none()
            && self.token.is_none()
            && self.selections.is_none()
            && self.current_index.is_none()
            && self.completed.is_none()
    }

    /// Rebuild a session from the cache.
    ///
    /// A survey without a token is never trusted: unless both are present the
    /// result is an empty session, whatever else was cached. Missing progress
    /// fields fall back to index 0, no selections, not completed. The question
    /// list is not cached, so a restored session starts without one.
    pub fn into_session(self) -> Session {
        match (self.survey, self.token) {
            (Some(survey), Some(token)) => Session {
                survey: Some(survey),
                token: Some(token),
                questions: Vec::new(),
                current_index: self.current_index.unwrap_or(0),
                selections: self.selections.unwrap_or_default(),
                completed: self.completed.unwrap_or(false),
            },
            _ => Session::new(),
        }
    }
}

/// Best-effort persistence of a session over a [`KeyValueStore`].
pub struct SessionStore {
    backend: Box<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Write the fields set in `update`, overwriting prior values.
    pub fn save(&self, update: &SessionUpdate<'_>) {
        if let Some(survey) = update.survey {
            match serde_json::to_string(survey) {
                Ok(json) => self.write(SessionKey::Survey, &json),
                Err(e) => warn!(error = %e, "could not serialize survey"),
            }
        }
        if let Some(token) = update.token {
            self.write(SessionKey::Token, token);
        }
        if let Some(selections) = update.selections {
            match serde_json::to_string(selections) {
                Ok(json) => self.write(SessionKey::Selections, &json),
                Err(e) => warn!(error = %e, "could not serialize selections"),
            }
        }
        if let Some(index) = update.current_index {
            self.write(SessionKey::CurrentIndex, &index.to_string());
        }
        if let Some(completed) = update.completed {
            self.write(SessionKey::Completed, if completed { "true" } else { "false" });
        }
    }

    /// Read every key. Unreadable or unparsable entries come back as `None`.
    pub fn load(&self) -> CachedSession {
        CachedSession {
            survey: self.read_json(SessionKey::Survey),
            token: self.read(SessionKey::Token),
            selections: self.read_json(SessionKey::Selections),
            current_index: self.read(SessionKey::CurrentIndex).and_then(|raw| {
                raw.trim()
                    .parse()
                    .inspect_err(|e| warn!(value = %raw, error = %e, "ignoring cached index"))
                    .ok()
            }),
            completed: self.read_json(SessionKey::Completed),
        }
    }

    /// Remove the given keys.
    pub fn clear(&self, keys: &[SessionKey]) {
        for key in keys {
            if let Err(e) = self.backend.remove(key.as_str()) {
                warn!(key = key.as_str(), error = %e, "session store remove failed");
            }
        }
    }

    /// Remove all five keys.
    pub fn clear_all(&self) {
        self.clear(&SessionKey::ALL);
    }

    fn write(&self, key: SessionKey, value: &str) {
        debug!(key = key.as_str(), "persisting");
        if let Err(e) = self.backend.set(key.as_str(), value) {
            warn!(key = key.as_str(), error = %e, "session store write failed");
        }
    }

    fn read(&self, key: SessionKey) -> Option<String> {
        self.backend
            .get(key.as_str())
            .inspect_err(|e| warn!(key = key.as_str(), error = %e, "session store read failed"))
            .ok()
            .flatten()
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: SessionKey) -> Option<T> {
        let raw = self.read(key)?;
        serde_json::from_str(&raw)
            .inspect_err(|e| warn!(key = key.as_str(), error = %e, "ignoring unparsable cache entry"))
            .ok()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn stored_formats() {
        let backend = MemoryStore::new();
        let store = SessionStore::new(backend.clone());
        let survey = Survey::new(1, "T", "D");
        let mut selections = Selections::new();
        selections.insert(3, "Yes");

        store.save(
            &SessionUpdate::new()
                .survey(&survey)
                .token("ABC123")
                .selections(&selections)
                .current_index(4)
                .completed(true),
        );

        assert_eq!(
            backend.get("cachedSurvey").unwrap().as_deref(),
            Some(r#"{"survey_id":1,"title":"T","description":"D"}"#)
        );
        assert_eq!(backend.get("cachedToken").unwrap().as_deref(), Some("ABC123"));
        assert_eq!(backend.get("userSelections").unwrap().as_deref(), Some(r#"{"3":"Yes"}"#));
        assert_eq!(backend.get("currentQuestionIndex").unwrap().as_deref(), Some("4"));
        assert_eq!(backend.get("isCompleted").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn partial_save_leaves_other_keys() {
        let backend = MemoryStore::new();
        let store = SessionStore::new(backend.clone());

        store.save(&SessionUpdate::new().token("ABC123"));
        store.save(&SessionUpdate::new().current_index(2));

        let cached = store.load();
        assert_eq!(cached.token.as_deref(), Some("ABC123"));
        assert_eq!(cached.current_index, Some(2));
        assert_eq!(cached.survey, None);
    }

    #[test]
    fn corrupt_entries_load_as_absent() {
        let backend = MemoryStore::new();
        backend.set("cachedSurvey", "{not json").unwrap();
        backend.set("currentQuestionIndex", "three").unwrap();
        backend.set("cachedToken", "ABC123").unwrap();

        let cached = SessionStore::new(backend).load();
        assert_eq!(cached.survey, None);
        assert_eq!(cached.current_index, None);
        assert_eq!(cached.token.as_deref(), Some("ABC123"));
    }

    #[test]
    fn tokenless_cache_restores_nothing() {
        let cached = CachedSession {
            survey: Some(Survey::new(1, "T", "D")),
            current_index: Some(3),
            completed: Some(true),
            ..CachedSession::default()
        };
        assert_eq!(cached.into_session(), Session::new());
    }

    #[test]
    fn missing_progress_fields_default() {
        let cached = CachedSession {
            survey: Some(Survey::new(1, "T", "D")),
            token: Some("ABC123".into()),
            ..CachedSession::default()
        };
        let session = cached.into_session();

        assert_eq!(session.current_index, 0);
        assert!(session.selections.is_empty());
        assert!(!session.completed);
        assert!(session.questions.is_empty());
    }

    #[test]
    fn clear_removes_only_named_keys() {
        let backend = MemoryStore::new();
        let store = SessionStore::new(backend.clone());
        store.save(&SessionUpdate::new().token("ABC123").current_index(1));

        store.clear(&[SessionKey::CurrentIndex]);
        assert_eq!(backend.keys(), vec!["cachedToken".to_string()]);

        store.clear_all();
        assert!(backend.is_empty());
    }
}
