//! # minitest
//!
//! Survey-taking client core. Frontend-agnostic.
//!
//! A user redeems an access code for a survey, walks its questions one at a
//! time, and each answer is posted to the remote service before the next
//! question is shown. The session is mirrored into a durable key-value store
//! after every transition so a restarted client picks up where it left off.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use minitest::{ClientConfig, FileStore, HttpSurveyService, SessionStore, SurveyRunner};
//!
//! let config = ClientConfig::load()?;
//! let service = HttpSurveyService::from_config(&config)?;
//! let store = SessionStore::new(FileStore::new(config.session_file()?));
//!
//! let mut runner = SurveyRunner::restore(service, store);
//! runner.enter_code("ABC123").await?;
//! runner.start().await?;
//!
//! while let Some(view) = runner.view() {
//!     let question_id = view.question().id();
//!     let choice = view.options()[0].option_text.clone();
//!     runner.select(question_id, choice)?;
//!     runner.advance().await?;
//! }
//! ```
//!
//! ## Components
//!
//! - [`SessionStore`] - best-effort durable mirror of the session
//! - [`AccessGate`] - exchanges an access code for a survey
//! - [`SurveyRunner`] - the four-phase state machine
//! - [`QuestionView`] - layout and submit gate for the current question
//! - [`HttpSurveyService`] - the remote service over HTTP
//!
//! ## Frontends
//!
//! Frontends are separate crates that drive a `SurveyRunner`:
//! - `minitest-dialoguer` - step-by-step terminal client via dialoguer

// Re-export all types from minitest-types
pub use minitest_types::*;

mod session_store;
pub use session_store::{CachedSession, SessionKey, SessionStore, SessionUpdate};

mod store;
pub use store::{FileStore, MemoryStore};

mod access_gate;
pub use access_gate::AccessGate;

mod presenter;
pub use presenter::QuestionView;

mod runner;
pub use runner::{Progress, SurveyRunner};

mod http_service;
pub use http_service::HttpSurveyService;

pub mod config;
pub use config::{ClientConfig, EndpointConfig, HttpConfig, StorageConfig};

// Scripted service for driving a runner without a network
mod test_service;
pub use test_service::{ScriptedFailure, TestService};
