//! # minitest-dialoguer
//!
//! Dialoguer frontend for the minitest survey client.
//!
//! Each phase of a [`SurveyRunner`](minitest::SurveyRunner) gets its own
//! screen: a code prompt, the survey intro, one question at a time, and the
//! completion message. Questions are drawn according to their layout.
//!
//! ## Example
//!
//! ```rust,ignore
//! use minitest::{ClientConfig, FileStore, HttpSurveyService, SessionStore, SurveyRunner};
//! use minitest_dialoguer::DialoguerFrontend;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::load()?;
//!     let service = HttpSurveyService::from_config(&config)?;
//!     let store = SessionStore::new(FileStore::new(config.session_file()?));
//!
//!     let mut runner = SurveyRunner::restore(service, store);
//!     DialoguerFrontend::new().run(&mut runner).await?;
//!     Ok(())
//! }
//! ```

mod frontend;
pub mod render;

pub use frontend::{DialoguerFrontend, FrontendError};
