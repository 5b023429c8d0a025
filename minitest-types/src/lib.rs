//! Core types for the minitest survey client.
//!
//! This crate provides the presentation-agnostic building blocks:
//! - `Survey`, `Question` and `AnswerOption` - What the remote service hands out
//! - `Selections` - The user's chosen answers, keyed by question
//! - `Session` and `Phase` - The single in-memory session and its derived phase
//! - `Layout` - How a question's options are laid out
//! - `SurveyService` and `KeyValueStore` traits - The remote and persistence seams

mod survey;
pub use survey::{Survey, SurveyId};

mod question;
pub use question::{AnswerOption, Question, QuestionId, sort_questions};

mod selections;
pub use selections::Selections;

mod session;
pub use session::{Phase, Session};

mod layout;
pub use layout::Layout;

mod submission;
pub use submission::AnswerSubmission;

mod error;
pub use error::{ClientError, RemoteCall, StoreError};

mod traits;
pub use traits::{KeyValueStore, SurveyService};
