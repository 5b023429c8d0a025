use serde::{Deserialize, Serialize};

/// Identifier of a question on the remote service.
pub type QuestionId = u64;

/// A single question in a survey.
///
/// Questions arrive from the remote service as an unordered batch. Use
/// [`sort_questions`] before walking them; `question_number` is the only
/// navigation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    question_id: QuestionId,

    question_text: String,

    /// Free-form type tag from the server. Carried, never interpreted.
    #[serde(default)]
    question_type: String,

    question_number: i64,

    /// Declared by the server but not enforced by the client.
    #[serde(default)]
    shuffle_options: bool,

    /// Creation timestamp, kept in the server's own format.
    #[serde(default)]
    created_at: String,

    #[serde(default)]
    options: Vec<AnswerOption>,
}

impl Question {
    /// Create a new question with no options.
    pub fn new(question_id: QuestionId, question_number: i64, text: impl Into<String>) -> Self {
        Self {
            question_id,
            question_text: text.into(),
            question_type: String::new(),
            question_number,
            shuffle_options: false,
            created_at: String::new(),
            options: Vec::new(),
        }
    }

    /// Set the options.
    pub fn with_options(mut self, options: Vec<AnswerOption>) -> Self {
        self.options = options;
        self
    }

    /// Append a single option.
    pub fn with_option(mut self, option: AnswerOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn id(&self) -> QuestionId {
        self.question_id
    }

    /// Get the display text.
    pub fn text(&self) -> &str {
        &self.question_text
    }

    pub fn question_type(&self) -> &str {
        &self.question_type
    }

    /// Get the ordering key.
    pub fn number(&self) -> i64 {
        self.question_number
    }

    pub fn shuffle_options(&self) -> bool {
        self.shuffle_options
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Get the options in the order the server sent them.
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    /// Check if any option carries an image.
    pub fn has_images(&self) -> bool {
        self.options.iter().any(AnswerOption::has_image)
    }
}

/// One selectable answer of a [`Question`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub option_text: String,

    /// Image reference. An empty string counts as no image.
    #[serde(default)]
    pub option_image_path: Option<String>,

    /// Used only for stable rendering order.
    #[serde(default)]
    pub option_order: i64,

    /// Opaque server-side weighting, passed through untouched.
    #[serde(default)]
    pub weights: serde_json::Value,
}

impl AnswerOption {
    /// Create a text-only option.
    pub fn text(option_text: impl Into<String>, option_order: i64) -> Self {
        Self {
            option_text: option_text.into(),
            option_image_path: None,
            option_order,
            weights: serde_json::Value::Null,
        }
    }

    /// Create an option with an image.
    pub fn with_image(
        option_text: impl Into<String>,
        image_path: impl Into<String>,
        option_order: i64,
    ) -> Self {
        Self {
            option_image_path: Some(image_path.into()),
            ..Self::text(option_text, option_order)
        }
    }

    /// Get the image reference, treating an empty path as absent.
    pub fn image(&self) -> Option<&str> {
        self.option_image_path.as_deref().filter(|p| !p.is_empty())
    }

    /// Check if this option carries an image.
    pub fn has_image(&self) -> bool {
        self.image().is_some()
    }
}

/// Sort a fetched question batch into navigation order.
///
/// Ascending by `question_number`. The sort is stable, so ties keep the
/// order the server sent them in.
pub fn sort_questions(questions: &mut [Question]) {
    questions.sort_by_key(Question::number);
}
