//! Terminal rendering of a question, independent of any prompt library.

use minitest::{AnswerOption, Layout, QuestionId, QuestionView};

pub const NO_OPTIONS: &str = "No options available for this question.";

const BAR_WIDTH: usize = 20;

/// `[#####---------------] Question 1 of 4`
pub fn progress_bar(round: usize, total: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        (round.min(total) * BAR_WIDTH) / total
    };
    format!(
        "[{}{}] Question {round} of {total}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled)
    )
}

fn image_tag(option: &AnswerOption) -> Option<String> {
    option.image().map(|path| format!("[image: {path}]"))
}

/// A question flattened into owned lines and choices, ready to prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionScreen {
    pub question_id: QuestionId,
    /// Printed above the prompt, in order.
    pub header: Vec<String>,
    /// Labels shown in the selection prompt.
    pub choices: Vec<String>,
    /// The answer text recorded for each choice.
    pub answers: Vec<String>,
    /// Index into `choices` of the current selection.
    pub selected: Option<usize>,
}

impl QuestionScreen {
    pub fn new(view: &QuestionView<'_>) -> Self {
        let question = view.question();
        let mut header = vec![
            progress_bar(view.round(), view.total()),
            String::new(),
            question.text().to_string(),
        ];

        match view.layout() {
            Layout::SharedImage { .. } => {
                if let Some(tag) = view.shared_image().and_then(image_tag) {
                    header.push(tag);
                }
            }
            Layout::TextPair => {
                let pair: Vec<String> = view
                    .options()
                    .iter()
                    .map(|o| format!("[ {} ]", o.option_text))
                    .collect();
                header.push(pair.join("   "));
            }
            Layout::ImageGrid | Layout::TextStack => {}
        }

        if !view.has_options() {
            header.push(NO_OPTIONS.to_string());
        }

        let choices = view
            .options()
            .iter()
            .map(|option| {
                let marker = if view.is_selected(option) { "●" } else { "○" };
                match (view.layout(), image_tag(option)) {
                    (Layout::ImageGrid, Some(tag)) => {
                        format!("{marker} {} {tag}", option.option_text)
                    }
                    _ => format!("{marker} {}", option.option_text),
                }
            })
            .collect();

        let answers = view
            .options()
            .iter()
            .map(|o| o.option_text.clone())
            .collect();

        let selected = view
            .options()
            .iter()
            .position(|option| view.is_selected(option));

        Self {
            question_id: question.id(),
            header,
            choices,
            answers,
            selected,
        }
    }

    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }

    pub fn can_submit(&self) -> bool {
        self.selected.is_some()
    }
}
