use minitest_types::{AnswerOption, Layout, Question};

/// Everything a frontend needs to draw the current question.
///
/// Holds no state of its own beyond the selection the caller passes in.
/// Choices go back through [`SurveyRunner::select`](crate::SurveyRunner::select).
#[derive(Debug, Clone)]
pub struct QuestionView<'a> {
    question: &'a Question,
    layout: Layout,
    options: Vec<&'a AnswerOption>,
    selected: Option<&'a str>,
    round: usize,
    total: usize,
}

impl<'a> QuestionView<'a> {
    pub fn new(question: &'a Question, selected: Option<&'a str>, round: usize, total: usize) -> Self {
        let mut options: Vec<&AnswerOption> = question.options().iter().collect();
        options.sort_by_key(|o| o.option_order);

        Self {
            question,
            layout: Layout::for_options(question.options()),
            options,
            selected,
            round,
            total,
        }
    }

    pub fn question(&self) -> &'a Question {
        self.question
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Options in rendering order (stable by `option_order`).
    pub fn options(&self) -> &[&'a AnswerOption] {
        &self.options
    }

    /// The option whose image is shown above both choices, for `SharedImage`.
    pub fn shared_image(&self) -> Option<&'a AnswerOption> {
        match self.layout {
            Layout::SharedImage { image_option } => self.question.options().get(image_option),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<&'a str> {
        self.selected
    }

    pub fn is_selected(&self, option: &AnswerOption) -> bool {
        self.selected == Some(option.option_text.as_str())
    }

    /// The submit action is only enabled once something is chosen.
    pub fn can_submit(&self) -> bool {
        self.selected.is_some()
    }

    /// 1-based round.
    pub fn round(&self) -> usize {
        self.round
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Fraction of the survey reached, counting the current question.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.round as f64 / self.total as f64
        }
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question::new(3, 1, "Pick one")
            .with_option(AnswerOption::text("Later", 2))
            .with_option(AnswerOption::with_image("First", "/img/first.png", 1))
    }

    #[test]
    fn options_render_in_option_order() {
        let question = question();
        let view = QuestionView::new(&question, None, 1, 2);

        let texts: Vec<_> = view.options().iter().map(|o| o.option_text.as_str()).collect();
        assert_eq!(texts, vec!["First", "Later"]);
    }

    #[test]
    fn shared_image_points_at_the_image_option() {
        let question = question();
        let view = QuestionView::new(&question, None, 1, 2);

        assert_eq!(view.layout(), Layout::SharedImage { image_option: 1 });
        assert_eq!(view.shared_image().map(|o| o.option_text.as_str()), Some("First"));
    }

    #[test]
    fn submit_is_gated_on_a_selection() {
        let question = question();
        assert!(!QuestionView::new(&question, None, 1, 2).can_submit());

        let view = QuestionView::new(&question, Some("Later"), 1, 2);
        assert!(view.can_submit());
        assert!(view.is_selected(&AnswerOption::text("Later", 9)));
        assert!(!view.is_selected(&AnswerOption::text("First", 1)));
    }

    #[test]
    fn progress_counts_the_current_round() {
        let question = question();
        let view = QuestionView::new(&question, None, 1, 4);
        assert!((view.progress() - 0.25).abs() < f64::EPSILON);
    }
}
