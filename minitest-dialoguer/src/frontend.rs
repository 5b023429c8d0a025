//! Dialoguer frontend driving a [`SurveyRunner`].

use console::style;
use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::{Input, Select};
use minitest::{ClientError, Phase, Progress, SurveyRunner, SurveyService};
use thiserror::Error;
use tracing::debug;

use crate::render::QuestionScreen;

/// Error type for the Dialoguer frontend.
#[derive(Debug, Error)]
pub enum FrontendError {
    /// User cancelled (e.g., pressed Ctrl+C or Escape).
    #[error("Survey cancelled by user")]
    Cancelled,

    /// An I/O error occurred during prompting.
    #[error("Dialoguer error: {0}")]
    Dialoguer(#[from] dialoguer::Error),
}

/// Helper to check if a dialoguer error is a cancellation (Ctrl+C / Escape)
fn is_cancelled(err: &dialoguer::Error) -> bool {
    matches!(err, dialoguer::Error::IO(io_err) if io_err.kind() == std::io::ErrorKind::Interrupted)
}

fn prompt_error(err: dialoguer::Error) -> FrontendError {
    if is_cancelled(&err) {
        FrontendError::Cancelled
    } else {
        FrontendError::Dialoguer(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Step-by-step terminal client.
///
/// Renders one screen per phase until the user quits. Everything the user
/// does goes through the runner, so the session on disk is always current
/// and a cancelled run can be resumed.
#[derive(Debug, Default, Clone)]
pub struct DialoguerFrontend {
    /// Use colorful theme for prompts.
    colorful: bool,
}

impl DialoguerFrontend {
    /// Create a new frontend with default (colorful) theme.
    pub fn new() -> Self {
        Self { colorful: true }
    }

    /// Create a frontend with plain (no color) theme.
    pub fn plain() -> Self {
        Self { colorful: false }
    }

    fn theme(&self) -> Box<dyn Theme> {
        if self.colorful {
            Box::new(ColorfulTheme::default())
        } else {
            Box::new(SimpleTheme)
        }
    }

    /// Drive the runner until the user quits.
    pub async fn run<S: SurveyService>(
        &self,
        runner: &mut SurveyRunner<S>,
    ) -> Result<(), FrontendError> {
        loop {
            debug!(phase = %runner.phase(), "rendering screen");
            let flow = match runner.phase() {
                Phase::CodeEntry => self.code_entry(runner).await?,
                Phase::Intro => self.intro(runner).await?,
                Phase::InProgress => self.question(runner).await?,
                Phase::Completed => self.completed(runner)?,
            };
            if flow == Flow::Quit {
                return Ok(());
            }
        }
    }

    async fn code_entry<S: SurveyService>(
        &self,
        runner: &mut SurveyRunner<S>,
    ) -> Result<Flow, FrontendError> {
        let theme = self.theme();
        let code = Input::<String>::with_theme(theme.as_ref())
            .with_prompt("Enter your code")
            .allow_empty(false)
            .interact_text()
            .map_err(prompt_error)?;

        let entered = runner.enter_code(code.trim()).await;
        if let Err(err) = entered {
            report(runner, &err);
        }
        Ok(Flow::Continue)
    }

    async fn intro<S: SurveyService>(
        &self,
        runner: &mut SurveyRunner<S>,
    ) -> Result<Flow, FrontendError> {
        if let Some(survey) = runner.survey() {
            println!();
            println!("{}", style(&survey.title).bold());
            if !survey.description.is_empty() {
                println!("{}", survey.description);
            }
            println!();
        }

        let resumable = runner.has_saved_progress();
        let mut items = vec!["Start"];
        if resumable {
            items.push("Resume where you left off");
        }
        items.push("Quit");

        let theme = self.theme();
        let choice = Select::with_theme(theme.as_ref())
            .with_prompt("Ready?")
            .items(&items)
            .default(if resumable { 1 } else { 0 })
            .interact()
            .map_err(prompt_error)?;

        let outcome = match items[choice] {
            "Start" => runner.start().await,
            "Quit" => return Ok(Flow::Quit),
            _ => runner.resume().await,
        };
        if let Err(err) = outcome {
            report(runner, &err);
        }
        Ok(Flow::Continue)
    }

    async fn question<S: SurveyService>(
        &self,
        runner: &mut SurveyRunner<S>,
    ) -> Result<Flow, FrontendError> {
        let Some(screen) = runner.view().map(|view| {
            let layout = view.layout();
            debug!(
                question_id = view.question().id(),
                layout = layout.name(),
                images = layout.shows_images(),
                "rendering question"
            );
            QuestionScreen::new(&view)
        }) else {
            return Ok(Flow::Continue);
        };

        println!();
        for line in &screen.header {
            println!("{line}");
        }

        if !screen.has_choices() {
            return self.dead_end(runner);
        }

        if !screen.can_submit() {
            self.pick(runner, &screen)?;
            return Ok(Flow::Continue);
        }

        for choice in &screen.choices {
            println!("  {choice}");
        }

        let items = ["Submit answer", "Change selection", "Quit"];
        let theme = self.theme();
        let action = Select::with_theme(theme.as_ref())
            .items(&items)
            .default(0)
            .interact()
            .map_err(prompt_error)?;

        match action {
            0 => {
                let advanced = runner.advance().await;
                match advanced {
                    Ok(Progress::Completed) => debug!("last answer accepted"),
                    Ok(_) => {}
                    Err(err) => report(runner, &err),
                }
            }
            1 => self.pick(runner, &screen)?,
            _ => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Ask for an option and record it.
    fn pick<S: SurveyService>(
        &self,
        runner: &mut SurveyRunner<S>,
        screen: &QuestionScreen,
    ) -> Result<(), FrontendError> {
        let theme = self.theme();
        let choice = Select::with_theme(theme.as_ref())
            .with_prompt("Choose an answer")
            .items(&screen.choices)
            .default(screen.selected.unwrap_or(0))
            .interact()
            .map_err(prompt_error)?;

        if let Err(err) = runner.select(screen.question_id, screen.answers[choice].clone()) {
            report(runner, &err);
        }
        Ok(())
    }

    /// A question with nothing to pick can only be left.
    fn dead_end<S: SurveyService>(
        &self,
        runner: &mut SurveyRunner<S>,
    ) -> Result<Flow, FrontendError> {
        let items = ["Start over with a new code", "Quit"];
        let theme = self.theme();
        let choice = Select::with_theme(theme.as_ref())
            .items(&items)
            .default(1)
            .interact()
            .map_err(prompt_error)?;

        if choice == 0 {
            runner.restart();
            Ok(Flow::Continue)
        } else {
            Ok(Flow::Quit)
        }
    }

    fn completed<S: SurveyService>(
        &self,
        runner: &mut SurveyRunner<S>,
    ) -> Result<Flow, FrontendError> {
        println!();
        println!("{}", style("Thank you! Your answers have been submitted.").green().bold());
        if let Some(survey) = runner.survey() {
            println!("{}", style(&survey.title).dim());
        }
        println!();

        let items = ["Start a new survey", "Quit"];
        let theme = self.theme();
        let choice = Select::with_theme(theme.as_ref())
            .items(&items)
            .default(1)
            .interact()
            .map_err(prompt_error)?;

        if choice == 0 {
            runner.restart();
            Ok(Flow::Continue)
        } else {
            Ok(Flow::Quit)
        }
    }
}

/// Print the banner of a failed action once.
fn report<S: SurveyService>(runner: &mut SurveyRunner<S>, err: &ClientError) {
    let message = runner
        .banner()
        .map(str::to_owned)
        .unwrap_or_else(|| err.to_string());
    eprintln!("{}", style(message).red());
    runner.dismiss_banner();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontend_creation() {
        assert!(DialoguerFrontend::new().colorful);
        assert!(!DialoguerFrontend::plain().colorful);
    }

    #[test]
    fn error_types() {
        let err = FrontendError::Cancelled;
        assert_eq!(err.to_string(), "Survey cancelled by user");
    }

    #[test]
    fn interrupted_prompt_is_a_cancellation() {
        let interrupted = dialoguer::Error::IO(std::io::Error::from(std::io::ErrorKind::Interrupted));
        assert!(matches!(prompt_error(interrupted), FrontendError::Cancelled));

        let broken = dialoguer::Error::IO(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        assert!(matches!(prompt_error(broken), FrontendError::Dialoguer(_)));
    }
}
