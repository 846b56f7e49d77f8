use anyhow::Context;
use inquire::{
    ui::{Attributes, Color, RenderConfig, StyleSheet, Styled},
    InquireError, Text,
};
use owo_colors::{OwoColorize, Stream, Style};
use std::io::{BufRead, IsTerminal, Write};

/// The only answer accepted as "yes", after trimming and lower-casing.
pub const AFFIRMATIVE: &str = "y";

/// Source of answers to interactive questions.
///
/// A prompter owns the input handle for as long as it lives. It is created
/// once per run and dropped on every way out of it.
pub trait Prompter {
    /// Shows `question` and blocks until a line is answered. [`None`] means
    /// the user gave no answer at all (end of input or a cancelled prompt).
    fn ask(&mut self, question: &str) -> anyhow::Result<Option<String>>;

    /// Asks a yes/no question. Anything but [`AFFIRMATIVE`] is a no.
    fn confirm(&mut self, question: &str) -> anyhow::Result<bool> {
        let answer = self.ask(question)?;
        crate::trace!("Answer to confirmation: {answer:?}");

        Ok(answer.is_some_and(|a| is_affirmative(&a)))
    }
}

/// Yellow and bold, for questions written to stdout.
#[must_use]
pub fn question_style() -> Style {
    Style::new().yellow().bold()
}

#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().to_lowercase() == AFFIRMATIVE
}

/// Reads answers line by line, writing questions to `output`.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
    style: Option<Style>,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LinePrompter {
            input,
            output,
            style: None,
        }
    }

    /// Paints questions with `style` when stdout supports color.
    #[must_use]
    pub fn styled(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, question: &str) -> anyhow::Result<Option<String>> {
        match self.style {
            Some(style) => write!(
                self.output,
                "{}",
                question.if_supports_color(Stream::Stdout, |q| q.style(style))
            ),
            None => write!(self.output, "{question}"),
        }
        .context("Failed to write prompt")?;
        self.output.flush().context("Failed to write prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read answer")?;

        if read == 0 {
            // Keep the terminal tidy when input ended without a newline
            writeln!(self.output).context("Failed to write prompt")?;
            Ok(None)
        } else {
            Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
        }
    }
}

/// Asks on the terminal through `inquire`, which draws on the terminal
/// itself rather than on the process' stdout.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn render_config() -> RenderConfig<'static> {
        let mut config = RenderConfig::default()
            .with_prompt_prefix(Styled::new(""))
            .with_answered_prompt_prefix(Styled::new(""));
        config.prompt = StyleSheet::new()
            .with_fg(Color::DarkYellow)
            .with_attr(Attributes::BOLD);

        config
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, question: &str) -> anyhow::Result<Option<String>> {
        match Text::new(question)
            .with_render_config(Self::render_config())
            .prompt()
        {
            Ok(answer) => Ok(Some(answer)),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
            Err(e) => Err(e).context("Failed to read answer"),
        }
    }
}

/// Takes the process' stdin for the rest of the run. A terminal gets an
/// `inquire` prompt; piped input is read line by line.
#[must_use]
pub fn acquire_stdin() -> Box<dyn Prompter> {
    let stdin = std::io::stdin();

    if stdin.is_terminal() && std::io::stdout().is_terminal() {
        crate::trace!("Prompting through the terminal");
        Box::new(TerminalPrompter)
    } else {
        crate::trace!("Prompting through piped stdin");
        Box::new(LinePrompter::new(stdin.lock(), std::io::stdout()).styled(question_style()))
    }
}
