use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::{fmt::Display, time::Duration};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Frames cycled while running. indicatif takes the last entry as the
/// finished frame.
const GLYPHS: &[&str] = &["|", "/", "-", "\\", DONE];

const DONE: &str = "✔";

/// A single-line progress indicator.
///
/// [`Spinner::stop`] joins the ticker and writes the completed line before
/// returning, so anything printed afterwards lands below it.
pub struct Spinner {
    bar: ProgressBar,
    label: String,
}

impl Spinner {
    /// Starts spinning on stdout next to `label`.
    pub fn start(label: impl Display) -> Self {
        Self::with_target(label, ProgressDrawTarget::stdout())
    }

    pub fn with_target(label: impl Display, target: ProgressDrawTarget) -> Self {
        let label = label.to_string();
        let style = ProgressStyle::with_template("{msg}{spinner} ")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(GLYPHS);

        let bar = ProgressBar::with_draw_target(None, target);
        bar.set_style(style);
        bar.set_message(label.clone());
        bar.enable_steady_tick(TICK_INTERVAL);

        crate::trace!("Spinner started: {label}");

        Spinner { bar, label }
    }

    /// Runs `f` with the spinner line hidden, for commands that write to the
    /// terminal themselves.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Stops the ticker and leaves `label✔` on screen.
    pub fn stop(self) {
        self.bar.disable_steady_tick();
        self.bar.finish_and_clear();

        // Written directly so it also shows when the bar is hidden
        println!("{}{DONE}", self.label);
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.disable_steady_tick();
            self.bar.finish_and_clear();
        }
    }
}
