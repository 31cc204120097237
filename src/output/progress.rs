use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::bright_yellow;

/// Spinner drawn on stderr while a request is in flight.
///
/// Nothing is drawn when stderr is not a terminal.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn start(message: impl std::fmt::Display) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_draw_target(ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::default_spinner().template("  {msg} {spinner}") {
            pb.set_style(style);
        }
        pb.set_message(bright_yellow(message).to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { pb }
    }

    /// Clears the spinner so the table that follows starts on a clean line.
    pub fn finish(self) {
        self.pb.finish_and_clear();
    }
}
