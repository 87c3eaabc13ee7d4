use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::output::OutputContext;

/// Create a spinner for ongoing operations.
///
/// The spinner is sent to stderr and ticks every 80ms.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// A spinner that only exists when the output context shows progress.
pub struct Spinner(Option<ProgressBar>);

impl Spinner {
    pub fn start(output: &OutputContext, message: &str) -> Self {
        Self(output.show_progress().then(|| create_spinner(message)))
    }

    /// Finish with an error message.
    pub fn fail(&self, message: &str) {
        if let Some(pb) = &self.0 {
            pb.finish_with_message(format!("ERROR: {message}"));
        }
    }

    /// Clear the line, e.g. before printing a table.
    pub fn clear(&self) {
        if let Some(pb) = &self.0 {
            pb.finish_and_clear();
        }
    }
}
