use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner showing which pipeline stage is running
pub struct ProgressReporter {
    spinner: Option<ProgressBar>,
    enabled: bool,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        Self {
            spinner: None,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start the spinner, or move it on to the next stage
    pub fn stage(&mut self, message: &str) {
        if !self.enabled {
            return;
        }

        if let Some(ref pb) = self.spinner {
            pb.set_message(message.to_string());
            return;
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        self.spinner = Some(pb);
    }

    pub fn finish(&self, message: &str) {
        if let Some(ref pb) = self.spinner {
            pb.finish_with_message(format!("✓ {message}"));
        }
    }

    pub fn finish_and_clear(&self) {
        if let Some(ref pb) = self.spinner {
            pb.finish_and_clear();
        }
    }
}
