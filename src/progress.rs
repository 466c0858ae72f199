use indicatif::{ProgressBar, ProgressStyle};

/// Builds the per-item counters shown while iterating over archives and XML files.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    visible: bool,
}

impl Progress {
    pub fn new(visible: bool) -> Self {
        Self { visible }
    }

    /// A progress reporter that never draws anything.
    pub fn hidden() -> Self {
        Self { visible: false }
    }

    pub fn bar(&self, len: usize, label: &str) -> ProgressBar {
        if !self.visible {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message(label.to_string());
        bar
    }
}
