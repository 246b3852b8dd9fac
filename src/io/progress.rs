//! Per-attempt progress tracking with automatic batching for many attempts

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

/// Display state of one generation attempt
#[derive(Clone, Debug, Default)]
struct AttemptState {
    label: String,
    resolved: usize,
    total: usize,
}

/// Coordinates progress display for generation attempts
///
/// Shows one bar per attempt for the most recent attempts, plus a single
/// batch bar once more attempts are planned than bars fit
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    attempt_bars: Vec<ProgressBar>,
    attempt_states: Vec<AttemptState>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:30.cyan/blue}] {prefix}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Attempts: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            attempt_bars: Vec::new(),
            attempt_states: Vec::new(),
        }
    }

    /// Initialize progress bars for at most `attempts` attempts
    pub fn initialize(&mut self, attempts: usize) {
        // Switch to batch mode for long retry runs to avoid terminal spam
        if attempts > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(attempts as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        let bars_to_create = attempts.min(MAX_INDIVIDUAL_PROGRESS_BARS);
        for _ in 0..bars_to_create {
            let pb = ProgressBar::new(0);
            pb.set_style(PROGRESS_STYLE.clone());
            self.attempt_bars.push(self.multi_progress.add(pb));
        }
    }

    /// Configure the bar of a new attempt
    pub fn start_attempt(&mut self, index: usize, seed: u64, total_cells: usize) {
        if index >= self.attempt_states.len() {
            self.attempt_states
                .resize(index + 1, AttemptState::default());
        }
        if let Some(state) = self.attempt_states.get_mut(index) {
            *state = AttemptState {
                label: format!("attempt {} (seed {seed})", index + 1),
                resolved: 0,
                total: total_cells,
            };
        }
        self.update_bars();
    }

    /// Report how many cells of an attempt are resolved
    pub fn update(&mut self, index: usize, resolved: usize) {
        if let Some(state) = self.attempt_states.get_mut(index) {
            state.resolved = resolved;
        }
        self.update_bars();
    }

    /// Mark an attempt as completed
    pub fn complete_attempt(&mut self, index: usize) {
        self.close_attempt(index, '✓');
    }

    /// Mark an attempt as ended by a contradiction
    pub fn fail_attempt(&mut self, index: usize) {
        self.close_attempt(index, '✗');
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All attempts processed");
        }
        let _ = self.multi_progress.clear();
    }

    fn close_attempt(&mut self, index: usize, marker: char) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }

        if let Some(state) = self.attempt_states.get_mut(index) {
            state.label = format!("{marker} {}", state.label);
            if marker == '✓' {
                state.resolved = state.total;
            }
        }
        self.update_bars();
    }

    /// Update all progress bars to show the last N attempts
    fn update_bars(&self) {
        let active: Vec<&AttemptState> = self
            .attempt_states
            .iter()
            .filter(|state| !state.label.is_empty())
            .collect();

        let start_idx = active.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = active.get(start_idx..).unwrap_or(&[]);

        for (bar_idx, state) in visible.iter().enumerate() {
            if let Some(bar) = self.attempt_bars.get(bar_idx) {
                bar.set_length(state.total as u64);
                bar.set_position(state.resolved as u64);
                let max_width = state.total.to_string().len();
                bar.set_message(format!("{:>max_width$}/{}", state.resolved, state.total));
                bar.set_prefix(state.label.clone());
            }
        }

        for bar_idx in visible.len()..self.attempt_bars.len() {
            if let Some(bar) = self.attempt_bars.get(bar_idx) {
                bar.set_length(0);
                bar.set_position(0);
                bar.set_message(String::new());
                bar.set_prefix(String::new());
            }
        }
    }
}
