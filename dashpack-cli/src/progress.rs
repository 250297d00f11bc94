// ============================================================================
// dashpack-cli/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: Terminal progress bar for pipeline runs
//
// Bridges the pipeline's progress events to an indicatif bar. Log lines are
// printed by the logger, so this handler only consumes progress and stage
// events. The bar is hidden when stderr is not a terminal.
//
// AI-ASSISTANT-INFO: indicatif progress bar fed by pipeline events

// ---- Internal crate imports ----
use dashpack_core::events::{Event, EventHandler};
use dashpack_core::pipeline::PipelineState;

// ---- External crate imports ----
use console::Term;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

pub struct ProgressBarHandler {
    bar: ProgressBar,
}

impl ProgressBarHandler {
    /// Creates the bar; `enabled = false` or a non-terminal stderr hides it.
    pub fn new(enabled: bool) -> Self {
        let bar = if enabled && Term::stderr().is_term() {
            ProgressBar::new(100)
        } else {
            ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::hidden())
        };
        let style = ProgressStyle::with_template("Converting [{bar:40.cyan/blue}] {pos:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self { bar }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl EventHandler for ProgressBarHandler {
    fn handle(&self, event: &Event) {
        match event {
            Event::Progress { percent } => self.bar.set_position(u64::from(*percent)),
            Event::StageChanged { state } => {
                if matches!(state, PipelineState::Done | PipelineState::Error) {
                    self.finish();
                }
            }
            Event::Log { .. } => {}
        }
    }
}
