// ============================================================================
// dashpack-core/src/events/mod.rs
// ============================================================================
//
// EVENTS: Log and Progress Reporting to the Embedding Caller
//
// The pipeline reports to its caller through events delivered synchronously
// on the thread that runs the pipeline. Front-ends register EventHandlers on
// an EventDispatcher; CallbackHandler adapts the plain two-callback contract
// (on_log, on_progress) to the handler trait.
//
// Within one run, progress goes through a ProgressTracker so that callers
// only ever observe non-decreasing values in [0, 100].
//
// AI-ASSISTANT-INFO: Event types, dispatch, and monotonic progress

// ---- Internal crate imports ----
use crate::pipeline::PipelineState;

// ---- Standard library imports ----
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A human-readable log line
    Log { message: String },

    /// Overall progress of the run, 0..=100
    Progress { percent: u8 },

    /// The pipeline entered a new stage
    StageChanged { state: PipelineState },
}

pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &Event);
}

pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn emit(&self, event: Event) {
        for handler in &self.handlers {
            handler.handle(&event);
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

type LogCallback = Box<dyn Fn(&str) + Send + Sync>;
type ProgressCallback = Box<dyn Fn(u8) + Send + Sync>;

/// Adapts `on_log` / `on_progress` closures to [`EventHandler`].
/// Stage changes are not forwarded.
pub struct CallbackHandler {
    on_log: LogCallback,
    on_progress: ProgressCallback,
}

impl CallbackHandler {
    pub fn new<L, P>(on_log: L, on_progress: P) -> Self
    where
        L: Fn(&str) + Send + Sync + 'static,
        P: Fn(u8) + Send + Sync + 'static,
    {
        Self {
            on_log: Box::new(on_log),
            on_progress: Box::new(on_progress),
        }
    }
}

impl EventHandler for CallbackHandler {
    fn handle(&self, event: &Event) {
        match event {
            Event::Log { message } => (self.on_log)(message),
            Event::Progress { percent } => (self.on_progress)(*percent),
            Event::StageChanged { .. } => {}
        }
    }
}

// ============================================================================
// PROGRESS
// ============================================================================

/// Keeps progress within [0, 100] and never lets it go backwards.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    last: Option<u8>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value to report for `percent`, or `None` if it would move
    /// progress backwards.
    pub fn advance(&mut self, percent: i64) -> Option<u8> {
        let clamped = percent.clamp(0, 100) as u8;
        match self.last {
            Some(last) if clamped < last => None,
            _ => {
                self.last = Some(clamped);
                Some(clamped)
            }
        }
    }

    pub fn last(&self) -> Option<u8> {
        self.last
    }
}

/// Per-run reporting front for the pipeline.
///
/// Every log line is mirrored to the `log` facade; progress passes through a
/// fresh [`ProgressTracker`].
pub struct RunEvents<'a> {
    dispatcher: &'a EventDispatcher,
    progress: ProgressTracker,
    state: PipelineState,
}

impl<'a> RunEvents<'a> {
    pub fn new(dispatcher: &'a EventDispatcher) -> Self {
        Self {
            dispatcher,
            progress: ProgressTracker::new(),
            state: PipelineState::Idle,
        }
    }

    pub fn log(&self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{}", message);
        self.dispatcher.emit(Event::Log { message });
    }

    /// Logs a failure line at error level.
    pub fn log_error(&self, message: impl Into<String>) {
        let message = message.into();
        log::error!("{}", message);
        self.dispatcher.emit(Event::Log { message });
    }

    pub fn progress(&mut self, percent: i64) {
        if let Some(percent) = self.progress.advance(percent) {
            self.dispatcher.emit(Event::Progress { percent });
        }
    }

    pub fn enter(&mut self, state: PipelineState) {
        log::debug!("Pipeline stage: {} -> {}", self.state, state);
        self.state = state;
        self.dispatcher.emit(Event::StageChanged { state });
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Event>>);

    impl EventHandler for Recorder {
        fn handle(&self, event: &Event) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn tracker_clamps_and_drops_regressions() {
        let mut tracker = ProgressTracker::new();
        assert_eq!(tracker.advance(-5), Some(0));
        assert_eq!(tracker.advance(40), Some(40));
        assert_eq!(tracker.advance(30), None);
        assert_eq!(tracker.advance(40), Some(40));
        assert_eq!(tracker.advance(250), Some(100));
        assert_eq!(tracker.advance(99), None);
        assert_eq!(tracker.last(), Some(100));
    }

    #[test]
    fn dispatcher_fans_out_to_every_handler() {
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_handler(first.clone());
        dispatcher.add_handler(second.clone());

        dispatcher.emit(Event::Progress { percent: 10 });

        assert_eq!(first.0.lock().unwrap().len(), 1);
        assert_eq!(second.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn callback_handler_routes_log_and_progress() {
        let logs = Arc::new(Mutex::new(Vec::new()));
        let progress = Arc::new(Mutex::new(Vec::new()));
        let (l, p) = (logs.clone(), progress.clone());
        let handler = CallbackHandler::new(
            move |m| l.lock().unwrap().push(m.to_string()),
            move |v| p.lock().unwrap().push(v),
        );

        handler.handle(&Event::Log {
            message: "hello".to_string(),
        });
        handler.handle(&Event::Progress { percent: 50 });
        handler.handle(&Event::StageChanged {
            state: PipelineState::Probing,
        });

        assert_eq!(*logs.lock().unwrap(), vec!["hello".to_string()]);
        assert_eq!(*progress.lock().unwrap(), vec![50]);
    }

    #[test]
    fn run_events_filter_progress_and_track_state() {
        let recorder = Arc::new(Recorder::default());
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_handler(recorder.clone());

        let mut events = RunEvents::new(&dispatcher);
        events.progress(50);
        events.progress(20);
        events.enter(PipelineState::Converting);
        events.progress(100);

        assert_eq!(events.state(), PipelineState::Converting);
        let seen = recorder.0.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                Event::Progress { percent: 50 },
                Event::StageChanged {
                    state: PipelineState::Converting
                },
                Event::Progress { percent: 100 },
            ]
        );
    }
}
