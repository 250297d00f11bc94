// dashpack-core/tests/common/mod.rs
//
// Shared fixtures for the pipeline integration tests.

#![allow(dead_code)]

use dashpack_core::config::CoreConfig;
use dashpack_core::events::{Event, EventDispatcher, EventHandler};
use dashpack_core::external::mocks::MockProcessRunner;
use dashpack_core::pipeline::RunContext;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::{TempDir, tempdir};

pub const RUN_ID: &str = "20240601120000";

/// Probe output with a video, an English audio track and embedded cover art.
pub const MOVIE_WITH_COVER_ART: &str = r#"{"streams":[
    {"index":0,"codec_type":"video","tags":{}},
    {"index":1,"codec_type":"audio","tags":{"language":"en"}},
    {"index":2,"codec_type":"mjpeg","tags":{}}
]}"#;

/// Collects every event the pipeline emits.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl EventHandler for Recorder {
    fn handle(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }
}

impl Recorder {
    pub fn logs(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::Log { message } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn progress(&self) -> Vec<u8> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::Progress { percent } => Some(*percent),
                _ => None,
            })
            .collect()
    }

    pub fn has_log(&self, needle: &str) -> bool {
        self.logs().iter().any(|l| l.contains(needle))
    }
}

/// An isolated work directory with an input file, a scripted runner and a
/// recording dispatcher.
pub struct Harness {
    pub dir: TempDir,
    pub config: CoreConfig,
    pub ctx: RunContext,
    pub input: PathBuf,
    pub runner: MockProcessRunner,
    pub recorder: Arc<Recorder>,
    pub dispatcher: EventDispatcher,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_input_name("movie.mkv")
    }

    pub fn with_input_name(name: &str) -> Self {
        let dir = tempdir().expect("Failed to create temp dir");
        let input = dir.path().join(name);
        fs::write(&input, b"dummy matroska").expect("Failed to create dummy input");

        let config = CoreConfig::new(dir.path().join("work"));
        let ctx = RunContext::new(&config, RUN_ID);

        let recorder = Arc::new(Recorder::default());
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_handler(recorder.clone());

        Self {
            dir,
            config,
            ctx,
            input,
            runner: MockProcessRunner::new(),
            recorder,
            dispatcher,
        }
    }

    /// Arguments of the single packager call, if one was made.
    pub fn packager_args(&self) -> Option<Vec<String>> {
        self.runner
            .get_received_calls()
            .into_iter()
            .find(|c| c.mentions("--generate_static_live_mpd"))
            .map(|c| c.args)
    }

    /// Stream descriptors handed to the packager.
    pub fn descriptors(&self) -> Vec<String> {
        self.packager_args()
            .unwrap_or_default()
            .into_iter()
            .filter(|a| a.starts_with("in="))
            .collect()
    }
}

/// Asserts the progress sequence is non-decreasing, bounded and ends at 100.
pub fn assert_progress_completes(progress: &[u8]) {
    assert!(!progress.is_empty(), "no progress was reported");
    assert!(
        progress.windows(2).all(|w| w[0] <= w[1]),
        "progress went backwards: {progress:?}"
    );
    assert!(progress.iter().all(|p| *p <= 100));
    assert_eq!(progress.last(), Some(&100));
}
