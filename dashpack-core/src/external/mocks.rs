// dashpack-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

use super::{CommandOutput, ProcessRunner};
use crate::error::{CoreError, CoreResult};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A command the mock runner received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedCall {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl ReceivedCall {
    /// Returns true if the program path or any argument contains `pattern`.
    pub fn mentions(&self, pattern: &str) -> bool {
        self.program.to_string_lossy().contains(pattern)
            || self.args.iter().any(|a| a.contains(pattern))
    }
}

/// Represents an expected command call and its mock result.
pub struct MockExpectation {
    pub pattern: String,
    pub result: CoreResult<CommandOutput>,
    pub create_dummy_output: bool,
}

/// Mock implementation of ProcessRunner supporting multiple expectations.
///
/// Each call is matched against the first unused expectation whose pattern
/// appears in the program path or any argument; a matched expectation is
/// consumed. A call with no matching expectation panics.
#[derive(Clone, Default)]
pub struct MockProcessRunner {
    expectations: Rc<RefCell<Vec<MockExpectation>>>,
    received_calls: Rc<RefCell<Vec<ReceivedCall>>>,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_expectation(
        &self,
        pattern: &str,
        result: CoreResult<CommandOutput>,
        create_dummy_output: bool,
    ) {
        self.expectations.borrow_mut().push(MockExpectation {
            pattern: pattern.to_string(),
            result,
            create_dummy_output,
        });
    }

    /// Expects a call that exits 0 with the given stdout.
    pub fn add_success_expectation(&self, pattern: &str, stdout: &str, create_dummy_output: bool) {
        let output = CommandOutput {
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        };
        self.add_expectation(pattern, Ok(output), create_dummy_output);
    }

    /// Expects a call that starts but exits with `exit_code`.
    pub fn add_exit_error_expectation(&self, pattern: &str, exit_code: i32, stderr: &str) {
        let output = CommandOutput {
            code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        };
        self.add_expectation(pattern, Ok(output), false);
    }

    /// Expects a call that fails to start.
    pub fn add_spawn_error_expectation(&self, pattern: &str, error: CoreError) {
        self.add_expectation(pattern, Err(error), false);
    }

    pub fn get_received_calls(&self) -> Vec<ReceivedCall> {
        self.received_calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.received_calls.borrow().len()
    }

    /// Number of expectations that were never matched.
    pub fn pending_expectations(&self) -> usize {
        self.expectations.borrow().len()
    }
}

impl ProcessRunner for MockProcessRunner {
    fn run(&self, program: &Path, args: &[String]) -> CoreResult<CommandOutput> {
        let call = ReceivedCall {
            program: program.to_path_buf(),
            args: args.to_vec(),
        };
        self.received_calls.borrow_mut().push(call.clone());

        let mut expectations = self.expectations.borrow_mut();
        let found_index = expectations.iter().position(|exp| call.mentions(&exp.pattern));

        let Some(index) = found_index else {
            log::error!("MockProcessRunner: No expectation found for command: {:?}", call);
            panic!("MockProcessRunner: No expectation found for command: {call:?}");
        };

        let expectation = expectations.remove(index);
        log::info!(
            "MockProcessRunner: Matched expectation with pattern '{}'",
            expectation.pattern
        );

        if expectation.create_dummy_output {
            match args.last() {
                Some(output_path) => {
                    let output_path = PathBuf::from(output_path);
                    if let Some(parent) = output_path.parent() {
                        if let Err(e) = std::fs::create_dir_all(parent) {
                            log::error!("MockProcessRunner failed to create parent dir {:?}: {}", parent, e);
                        }
                    }
                    if let Err(e) = std::fs::write(&output_path, b"dummy content") {
                        log::error!("MockProcessRunner failed to create dummy output {:?}: {}", output_path, e);
                    }
                }
                None => log::warn!("MockProcessRunner couldn't find output path in args to create dummy file."),
            }
        }

        expectation.result
    }
}
