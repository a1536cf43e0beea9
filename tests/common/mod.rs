//! Shared helpers for the integration tests

#![allow(dead_code)]

use rt_testkit::runner::{RunnerConfig, TestCase};
use rt_testkit::stream::{Operation, StreamDoubleError};
use std::fmt::Debug;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Assert that `result` is the double's unsupported failure for `operation`
pub fn assert_unsupported<T: Debug>(result: io::Result<T>, operation: Operation) {
    let error = result.expect_err("operation should be unsupported");
    assert_eq!(error.kind(), io::ErrorKind::Unsupported);
    assert_eq!(
        StreamDoubleError::from_io(&error),
        Some(&StreamDoubleError::Unsupported { operation })
    );
}

/// Records the arguments each behavior call received
#[derive(Debug, Clone, Default)]
pub struct CallLog<T> {
    calls: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone> CallLog<T> {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push(&self, call: T) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<T> {
        self.calls.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

/// The rt-testkit binary, used as the child program in runner tests
pub fn fixture_program() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_rt-testkit"))
}

/// A case whose child emits `count` binds of `assembly`
pub fn emit_case(name: &str, assembly: &str, count: usize, extra_args: &[&str]) -> TestCase {
    let mut args = vec![
        "emit-bind".to_string(),
        "--assembly".to_string(),
        assembly.to_string(),
        "--count".to_string(),
        count.to_string(),
    ];
    args.extend(extra_args.iter().map(|arg| arg.to_string()));

    TestCase {
        name: name.to_string(),
        program: Some(fixture_program()),
        args,
        expected_assembly: assembly.to_string(),
    }
}

pub fn config_with(cases: Vec<TestCase>, timeout_secs: u64) -> RunnerConfig {
    RunnerConfig {
        timeout_secs,
        cases,
        ..RunnerConfig::default()
    }
}
