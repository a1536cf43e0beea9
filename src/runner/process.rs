use crate::runner::config::{RunnerConfig, TestCase};
use crate::runner::events::BindEventLog;
use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Case '{case}' did not finish within {timeout:?}")]
    Timeout { case: String, timeout: Duration },

    #[error("Case '{case}' exited with {actual}, expected exit code {expected}")]
    ExitCode {
        case: String,
        expected: i32,
        actual: ExitDescription,
    },

    #[error("Case '{case}' recorded {count} bind events for '{assembly}', expected exactly 1")]
    BindCount {
        case: String,
        assembly: String,
        count: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// How a child process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDescription {
    Code(i32),
    Signal,
}

impl From<ExitStatus> for ExitDescription {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => ExitDescription::Code(code),
            None => ExitDescription::Signal,
        }
    }
}

impl std::fmt::Display for ExitDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitDescription::Code(code) => write!(f, "exit code {}", code),
            ExitDescription::Signal => write!(f, "termination by signal"),
        }
    }
}

/// Result of a passing case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    pub name: String,
    pub exit_code: i32,
    pub expected_binds: usize,
    pub total_binds: usize,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub passed: Vec<CaseReport>,
    pub failed: Vec<(String, RunnerError)>,
}

impl RunSummary {
    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len()
    }
}

/// Launches each case in its own child process and checks its bind events
pub struct BindRunner {
    config: RunnerConfig,
    default_program: PathBuf,
}

impl BindRunner {
    /// Cases without a `program` re-launch the current executable
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let default_program = std::env::current_exe()?;
        Ok(Self::with_default_program(config, default_program))
    }

    pub fn with_default_program(config: RunnerConfig, default_program: PathBuf) -> Self {
        Self {
            config,
            default_program,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run every case matching `filter`, continuing past failures
    pub async fn run_all(&self, filter: Option<&str>) -> RunSummary {
        let mut summary = RunSummary::default();

        for case in self.config.selected(filter) {
            match self.run_case(case).await {
                Ok(report) => {
                    info!("PASS {}", report.name);
                    summary.passed.push(report);
                }
                Err(e) => {
                    error!("FAIL {}: {}", case.name, e);
                    summary.failed.push((case.name.clone(), e));
                }
            }
        }

        info!(
            "{} of {} cases passed",
            summary.passed.len(),
            summary.total()
        );
        summary
    }

    #[instrument(skip(self, case), fields(case = %case.name))]
    pub async fn run_case(&self, case: &TestCase) -> Result<CaseReport, RunnerError> {
        let program = case
            .program
            .clone()
            .unwrap_or_else(|| self.default_program.clone());
        debug!("Launching {} {:?}", program.display(), case.args);

        let mut child = Command::new(&program)
            .args(&case.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                program: program.clone(),
                source,
            })?;

        let timeout = self.config.timeout();
        let outcome = tokio::time::timeout(timeout, Self::collect(&mut child)).await;
        let (status, log) = match outcome {
            Ok(result) => result?,
            Err(_) => {
                warn!("Case timed out after {:?}, killing child", timeout);
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill timed out child: {}", e);
                }
                return Err(RunnerError::Timeout {
                    case: case.name.clone(),
                    timeout,
                });
            }
        };

        let exit = ExitDescription::from(status);
        let exit_code = match exit {
            ExitDescription::Code(code) if code == self.config.success_exit_code => code,
            actual => {
                return Err(RunnerError::ExitCode {
                    case: case.name.clone(),
                    expected: self.config.success_exit_code,
                    actual,
                });
            }
        };

        let expected_binds = log.count_for(&case.expected_assembly);
        debug!(
            expected_binds,
            total_binds = log.len(),
            "Child finished with {}",
            exit
        );
        if expected_binds != 1 {
            return Err(RunnerError::BindCount {
                case: case.name.clone(),
                assembly: case.expected_assembly.clone(),
                count: expected_binds,
            });
        }

        Ok(CaseReport {
            name: case.name.clone(),
            exit_code,
            expected_binds,
            total_binds: log.len(),
        })
    }

    /// Read the child's stdout to EOF, then wait for it to exit
    async fn collect(child: &mut Child) -> Result<(ExitStatus, BindEventLog), RunnerError> {
        let mut log = BindEventLog::new();

        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                log.record_line(&line);
            }
        }

        let status = child.wait().await?;
        Ok((status, log))
    }
}
