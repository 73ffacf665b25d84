use pathbench_core::{RunSpec, RunTarget, SweepConfig};
use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Exited { code: Option<i32> },
    LaunchFailed { message: String },
}

impl RunStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }

    pub fn describe(&self) -> String {
        match self {
            RunStatus::Completed => "completed".to_string(),
            RunStatus::Exited { code: Some(code) } => format!("exit {}", code),
            RunStatus::Exited { code: None } => "signal".to_string(),
            RunStatus::LaunchFailed { message } => format!("launch failed: {}", message),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub stdout: String,
    pub diagnostics: String,
    pub status: RunStatus,
    pub elapsed: Duration,
}

/// Executes one RunSpec. Implementations must report failures through
/// [`RunStatus`] instead of panicking.
pub trait TaskExecutor: Sync {
    fn execute(&self, spec: &RunSpec) -> RunOutcome;
}

#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    create_graphs_exe: PathBuf,
    run_multi_exe: PathBuf,
    time_command: Vec<String>,
}

impl ProcessExecutor {
    pub fn new(config: &SweepConfig) -> Self {
        Self {
            create_graphs_exe: config.create_graphs_exe.clone(),
            run_multi_exe: config.run_multi_exe.clone(),
            time_command: config.time_command.clone(),
        }
    }

    pub fn argv(&self, spec: &RunSpec) -> Vec<OsString> {
        let mut argv: Vec<OsString> = self.time_command.iter().map(OsString::from).collect();
        match spec.target() {
            RunTarget::CreateGraph { instance } => {
                argv.push(self.create_graphs_exe.clone().into());
                argv.push("--map_path".into());
                argv.push(instance.absolute().into());
            }
            RunTarget::Search {
                scenario,
                algorithm,
            } => {
                argv.push(self.run_multi_exe.clone().into());
                argv.push("--scenario_path".into());
                argv.push(scenario.absolute().into());
                if let Some(results) = spec.results_path() {
                    argv.push("--export_path".into());
                    argv.push(results.into());
                }
                argv.push("--algorithm".into());
                argv.push(algorithm.family().as_str().into());
                argv.push("--k".into());
                argv.push(algorithm.k().to_string().into());
            }
        }
        argv
    }
}

impl TaskExecutor for ProcessExecutor {
    fn execute(&self, spec: &RunSpec) -> RunOutcome {
        let argv = self.argv(spec);
        let started = Instant::now();
        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..]);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        match cmd.output() {
            Ok(output) => RunOutcome {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                diagnostics: String::from_utf8_lossy(&output.stderr).into_owned(),
                status: if output.status.success() {
                    RunStatus::Completed
                } else {
                    RunStatus::Exited {
                        code: output.status.code(),
                    }
                },
                elapsed: started.elapsed(),
            },
            Err(e) => RunOutcome {
                stdout: String::new(),
                diagnostics: format!(
                    "failed to launch {}: {}\n",
                    argv[0].to_string_lossy(),
                    e
                ),
                status: RunStatus::LaunchFailed {
                    message: e.to_string(),
                },
                elapsed: started.elapsed(),
            },
        }
    }
}
