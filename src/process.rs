use std::collections::HashMap;
use std::process::{Command, ExitStatus, Stdio};

use crate::error::MenuError;

/// Name of the build tool executable.
pub const MAKE: &str = "make";

/// Synchronous build-tool invocation: program, arguments, environment in,
/// exit code out.
///
/// The dispatcher only ever talks to the build tool through this trait, so
/// it can be exercised in tests without spawning real processes.
pub trait ToolRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        env: &HashMap<String, String>,
    ) -> Result<i32, MenuError>;
}

/// Runner that spawns the real build tool, sharing the terminal with it,
/// and blocks until it exits.
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        env: &HashMap<String, String>,
    ) -> Result<i32, MenuError> {
        let status = Command::new(program)
            .args(args)
            .env_clear()
            .envs(env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(MenuError::Tool)?;
        match status.code() {
            Some(code) => Ok(code),
            None => Ok(terminated_by_signal(status)),
        }
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}
