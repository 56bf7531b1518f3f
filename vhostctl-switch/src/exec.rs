//! External command execution.
//!
//! Every backend talks to its switch exclusively through a [`CommandRunner`].
//! The runner captures stdout only; exit codes are logged but not enforced,
//! since the management CLIs report most failures in their text output.

use std::process::Command;
use tracing::{debug, warn};

use crate::error::{Result, SwitchError};

/// Marker the switch CLIs print when the management plane rejects a request.
pub const RPC_ERROR_MARKER: &str = "rpc error";

/// Runs external programs on behalf of a backend.
pub trait CommandRunner {
    /// Run `program` with `args` and return its raw stdout.
    ///
    /// Only a failure to start the program is an error here.
    fn output(&self, program: &str, args: &[&str]) -> Result<String>;

    /// Run a command and return its stdout, treating `rpc error` output as failure.
    fn exec(&self, program: &str, args: &[&str]) -> Result<String> {
        let command = render_command(program, args);
        debug!(command = %command, "Executing");

        let stdout = self.output(program, args)?;
        check_output(&command, stdout)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn output(&self, program: &str, args: &[&str]) -> Result<String> {
        (**self).output(program, args)
    }
}

/// Runs commands on the local host with [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new system runner.
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn output(&self, program: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| SwitchError::Exec {
                command: render_command(program, args),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                command = %render_command(program, args),
                status = %output.status,
                stderr = %stderr.trim(),
                "Command exited with failure status"
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Reject output that carries the backend error marker.
pub fn check_output(command: &str, stdout: String) -> Result<String> {
    if stdout.contains(RPC_ERROR_MARKER) {
        debug!(command = %command, output = %stdout.trim(), "Backend error suppressed");
        return Err(SwitchError::Backend {
            command: command.to_string(),
        });
    }
    Ok(stdout)
}

/// Render a command line for logs and error messages.
pub fn render_command(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Remove every newline together with the whitespace that follows it, then
/// trim trailing whitespace.
///
/// Switch CLIs print a single value followed by blank lines; this turns that
/// into the bare value.
pub fn collapse_output(output: &str) -> String {
    let mut collapsed = String::with_capacity(output.len());
    let mut chars = output.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            while chars.peek().map_or(false, |next| next.is_whitespace()) {
                chars.next();
            }
        } else {
            collapsed.push(c);
        }
    }

    collapsed.trim_end().to_string()
}
