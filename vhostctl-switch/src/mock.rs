//! Scripted command runner for testing.

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use crate::error::{Result, SwitchError};
use crate::exec::{render_command, CommandRunner};

/// A canned reply to one command.
#[derive(Debug, Clone)]
enum MockReply {
    Stdout(String),
    SpawnFailure,
}

/// Command runner that records every invocation and answers from a script.
///
/// Replies are consumed in order, one per command. Once the script runs out,
/// every further command gets empty output. Used to test backends against
/// recorded CLI output.
#[derive(Debug, Default)]
pub struct MockRunner {
    replies: Mutex<VecDeque<MockReply>>,
    calls: Mutex<Vec<String>>,
}

impl MockRunner {
    /// Create a runner with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue stdout for the next unanswered command.
    pub fn reply(self, stdout: impl Into<String>) -> Self {
        self.push(MockReply::Stdout(stdout.into()));
        self
    }

    /// Queue a spawn failure, as if the program were not installed.
    pub fn fail_spawn(self) -> Self {
        self.push(MockReply::SpawnFailure);
        self
    }

    /// Commands issued so far, rendered as command lines.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn push(&self, reply: MockReply) {
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(reply);
    }
}

impl CommandRunner for MockRunner {
    fn output(&self, program: &str, args: &[&str]) -> Result<String> {
        let command = render_command(program, args);
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(command.clone());

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();

        match reply {
            Some(MockReply::Stdout(stdout)) => Ok(stdout),
            Some(MockReply::SpawnFailure) => Err(SwitchError::Exec {
                command,
                source: io::Error::new(io::ErrorKind::NotFound, "mock: program not found"),
            }),
            None => Ok(String::new()),
        }
    }
}
