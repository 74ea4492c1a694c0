//! Player agents: whatever answers one line per turn.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use log::{debug, warn};

/// Error from exchanging a turn with a player.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// No answer within the allowed time.
    #[error("no response within {0:?}")]
    Timeout(Duration),
    /// The player closed its output or has nothing left to say.
    #[error("player disconnected")]
    Disconnected,
    /// Writing input to the player failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A participant that reads input lines and answers with one line.
pub trait PlayerAgent {
    /// Send this turn's input and wait up to `timeout` for the response line.
    ///
    /// # Errors
    ///
    /// Returns an error if no line arrives in time or the player is gone.
    fn exchange(&mut self, input: &[String], timeout: Duration) -> Result<String, AgentError>;
}

impl<T: PlayerAgent + ?Sized> PlayerAgent for &mut T {
    fn exchange(&mut self, input: &[String], timeout: Duration) -> Result<String, AgentError> {
        (**self).exchange(input, timeout)
    }
}

/// Agent answering from a fixed list of responses.
///
/// `None` entries stand for turns where the player timed out. Once the list
/// is exhausted every exchange reports [`AgentError::Disconnected`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedAgent {
    responses: VecDeque<Option<String>>,
    received: Vec<Vec<String>>,
}

impl ScriptedAgent {
    /// Create an agent that answers with `lines` in order.
    #[must_use]
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_log(lines.into_iter().map(|l| Some(l.into())))
    }

    /// Create an agent from recorded responses, `None` meaning a timeout.
    #[must_use]
    pub fn from_log(responses: impl IntoIterator<Item = Option<String>>) -> Self {
        Self {
            responses: responses.into_iter().collect(),
            received: Vec::new(),
        }
    }

    /// Input of every turn this agent was asked to play.
    #[must_use]
    pub fn received(&self) -> &[Vec<String>] {
        &self.received
    }
}

impl PlayerAgent for ScriptedAgent {
    fn exchange(&mut self, input: &[String], timeout: Duration) -> Result<String, AgentError> {
        self.received.push(input.to_vec());
        match self.responses.pop_front() {
            Some(Some(line)) => Ok(line),
            Some(None) => Err(AgentError::Timeout(timeout)),
            None => Err(AgentError::Disconnected),
        }
    }
}

/// Agent backed by a child process talking over stdin/stdout.
///
/// A reader thread forwards every output line, so a turn can wait with a
/// deadline. The child is killed when the agent is dropped.
#[derive(Debug)]
pub struct ProcessAgent {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<io::Result<String>>,
}

impl ProcessAgent {
    /// Spawn `program` with `args`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started.
    pub fn spawn<S: AsRef<std::ffi::OsStr>>(program: &str, args: &[S]) -> Result<Self, AgentError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;
        let stdin = child.stdin.take().ok_or(AgentError::Disconnected)?;
        let stdout = child.stdout.take().ok_or(AgentError::Disconnected)?;

        let (sender, lines) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                if sender.send(line).is_err() {
                    break;
                }
            }
        });
        debug!("spawned player process {program} (pid {})", child.id());

        Ok(Self { child, stdin, lines })
    }

    /// Spawn from a shell-like command line split on whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the command line is empty or the process cannot
    /// be started.
    pub fn from_command_line(command: &str) -> Result<Self, AgentError> {
        let mut parts = command.split_whitespace();
        let program = parts.next().ok_or_else(|| {
            AgentError::Io(io::Error::new(io::ErrorKind::InvalidInput, "empty player command"))
        })?;
        let args: Vec<&str> = parts.collect();
        Self::spawn(program, args.as_slice())
    }
}

impl PlayerAgent for ProcessAgent {
    fn exchange(&mut self, input: &[String], timeout: Duration) -> Result<String, AgentError> {
        for line in input {
            writeln!(self.stdin, "{line}")?;
        }
        self.stdin.flush()?;

        match self.lines.recv_timeout(timeout) {
            Ok(Ok(line)) => Ok(line),
            Ok(Err(e)) => Err(AgentError::Io(e)),
            Err(RecvTimeoutError::Timeout) => Err(AgentError::Timeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(AgentError::Disconnected),
        }
    }
}

impl Drop for ProcessAgent {
    fn drop(&mut self) {
        if let Err(e) = self.child.kill() {
            warn!("failed to kill player process {}: {e}", self.child.id());
        }
        // Reap to avoid leaving a zombie behind.
        let _ = self.child.wait();
    }
}
