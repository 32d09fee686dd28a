//! External process runner
//!
//! Spawns the interpreter for one file at a time and reports its
//! lifecycle as [`RunEvent`]s over a channel. Reader threads only send
//! owned events; all state changes happen on the thread that drains them.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{EditorError, Result};

/// Size of a single pipe read
const READ_CHUNK: usize = 4096;

/// How long output may keep arriving after the process exits
const DRAIN_WINDOW: Duration = Duration::from_millis(250);

/// Exit code reported when the process was killed by a signal
pub const SIGNAL_EXIT_CODE: i32 = -1;

/// Lifecycle signal of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// The process was spawned; always the first event of a run
    Started { command: String },
    /// A chunk read from standard output
    Stdout(Vec<u8>),
    /// A chunk read from standard error
    Stderr(Vec<u8>),
    /// The process exited and its output was drained; always the last event
    Finished(i32),
}

/// The run currently (or most recently) in flight
#[derive(Debug, Clone)]
pub struct RunRecord {
    /// Program and arguments, file path last
    pub command: Vec<String>,
    /// File being run
    pub path: PathBuf,
    /// OS process id
    pub pid: u32,
    /// Set once the run has finished
    pub exit_code: Option<i32>,
}

impl RunRecord {
    /// Command line as shown to the user
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }

    pub fn is_running(&self) -> bool {
        self.exit_code.is_none()
    }
}

/// Owns at most one external process
pub struct RunCoordinator {
    tx: Sender<RunEvent>,
    rx: Receiver<RunEvent>,
    record: Option<RunRecord>,
}

impl RunCoordinator {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx, record: None }
    }

    /// Whether a run has started and not yet delivered `Finished`
    pub fn is_running(&self) -> bool {
        self.record.as_ref().is_some_and(RunRecord::is_running)
    }

    /// The most recent run, if any
    pub fn record(&self) -> Option<&RunRecord> {
        self.record.as_ref()
    }

    /// Run `interpreter... path`.
    ///
    /// Fails with `RunInProgress` while a previous run has not finished.
    pub fn start(&mut self, interpreter: &[String], path: &Path) -> Result<()> {
        if self.is_running() {
            return Err(EditorError::RunInProgress);
        }
        let (program, args) = interpreter
            .split_first()
            .ok_or_else(|| EditorError::NoInterpreter(path.to_path_buf()))?;

        let mut command: Vec<String> = interpreter.to_vec();
        command.push(path.display().to_string());

        let mut child = Command::new(program)
            .args(args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EditorError::Spawn {
                command: command.join(" "),
                source,
            })?;

        let record = RunRecord {
            command,
            path: path.to_path_buf(),
            pid: child.id(),
            exit_code: None,
        };
        let command_line = record.command_line();
        info!(pid = record.pid, command = %command_line, "run started");

        // Started is queued before any reader exists, so it is always first
        let _ = self.tx.send(RunEvent::Started {
            command: command_line,
        });

        let shared: SharedSender = Arc::new(Mutex::new(Some(self.tx.clone())));
        let (done_tx, done_rx) = mpsc::channel();
        spawn_reader(child.stdout.take(), shared.clone(), done_tx.clone(), RunEvent::Stdout);
        spawn_reader(child.stderr.take(), shared.clone(), done_tx, RunEvent::Stderr);
        spawn_waiter(child, shared, done_rx, 2);

        self.record = Some(record);
        Ok(())
    }

    /// Collect every event delivered so far without blocking
    pub fn poll(&mut self) -> Vec<RunEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            self.observe(&event);
            events.push(event);
        }
        events
    }

    /// Wait up to `timeout` for the next event
    pub fn next_event(&mut self, timeout: Duration) -> Option<RunEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                self.observe(&event);
                Some(event)
            }
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    fn observe(&mut self, event: &RunEvent) {
        if let RunEvent::Finished(code) = event {
            if let Some(record) = self.record.as_mut() {
                record.exit_code = Some(*code);
                info!(pid = record.pid, code, "run finished");
            }
        }
    }
}

impl Default for RunCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Pipe types the readers accept
trait OutputPipe: Read + Send + 'static {}
impl OutputPipe for ChildStdout {}
impl OutputPipe for ChildStderr {}

/// Event sender shared by the readers and the waiter.
///
/// The waiter takes the sender when it queues `Finished`, so a reader that
/// is still attached to a pipe (held open by a grandchild) goes quiet.
type SharedSender = Arc<Mutex<Option<Sender<RunEvent>>>>;

fn spawn_reader<P: OutputPipe>(
    pipe: Option<P>,
    tx: SharedSender,
    done: Sender<()>,
    wrap: fn(Vec<u8>) -> RunEvent,
) {
    thread::spawn(move || {
        let Some(mut pipe) = pipe else {
            let _ = done.send(());
            return;
        };
        let mut buf = [0u8; READ_CHUNK];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    let Ok(guard) = tx.lock() else {
                        break;
                    };
                    let sent = guard
                        .as_ref()
                        .is_some_and(|tx| tx.send(wrap(buf[..n].to_vec())).is_ok());
                    if !sent {
                        break;
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(error = %e, "reading process output failed");
                    break;
                }
            }
        }
        let _ = done.send(());
    });
}

fn spawn_waiter(mut child: Child, tx: SharedSender, done: Receiver<()>, readers: usize) {
    thread::spawn(move || {
        let code = match child.wait() {
            Ok(status) => status.code().unwrap_or(SIGNAL_EXIT_CODE),
            Err(e) => {
                warn!(error = %e, "waiting for process failed");
                SIGNAL_EXIT_CODE
            }
        };
        debug!(code, "process reaped");

        // Output already in the pipes still belongs to this run
        let deadline = Instant::now() + DRAIN_WINDOW;
        for _ in 0..readers {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if done.recv_timeout(remaining).is_err() {
                debug!("output pipes still open after exit, detaching readers");
                break;
            }
        }

        let Ok(mut guard) = tx.lock() else {
            return;
        };
        if let Some(tx) = guard.take() {
            let _ = tx.send(RunEvent::Finished(code));
        }
    });
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::io::Write;

    fn collect_run(coordinator: &mut RunCoordinator) -> Vec<RunEvent> {
        let mut events = Vec::new();
        while let Some(event) = coordinator.next_event(Duration::from_secs(10)) {
            let done = matches!(event, RunEvent::Finished(_));
            events.push(event);
            if done {
                break;
            }
        }
        events
    }

    fn script(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn sh() -> Vec<String> {
        vec!["sh".to_string()]
    }

    #[test]
    fn test_lifecycle_order() {
        let file = script("echo out\necho err 1>&2\nexit 3\n");
        let mut coordinator = RunCoordinator::new();
        coordinator.start(&sh(), file.path()).unwrap();
        assert!(coordinator.is_running());

        let events = collect_run(&mut coordinator);
        assert!(matches!(events.first(), Some(RunEvent::Started { .. })));
        assert_eq!(events.last(), Some(&RunEvent::Finished(3)));

        let stdout: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                RunEvent::Stdout(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .flatten()
            .collect();
        let stderr: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                RunEvent::Stderr(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .flatten()
            .collect();
        assert_eq!(stdout, b"out\n");
        assert_eq!(stderr, b"err\n");

        assert!(!coordinator.is_running());
        assert_eq!(coordinator.record().and_then(|r| r.exit_code), Some(3));
    }

    #[test]
    fn test_started_carries_command_line() {
        let file = script("true\n");
        let mut coordinator = RunCoordinator::new();
        coordinator.start(&sh(), file.path()).unwrap();

        let events = collect_run(&mut coordinator);
        let expected = format!("sh {}", file.path().display());
        assert_eq!(events[0], RunEvent::Started { command: expected });
        assert_eq!(events.last(), Some(&RunEvent::Finished(0)));
    }

    #[test]
    fn test_second_run_rejected_while_active() {
        let file = script("sleep 1\n");
        let mut coordinator = RunCoordinator::new();
        coordinator.start(&sh(), file.path()).unwrap();

        let err = coordinator.start(&sh(), file.path()).unwrap_err();
        assert!(matches!(err, EditorError::RunInProgress));

        collect_run(&mut coordinator);
        // Finished clears the way for the next run
        coordinator.start(&sh(), file.path()).unwrap();
        collect_run(&mut coordinator);
    }

    #[test]
    fn test_finished_on_exit_with_background_child() {
        // The backgrounded sleep inherits both pipes and outlives sh
        let file = script("sleep 5 &\necho hi\nexit 0\n");
        let mut coordinator = RunCoordinator::new();
        let started = Instant::now();
        coordinator.start(&sh(), file.path()).unwrap();

        let events = collect_run(&mut coordinator);
        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(events.last(), Some(&RunEvent::Finished(0)));
        assert!(events.contains(&RunEvent::Stdout(b"hi\n".to_vec())));
        assert!(!coordinator.is_running());

        // Nothing trails Finished, and the next run is accepted
        assert!(coordinator.poll().is_empty());
        let file = script("true\n");
        coordinator.start(&sh(), file.path()).unwrap();
        let events = collect_run(&mut coordinator);
        assert_eq!(events.last(), Some(&RunEvent::Finished(0)));
    }

    #[test]
    fn test_spawn_failure() {
        let mut coordinator = RunCoordinator::new();
        let interpreter = vec!["/definitely/not/an/interpreter".to_string()];
        let err = coordinator
            .start(&interpreter, Path::new("main.swift"))
            .unwrap_err();
        assert!(matches!(err, EditorError::Spawn { .. }));
        assert!(!coordinator.is_running());
        assert!(coordinator.poll().is_empty());
    }

    #[test]
    fn test_empty_interpreter() {
        let mut coordinator = RunCoordinator::new();
        let err = coordinator.start(&[], Path::new("main.swift")).unwrap_err();
        assert!(matches!(err, EditorError::NoInterpreter(_)));
    }
}
