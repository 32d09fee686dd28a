//! Run panel
//!
//! Reacts to the lifecycle signals of a run: colors and appends output to
//! the console, keeps the run trigger disabled while a process is active
//! and shows the last exit code.

use tracing::debug;

use super::coordinator::RunEvent;
use crate::console::{ChunkSink, HighlightState, Utf8Decoder};

/// Console-side state of the run trigger
pub struct RunPanel<S: ChunkSink> {
    sink: S,
    run_enabled: bool,
    exit_code: Option<i32>,
    stdout: Utf8Decoder,
    stderr: Utf8Decoder,
}

impl<S: ChunkSink> RunPanel<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            run_enabled: true,
            exit_code: None,
            stdout: Utf8Decoder::new(),
            stderr: Utf8Decoder::new(),
        }
    }

    /// Dispatch one lifecycle signal
    pub fn handle(&mut self, event: RunEvent) {
        match event {
            RunEvent::Started { command } => self.on_started(&command),
            RunEvent::Stdout(bytes) => self.on_stdout(&bytes),
            RunEvent::Stderr(bytes) => self.on_stderr(&bytes),
            RunEvent::Finished(code) => self.on_finished(code),
        }
    }

    pub fn on_started(&mut self, command: &str) {
        debug!(command, "run panel: started");
        self.run_enabled = false;
        self.stdout = Utf8Decoder::new();
        self.stderr = Utf8Decoder::new();
        self.sink
            .append(&format!("Running {}\n", command), HighlightState::BeginOrEnd);
    }

    pub fn on_stdout(&mut self, bytes: &[u8]) {
        let text = self.stdout.decode(bytes);
        if !text.is_empty() {
            self.sink.append(&text, HighlightState::Default);
        }
    }

    pub fn on_stderr(&mut self, bytes: &[u8]) {
        let text = self.stderr.decode(bytes);
        if !text.is_empty() {
            self.sink.append(&text, HighlightState::Error);
        }
    }

    pub fn on_finished(&mut self, code: i32) {
        debug!(code, "run panel: finished");
        let tail = self.stdout.finish();
        if !tail.is_empty() {
            self.sink.append(&tail, HighlightState::Default);
        }
        let tail = self.stderr.finish();
        if !tail.is_empty() {
            self.sink.append(&tail, HighlightState::Error);
        }
        self.sink.append(
            &format!("Process finished with exit code {}\n", code),
            HighlightState::BeginOrEnd,
        );
        self.exit_code = Some(code);
        self.run_enabled = true;
    }

    /// Whether the run trigger accepts a new run
    pub fn is_run_enabled(&self) -> bool {
        self.run_enabled
    }

    /// Exit code of the last finished run
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Text of the exit-code line
    pub fn exit_code_label(&self) -> String {
        match self.exit_code() {
            Some(code) => format!("Exit code: {}", code),
            None => "Exit code: ".to_string(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Console;
    use crate::syntax::{Color, Style};

    /// Records each chunk with the state it was appended in
    #[derive(Default)]
    struct Recorder(Vec<(String, HighlightState)>);

    impl ChunkSink for Recorder {
        fn append(&mut self, chunk: &str, state: HighlightState) {
            self.0.push((chunk.to_string(), state));
        }
    }

    #[test]
    fn test_started_output_finished() {
        let mut panel = RunPanel::new(Recorder::default());
        assert!(panel.is_run_enabled());
        assert_eq!(panel.exit_code_label(), "Exit code: ");

        panel.handle(RunEvent::Started {
            command: "swift main.swift".to_string(),
        });
        assert!(!panel.is_run_enabled());
        assert_eq!(
            panel.sink().0[0],
            ("Running swift main.swift\n".to_string(), HighlightState::BeginOrEnd)
        );

        panel.handle(RunEvent::Stdout(b"hi\n".to_vec()));
        assert_eq!(panel.sink().0[1], ("hi\n".to_string(), HighlightState::Default));

        panel.handle(RunEvent::Finished(1));
        assert_eq!(panel.exit_code(), Some(1));
        assert_eq!(panel.exit_code_label(), "Exit code: 1");
        assert!(panel.is_run_enabled());
        assert_eq!(panel.sink().0.last().map(|c| c.1), Some(HighlightState::BeginOrEnd));
    }

    #[test]
    fn test_stderr_is_error_state() {
        let mut panel = RunPanel::new(Recorder::default());
        panel.on_started("scala x.scala");
        panel.on_stderr(b"error: boom\n");
        panel.on_stdout(b"ok\n");

        let states: Vec<HighlightState> = panel.sink().0.iter().map(|c| c.1).collect();
        assert_eq!(
            states,
            vec![
                HighlightState::BeginOrEnd,
                HighlightState::Error,
                HighlightState::Default
            ]
        );
    }

    #[test]
    fn test_split_utf8_across_chunks() {
        let mut panel = RunPanel::new(Recorder::default());
        panel.on_started("swift a.swift");
        let bytes = "ü\n".as_bytes();
        panel.on_stdout(&bytes[..1]);
        panel.on_stdout(&bytes[1..]);

        let chunks: Vec<&str> = panel.sink().0.iter().skip(1).map(|c| c.0.as_str()).collect();
        assert_eq!(chunks, vec!["ü\n"]);
    }

    #[test]
    fn test_truncated_tail_flushed_on_finish() {
        let mut panel = RunPanel::new(Recorder::default());
        panel.on_started("swift a.swift");
        panel.on_stdout(&[0xc3]);
        panel.on_finished(0);

        let chunks: Vec<&str> = panel.sink().0.iter().map(|c| c.0.as_str()).collect();
        assert_eq!(chunks[1], "\u{fffd}");
    }

    #[test]
    fn test_nonzero_exit_is_plain_text() {
        let mut panel = RunPanel::new(Console::default());
        panel.on_started("swift main.swift");
        panel.on_stdout(b"hi\n");
        panel.on_finished(1);

        let console = panel.sink();
        let lines = console.tail(3);
        assert_eq!(lines[0].text(), "Running swift main.swift");
        assert_eq!(lines[0].style_at(0), Style::fg(Color::Blue));
        assert_eq!(lines[1].text(), "hi");
        assert_eq!(lines[1].style_at(0), Style::default());
        assert_eq!(lines[2].text(), "Process finished with exit code 1");
        assert_eq!(console.state(), HighlightState::Default);
    }
}
