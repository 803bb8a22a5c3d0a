//! Append-only result log for test runs.

use std::io::Write;

use anyhow::Context;

/// One completed attempt, as persisted to the log.
///
/// Serialized as a single JSON line with exactly these keys.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Record {
    /// Full argv of the upload invocation, tool path first.
    pub args: Vec<String>,
    /// Exit code of the tool (124 when the timeout fired).
    pub returncode: i32,
    /// Everything the tool wrote to stderr.
    pub stderr: String,
    /// Everything the tool wrote to stdout.
    pub stdout: String,
}

/// Append-only sink for progress lines and [`Record`]s.
///
/// The file is opened in append mode for each write and closed immediately,
/// so lines survive a crash or forced kill mid-run and external readers can
/// interleave safely. The log is never truncated here.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: std::path::PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Verify the log opens for append. Called once at startup; failure here
    /// is fatal to the run.
    pub fn check_writable(&self) -> anyhow::Result<()> {
        self.open_append().map(|_| ())
    }

    fn open_append(&self) -> anyhow::Result<std::fs::File> {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("cannot open log {:?} for append", &self.path))
    }

    /// Append `msg` as one line; echo it to the console when `echo` is set.
    pub fn log(&self, msg: &str, echo: bool) -> anyhow::Result<()> {
        if echo {
            println!("{}", msg);
        }
        let mut file = self.open_append()?;
        writeln!(file, "{}", msg).with_context(|| format!("failed writing to log {:?}", &self.path))
    }

    /// Append a record as a single JSON line; echo it when `echo` is set.
    pub fn append_record(&self, record: &Record, echo: bool) -> anyhow::Result<()> {
        let line = serde_json::to_string(record).context("failed to serialize result record")?;
        self.log(&line, echo)
    }
}
