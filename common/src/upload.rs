//! Supervised execution of a single upload attempt.
//!
//! One attempt spawns the external upload tool for one candidate file,
//! bounded by a hard wall-clock timeout. Every line the tool prints is
//! appended to the result log the moment it is read, so a crash or forced
//! kill mid-upload still leaves the output on disk.

use std::process::Stdio;

use tokio::io::AsyncBufReadExt;

use crate::runlog::{Record, RunLog};

/// Exit code reported when the timeout kills the tool, matching shell
/// `timeout` convention. Not distinguished from any other failure exit code
/// at this layer.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Fixed per-attempt invocation parameters.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path to the upload tool binary.
    pub tool: std::path::PathBuf,
    /// Local corpus tree the candidates live in.
    pub tree: std::path::PathBuf,
    /// Remote the tool uploads to.
    pub remote: String,
    /// Destination path within the remote.
    pub archive_path: String,
    /// Wall-clock bound for one attempt.
    pub timeout: std::time::Duration,
}

impl Settings {
    /// Full argv for uploading `name`, tool path first.
    ///
    /// Size-only comparison and disabled modtime-setting keep the tool from
    /// tripping over remotes that cannot faithfully store either; `-vv`
    /// makes the streamed diagnostics worth logging.
    pub fn invocation(&self, name: &str) -> Vec<String> {
        vec![
            self.tool.to_string_lossy().into_owned(),
            "copy".to_string(),
            "-vv".to_string(),
            "--size-only".to_string(),
            "--sftp-set-modtime=false".to_string(),
            self.tree.join(name).to_string_lossy().into_owned(),
            format!("{}:{}", self.remote, self.archive_path),
        ]
    }
}

/// The tool could not be started (or supervised) at all.
///
/// Never fatal to the overall run; the controller logs it and moves on to
/// the next candidate.
#[derive(Debug, thiserror::Error)]
#[error("failed to launch {tool:?}: {source}")]
pub struct LaunchError {
    pub tool: std::path::PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// A finished attempt: the tool ran and terminated, on its own or killed by
/// the timeout.
#[derive(Debug)]
pub struct Completed {
    pub exit_code: i32,
    pub elapsed: std::time::Duration,
    pub record: Record,
}

/// Read lines from one of the child's pipes, appending each to the log as it
/// arrives, and return the accumulated capture.
async fn stream_lines<R>(reader: R, log: RunLog) -> String
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut lines = tokio::io::BufReader::new(reader).lines();
    let mut captured = String::new();
    while let Ok(Some(line)) = lines.next_line().await {
        // each line hits the disk before the next is read
        if let Err(error) = log.log(&line, true) {
            tracing::warn!("failed to append tool output: {:#}", error);
        }
        captured.push_str(&line);
        captured.push('\n');
    }
    captured
}

fn exit_status_code(status: std::process::ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    status.code().unwrap_or(-1)
}

fn duration_for_display(elapsed: std::time::Duration) -> std::time::Duration {
    std::time::Duration::from_millis(elapsed.as_millis() as u64)
}

/// Run one upload attempt for `name`, bounded by `settings.timeout`.
///
/// Timeout expiry kills the tool and reports [`TIMEOUT_EXIT_CODE`]; any
/// other exit code is surfaced unchanged. Only a failure to spawn the tool
/// is an error.
pub async fn attempt(
    name: &str,
    settings: &Settings,
    log: &RunLog,
) -> Result<Completed, LaunchError> {
    let args = settings.invocation(name);
    let start = std::time::Instant::now();
    let mut child = tokio::process::Command::new(&settings.tool)
        .args(&args[1..])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| LaunchError {
            tool: settings.tool.clone(),
            source,
        })?;

    let stdout_task = child
        .stdout
        .take()
        .map(|out| tokio::spawn(stream_lines(out, log.clone())));
    let stderr_task = child
        .stderr
        .take()
        .map(|err| tokio::spawn(stream_lines(err, log.clone())));

    let exit_code = match tokio::time::timeout(settings.timeout, child.wait()).await {
        Ok(Ok(status)) => exit_status_code(status),
        Ok(Err(source)) => {
            return Err(LaunchError {
                tool: settings.tool.clone(),
                source,
            })
        }
        Err(_) => {
            tracing::warn!(
                "upload of {:?} exceeded {}, killing",
                name,
                humantime::format_duration(settings.timeout)
            );
            if let Err(error) = child.kill().await {
                tracing::warn!("failed to kill timed-out tool: {}", error);
            }
            let _ = child.wait().await;
            TIMEOUT_EXIT_CODE
        }
    };

    // the pipes close with the child, so the readers finish promptly
    let stdout = match stdout_task {
        Some(task) => task.await.unwrap_or_default(),
        None => String::new(),
    };
    let stderr = match stderr_task {
        Some(task) => task.await.unwrap_or_default(),
        None => String::new(),
    };

    let elapsed = start.elapsed();
    log_or_warn(
        log,
        &format!(
            "Elapsed time to upload {}: {}",
            name,
            humantime::format_duration(duration_for_display(elapsed))
        ),
    );
    log_or_warn(log, &format!("Return code for uploading {}: {}", name, exit_code));

    Ok(Completed {
        exit_code,
        elapsed,
        record: Record {
            args,
            returncode: exit_code,
            stderr,
            stdout,
        },
    })
}

fn log_or_warn(log: &RunLog, msg: &str) {
    if let Err(error) = log.log(msg, true) {
        tracing::warn!("failed to append to log: {:#}", error);
    }
}
