//! Sequential test-run controller.
//!
//! Drives the candidate sequence through the skip policy and the upload
//! supervisor, one candidate at a time, and persists a result record per
//! completed attempt. Nothing that happens to a single candidate aborts the
//! run; the only checkpoint for resuming a partial run is the append-only
//! log plus the `--start` marker.

use anyhow::Result;

use crate::runlog::RunLog;
use crate::skip::{SkipPolicy, SkipReason, StartMarker, Verdict};
use crate::upload;

/// Counters for one run.
#[derive(Copy, Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Summary {
    /// Candidates handed to the supervisor (completed or launch-failed).
    pub attempted: usize,
    /// Candidates the skip policy filtered out.
    pub skipped: usize,
    /// Attempts that completed with exit code 0.
    pub succeeded: usize,
    /// Attempts that completed with a non-zero exit code (timeouts included).
    pub tool_failures: usize,
    /// Attempts where the tool could not be launched at all.
    pub launch_failures: usize,
}

impl std::ops::Add for Summary {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            attempted: self.attempted + other.attempted,
            skipped: self.skipped + other.skipped,
            succeeded: self.succeeded + other.succeeded,
            tool_failures: self.tool_failures + other.tool_failures,
            launch_failures: self.launch_failures + other.launch_failures,
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "names attempted: {}\n\
            names skipped: {}\n\
            uploads succeeded: {}\n\
            uploads failed: {}\n\
            launch failures: {}",
            self.attempted, self.skipped, self.succeeded, self.tool_failures, self.launch_failures,
        )
    }
}

/// Step through every candidate and try to upload the ones the policy keeps.
///
/// Per candidate: skipped names get a console notice only; attempted names
/// get an echoed progress line, the supervisor call, and (when the tool ran)
/// a JSON record appended to the log. Records are echoed to the console only
/// for non-zero exit codes, keeping the console focused on failures.
pub async fn run(
    candidates: impl IntoIterator<Item = String>,
    policy: &SkipPolicy,
    mut marker: StartMarker,
    settings: &upload::Settings,
    log: &RunLog,
) -> Result<Summary> {
    let mut summary = Summary::default();
    for name in candidates {
        let (verdict, next) = policy.decide(&name, marker);
        marker = next;
        match verdict {
            Verdict::Skip(reason) => {
                summary.skipped += 1;
                match reason {
                    SkipReason::OnlyMismatch => {
                        tracing::debug!("skipping {:?}: does not match --only", name);
                    }
                    SkipReason::BeforeStart => {
                        tracing::info!("not started yet, skipping {:?}", name);
                    }
                    SkipReason::Omitted(omit) => {
                        tracing::info!("omitting {:?} (matches {:?})", name, omit);
                    }
                }
                continue;
            }
            Verdict::Attempt => {}
        }
        log.log(&format!("Attempting {}...", name), true)?;
        match upload::attempt(&name, settings, log).await {
            Ok(completed) => {
                summary.attempted += 1;
                if completed.exit_code == 0 {
                    summary.succeeded += 1;
                } else {
                    summary.tool_failures += 1;
                }
                log.append_record(&completed.record, completed.exit_code != 0)?;
            }
            Err(error) => {
                // no record for a tool that never ran; log and move on
                summary.attempted += 1;
                summary.launch_failures += 1;
                log.log(&format!("ERROR: {} failed\n{}", name, error), true)?;
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::os::unix::fs::PermissionsExt;

    use super::*;
    use crate::runlog::Record;

    fn write_stub(dir: &std::path::Path, script: &str) -> std::path::PathBuf {
        let path = dir.join("stub-tool");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn settings(
        dir: &std::path::Path,
        tool: std::path::PathBuf,
        timeout: std::time::Duration,
    ) -> upload::Settings {
        upload::Settings {
            tool,
            tree: dir.join("tree"),
            remote: "qa-remote".to_string(),
            archive_path: "/archive".to_string(),
            timeout,
        }
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    fn records_in(log: &RunLog) -> Vec<Record> {
        std::fs::read_to_string(log.path())
            .unwrap()
            .lines()
            .filter(|line| line.starts_with('{'))
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_unfiltered_run_records_every_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let tool = write_stub(dir.path(), "#!/bin/sh\nsleep 0.1\nexit 0\n");
        let log = RunLog::new(dir.path().join("log.txt"));
        let policy = SkipPolicy::default();

        let summary = run(
            names(&["001-a", "002-b", "003-c"]),
            &policy,
            StartMarker::Unset,
            &settings(dir.path(), tool, std::time::Duration::from_secs(10)),
            &log,
        )
        .await
        .unwrap();

        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.skipped, 0);
        let records = records_in(&log);
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.returncode == 0));
    }

    #[tokio::test]
    async fn test_timeout_surfaces_as_124_within_margin() {
        let dir = tempfile::tempdir().unwrap();
        let tool = write_stub(dir.path(), "#!/bin/sh\nexec sleep 30\n");
        let log = RunLog::new(dir.path().join("log.txt"));
        let policy = SkipPolicy::default();

        let start = std::time::Instant::now();
        let summary = run(
            names(&["001-a"]),
            &policy,
            StartMarker::Unset,
            &settings(dir.path(), tool, std::time::Duration::from_secs(1)),
            &log,
        )
        .await
        .unwrap();
        let elapsed = start.elapsed();

        assert_eq!(summary.tool_failures, 1);
        let records = records_in(&log);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].returncode, upload::TIMEOUT_EXIT_CODE);
        assert!(elapsed < std::time::Duration::from_secs(3), "{:?}", elapsed);
    }

    #[tokio::test]
    async fn test_launch_failure_is_logged_and_run_continues() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_stub(dir.path(), "#!/bin/sh\nexit 0\n");
        let missing = dir.path().join("no-such-tool");
        let log = RunLog::new(dir.path().join("log.txt"));
        let policy = SkipPolicy::default();

        // first pass with an unspawnable tool: failures logged, no records
        let summary = run(
            names(&["001-a", "002-b"]),
            &policy,
            StartMarker::Unset,
            &settings(dir.path(), missing, std::time::Duration::from_secs(5)),
            &log,
        )
        .await
        .unwrap();
        assert_eq!(summary.launch_failures, 2);
        assert!(records_in(&log).is_empty());
        assert!(std::fs::read_to_string(log.path()).unwrap().contains("ERROR: 001-a failed"));

        // the same run with a working tool still gets through the sequence
        let summary = run(
            names(&["001-a", "002-b"]),
            &policy,
            StartMarker::Unset,
            &settings(dir.path(), good, std::time::Duration::from_secs(5)),
            &log,
        )
        .await
        .unwrap();
        assert_eq!(summary.succeeded, 2);
        assert_eq!(records_in(&log).len(), 2);
    }

    #[tokio::test]
    async fn test_resume_marker_limits_the_attempted_set() {
        let dir = tempfile::tempdir().unwrap();
        let tool = write_stub(dir.path(), "#!/bin/sh\nexit 0\n");
        let log = RunLog::new(dir.path().join("log.txt"));
        let policy = SkipPolicy::default();

        let summary = run(
            names(&["001-a", "002-b", "003-c"]),
            &policy,
            StartMarker::Armed("002".to_string()),
            &settings(dir.path(), tool, std::time::Duration::from_secs(5)),
            &log,
        )
        .await
        .unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.attempted, 2);
        let records = records_in(&log);
        assert!(records[0].args.iter().any(|arg| arg.contains("002-b")));
    }

    #[test]
    fn test_summary_add_and_display() {
        let first = Summary {
            attempted: 2,
            skipped: 1,
            succeeded: 1,
            tool_failures: 1,
            launch_failures: 0,
        };
        let second = Summary {
            attempted: 1,
            skipped: 0,
            succeeded: 0,
            tool_failures: 0,
            launch_failures: 1,
        };
        let total = first + second;
        assert_eq!(total.attempted, 3);
        assert_eq!(total.launch_failures, 1);
        let text = format!("{}", total);
        assert!(text.contains("names attempted: 3"));
        assert!(text.contains("launch failures: 1"));
    }
}
