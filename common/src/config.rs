//! Static defaults for a QA run.
//!
//! Every value here can be overridden on the command line; these are the
//! settings the harness is normally driven with.

/// Remote the upload tool copies to.
pub const DEFAULT_REMOTE: &str = "permanent-prod";

/// Destination path within the remote.
pub const DEFAULT_ARCHIVE_PATH: &str = "/archives/rclone QA 1 (0a0j-0000)/My Files/test-tree";

/// Local corpus tree holding one file per challenging name.
pub const DEFAULT_TREE: &str = "test-tree/challenging-names";

/// Omit-list file consulted unless `--no-omit` is given.
pub const DEFAULT_OMIT_FILE: &str = "omit.txt";

/// Result log file, appended to across runs.
pub const DEFAULT_LOG_FILE: &str = "log.txt";

/// Upload tool resolved on PATH unless `--tool` is given.
pub const DEFAULT_TOOL: &str = "rclone";

/// Per-attempt wall-clock bound, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5 * 60;
