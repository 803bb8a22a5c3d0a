use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "upqa",
    version,
    about = "QA-test a remote-storage sync tool against filesystem-challenging filenames",
    long_about = "`upqa` steps through a generated corpus of challenging filenames, uploads each \
one through an external sync tool (rclone by default), and appends the outcome of every attempt \
to a durable log.

Each attempt is bounded by a hard timeout; a killed upload is recorded with exit code 124. \
Successful attempts are recorded silently, so the console stays focused on failures.

EXAMPLES:
    # Run the full corpus with defaults
    upqa

    # Re-run a single name by number, ignoring the omit list
    upqa --no-omit --only 17

    # Resume an interrupted run from name 42 with a shorter timeout
    upqa --start 42 --timeout 60"
)]
struct Args {
    // Selection
    /// Turn off skipping of names listed in the omit file
    #[arg(long, help_heading = "Selection")]
    no_omit: bool,

    /// Only test names containing this value
    ///
    /// Numbers are zero-padded to three digits to match the corpus ordinals,
    /// so `--only 7` selects name `007-...`.
    #[arg(long, value_name = "NUMBER", help_heading = "Selection")]
    only: Option<String>,

    /// Resume: skip names until one contains this value
    ///
    /// Numbers are zero-padded to three digits to match the corpus ordinals.
    /// The matching name itself is attempted.
    #[arg(long, value_name = "NUMBER", help_heading = "Selection")]
    start: Option<String>,

    /// File with one substring per line; matching names are skipped
    #[arg(long, value_name = "PATH", default_value = common::config::DEFAULT_OMIT_FILE, help_heading = "Selection")]
    omit_file: std::path::PathBuf,

    // Execution
    /// Seconds to allow each upload before it is killed
    #[arg(long, value_name = "SECS", default_value_t = common::config::DEFAULT_TIMEOUT_SECS, help_heading = "Execution")]
    timeout: u64,

    /// Path to the upload tool
    ///
    /// If not specified, `rclone` is resolved on PATH.
    #[arg(long, value_name = "PATH", help_heading = "Execution")]
    tool: Option<std::path::PathBuf>,

    /// Local corpus tree to upload from
    #[arg(long, value_name = "DIR", default_value = common::config::DEFAULT_TREE, help_heading = "Execution")]
    tree: std::path::PathBuf,

    /// Remote the tool uploads to
    #[arg(long, value_name = "NAME", default_value = common::config::DEFAULT_REMOTE, help_heading = "Execution")]
    remote: String,

    /// Destination path within the remote
    #[arg(long, value_name = "PATH", default_value = common::config::DEFAULT_ARCHIVE_PATH, help_heading = "Execution")]
    archive_path: String,

    // Progress & output
    /// Append progress lines and result records to this file
    #[arg(long, value_name = "PATH", default_value = common::config::DEFAULT_LOG_FILE, help_heading = "Progress & output")]
    log_file: std::path::PathBuf,

    /// Print run totals at the end
    #[arg(long, help_heading = "Progress & output")]
    summary: bool,

    /// Verbose level: -v DEBUG / -vv TRACE (default: INFO)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, help_heading = "Progress & output")]
    verbose: u8,
}

/// Numeric selectors address corpus ordinals and are zero-padded to match
/// the `NNN-` name prefix; anything else passes through as a raw substring.
fn normalize_selector(value: &str) -> String {
    match value.parse::<u32>() {
        Ok(number) => format!("{:03}", number),
        Err(_) => value.to_string(),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    // the only fatal conditions: no upload tool, or a log we cannot append to
    let tool = match &args.tool {
        Some(path) => path.clone(),
        None => which::which(common::config::DEFAULT_TOOL).with_context(|| {
            format!("cannot find `{}` on PATH", common::config::DEFAULT_TOOL)
        })?,
    };
    let log = common::runlog::RunLog::new(&args.log_file);
    log.check_writable()
        .context("result log must be appendable before the run starts")?;

    let policy = common::skip::SkipPolicy {
        only: args.only.as_deref().map(normalize_selector),
        omit: common::skip::load_omit_list(&args.omit_file)?,
        honor_omit: !args.no_omit,
    };
    let marker = common::skip::StartMarker::new(args.start.as_deref().map(normalize_selector));
    let timeout = std::time::Duration::from_secs(args.timeout);
    let settings = common::upload::Settings {
        tool,
        tree: args.tree.clone(),
        remote: args.remote.clone(),
        archive_path: args.archive_path.clone(),
        timeout,
    };
    tracing::debug!(
        "using tool {:?}, timeout {} per upload",
        &settings.tool,
        humantime::format_duration(timeout)
    );

    let summary = common::testrun::run(
        namegen::name_permutations(),
        &policy,
        marker,
        &settings,
        &log,
    )
    .await?;
    if args.summary {
        println!("{}", &summary);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_selectors_are_zero_padded() {
        assert_eq!(normalize_selector("7"), "007");
        assert_eq!(normalize_selector("042"), "042");
        assert_eq!(normalize_selector("120"), "120");
    }

    #[test]
    fn test_non_numeric_selectors_pass_through() {
        assert_eq!(normalize_selector("rocket"), "rocket");
        assert_eq!(normalize_selector("003-c"), "003-c");
    }
}
