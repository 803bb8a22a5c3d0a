//! Substring-based candidate filtering for test runs
//!
//! Decides, per candidate filename, whether this run should attempt the
//! upload or move on. Three rules apply, in precedence order:
//!
//! 1. `--only` restricts the run to names containing one substring and
//!    overrides everything else
//! 2. an armed resume marker skips candidates until the first one containing
//!    it; that candidate is attempted and the marker is consumed
//! 3. the omit list skips names containing any of its entries, unless the
//!    run disables it
//!
//! The resume marker is the only mutable piece of run state, so it is passed
//! into and returned from [`SkipPolicy::decide`] explicitly rather than
//! hidden inside the policy.
//!
//! # Examples
//!
//! ```
//! use common::skip::{SkipPolicy, StartMarker, Verdict};
//!
//! let policy = SkipPolicy {
//!     only: None,
//!     omit: vec!["042".to_string()],
//!     honor_omit: true,
//! };
//!
//! let (verdict, marker) = policy.decide("001-plain.txt", StartMarker::Unset);
//! assert_eq!(verdict, Verdict::Attempt);
//!
//! let (verdict, _) = policy.decide("042-bad.txt", marker);
//! assert!(matches!(verdict, Verdict::Skip(_)));
//! ```

use anyhow::Context;

/// Resume-marker state threaded through a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartMarker {
    /// No resume point requested.
    Unset,
    /// Candidates are skipped until one contains this substring.
    Armed(String),
    /// The matching candidate has been reached; later candidates are subject
    /// only to the omit rule.
    Consumed,
}

impl StartMarker {
    /// Build the initial marker state from an optional `--start` value.
    pub fn new(start: Option<String>) -> Self {
        match start {
            Some(marker) => StartMarker::Armed(marker),
            None => StartMarker::Unset,
        }
    }
}

/// Why a candidate was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// `--only` is set and the candidate does not contain it.
    OnlyMismatch,
    /// An armed resume marker has not been reached yet.
    BeforeStart,
    /// The candidate contains this omit-list entry.
    Omitted(String),
}

/// Decision for a single candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Hand the candidate to the upload supervisor.
    Attempt,
    /// Move on without touching the supervisor.
    Skip(SkipReason),
}

/// Immutable per-run filtering options.
///
/// Resume state lives in [`StartMarker`], not here; `decide` takes the
/// current marker and returns the next one.
#[derive(Debug, Clone, Default)]
pub struct SkipPolicy {
    /// Restrict the run to candidates containing this substring.
    pub only: Option<String>,
    /// Substrings whose presence skips a candidate.
    pub omit: Vec<String>,
    /// Whether the omit list is honored (`--no-omit` clears this).
    pub honor_omit: bool,
}

impl SkipPolicy {
    /// Decide whether `name` should be attempted, given the current marker
    /// state. Always resolves; the returned marker replaces the one passed
    /// in for the next candidate.
    pub fn decide(&self, name: &str, marker: StartMarker) -> (Verdict, StartMarker) {
        // --only is evaluated independently of resume/omit logic
        if let Some(only) = &self.only {
            let verdict = if name.contains(only.as_str()) {
                Verdict::Attempt
            } else {
                Verdict::Skip(SkipReason::OnlyMismatch)
            };
            return (verdict, marker);
        }
        if let StartMarker::Armed(start) = &marker {
            if !name.contains(start.as_str()) {
                return (Verdict::Skip(SkipReason::BeforeStart), marker);
            }
            // the matching candidate itself is attempted, unconditionally
            return (Verdict::Attempt, StartMarker::Consumed);
        }
        if self.honor_omit {
            for omit in &self.omit {
                if name.contains(omit.as_str()) {
                    return (Verdict::Skip(SkipReason::Omitted(omit.clone())), marker);
                }
            }
        }
        (Verdict::Attempt, marker)
    }
}

/// Load the omit list from `path`: one substring per line.
///
/// A missing file is an empty list. Blank lines are dropped; an empty entry
/// would match every candidate.
pub fn load_omit_list(path: &std::path::Path) -> anyhow::Result<Vec<String>> {
    if !path.exists() {
        return Ok(vec![]);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read omit file {:?}", path))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
