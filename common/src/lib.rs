//! Internal library for the `upqa` QA harness.
//!
//! The harness uploads a corpus of filesystem-challenging filenames one at a
//! time through an external sync tool and records every attempt. This crate
//! carries the pieces with actual behavior; the binaries are thin wrappers.
//!
//! - [`skip`] decides which candidates a run attempts
//! - [`upload`] supervises one bounded attempt of the external tool
//! - [`testrun`] drives the candidate sequence through both
//! - [`runlog`] is the append-only progress/result sink
//! - [`config`] holds the static defaults

pub mod config;
pub mod runlog;
pub mod skip;
pub mod testrun;
pub mod upload;
