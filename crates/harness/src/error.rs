//! Harness error types.
//!
//! The startup errors (`Load`, `Image`, `NoRegion`, `ImageFit`) are fatal:
//! they abort the run before the clock loop starts. `Io` covers trace-sink
//! and log-directory failures.

use std::io;

use thiserror::Error;

/// Errors produced by the simulation driver and loader.
#[derive(Debug, Error)]
pub enum SimError {
    /// The memory image file could not be read.
    #[error("cannot read memory image '{path}': {source}")]
    Load {
        /// Path that failed to load.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The memory image file was readable but malformed.
    #[error("bad memory image '{path}' (line {line}): {reason}")]
    Image {
        /// Path of the malformed image.
        path: String,
        /// 1-based line number of the offending record.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// The preload target region does not exist on the bus.
    #[error("no memory region named '{region}' on the bus")]
    NoRegion {
        /// Requested region name.
        region: String,
    },

    /// The memory image does not fit the target region.
    #[error("memory image ({size} bytes) does not fit region '{region}' ({capacity} bytes)")]
    ImageFit {
        /// Target region name.
        region: String,
        /// Image size in bytes.
        size: usize,
        /// Region capacity in bytes.
        capacity: usize,
    },

    /// An I/O failure on a trace sink or the log directory.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}
