use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all possible error conditions that can occur while streaming a textual
/// IR file and propagating taint facts through it. Each variant provides specific context
/// about the failure mode to enable appropriate error handling.
///
/// # Error Categories
///
/// ## I/O Errors
/// - [`Error::FileError`] - Filesystem I/O errors while opening or reading the input
///
/// ## Analysis Errors
/// - [`Error::OriginCycle`] - An origin chain revisited a variable during resolution
///
/// # Examples
///
/// ```rust
/// use flowscope::{Error, TaintEngine};
/// use std::path::Path;
///
/// match TaintEngine::analyze_file(Path::new("program.ll")) {
///     Ok(verdict) => println!("{}", verdict),
///     Err(Error::FileError(io_err)) => eprintln!("I/O error: {}", io_err),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while opening or reading the
    /// input stream, such as a missing file, permission issues, or filesystem
    /// errors. Surfaces before any partial verdict is produced.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// An origin chain revisited a variable during resolution.
    ///
    /// Origin chains written by a single forward pass cannot contain cycles,
    /// so hitting one means the recorded state is internally inconsistent.
    /// Resolution fails closed rather than walking the chain without bound.
    ///
    /// The associated value names the variable whose resolution failed.
    #[error("Origin chain for '{0}' contains a cycle")]
    OriginCycle(String),
}
