use std::path::PathBuf;

use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds {
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which covers every failure this library can report.
///
/// Only the loading side of the crate can fail: reading a module, its metadata or its debug
/// symbols. The comparison engine itself never returns an error, every divergence between two
/// modules is reported as a [`crate::compare::Finding`] instead.
///
/// # Error Categories
///
/// ## File Parsing Errors
/// - [`Error::Malformed`] - Corrupted or invalid file structure
/// - [`Error::OutOfBounds`] - Attempted to read beyond the end of a buffer
/// - [`Error::NotSupported`] - Unsupported file format or feature
/// - [`Error::Empty`] - Empty input provided
/// - [`Error::RecursionLimit`] - Signature nesting exceeded the allowed depth
///
/// ## I/O and External Errors
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::GoblinErr`] - PE parsing errors from the goblin crate
/// - [`Error::Snapshot`] - A module graph snapshot could not be (de)serialized
///
/// ## Debug Symbol Errors
/// - [`Error::MissingSymbols`] - No Portable PDB could be located for a module
/// - [`Error::SymbolMismatch`] - The located PDB belongs to a different build
/// - [`Error::UnsupportedSymbolFormat`] - The symbol file is not a Portable PDB
///
/// # Examples
///
/// ```rust,no_run
/// use pdbcompare::{CilLoader, Error, ModuleLoader};
/// use std::path::Path;
///
/// match CilLoader::default().load(Path::new("assembly.dll")) {
///     Ok(graph) => println!("{} types", graph.types.len()),
///     Err(Error::MissingSymbols(path)) => eprintln!("no pdb at {}", path.display()),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed file: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The file is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the file.
    #[error("Out of Bound read would have occurred! - {file}:{line}")]
    OutOfBounds {
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// This file type is not supported.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Error from the goblin crate during PE parsing.
    #[error("{0}")]
    GoblinErr(#[from] goblin::error::Error),

    /// Recursion limit reached while decoding nested signatures.
    ///
    /// The associated value shows the recursion limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// No Portable PDB could be found for the module.
    ///
    /// The associated path is the last location that was probed.
    #[error("No debug symbols found for module, looked for {0}")]
    MissingSymbols(PathBuf),

    /// The PDB id does not match the CodeView record of the module.
    #[error("Debug symbols do not belong to this module - expected {expected}, found {found}")]
    SymbolMismatch {
        /// GUID recorded in the module's CodeView debug directory entry
        expected: uguid::Guid,
        /// GUID found in the `#Pdb` stream of the symbol file
        found: uguid::Guid,
    },

    /// The symbol file exists, but is not in Portable PDB format.
    #[error("Unsupported debug symbol format - {0}")]
    UnsupportedSymbolFormat(String),

    /// A module graph snapshot could not be read or written.
    #[error("{0}")]
    Snapshot(#[from] serde_json::Error),
}
