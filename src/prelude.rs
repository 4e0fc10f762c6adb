//! # pdbcompare Prelude
//!
//! The types needed to load two modules and compare them, for glob import.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all pdbcompare operations
pub use crate::Error;

/// The result type used throughout pdbcompare
pub use crate::Result;

// ================================================================================================
// Loading
// ================================================================================================

/// Loader interface and its implementations
pub use crate::{AutoLoader, CilLoader, LoaderOptions, ModuleLoader, SnapshotLoader};

/// The module graph
pub use crate::{InstructionEntry, MethodEntry, ModuleGraph, SourcePosition, TypeEntry};

/// Low-level file parsing utilities
pub use crate::{File, Parser};

// ================================================================================================
// Metadata
// ================================================================================================

/// Metadata token type for referencing table entries
pub use crate::metadata::token::Token;

/// Loaded module metadata
pub use crate::metadata::module::ModuleView;

/// Portable PDB reading
pub use crate::metadata::pdb::{DebugSymbols, PortablePdb, SymbolSource};

/// Sequence points
pub use crate::metadata::sequencepoints::{SequencePoint, SequencePoints, HIDDEN_LINE};

// ================================================================================================
// Comparison
// ================================================================================================

/// The comparison engine and its results
pub use crate::{AssemblySlot, CompareOptions, Comparer, Finding, FindingKind, Report, Severity};
