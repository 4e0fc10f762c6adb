// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # pdbcompare
//!
//! Verifies that the debug information of a rewritten .NET module still matches the original.
//!
//! Tools that rewrite compiled .NET modules (weavers, obfuscators, instrumenters, linkers) are
//! expected to keep the module debuggable. `pdbcompare` loads the original ("First") and the
//! rewritten ("Second") module together with their Portable PDBs and checks, method by method,
//! that the sequence points still lead to the same source file and line.
//!
//! ## Features
//!
//! - **Own ECMA-335 reader** - PE container, metadata streams, tables, signatures and IL method
//!   bodies, memory mapped and parsed without the .NET runtime
//! - **Portable PDB support** - side-car, CodeView referenced and embedded (deflate) symbol
//!   files, with id verification
//! - **Full scan comparison** - every divergence is reported as a finding, nothing stops early
//! - **Snapshots** - module graphs can be stored as JSON and compared later
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdbcompare::prelude::*;
//! use std::path::Path;
//!
//! let loader = AutoLoader::default();
//! let first = loader.load(Path::new("original/App.dll"))?;
//! let second = loader.load(Path::new("rewritten/App.dll"))?;
//!
//! let report = Comparer::new(CompareOptions::default()).compare_modules(&first, &second);
//! for finding in report.findings() {
//!     println!("[{}] {}", finding.severity(), finding);
//! }
//! std::process::exit(report.error_count() as i32);
//! # Ok::<(), pdbcompare::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`file`] - PE container access, memory mapped through `memmap2`, parsed by `goblin`
//! - [`metadata`] - ECMA-335 metadata and Portable PDB reading
//! - [`graph`] - The owned module graph the comparison works on
//! - [`loader`] - [`ModuleLoader`] implementations producing module graphs
//! - [`compare`] - The comparison engine, its findings and reports
//!
//! ### Testing
//!
//! ```bash
//! cargo test
//! cargo bench
//! ```

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use pdbcompare::prelude::*;
///
/// let graph = CilLoader::default().load(std::path::Path::new("App.dll"))?;
/// println!("{} methods", graph.method_count());
/// # Ok::<(), pdbcompare::Error>(())
/// ```
pub mod prelude;

/// Access to PE files and their raw bytes
///
/// [`file::File`] owns a memory mapped or in-memory PE image and exposes the CLR runtime
/// header, the debug directory and RVA translation. [`file::parser::Parser`] decodes the
/// compressed integers used throughout metadata blobs.
pub mod file;

/// ECMA-335 metadata and Portable PDB parsing
///
/// See [`metadata::module::ModuleView`] for the metadata of a module and
/// [`metadata::pdb::PortablePdb`] for its debug symbols.
pub mod metadata;

/// The module graph data model and its JSON snapshots
pub mod graph;

/// Loading module graphs from modules and snapshots
pub mod loader;

/// The sequence point comparison engine
///
/// Compares two [`graph::ModuleGraph`]s and reports every divergence as a
/// [`compare::Finding`].
pub mod compare;

/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust,no_run
/// use pdbcompare::{graph::ModuleGraph, CilLoader, ModuleLoader, Result};
///
/// fn load(path: &str) -> Result<ModuleGraph> {
///     CilLoader::default().load(std::path::Path::new(path))
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `pdbcompare` Error type
///
/// Returned by everything that reads modules, symbols or snapshots. The comparison itself never
/// fails.
///
/// # Examples
///
/// ```rust,no_run
/// use pdbcompare::{CilLoader, Error, ModuleLoader};
///
/// match CilLoader::default().load(std::path::Path::new("App.dll")) {
///     Ok(graph) => println!("Loaded {}", graph.name),
///     Err(Error::UnsupportedSymbolFormat(format)) => println!("Can not read {format}"),
///     Err(Error::Malformed { message, .. }) => println!("Malformed: {}", message),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

pub use compare::{
    AssemblySlot, CompareOptions, Comparer, Finding, FindingKind, Report, Severity,
};
pub use graph::{InstructionEntry, MethodEntry, ModuleGraph, SourcePosition, TypeEntry};
pub use loader::{AutoLoader, CilLoader, LoaderOptions, ModuleLoader, SnapshotLoader};

pub use file::{parser::Parser, File};
