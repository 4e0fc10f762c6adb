//! The sequence point comparison engine.
//!
//! Two [`ModuleGraph`]s, an original ("First") and a rewritten copy ("Second"), are compared
//! top down:
//!
//! 1. every type of the first module is looked up by full name in the second one
//! 2. every method with a body is looked up by signature in the matching type
//! 3. the first sequence points of both copies have to agree on document and start line
//! 4. all sequence points of the rewritten copy have to stay in the document of its first one
//!
//! Nothing here fails. Every divergence becomes a [`Finding`] in the returned [`Report`], and
//! the comparison always runs to completion.
//!
//! # Examples
//!
//! ```rust
//! use pdbcompare::{compare::{CompareOptions, Comparer}, graph::ModuleGraph};
//!
//! let first = ModuleGraph::default();
//! let second = ModuleGraph::default();
//!
//! let report = Comparer::new(CompareOptions::default()).compare_modules(&first, &second);
//! assert_eq!(report.error_count(), 0);
//! ```

mod extract;
mod finding;
mod identity;
mod method;
mod module;
mod report;
mod types;

pub use extract::{first_sequence_point, sequence_points};
pub use finding::{AssemblySlot, Finding, FindingKind, Severity};
pub use identity::{key_map, Identity};
pub use method::{compare_methods, verify_all_sequence_points};
pub use module::compare_modules;
pub use report::Report;
pub use types::compare_types;

use crate::graph::{MethodEntry, ModuleGraph, TypeEntry};

/// Settings of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    /// Report differing start lines of the first sequence points
    pub compare_start_lines: bool,
    /// Compare type pairs on the rayon thread pool
    pub parallel: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            compare_start_lines: true,
            parallel: false,
        }
    }
}

/// Entry point bundling [`CompareOptions`] with the comparison functions
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparer {
    options: CompareOptions,
}

impl Comparer {
    /// Create a comparer with the given options
    #[must_use]
    pub fn new(options: CompareOptions) -> Self {
        Comparer { options }
    }

    /// The options in use
    #[must_use]
    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// See [`compare_modules`]
    #[must_use]
    pub fn compare_modules(&self, source: &ModuleGraph, rewritten: &ModuleGraph) -> Report {
        compare_modules(source, rewritten, &self.options)
    }

    /// See [`compare_types`]
    #[must_use]
    pub fn compare_types(&self, source: &TypeEntry, rewritten: &TypeEntry) -> Report {
        compare_types(source, rewritten, &self.options)
    }

    /// See [`compare_methods`]
    #[must_use]
    pub fn compare_methods(
        &self,
        source: &MethodEntry,
        rewritten: &MethodEntry,
        method_name: &str,
    ) -> Report {
        compare_methods(source, rewritten, method_name, &self.options)
    }
}
