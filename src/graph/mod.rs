//! The module graph compared by [`crate::compare`].
//!
//! A [`ModuleGraph`] is an owned, immutable snapshot of everything the comparison looks at:
//! the types of a module, their methods, the IL instructions of every method body and the
//! source positions attached to those instructions. It is produced once by a
//! [`crate::ModuleLoader`] and never modified afterwards.
//!
//! Graphs can be written to and read back from JSON snapshots, which makes it possible to store
//! the state of a module and compare against it later without the original binary.
//!
//! # Examples
//!
//! ```rust
//! use pdbcompare::graph::{InstructionEntry, MethodEntry, ModuleGraph, SourcePosition, TypeEntry};
//!
//! let graph = ModuleGraph {
//!     name: "App.dll".to_string(),
//!     types: vec![TypeEntry {
//!         name: "App.Program".to_string(),
//!         methods: vec![MethodEntry {
//!             signature: "System.Void App.Program::Main()".to_string(),
//!             has_body: true,
//!             instructions: vec![InstructionEntry {
//!                 offset: 0,
//!                 position: Some(SourcePosition::new("Program.cs", 5)),
//!             }],
//!         }],
//!     }],
//! };
//!
//! let mut json = Vec::new();
//! graph.write_json(&mut json)?;
//! assert_eq!(ModuleGraph::read_json(json.as_slice())?, graph);
//! # Ok::<(), pdbcompare::Error>(())
//! ```

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::{metadata::sequencepoints::HIDDEN_LINE, Result};

/// A source location attached to an IL instruction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    /// Path or URL of the source document
    pub document: String,
    /// First line, [`HIDDEN_LINE`] for hidden points
    pub start_line: u32,
    /// First column
    pub start_column: u32,
    /// Last line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    /// Column after the last character
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
}

impl SourcePosition {
    /// A position covering only its start line
    #[must_use]
    pub fn new(document: impl Into<String>, start_line: u32) -> Self {
        SourcePosition {
            document: document.into(),
            start_line,
            start_column: 0,
            end_line: None,
            end_column: None,
        }
    }

    /// Returns true for hidden sequence points
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.start_line == HIDDEN_LINE
    }
}

/// One IL instruction of a method body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionEntry {
    /// Offset in the IL stream of the method
    pub offset: u32,
    /// Source position whose sequence point starts at this instruction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<SourcePosition>,
}

/// A method declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodEntry {
    /// Full signature, `ReturnType DeclaringType::Name(Param1,Param2)`
    pub signature: String,
    /// True if the method carries IL code
    pub has_body: bool,
    /// The instructions of the body in IL order, empty without a body
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instructions: Vec<InstructionEntry>,
}

/// A type declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    /// Full name, nested types as `Namespace.Outer/Inner`
    pub name: String,
    /// Methods in declaration order
    pub methods: Vec<MethodEntry>,
}

/// All types of one module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleGraph {
    /// Name of the module, usually its file name
    pub name: String,
    /// Types in declaration order
    pub types: Vec<TypeEntry>,
}

impl ModuleGraph {
    /// Read a graph from a JSON snapshot
    ///
    /// # Errors
    /// Returns [`crate::Error::Snapshot`] if the input is not a valid snapshot.
    pub fn read_json<R: Read>(reader: R) -> Result<ModuleGraph> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the graph as a pretty printed JSON snapshot
    ///
    /// # Errors
    /// Returns [`crate::Error::Snapshot`] if writing fails.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Look up a type by its full name
    #[must_use]
    pub fn find_type(&self, name: &str) -> Option<&TypeEntry> {
        self.types.iter().find(|entry| entry.name == name)
    }

    /// Number of methods over all types
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.types.iter().map(|entry| entry.methods.len()).sum()
    }
}
