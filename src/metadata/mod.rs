//! ECMA-335 metadata and Portable PDB parsing.
//!
//! This module contains everything needed to read the parts of a .NET module and its debug
//! symbols that a sequence point comparison relies on.
//!
//! # Key Components
//!
//! - [`module`] - A loaded module with its CLI header, metadata streams and method bodies
//! - [`pdb`] - Portable PDB loading, symbol lookup and sequence point extraction
//! - [`view`] - Stream level view over one metadata block
//! - [`tables`] - Typed access to the metadata table rows
//! - [`streams`] - The `#~`, `#Strings`, `#Blob`, `#GUID` and `#Pdb` streams
//! - [`signatures`] - Method and type signature decoding
//! - [`names`] - Display names of types and methods
//! - [`method`] - Method body headers and IL instruction boundaries
//! - [`sequencepoints`] - Portable PDB sequence point blobs
//! - [`token`] - Metadata table row references
//!
//! # Examples
//!
//! ```rust,no_run
//! use pdbcompare::metadata::{module::ModuleView, names::MetadataNames, tables::TypeDefRaw};
//! use std::path::Path;
//!
//! let module = ModuleView::from_file(Path::new("Sample.dll"))?;
//! module.with_metadata(|metadata| -> pdbcompare::Result<()> {
//!     let names = MetadataNames::new(metadata)?;
//!     if let Some(types) = metadata.tables()?.table::<TypeDefRaw>() {
//!         for row in types.iter() {
//!             println!("{}", names.type_def_name(row?.rid)?);
//!         }
//!     }
//!     Ok(())
//! })?;
//! # Ok::<(), pdbcompare::Error>(())
//! ```

/// Implementation of the Header of CIL
pub mod cor20header;
/// Method body headers and IL decoding
pub mod method;
/// A loaded module with its metadata
pub mod module;
/// Display names of types and methods
pub mod names;
/// Portable PDB symbol files
pub mod pdb;
/// Implementation of the root metadata structure
pub mod root;
/// Portable PDB sequence points
pub mod sequencepoints;
/// Implementation of method and type signatures
pub mod signatures;
/// Implementation of the metadata streams (tables, heaps, `#Pdb`)
pub mod streams;
/// Implementation of the metadata tables
pub mod tables;
/// Commonly used metadata token type
pub mod token;
/// Stream level view over one metadata block
pub mod view;
