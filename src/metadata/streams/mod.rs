//! Metadata streams and heaps (ECMA-335 II.24.2).
//!
//! # Key Components
//!
//! - [`StreamHeader`] - Entry of the stream directory
//! - [`Strings`] - `#Strings` identifier heap
//! - [`Blob`] - `#Blob` binary heap
//! - [`Guid`] - `#GUID` heap
//! - [`TablesHeader`] - `#~` table stream
//! - [`PdbStream`] - `#Pdb` stream of a Portable PDB

mod blob;
mod guid;
mod pdb;
mod streamheader;
mod strings;
mod tablesheader;

pub use blob::Blob;
pub use guid::Guid;
pub use pdb::PdbStream;
pub use streamheader::StreamHeader;
pub use strings::Strings;
pub use tablesheader::TablesHeader;
