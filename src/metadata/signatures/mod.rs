//! Method and type signature parsing for .NET metadata.
//!
//! Signatures encode parameter and return types, calling conventions and type instantiations
//! in the `#Blob` heap (ECMA-335 II.23.2). Two kinds are decoded here:
//!
//! - **Method Signatures** - Calling convention, generic arity, return and parameter types of a
//!   `MethodDef`
//! - **TypeSpec Signatures** - Generic instantiations, arrays and other constructed types
//!   referenced from other signatures
//!
//! The decoded [`TypeSignature`] tree is turned into a display name by
//! [`crate::metadata::names`].
//!
//! # Examples
//!
//! ```rust
//! use pdbcompare::metadata::signatures::{parse_method_signature, TypeSignature};
//!
//! // instance string M(int32)
//! let method = parse_method_signature(&[0x20, 0x01, 0x0E, 0x08])?;
//! assert!(method.has_this);
//! assert_eq!(method.return_type, TypeSignature::String);
//! assert_eq!(method.params, vec![TypeSignature::I4]);
//! # Ok::<(), pdbcompare::Error>(())
//! ```
//!
//! # References
//!
//! - ECMA-335 6th Edition, Partition II, Section 23.2 - Blobs and Signatures

mod parser;
mod types;

pub use parser::*;
pub use types::*;

use crate::Result;

/// Parse a `MethodSignature` from a byte slice
///
/// # Errors
/// Returns an error if the signature data is malformed or parsing fails
pub fn parse_method_signature(data: &[u8]) -> Result<SignatureMethod> {
    let mut parser = SignatureParser::new(data);
    parser.parse_method_signature()
}

/// Parse a `TypeSpecSignature` from a byte slice
///
/// # Errors
/// Returns an error if the signature data is malformed or parsing fails
pub fn parse_type_spec_signature(data: &[u8]) -> Result<SignatureTypeSpec> {
    let mut parser = SignatureParser::new(data);
    parser.parse_type_spec_signature()
}
