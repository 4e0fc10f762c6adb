//! Method level structures: attribute flags, body headers and IL instruction boundaries.
//!
//! # Key Components
//!
//! - [`crate::metadata::method::MethodBody`] - Tiny and fat method header decoding
//! - [`crate::metadata::method::instruction_offsets`] - IL offsets of every instruction of a body
//! - [`crate::metadata::method::MethodModifiers`] and friends - Flags deciding whether a method
//!   carries IL
//!
//! # Examples
//!
//! ```rust
//! use pdbcompare::metadata::method::{instruction_offsets, MethodBody};
//!
//! // tiny header, code: ldarg.0, ldc.i4.s 5, add, ret
//! let data = [0x16, 0x02, 0x1F, 0x05, 0x58, 0x2A];
//! let body = MethodBody::from(&data)?;
//! let offsets = instruction_offsets(body.code(&data)?)?;
//! assert_eq!(offsets, vec![0, 1, 3, 4]);
//! # Ok::<(), pdbcompare::Error>(())
//! ```

mod body;
mod il;
mod types;

pub use body::MethodBody;
pub use il::{instruction_offsets, operand_type, operand_type_fe, skip_instruction, OperandType};
pub use types::*;
