//! Portable PDB `#Pdb` stream.
//!
//! Holds the 20-byte PDB id, the entry point and the row counts of the type system tables of
//! the module the PDB belongs to.

use strum::IntoEnumIterator;

use crate::{
    file::parser::Parser,
    metadata::{
        tables::{TableId, TABLE_SLOTS},
        token::Token,
    },
    Result,
};

/// The `#Pdb` stream of a Portable PDB.
///
/// It identifies the PDB, and carries the row counts of the module's type system tables which
/// the debug tables index into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdbStream {
    /// 20 byte PDB id: a 16 byte GUID followed by a 4 byte stamp
    pub id: [u8; 20],
    /// Entry point `MethodDef` token, nil for libraries
    pub entry_point: Token,
    /// Bit vector of type system tables the PDB references
    pub referenced_tables: u64,
    /// Row counts of the referenced tables, indexed by table id
    pub type_system_rows: Vec<u32>,
}

impl PdbStream {
    /// Parse the `#Pdb` stream
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] on truncated input and [`crate::Error::Malformed`]
    /// if a referenced table is not a type system table.
    pub fn from(data: &[u8]) -> Result<PdbStream> {
        let mut parser = Parser::new(data);

        let mut id = [0u8; 20];
        id.copy_from_slice(parser.read_bytes(20)?);

        let entry_point = Token::new(parser.read_le::<u32>()?);
        let referenced_tables = parser.read_le::<u64>()?;

        let mut type_system_rows = vec![0u32; TABLE_SLOTS];
        for bit in 0..TABLE_SLOTS {
            if referenced_tables & (1 << bit) == 0 {
                continue;
            }

            let known = TableId::iter().any(|id| id as usize == bit && id.is_type_system());
            if !known {
                return Err(malformed_error!(
                    "Portable PDB references non type system table - 0x{:02x}",
                    bit
                ));
            }

            type_system_rows[bit] = parser.read_le::<u32>()?;
        }

        Ok(PdbStream {
            id,
            entry_point,
            referenced_tables,
            type_system_rows,
        })
    }

    /// The GUID part of the PDB id, matching the CodeView record of the module
    #[must_use]
    pub fn guid(&self) -> uguid::Guid {
        let mut guid = [0u8; 16];
        guid.copy_from_slice(&self.id[..16]);
        uguid::Guid::from_bytes(guid)
    }

    /// The stamp part of the PDB id
    #[must_use]
    pub fn stamp(&self) -> u32 {
        u32::from_le_bytes([self.id[16], self.id[17], self.id[18], self.id[19]])
    }
}
