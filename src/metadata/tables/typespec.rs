//! `TypeSpec` table (0x1B) rows, ECMA-335 II.22.39.

use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// A raw `TypeSpec` row (0x1B)
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpecRaw {
    /// 1-based row index
    pub rid: u32,
    /// Metadata token of the row
    pub token: Token,
    /// `#Blob` index of the type signature
    pub signature: u32,
}

impl RowReadable for TypeSpecRaw {
    const TABLE_ID: TableId = TableId::TypeSpec;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(TypeSpecRaw {
            rid,
            token: Token::from_parts(TableId::TypeSpec as u8, rid),
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }

    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(sizes.blob_bytes())
    }
}
