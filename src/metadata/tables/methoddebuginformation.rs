//! Portable PDB `MethodDebugInformation` table (0x31) rows.
//!
//! Row `n` describes `MethodDef` row `n`: its document and its sequence points blob.

use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// A raw Portable PDB `MethodDebugInformation` row (0x31).
///
/// The table runs parallel to the `MethodDef` table of the module: row `n` describes method
/// `0x06000000 | n`.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDebugInformationRaw {
    /// 1-based row index
    pub rid: u32,
    /// Metadata token of the row
    pub token: Token,
    /// `Document` row holding all sequence points, 0 if the method spans several documents
    pub document: u32,
    /// `#Blob` index of the sequence points, 0 if the method has none
    pub sequence_points: u32,
}

impl MethodDebugInformationRaw {
    /// The token of the method this row describes
    #[must_use]
    pub fn method_token(&self) -> Token {
        Token::from_parts(TableId::MethodDef as u8, self.rid)
    }
}

impl RowReadable for MethodDebugInformationRaw {
    const TABLE_ID: TableId = TableId::MethodDebugInformation;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(MethodDebugInformationRaw {
            rid,
            token: Token::from_parts(TableId::MethodDebugInformation as u8, rid),
            document: read_le_at_dyn(data, offset, sizes.is_large(TableId::Document))?,
            sequence_points: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* document */        sizes.table_index_bytes(TableId::Document) +
            /* sequence_points */ sizes.blob_bytes()
        )
    }
}
