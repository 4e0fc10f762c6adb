//! Portable PDB `Document` table (0x30) rows.
//!
//! Only the name blob is used. Hash and language columns are read to keep row offsets intact.

use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// A raw Portable PDB `Document` row (0x30)
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRaw {
    /// 1-based row index
    pub rid: u32,
    /// Metadata token of the row
    pub token: Token,
    /// `#Blob` index of the encoded document name
    pub name: u32,
    /// `#GUID` index of the hash algorithm
    pub hash_algorithm: u32,
    /// `#Blob` index of the document hash
    pub hash: u32,
    /// `#GUID` index of the source language
    pub language: u32,
}

impl RowReadable for DocumentRaw {
    const TABLE_ID: TableId = TableId::Document;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(DocumentRaw {
            rid,
            token: Token::from_parts(TableId::Document as u8, rid),
            name: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
            hash_algorithm: read_le_at_dyn(data, offset, sizes.is_large_guid())?,
            hash: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
            language: read_le_at_dyn(data, offset, sizes.is_large_guid())?,
        })
    }

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* name */           sizes.blob_bytes() +
            /* hash_algorithm */ sizes.guid_bytes() +
            /* hash */           sizes.blob_bytes() +
            /* language */       sizes.guid_bytes()
        )
    }
}
