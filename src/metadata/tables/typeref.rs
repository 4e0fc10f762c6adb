//! `TypeRef` table (0x01) rows, ECMA-335 II.22.38.

use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// A raw `TypeRef` row (0x01)
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRefRaw {
    /// 1-based row index
    pub rid: u32,
    /// Metadata token of the row
    pub token: Token,
    /// `ResolutionScope` coded index. A `TypeRef` scope marks a nested type reference.
    pub resolution_scope: CodedIndex,
    /// `#Strings` index of the name
    pub type_name: u32,
    /// `#Strings` index of the namespace
    pub type_namespace: u32,
}

impl RowReadable for TypeRefRaw {
    const TABLE_ID: TableId = TableId::TypeRef;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(TypeRefRaw {
            rid,
            token: Token::from_parts(TableId::TypeRef as u8, rid),
            resolution_scope: sizes.decode_coded_index(
                read_le_at_dyn(
                    data,
                    offset,
                    sizes.is_large_coded(CodedIndexType::ResolutionScope),
                )?,
                CodedIndexType::ResolutionScope,
            )?,
            type_name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            type_namespace: read_le_at_dyn(data, offset, sizes.is_large_str())?,
        })
    }

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* resolution_scope */ sizes.coded_index_bytes(CodedIndexType::ResolutionScope) +
            /* type_name */        sizes.str_bytes() +
            /* type_namespace */   sizes.str_bytes()
        )
    }
}
