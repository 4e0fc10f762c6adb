//! `GenericParam` table (0x2A) rows, ECMA-335 II.22.20.

use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// A raw `GenericParam` row (0x2A)
#[derive(Debug, Clone, PartialEq)]
pub struct GenericParamRaw {
    /// 1-based row index
    pub rid: u32,
    /// Metadata token of the row
    pub token: Token,
    /// 0-based position in the owner's parameter list
    pub number: u32,
    /// `GenericParamAttributes`
    pub flags: u32,
    /// Owning type or method, `TypeOrMethodDef` coded index
    pub owner: CodedIndex,
    /// `#Strings` index of the name
    pub name: u32,
}

impl RowReadable for GenericParamRaw {
    const TABLE_ID: TableId = TableId::GenericParam;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(GenericParamRaw {
            rid,
            token: Token::from_parts(TableId::GenericParam as u8, rid),
            number: u32::from(read_le_at::<u16>(data, offset)?),
            flags: u32::from(read_le_at::<u16>(data, offset)?),
            owner: sizes.decode_coded_index(
                read_le_at_dyn(
                    data,
                    offset,
                    sizes.is_large_coded(CodedIndexType::TypeOrMethodDef),
                )?,
                CodedIndexType::TypeOrMethodDef,
            )?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
        })
    }

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* number */ 2 +
            /* flags */  2 +
            /* owner */  sizes.coded_index_bytes(CodedIndexType::TypeOrMethodDef) +
            /* name */   sizes.str_bytes()
        )
    }
}
