//! `MethodDef` table (0x06) rows, ECMA-335 II.22.26.

use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        method::{MethodImplCodeType, MethodImplManagement, MethodImplOptions, MethodModifiers},
        tables::{RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// A raw `MethodDef` row (0x06)
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDefRaw {
    /// 1-based row index
    pub rid: u32,
    /// Metadata token of the row
    pub token: Token,
    /// RVA of the method body, 0 if there is none
    pub rva: u32,
    /// `MethodImplAttributes`
    pub impl_flags: u32,
    /// `MethodAttributes`
    pub flags: u32,
    /// `#Strings` index of the name
    pub name: u32,
    /// `#Blob` index of the method signature
    pub signature: u32,
    /// First row of the owned `Param` range
    pub param_list: u32,
}

impl MethodDefRaw {
    /// Returns true if the method carries an IL body in this module.
    ///
    /// Abstract, P/Invoke, internal call, runtime provided, native and unmanaged methods have no
    /// IL, regardless of their RVA.
    #[must_use]
    pub fn has_body(&self) -> bool {
        if self.rva == 0 {
            return false;
        }

        let modifiers = MethodModifiers::from_method_flags(self.flags);
        if modifiers.intersects(MethodModifiers::ABSTRACT | MethodModifiers::PINVOKE_IMPL) {
            return false;
        }

        let code_type = MethodImplCodeType::from_impl_flags(self.impl_flags);
        if code_type == MethodImplCodeType::NATIVE || code_type == MethodImplCodeType::RUNTIME {
            return false;
        }

        !MethodImplManagement::from_impl_flags(self.impl_flags)
            .contains(MethodImplManagement::UNMANAGED)
            && !MethodImplOptions::from_impl_flags(self.impl_flags)
                .contains(MethodImplOptions::INTERNAL_CALL)
    }
}

impl RowReadable for MethodDefRaw {
    const TABLE_ID: TableId = TableId::MethodDef;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(MethodDefRaw {
            rid,
            token: Token::from_parts(TableId::MethodDef as u8, rid),
            rva: read_le_at::<u32>(data, offset)?,
            impl_flags: u32::from(read_le_at::<u16>(data, offset)?),
            flags: u32::from(read_le_at::<u16>(data, offset)?),
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
            param_list: read_le_at_dyn(data, offset, sizes.is_large(TableId::Param))?,
        })
    }

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* rva */        4 +
            /* impl_flags */ 2 +
            /* flags */      2 +
            /* name */       sizes.str_bytes() +
            /* signature */  sizes.blob_bytes() +
            /* param_list */ sizes.table_index_bytes(TableId::Param)
        )
    }
}
