//! `NestedClass` table (0x29) rows, ECMA-335 II.22.32.
//!
//! Maps every nested type to its enclosing type. Used to build `Outer/Inner` names and to skip
//! nested types.

use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// A raw `NestedClass` row (0x29)
#[derive(Debug, Clone, PartialEq)]
pub struct NestedClassRaw {
    /// 1-based row index
    pub rid: u32,
    /// Metadata token of the row
    pub token: Token,
    /// `TypeDef` row of the nested type
    pub nested_class: u32,
    /// `TypeDef` row of the enclosing type
    pub enclosing_class: u32,
}

impl RowReadable for NestedClassRaw {
    const TABLE_ID: TableId = TableId::NestedClass;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(NestedClassRaw {
            rid,
            token: Token::from_parts(TableId::NestedClass as u8, rid),
            nested_class: read_le_at_dyn(data, offset, sizes.is_large(TableId::TypeDef))?,
            enclosing_class: read_le_at_dyn(data, offset, sizes.is_large(TableId::TypeDef))?,
        })
    }

    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(sizes.table_index_bytes(TableId::TypeDef) * 2)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::tables::{MetadataTable, TableInfo};

    #[test]
    fn crafted() {
        let data = vec![0x03, 0x00, 0x02, 0x00];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::NestedClass, 1), (TableId::TypeDef, 3)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<NestedClassRaw>::new(&data, 1, sizes.clone()).unwrap();
        assert_eq!(table.row_size(), sizes.row_size(TableId::NestedClass));

        let row = table.get(1).unwrap();
        assert_eq!(row.token.value(), 0x2900_0001);
        assert_eq!(row.nested_class, 3);
        assert_eq!(row.enclosing_class, 2);
    }
}
