//! Header of the `#~` and `#-` streams (ECMA-335 II.24.2.6).
//!
//! Reads the present-table mask and row counts and locates every table inside the stream.

use std::sync::Arc;
use strum::IntoEnumIterator;

use crate::{
    file::io::read_le,
    metadata::tables::{MetadataTable, RowReadable, TableId, TableInfo, TableInfoRef, TABLE_SLOTS},
    Result,
};

/// Heap size flag announcing four bytes of extra data after the row counts
const HEAP_EXTRA_DATA: u8 = 0x40;

/// The header of the `#~` (or `#-`) stream and the location of every table in it
/// (ECMA-335 II.24.2.6).
pub struct TablesHeader<'a> {
    /// Major version of the table schema, 2
    pub major_version: u8,
    /// Minor version of the table schema, 0
    pub minor_version: u8,
    /// Bit vector of present tables
    pub valid: u64,
    /// Bit vector of sorted tables
    pub sorted: u64,
    /// Row counts and index widths
    pub info: TableInfoRef,
    data: &'a [u8],
    offsets: Vec<Option<usize>>,
}

impl<'a> TablesHeader<'a> {
    /// Parse the `#~` stream.
    ///
    /// `external_rows` are row counts of tables referenced from another image, see
    /// [`TableInfo::new`]. Pass an empty slice for a module.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if unknown tables are present and
    /// [`crate::Error::OutOfBounds`] if the tables do not fit in the stream.
    pub fn from(data: &'a [u8], external_rows: &[u32]) -> Result<TablesHeader<'a>> {
        if data.len() < 24 {
            return Err(out_of_bounds_error!());
        }

        let valid = read_le::<u64>(&data[8..])?;
        if valid & !TableId::known_mask() != 0 {
            return Err(malformed_error!(
                "Unknown tables present - 0x{:016x}",
                valid & !TableId::known_mask()
            ));
        }

        let info = Arc::new(TableInfo::new(data, valid, external_rows)?);

        let heap_sizes = read_le::<u8>(&data[6..])?;
        let mut current_offset = 24 + valid.count_ones() as usize * 4;
        if heap_sizes & HEAP_EXTRA_DATA != 0 {
            current_offset += 4;
        }

        let mut offsets = vec![None; TABLE_SLOTS];
        for table_id in TableId::iter() {
            if valid & (1 << table_id as u64) == 0 {
                continue;
            }

            let table_size =
                u64::from(info.rows(table_id)) * u64::from(info.row_size(table_id));
            let Some(table_end) = (current_offset as u64).checked_add(table_size) else {
                return Err(out_of_bounds_error!());
            };
            if table_end > data.len() as u64 {
                return Err(malformed_error!(
                    "Table {:?} exceeds the tables stream - {} > {}",
                    table_id,
                    table_end,
                    data.len()
                ));
            }

            offsets[table_id as usize] = Some(current_offset);
            current_offset = table_end as usize;
        }

        Ok(TablesHeader {
            major_version: read_le::<u8>(&data[4..])?,
            minor_version: read_le::<u8>(&data[5..])?,
            valid,
            sorted: read_le::<u64>(&data[16..])?,
            info,
            data,
            offsets,
        })
    }

    /// Number of tables present in the stream
    #[must_use]
    pub fn table_count(&self) -> u32 {
        self.valid.count_ones()
    }

    /// Returns true if `table_id` is present in the stream
    #[must_use]
    pub fn has_table(&self, table_id: TableId) -> bool {
        self.offsets[table_id as usize].is_some()
    }

    /// Typed access to the rows of the table `T` belongs to, `None` if it is not present
    #[must_use]
    pub fn table<T: RowReadable>(&self) -> Option<MetadataTable<'a, T>> {
        let offset = self.offsets[T::TABLE_ID as usize]?;
        MetadataTable::new(
            &self.data[offset..],
            self.info.rows(T::TABLE_ID),
            self.info.clone(),
        )
        .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::{NestedClassRaw, TypeSpecRaw};

    #[rustfmt::skip]
    fn stream(heap_sizes: u8) -> Vec<u8> {
        let mut data = vec![
            0x00, 0x00, 0x00, 0x00, // reserved
            0x02, 0x00,             // major, minor
            heap_sizes, 0x01,
            0x00, 0x00, 0x00, 0x08, 0x00, 0x02, 0x00, 0x00, // valid: TypeSpec, NestedClass
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // sorted
            0x02, 0x00, 0x00, 0x00, // TypeSpec rows
            0x01, 0x00, 0x00, 0x00, // NestedClass rows
        ];
        if heap_sizes & HEAP_EXTRA_DATA != 0 {
            data.extend_from_slice(&[0xEE, 0xEE, 0xEE, 0xEE]);
        }
        data.extend_from_slice(&[
            0x10, 0x00, // TypeSpec 1
            0x20, 0x00, // TypeSpec 2
            0x02, 0x00, 0x01, 0x00, // NestedClass 1
        ]);
        data
    }

    #[test]
    fn crafted() {
        let data = stream(0x00);
        let header = TablesHeader::from(&data, &[]).unwrap();

        assert_eq!(header.major_version, 2);
        assert_eq!(header.table_count(), 2);
        assert!(header.has_table(TableId::TypeSpec));
        assert!(!header.has_table(TableId::TypeDef));

        let specs = header.table::<TypeSpecRaw>().unwrap();
        assert_eq!(specs.row_count(), 2);
        assert_eq!(specs.get(2).unwrap().signature, 0x20);

        let nested = header.table::<NestedClassRaw>().unwrap();
        let row = nested.get(1).unwrap();
        assert_eq!(row.nested_class, 2);
        assert_eq!(row.enclosing_class, 1);
    }

    #[test]
    fn extra_data() {
        let data = stream(HEAP_EXTRA_DATA);
        let header = TablesHeader::from(&data, &[]).unwrap();

        let nested = header.table::<NestedClassRaw>().unwrap();
        assert_eq!(nested.get(1).unwrap().nested_class, 2);
    }

    #[test]
    fn truncated() {
        let mut data = stream(0x00);
        data.truncate(data.len() - 2);
        assert!(TablesHeader::from(&data, &[]).is_err());
    }

    #[test]
    fn unknown_table() {
        let mut data = stream(0x00);
        data[13] |= 0x20; // table 0x2D
        assert!(matches!(
            TablesHeader::from(&data, &[]),
            Err(crate::Error::Malformed { .. })
        ));
    }
}
