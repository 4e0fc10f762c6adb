//! Metadata tables of the `#~` stream (ECMA-335 II.22) and of the Portable PDB format.
//!
//! Every table is a packed array of fixed-size rows. The width of a row depends on the row
//! counts of other tables and the sizes of the heaps, which [`TableInfo`] computes from the
//! stream header. [`MetadataTable`] gives typed, bounds-checked access to the rows of one
//! table through the [`RowReadable`] implementation of its raw row type.
//!
//! Only the tables needed to name types and methods and to map IL offsets to source positions
//! are decoded: `TypeRef`, `TypeDef`, `MethodDef`, `TypeSpec`, `NestedClass`, `GenericParam`,
//! `Document` and `MethodDebugInformation`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pdbcompare::metadata::tables::MethodDefRaw;
//! # fn example(tables: &pdbcompare::metadata::streams::TablesHeader) -> pdbcompare::Result<()> {
//! if let Some(methods) = tables.table::<MethodDefRaw>() {
//!     for method in methods.iter() {
//!         let method = method?;
//!         println!("{} rva=0x{:x}", method.token, method.rva);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod codedindex;
mod document;
mod genericparam;
mod methoddebuginformation;
mod methoddef;
mod nestedclass;
pub(crate) mod schema;
mod tableid;
mod tableinfo;
mod typedef;
mod typeref;
mod typespec;

use std::marker::PhantomData;

use crate::Result;

pub use codedindex::{CodedIndex, CodedIndexType};
pub use document::DocumentRaw;
pub use genericparam::GenericParamRaw;
pub use methoddebuginformation::MethodDebugInformationRaw;
pub use methoddef::MethodDefRaw;
pub use nestedclass::NestedClassRaw;
pub use tableid::TableId;
pub use tableinfo::{TableInfo, TableInfoRef, TableRowInfo};
pub(crate) use tableinfo::TABLE_SLOTS;
pub use typedef::TypeDefRaw;
pub use typeref::TypeRefRaw;
pub use typespec::TypeSpecRaw;

/// Decoding of a single raw table row
pub trait RowReadable: Sized + Send {
    /// The table this row type belongs to
    const TABLE_ID: TableId;

    /// Size of one row in bytes, given the index widths in `sizes`
    fn row_size(sizes: &TableInfoRef) -> u32;

    /// Read the row with the 1-based `rid` at `offset`, advancing `offset` past it
    ///
    /// # Errors
    /// Returns an error if the row is truncated or contains an invalid coded index.
    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self>;
}

/// Typed view over the rows of one metadata table
pub struct MetadataTable<'a, T> {
    data: &'a [u8],
    row_count: u32,
    row_size: u32,
    sizes: TableInfoRef,
    _phantom: PhantomData<T>,
}

impl<'a, T: RowReadable> MetadataTable<'a, T> {
    /// Create a view over `row_count` rows stored at the start of `data`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `data` is too small for all rows.
    pub fn new(data: &'a [u8], row_count: u32, sizes: TableInfoRef) -> Result<Self> {
        let row_size = T::row_size(&sizes);
        if u64::from(row_count) * u64::from(row_size) > data.len() as u64 {
            return Err(out_of_bounds_error!());
        }

        Ok(MetadataTable {
            data,
            row_count,
            row_size,
            sizes,
            _phantom: PhantomData,
        })
    }

    /// Total size of the table in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        u64::from(self.row_count) * u64::from(self.row_size)
    }

    /// Size of one row in bytes
    #[must_use]
    pub fn row_size(&self) -> u32 {
        self.row_size
    }

    /// Number of rows
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Get the row with the 1-based `rid`, `None` if the index is out of range or the row can
    /// not be decoded
    #[must_use]
    pub fn get(&self, rid: u32) -> Option<T> {
        self.try_get(rid).ok()
    }

    /// Get the row with the 1-based `rid`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `rid` is 0 or past the last row.
    pub fn try_get(&self, rid: u32) -> Result<T> {
        if rid == 0 || rid > self.row_count {
            return Err(out_of_bounds_error!());
        }

        let mut offset = ((rid - 1) * self.row_size) as usize;
        T::row_read(self.data, &mut offset, rid, &self.sizes)
    }

    /// Iterate over all rows in table order
    pub fn iter(&self) -> impl Iterator<Item = Result<T>> + '_ {
        (1..=self.row_count).map(move |rid| self.try_get(rid))
    }
}
