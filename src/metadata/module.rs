//! The metadata of a loaded .NET module.
//!
//! [`ModuleView`] ties a [`File`] to the [`MetadataView`] borrowed from it, and gives access to
//! the IL method bodies the `MethodDef` table points at.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pdbcompare::metadata::{module::ModuleView, tables::MethodDefRaw};
//! use std::path::Path;
//!
//! let module = ModuleView::from_file(Path::new("Sample.dll"))?;
//! module.with_metadata(|metadata| -> pdbcompare::Result<()> {
//!     let tables = metadata.tables()?;
//!     if let Some(methods) = tables.table::<MethodDefRaw>() {
//!         println!("{} methods", methods.row_count());
//!     }
//!     Ok(())
//! })?;
//! # Ok::<(), pdbcompare::Error>(())
//! ```

use std::{path::Path, sync::Arc};

use ouroboros::self_referencing;

use crate::{
    file::File,
    metadata::{
        cor20header::{Cor20Header, COR20_HEADER_SIZE},
        method::{instruction_offsets, MethodBody},
        view::MetadataView,
    },
    Result,
};

/// A module and its parsed metadata streams
#[self_referencing]
pub struct ModuleView {
    file: Arc<File>,
    cor20header: Cor20Header,
    #[borrows(file)]
    #[not_covariant]
    view: MetadataView<'this>,
}

impl ModuleView {
    /// Load and parse the module at `path`.
    ///
    /// # Errors
    /// Returns an error if the file is not a .NET module or its metadata is malformed.
    pub fn from_file(path: &Path) -> Result<ModuleView> {
        Self::from_arc(Arc::new(File::from_file(path)?))
    }

    /// Parse a module held in memory.
    ///
    /// # Errors
    /// Same as [`ModuleView::from_file`], minus the I/O failures.
    pub fn from_mem(data: Vec<u8>) -> Result<ModuleView> {
        Self::from_arc(Arc::new(File::from_mem(data)?))
    }

    /// Parse the metadata of an already loaded PE image.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the CLI header or the metadata root is invalid.
    pub fn from_arc(file: Arc<File>) -> Result<ModuleView> {
        let (clr_rva, clr_size) = file.clr()?;
        let clr_offset = file.rva_to_offset(clr_rva)?;
        let cor20header =
            Cor20Header::read(file.data_slice(clr_offset, clr_size.max(COR20_HEADER_SIZE))?)?;

        let metadata_offset = file.rva_to_offset(cor20header.meta_data_rva as usize)?;
        let metadata_size = cor20header.meta_data_size as usize;

        ModuleView::try_new(file, cor20header, |file| {
            MetadataView::read(file.data_slice(metadata_offset, metadata_size)?)
        })
    }

    /// The underlying PE image
    #[must_use]
    pub fn file(&self) -> &Arc<File> {
        self.borrow_file()
    }

    /// The CLI header of the module
    #[must_use]
    pub fn cor20header(&self) -> &Cor20Header {
        self.borrow_cor20header()
    }

    /// Run `f` with access to the metadata streams
    pub fn with_metadata<R>(&self, f: impl FnOnce(&MetadataView<'_>) -> R) -> R {
        self.with_view(|view| f(view))
    }

    /// Decode the header of the method body at `rva`
    ///
    /// # Errors
    /// Returns an error if `rva` is not mapped or the header is malformed.
    pub fn method_body(&self, rva: u32) -> Result<MethodBody> {
        let data = self.body_data(rva)?;
        MethodBody::from(data)
    }

    /// Offsets of every IL instruction in the method body at `rva`, in ascending order
    ///
    /// # Errors
    /// Returns an error if the body can not be decoded or contains an invalid opcode.
    pub fn method_instructions(&self, rva: u32) -> Result<Vec<u32>> {
        let data = self.body_data(rva)?;
        let body = MethodBody::from(data)?;
        instruction_offsets(body.code(data)?)
    }

    fn body_data(&self, rva: u32) -> Result<&[u8]> {
        let file = self.borrow_file();
        let offset = file.rva_to_offset(rva as usize)?;
        file.data()
            .get(offset..)
            .ok_or(out_of_bounds_error!())
    }
}
