//! PE container access for .NET modules.
//!
//! [`crate::file::File`] owns the raw bytes of a module (memory mapped from disk or held in a
//! buffer) together with the `goblin` PE view that borrows from them. It exposes what the
//! metadata layer needs: the CLR runtime header location, data directories, the debug directory
//! and RVA to file offset translation.
//!
//! # Key Components
//!
//! - [`crate::file::File`] - The parsed PE image
//! - [`crate::file::Backend`] - Storage abstraction shared by the mmap and in-memory inputs
//! - [`crate::file::DebugDirectory`] - One `IMAGE_DEBUG_DIRECTORY` entry
//! - [`crate::file::io`] - Little-endian primitive reads
//! - [`crate::file::parser`] - Cursor based parser with compressed integer support
//!
//! # Examples
//!
//! ```rust,no_run
//! use pdbcompare::file::File;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("tests/samples/Sample.dll"))?;
//! let (clr_rva, clr_size) = file.clr()?;
//! println!("CLR header at RVA 0x{clr_rva:x} ({clr_size} bytes)");
//! # Ok::<(), pdbcompare::Error>(())
//! ```

pub mod io;
pub mod parser;

mod debug;
mod memory;
mod physical;

use std::path::Path;

use crate::{
    Error::{Empty, GoblinErr},
    Result,
};
use goblin::pe::{data_directories::DataDirectoryType, section_table::SectionTable, PE};
use ouroboros::self_referencing;

pub use debug::{DebugDirectory, DebugDirectoryType};
pub(crate) use memory::Memory;
pub(crate) use physical::Physical;

/// Storage for the bytes of an input file.
pub trait Backend: Send + Sync {
    /// Returns a slice of `len` bytes starting at `offset`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range is not fully contained in the input.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the complete input
    fn data(&self) -> &[u8];

    /// Size of the input in bytes
    fn len(&self) -> usize;
}

/// A loaded .NET PE image.
///
/// The `goblin` parse result borrows from the owned input, which is why the structure is built
/// through `ouroboros`.
#[self_referencing]
pub struct File {
    data: Box<dyn Backend>,
    #[borrows(data)]
    #[not_covariant]
    pe: PE<'this>,
}

impl File {
    /// Memory map and parse the PE image at `file`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file can not be read,
    /// [`crate::Error::Empty`] for empty input, [`crate::Error::GoblinErr`] if it is not a PE
    /// image and [`crate::Error::Malformed`] if it carries no CLR runtime header.
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Parse a PE image held in memory.
    ///
    /// # Errors
    /// Same as [`File::from_file`], minus the I/O failures.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let data = Box::new(data);

        File::try_new(data, |data| {
            let data = data.as_ref();
            match PE::parse(data.data()) {
                Ok(pe) => match pe.header.optional_header {
                    Some(optional_header) => {
                        if optional_header
                            .data_directories
                            .get_clr_runtime_header()
                            .is_none()
                        {
                            Err(malformed_error!(
                                "File does not have a CLR runtime header directory"
                            ))
                        } else {
                            Ok(pe)
                        }
                    }
                    None => Err(malformed_error!("File does not have an OptionalHeader")),
                },
                Err(error) => Err(GoblinErr(error)),
            }
        })
    }

    /// Size of the image in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns true if the image holds no data
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// RVA and size of the CLR runtime header.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the directory is absent.
    pub fn clr(&self) -> Result<(usize, usize)> {
        match self.get_data_directory(DataDirectoryType::ClrRuntimeHeader) {
            Some((rva, size)) => Ok((rva as usize, size as usize)),
            None => Err(malformed_error!(
                "File does not have a CLR runtime header directory"
            )),
        }
    }

    /// The section headers of the image
    pub fn sections(&self) -> impl Iterator<Item = &SectionTable> {
        self.with_pe(|pe| pe.sections.iter())
    }

    /// RVA and size of a data directory, if it is present and non-empty
    #[must_use]
    pub fn get_data_directory(&self, dir_type: DataDirectoryType) -> Option<(u32, u32)> {
        self.with_pe(|pe| {
            pe.header
                .optional_header
                .as_ref()?
                .data_directories
                .dirs()
                .find(|(directory_type, directory)| {
                    *directory_type == dir_type
                        && directory.virtual_address != 0
                        && directory.size != 0
                })
                .map(|(_, directory)| (directory.virtual_address, directory.size))
        })
    }

    /// Entries of the debug directory, in file order.
    ///
    /// An image without a debug directory yields an empty list.
    ///
    /// # Errors
    /// Returns an error if the directory points outside of the image.
    pub fn debug_directories(&self) -> Result<Vec<DebugDirectory>> {
        let Some((rva, size)) = self.get_data_directory(DataDirectoryType::DebugTable) else {
            return Ok(Vec::new());
        };

        let offset = self.rva_to_offset(rva as usize)?;
        let data = self.data_slice(offset, size as usize)?;

        DebugDirectory::read_all(data)
    }

    /// The raw bytes of the image
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.with_data(|data| data.data())
    }

    /// Returns a slice of `len` bytes starting at file `offset`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range is not fully contained in the image.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.with_data(|data| data.data_slice(offset, len))
    }

    /// Translate a relative virtual address into a file offset.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if no section contains the address.
    pub fn rva_to_offset(&self, rva: usize) -> Result<usize> {
        let rva_u32 = u32::try_from(rva)
            .map_err(|_| malformed_error!("RVA too large to fit in u32: {}", rva))?;

        self.with_pe(|pe| {
            for section in &pe.sections {
                let section_size = section.virtual_size.max(section.size_of_raw_data);
                let Some(section_max) = section.virtual_address.checked_add(section_size) else {
                    return Err(malformed_error!(
                        "Section malformed, causing integer overflow - {} + {}",
                        section.virtual_address,
                        section_size
                    ));
                };

                if section.virtual_address <= rva_u32 && section_max > rva_u32 {
                    return Ok((rva - section.virtual_address as usize)
                        + section.pointer_to_raw_data as usize);
                }
            }

            Err(malformed_error!(
                "RVA could not be converted to offset - {}",
                rva
            ))
        })
    }
}
