//! PE debug directory (`IMAGE_DEBUG_DIRECTORY`).
//!
//! The debug directory tells where the symbols of a module live: a CodeView `RSDS` record with
//! the PDB path and id, or a Portable PDB embedded as a deflated `MPDB` blob.

use crate::{file::io::read_le_at, Result};

/// Size of one `IMAGE_DEBUG_DIRECTORY` record
const DEBUG_DIRECTORY_SIZE: usize = 28;

/// The kinds of debug directory entries the symbol reader cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugDirectoryType {
    /// `IMAGE_DEBUG_TYPE_CODEVIEW` - `RSDS` record naming the PDB path and id
    CodeView,
    /// `IMAGE_DEBUG_TYPE_EMBEDDED_PORTABLE_PDB` - deflated Portable PDB
    EmbeddedPortablePdb,
    /// `IMAGE_DEBUG_TYPE_PDBCHECKSUM` - hash of the associated PDB
    PdbChecksum,
    /// Any other entry type
    Other(u32),
}

impl From<u32> for DebugDirectoryType {
    fn from(value: u32) -> Self {
        match value {
            2 => DebugDirectoryType::CodeView,
            17 => DebugDirectoryType::EmbeddedPortablePdb,
            19 => DebugDirectoryType::PdbChecksum,
            other => DebugDirectoryType::Other(other),
        }
    }
}

/// One entry of the PE debug directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugDirectory {
    /// Time and date the debug data was created
    pub time_date_stamp: u32,
    /// Major version of the debug data format
    pub major_version: u16,
    /// Minor version of the debug data format
    pub minor_version: u16,
    /// Kind of debug data
    pub kind: DebugDirectoryType,
    /// Size of the debug data in bytes
    pub size_of_data: u32,
    /// RVA of the debug data, 0 when not mapped
    pub address_of_raw_data: u32,
    /// File offset of the debug data
    pub pointer_to_raw_data: u32,
}

impl DebugDirectory {
    /// Decode all entries of a debug directory.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the last entry is truncated.
    pub fn read_all(data: &[u8]) -> Result<Vec<DebugDirectory>> {
        let count = data.len() / DEBUG_DIRECTORY_SIZE;
        let mut entries = Vec::with_capacity(count);

        let mut offset = 0;
        for _ in 0..count {
            let _characteristics = read_le_at::<u32>(data, &mut offset)?;
            entries.push(DebugDirectory {
                time_date_stamp: read_le_at::<u32>(data, &mut offset)?,
                major_version: read_le_at::<u16>(data, &mut offset)?,
                minor_version: read_le_at::<u16>(data, &mut offset)?,
                kind: DebugDirectoryType::from(read_le_at::<u32>(data, &mut offset)?),
                size_of_data: read_le_at::<u32>(data, &mut offset)?,
                address_of_raw_data: read_le_at::<u32>(data, &mut offset)?,
                pointer_to_raw_data: read_le_at::<u32>(data, &mut offset)?,
            });
        }

        Ok(entries)
    }
}
