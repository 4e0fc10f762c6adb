//! In-memory input backend.
//!
//! Wraps an owned `Vec<u8>` so that buffers (for example an inflated embedded Portable PDB) can
//! be parsed through the same [`crate::file::Backend`] interface as memory mapped files.

use super::Backend;
use crate::Result;

/// Input backed by an owned buffer.
///
/// Used for modules handed over as bytes and for Portable PDBs inflated from an embedded
/// debug directory entry.
#[derive(Debug)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Wrap an owned buffer
    pub fn new(data: Vec<u8>) -> Memory {
        Memory { data }
    }
}

impl Backend for Memory {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let Some(offset_end) = offset.checked_add(len) else {
            return Err(out_of_bounds_error!());
        };

        if offset_end > self.data.len() {
            return Err(out_of_bounds_error!());
        }

        Ok(&self.data[offset..offset_end])
    }

    fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn memory() {
        let mut data = vec![0xCC_u8; 1048];
        data[10..15].fill(0xBB);

        let memory = Memory::new(data);

        assert_eq!(memory.len(), 1048);
        assert_eq!(memory.data()[42], 0xCC);
        assert_eq!(
            memory.data_slice(10, 5).unwrap(),
            &[0xBB, 0xBB, 0xBB, 0xBB, 0xBB]
        );

        assert!(memory.data_slice(u32::MAX as usize, u32::MAX as usize).is_err());
        assert!(memory.data_slice(0, 2048).is_err());
    }

    #[test]
    fn offset_overflow() {
        let memory = Memory::new(vec![0x00; 100]);

        assert!(matches!(
            memory.data_slice(usize::MAX, 1),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(memory.data_slice(100, 1).is_err());
        assert!(memory.data_slice(99, 2).is_err());
        assert_eq!(memory.data_slice(100, 0).unwrap(), &[] as &[u8]);
    }
}
