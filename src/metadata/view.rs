//! Stream level view over one block of ECMA-335 metadata.
//!
//! The metadata of a module and a standalone Portable PDB share the same physical layout: a
//! metadata root followed by streams. [`MetadataView`] locates the streams and wraps them in
//! their typed accessors, without decoding any table rows.

use crate::{
    metadata::{
        root::Root,
        streams::{Blob, Guid, PdbStream, Strings, TablesHeader},
    },
    Result,
};

/// The streams of one metadata block
pub struct MetadataView<'a> {
    /// Metadata root with the stream directory
    pub root: Root,
    /// Tables from the `#~` or `#-` stream
    pub tables: Option<TablesHeader<'a>>,
    /// `#Strings` heap
    pub strings: Option<Strings<'a>>,
    /// `#GUID` heap
    pub guids: Option<Guid<'a>>,
    /// `#Blob` heap
    pub blobs: Option<Blob<'a>>,
    /// `#Pdb` stream, only present in Portable PDBs
    pub pdb: Option<PdbStream>,
}

impl<'a> MetadataView<'a> {
    /// Parse the metadata root at the start of `data` and every stream it lists.
    ///
    /// For Portable PDBs the `#Pdb` stream is decoded first, since its type system row counts
    /// determine the index widths of the debug tables.
    ///
    /// # Errors
    /// Returns an error if the root or one of the recognized streams is malformed.
    pub fn read(data: &'a [u8]) -> Result<MetadataView<'a>> {
        let root = Root::read(data)?;

        let pdb = match root.stream("#Pdb") {
            Some(stream) => {
                let stream_data = Self::stream_data(data, stream.offset, stream.size)?;
                Some(PdbStream::from(stream_data)?)
            }
            None => None,
        };
        let external_rows: &[u32] = match &pdb {
            Some(pdb) => &pdb.type_system_rows,
            None => &[],
        };

        let mut tables = None;
        let mut strings = None;
        let mut guids = None;
        let mut blobs = None;

        for stream in &root.stream_headers {
            let stream_data = Self::stream_data(data, stream.offset, stream.size)?;

            match stream.name.as_str() {
                "#~" | "#-" => {
                    tables = Some(TablesHeader::from(stream_data, external_rows)?);
                }
                "#Strings" => {
                    strings = Some(Strings::from(stream_data)?);
                }
                "#GUID" => {
                    guids = Some(Guid::from(stream_data)?);
                }
                "#Blob" => {
                    blobs = Some(Blob::from(stream_data)?);
                }
                _ => {}
            }
        }

        Ok(MetadataView {
            root,
            tables,
            strings,
            guids,
            blobs,
            pdb,
        })
    }

    fn stream_data(data: &'a [u8], offset: u32, size: u32) -> Result<&'a [u8]> {
        let start = offset as usize;
        let end = start
            .checked_add(size as usize)
            .ok_or(out_of_bounds_error!())?;
        data.get(start..end).ok_or(out_of_bounds_error!())
    }

    /// The tables stream
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the metadata has no `#~` stream.
    pub fn tables(&self) -> Result<&TablesHeader<'a>> {
        self.tables
            .as_ref()
            .ok_or_else(|| malformed_error!("Metadata does not contain a tables stream"))
    }

    /// The `#Strings` heap
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the heap is absent.
    pub fn strings(&self) -> Result<&Strings<'a>> {
        self.strings
            .as_ref()
            .ok_or_else(|| malformed_error!("Metadata does not contain a #Strings heap"))
    }

    /// The `#Blob` heap
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the heap is absent.
    pub fn blobs(&self) -> Result<&Blob<'a>> {
        self.blobs
            .as_ref()
            .ok_or_else(|| malformed_error!("Metadata does not contain a #Blob heap"))
    }

    /// Look up a string, index 0 being the empty string
    ///
    /// # Errors
    /// Returns an error if the index is invalid or the heap is absent.
    pub fn string(&self, index: u32) -> Result<&'a str> {
        if index == 0 {
            return Ok("");
        }

        self.strings()?.get(index as usize)
    }

    /// Look up a blob, index 0 being the empty blob
    ///
    /// # Errors
    /// Returns an error if the index is invalid or the heap is absent.
    pub fn blob(&self, index: u32) -> Result<&'a [u8]> {
        if index == 0 {
            return Ok(&[]);
        }

        self.blobs()?.get(index as usize)
    }
}
