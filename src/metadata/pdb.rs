//! Portable PDB symbol files.
//!
//! A Portable PDB is a metadata block of its own: a metadata root with a `#Pdb` stream, a
//! tables stream holding the debug tables and the usual heaps. [`PortablePdb`] owns the bytes of
//! one such file, and [`PortablePdb::read_symbols`] extracts what a module comparison needs
//! into owned [`DebugSymbols`]: the document names and the sequence points of every method.
//!
//! [`PortablePdb::locate`] finds the symbols of a module, in this order:
//!
//! 1. an explicitly given path
//! 2. a Portable PDB embedded in the module's debug directory (deflate compressed)
//! 3. the path recorded in the module's CodeView debug record, if it exists
//! 4. `<module>.pdb` next to the module
//!
//! When the module carries a CodeView record, its GUID has to match the id of the PDB.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pdbcompare::{file::File, metadata::pdb::PortablePdb};
//! use std::path::Path;
//!
//! let path = Path::new("Sample.dll");
//! let file = File::from_file(path)?;
//! let (pdb, source) = PortablePdb::locate(&file, path, None)?;
//! let symbols = pdb.read_symbols()?;
//! println!("{} documents from {}", symbols.documents.len(), source);
//! # Ok::<(), pdbcompare::Error>(())
//! ```

use std::{
    collections::HashMap,
    fmt,
    io::Read,
    path::{Path, PathBuf},
};

use flate2::read::DeflateDecoder;
use ouroboros::self_referencing;

use crate::{
    file::{parser::Parser, Backend, DebugDirectoryType, File, Memory, Physical},
    metadata::{
        sequencepoints::{parse_sequence_points, SequencePoints},
        tables::{DocumentRaw, MethodDebugInformationRaw},
        view::MetadataView,
    },
    Error::{Empty, MissingSymbols, SymbolMismatch, UnsupportedSymbolFormat},
    Result,
};

/// Signature of a CodeView debug record
const CODEVIEW_SIGNATURE: &[u8; 4] = b"RSDS";

/// Signature of an embedded Portable PDB debug record
const EMBEDDED_PDB_SIGNATURE: &[u8; 4] = b"MPDB";

/// Start of a Windows (MSF) PDB
const MSF_SIGNATURE: &[u8] = b"Microsoft C/C++ MSF 7.00";

/// Where the symbols of a module were found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolSource {
    /// Path given by the caller
    Explicit(PathBuf),
    /// Embedded in the module's debug directory
    Embedded,
    /// Path recorded in the CodeView debug record
    CodeView(PathBuf),
    /// `<module>.pdb` next to the module
    SideCar(PathBuf),
}

impl fmt::Display for SymbolSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolSource::Explicit(path) => write!(f, "{}", path.display()),
            SymbolSource::Embedded => write!(f, "embedded pdb"),
            SymbolSource::CodeView(path) => write!(f, "{} (codeview)", path.display()),
            SymbolSource::SideCar(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The CodeView (`RSDS`) debug record of a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeViewRecord {
    /// Id shared with the matching PDB
    pub guid: uguid::Guid,
    /// Incremented on every PDB update
    pub age: u32,
    /// Path of the PDB at build time
    pub path: String,
}

impl CodeViewRecord {
    /// Decode a CodeView debug record
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the record does not start with `RSDS`.
    pub fn read(data: &[u8]) -> Result<CodeViewRecord> {
        let mut parser = Parser::new(data);
        if parser.read_bytes(4)? != CODEVIEW_SIGNATURE {
            return Err(malformed_error!("CodeView record without RSDS signature"));
        }

        let mut guid = [0u8; 16];
        guid.copy_from_slice(parser.read_bytes(16)?);
        let age = parser.read_le::<u32>()?;

        let rest = parser.read_bytes(parser.remaining())?;
        let path_len = rest.iter().position(|byte| *byte == 0).unwrap_or(rest.len());

        Ok(CodeViewRecord {
            guid: uguid::Guid::from_bytes(guid),
            age,
            path: String::from_utf8_lossy(&rest[..path_len]).into_owned(),
        })
    }
}

/// Inflate the payload of an embedded Portable PDB debug record (`MPDB`, size, deflate data)
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the signature is wrong or the decompressed size does
/// not match the announced one.
pub fn decompress_embedded(data: &[u8]) -> Result<Vec<u8>> {
    let mut parser = Parser::new(data);
    if parser.read_bytes(4)? != EMBEDDED_PDB_SIGNATURE {
        return Err(malformed_error!("Embedded PDB record without MPDB signature"));
    }

    let size = parser.read_le::<u32>()? as usize;
    let compressed = parser.read_bytes(parser.remaining())?;

    let mut decompressed = Vec::with_capacity(size.min(compressed.len().saturating_mul(16)));
    DeflateDecoder::new(compressed)
        .take(size as u64 + 1)
        .read_to_end(&mut decompressed)?;

    if decompressed.len() != size {
        return Err(malformed_error!(
            "Embedded PDB size mismatch - expected {}, got {}",
            size,
            decompressed.len()
        ));
    }

    Ok(decompressed)
}

/// Decode a `Document` name blob: a separator byte followed by blob indices of UTF-8 parts
///
/// # Errors
/// Returns an error if a part is not valid UTF-8 or an index is out of range.
pub fn decode_document_name(metadata: &MetadataView, name: u32) -> Result<String> {
    let blob = metadata.blob(name)?;
    if blob.is_empty() {
        return Ok(String::new());
    }

    let mut parser = Parser::new(blob);
    let separator = parser.read_le::<u8>()?;

    let mut result = String::new();
    let mut first = true;
    while parser.has_more_data() {
        if !first && separator != 0 {
            result.push(char::from(separator));
        }
        first = false;

        let part = metadata.blob(parser.read_compressed_uint()?)?;
        match std::str::from_utf8(part) {
            Ok(part) => result.push_str(part),
            Err(_) => return Err(malformed_error!("Document name part is not UTF-8")),
        }
    }

    Ok(result)
}

/// Debug information of one module, decoded from its Portable PDB
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugSymbols {
    /// GUID part of the PDB id
    pub id: uguid::Guid,
    /// Document names, `documents[rid - 1]` for `Document` row `rid`
    pub documents: Vec<String>,
    /// Sequence points by `MethodDef` row
    pub methods: HashMap<u32, SequencePoints>,
}

impl DebugSymbols {
    /// Name of the `Document` row `rid`
    #[must_use]
    pub fn document(&self, rid: u32) -> Option<&str> {
        let index = usize::try_from(rid).ok()?.checked_sub(1)?;
        self.documents.get(index).map(String::as_str)
    }

    /// Sequence points of the `MethodDef` row `rid`
    #[must_use]
    pub fn sequence_points(&self, rid: u32) -> Option<&SequencePoints> {
        self.methods.get(&rid)
    }
}

/// A loaded Portable PDB
#[self_referencing]
pub struct PortablePdb {
    data: Box<dyn Backend>,
    #[borrows(data)]
    #[not_covariant]
    metadata: MetadataView<'this>,
}

impl PortablePdb {
    /// Memory map and parse the Portable PDB at `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file can not be read,
    /// [`crate::Error::UnsupportedSymbolFormat`] for Windows PDBs and other errors for
    /// malformed input.
    pub fn from_file(path: &Path) -> Result<PortablePdb> {
        Self::load(Physical::new(path)?)
    }

    /// Parse a Portable PDB held in memory.
    ///
    /// # Errors
    /// Same as [`PortablePdb::from_file`], minus the I/O failures.
    pub fn from_mem(data: Vec<u8>) -> Result<PortablePdb> {
        Self::load(Memory::new(data))
    }

    fn load<T: Backend + 'static>(data: T) -> Result<PortablePdb> {
        if data.len() == 0 {
            return Err(Empty);
        }
        if data.data().starts_with(MSF_SIGNATURE) {
            return Err(UnsupportedSymbolFormat("Windows PDB (MSF)".to_string()));
        }

        PortablePdb::try_new(Box::new(data), |data| {
            let metadata = MetadataView::read(data.data())?;
            if metadata.pdb.is_none() {
                return Err(UnsupportedSymbolFormat(
                    "metadata without #Pdb stream".to_string(),
                ));
            }

            Ok(metadata)
        })
    }

    /// Find and load the symbols of the module `file`, which was loaded from `module_path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::MissingSymbols`] if no candidate exists,
    /// [`crate::Error::SymbolMismatch`] if the PDB id differs from the module's CodeView record
    /// and any error of loading the PDB itself.
    pub fn locate(
        file: &File,
        module_path: &Path,
        explicit: Option<&Path>,
    ) -> Result<(PortablePdb, SymbolSource)> {
        let mut codeview = None;
        let mut embedded = None;
        for entry in file.debug_directories()? {
            let data = file.data_slice(
                entry.pointer_to_raw_data as usize,
                entry.size_of_data as usize,
            )?;
            match entry.kind {
                DebugDirectoryType::CodeView if codeview.is_none() => {
                    if let Ok(record) = CodeViewRecord::read(data) {
                        codeview = Some(record);
                    }
                }
                DebugDirectoryType::EmbeddedPortablePdb if embedded.is_none() => {
                    embedded = Some(data);
                }
                _ => {}
            }
        }

        let sidecar = module_path.with_extension("pdb");
        let (pdb, source) = if let Some(path) = explicit {
            (
                PortablePdb::from_file(path)?,
                SymbolSource::Explicit(path.to_path_buf()),
            )
        } else if let Some(data) = embedded {
            (
                PortablePdb::from_mem(decompress_embedded(data)?)?,
                SymbolSource::Embedded,
            )
        } else if let Some(path) = codeview
            .as_ref()
            .map(|record| PathBuf::from(&record.path))
            .filter(|path| path.is_file())
        {
            (PortablePdb::from_file(&path)?, SymbolSource::CodeView(path))
        } else if sidecar.is_file() {
            (
                PortablePdb::from_file(&sidecar)?,
                SymbolSource::SideCar(sidecar),
            )
        } else {
            return Err(MissingSymbols(sidecar));
        };

        if let Some(record) = codeview {
            let found = pdb.id();
            if record.guid != found {
                return Err(SymbolMismatch {
                    expected: record.guid,
                    found,
                });
            }
        }

        Ok((pdb, source))
    }

    /// GUID part of the PDB id
    #[must_use]
    pub fn id(&self) -> uguid::Guid {
        self.with_metadata(|metadata| {
            metadata
                .pdb
                .as_ref()
                .map(|pdb| pdb.guid())
                .unwrap_or_default()
        })
    }

    /// Decode the document names and the sequence points of every method.
    ///
    /// # Errors
    /// Returns an error if a debug table row, a document name or a sequence points blob is
    /// malformed.
    pub fn read_symbols(&self) -> Result<DebugSymbols> {
        self.with_metadata(|metadata| {
            let tables = metadata.tables()?;

            let mut documents = Vec::new();
            if let Some(table) = tables.table::<DocumentRaw>() {
                documents.reserve(table.row_count() as usize);
                for row in table.iter() {
                    documents.push(decode_document_name(metadata, row?.name)?);
                }
            }

            let mut methods = HashMap::new();
            if let Some(table) = tables.table::<MethodDebugInformationRaw>() {
                for row in table.iter() {
                    let row = row?;
                    if row.sequence_points == 0 {
                        continue;
                    }

                    let blob = metadata.blob(row.sequence_points)?;
                    methods.insert(row.rid, parse_sequence_points(blob, row.document)?);
                }
            }

            Ok(DebugSymbols {
                id: metadata
                    .pdb
                    .as_ref()
                    .map(|pdb| pdb.guid())
                    .unwrap_or_default(),
                documents,
                methods,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test::PdbBuilder, Error};
    use flate2::{write::DeflateEncoder, Compression};
    use std::io::Write;

    #[test]
    fn codeview_record() {
        let mut data = b"RSDS".to_vec();
        data.extend_from_slice(&[0x11; 16]);
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(b"C:\\build\\obj\\Sample.pdb\0");

        let record = CodeViewRecord::read(&data).unwrap();
        assert_eq!(record.guid, uguid::Guid::from_bytes([0x11; 16]));
        assert_eq!(record.age, 1);
        assert_eq!(record.path, "C:\\build\\obj\\Sample.pdb");

        assert!(CodeViewRecord::read(b"NB10\0\0\0\0").is_err());
    }

    #[test]
    fn embedded_roundtrip() {
        let payload = b"BSJB not really metadata".to_vec();
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&payload).unwrap();

        let mut record = b"MPDB".to_vec();
        record.extend_from_slice(&u32::try_from(payload.len()).unwrap().to_le_bytes());
        record.extend_from_slice(&encoder.finish().unwrap());

        assert_eq!(decompress_embedded(&record).unwrap(), payload);

        record[4] += 1;
        assert!(matches!(
            decompress_embedded(&record),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn reject_windows_pdb() {
        let mut data = MSF_SIGNATURE.to_vec();
        data.extend_from_slice(b"\r\n\x1ADS\0\0\0");
        assert!(matches!(
            PortablePdb::from_mem(data),
            Err(Error::UnsupportedSymbolFormat(_))
        ));
        assert!(matches!(PortablePdb::from_mem(Vec::new()), Err(Error::Empty)));
    }

    #[test]
    fn read_symbols_from_crafted_pdb() {
        let mut builder = PdbBuilder::new([0xAB; 16]);
        let doc = builder.document("/src/app/Program.cs");
        // method 1: one point at il 0, line 10
        builder.method(&[(0, doc, 10)]);
        // method 2: no debug information
        builder.method(&[]);
        // method 3: two points in two documents
        let other = builder.document("/src/app/Other.cs");
        builder.method(&[(0, doc, 3), (4, other, 7)]);

        let pdb = PortablePdb::from_mem(builder.build()).unwrap();
        assert_eq!(pdb.id(), uguid::Guid::from_bytes([0xAB; 16]));

        let symbols = pdb.read_symbols().unwrap();
        assert_eq!(symbols.documents, vec!["/src/app/Program.cs", "/src/app/Other.cs"]);
        assert_eq!(symbols.document(2), Some("/src/app/Other.cs"));
        assert_eq!(symbols.document(0), None);

        let first = symbols.sequence_points(1).unwrap();
        assert_eq!(first.0.len(), 1);
        assert_eq!(first.0[0].start_line, 10);
        assert_eq!(first.0[0].document, doc);

        assert!(symbols.sequence_points(2).is_none());

        let third = symbols.sequence_points(3).unwrap();
        assert_eq!(third.0[1].il_offset, 4);
        assert_eq!(third.0[1].document, other);
        assert_eq!(third.0[1].start_line, 7);
    }
}
