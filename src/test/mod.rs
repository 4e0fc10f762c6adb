//! Builders for crafted modules and Portable PDBs used by the unit tests.
//!
//! All heaps and tables are kept small enough for 2 byte indices.

use std::collections::BTreeMap;

use crate::{
    file::tests::build_pe,
    metadata::{
        sequencepoints::HIDDEN_LINE,
        tables::{schema::columns, schema::Column, CodedIndexType, TableId},
    },
};

/// `IMAGE_DIRECTORY_ENTRY_DEBUG`
const DEBUG_DIRECTORY: usize = 6;
/// `IMAGE_DIRECTORY_ENTRY_COM_DESCRIPTOR`
const CLR_DIRECTORY: usize = 14;
/// RVA the builder places the `.text` section at
const TEXT_RVA: u32 = 0x2000;
/// File offset of the `.text` section
const TEXT_OFFSET: u32 = 0x200;

fn compressed_bytes(value: u32, width: usize) -> Vec<u8> {
    match width {
        1 => vec![value as u8],
        2 => vec![0x80 | (value >> 8) as u8, value as u8],
        _ => vec![
            0xC0 | (value >> 24) as u8,
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        ],
    }
}

pub(crate) fn compressed_uint(value: u32) -> Vec<u8> {
    if value < 0x80 {
        compressed_bytes(value, 1)
    } else if value < 0x4000 {
        compressed_bytes(value, 2)
    } else {
        compressed_bytes(value, 4)
    }
}

pub(crate) fn compressed_int(value: i32) -> Vec<u8> {
    let rotated = ((value as u32) << 1) | u32::from(value < 0);
    if (-0x40..0x40).contains(&value) {
        compressed_bytes(rotated & 0x7F, 1)
    } else if (-0x2000..0x2000).contains(&value) {
        compressed_bytes(rotated & 0x3FFF, 2)
    } else {
        compressed_bytes(rotated & 0x1FFF_FFFF, 4)
    }
}

/// Encode a coded index value of `kind` pointing at `table` row `row`
pub(crate) fn coded(kind: CodedIndexType, table: TableId, row: u32) -> u32 {
    let tag = kind
        .tables()
        .iter()
        .position(|candidate| *candidate == Some(table))
        .unwrap();
    (row << kind.tag_bits()) | tag as u32
}

fn pad4(data: &mut Vec<u8>) {
    while data.len() % 4 != 0 {
        data.push(0);
    }
}

/// `#Strings`, `#Blob` and `#GUID` heaps
pub(crate) struct Heaps {
    strings: Vec<u8>,
    blobs: Vec<u8>,
    guids: Vec<u8>,
}

impl Heaps {
    pub(crate) fn new() -> Self {
        Heaps {
            strings: vec![0],
            blobs: vec![0],
            guids: Vec::new(),
        }
    }

    pub(crate) fn string(&mut self, value: &str) -> u32 {
        if value.is_empty() {
            return 0;
        }
        let index = self.strings.len() as u32;
        self.strings.extend_from_slice(value.as_bytes());
        self.strings.push(0);
        index
    }

    pub(crate) fn blob(&mut self, value: &[u8]) -> u32 {
        if value.is_empty() {
            return 0;
        }
        let index = self.blobs.len() as u32;
        self.blobs
            .extend_from_slice(&compressed_uint(value.len() as u32));
        self.blobs.extend_from_slice(value);
        index
    }

    pub(crate) fn guid(&mut self, value: [u8; 16]) -> u32 {
        self.guids.extend_from_slice(&value);
        (self.guids.len() / 16) as u32
    }
}

/// Rows of a `#~` stream, every column value stored unencoded
#[derive(Default)]
pub(crate) struct Tables {
    rows: BTreeMap<TableId, Vec<Vec<u32>>>,
}

impl Tables {
    /// Append a row, returning its rid
    pub(crate) fn push(&mut self, table: TableId, values: &[u32]) -> u32 {
        assert_eq!(columns(table).len(), values.len(), "{table:?}");
        let rows = self.rows.entry(table).or_default();
        rows.push(values.to_vec());
        rows.len() as u32
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let valid = self
            .rows
            .keys()
            .fold(0u64, |mask, table| mask | (1 << *table as u64));

        let mut data = vec![0, 0, 0, 0, 2, 0, 0, 1];
        data.extend_from_slice(&valid.to_le_bytes());
        data.extend_from_slice(&0u64.to_le_bytes());
        for rows in self.rows.values() {
            data.extend_from_slice(&(rows.len() as u32).to_le_bytes());
        }

        for (table, rows) in &self.rows {
            for row in rows {
                for (column, value) in columns(*table).iter().zip(row) {
                    match column {
                        Column::Fixed(width) => {
                            data.extend_from_slice(&value.to_le_bytes()[..*width as usize]);
                        }
                        _ => {
                            let value = u16::try_from(*value).unwrap();
                            data.extend_from_slice(&value.to_le_bytes());
                        }
                    }
                }
            }
        }

        pad4(&mut data);
        data
    }
}

/// Assemble a metadata root with the given streams
pub(crate) fn metadata_root(version: &str, streams: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut version_bytes = version.as_bytes().to_vec();
    version_bytes.push(0);
    pad4(&mut version_bytes);

    let mut headers_size = 0;
    for (name, _) in streams {
        headers_size += 8 + (name.len() + 1).next_multiple_of(4);
    }

    let mut data = Vec::new();
    data.extend_from_slice(&0x424A_5342u32.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&(version_bytes.len() as u32).to_le_bytes());
    data.extend_from_slice(&version_bytes);
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&(streams.len() as u16).to_le_bytes());

    let mut offset = data.len() + headers_size;
    for (name, content) in streams {
        data.extend_from_slice(&(offset as u32).to_le_bytes());
        data.extend_from_slice(&(content.len() as u32).to_le_bytes());
        let mut name_bytes = name.as_bytes().to_vec();
        name_bytes.push(0);
        pad4(&mut name_bytes);
        data.extend_from_slice(&name_bytes);
        offset += content.len().next_multiple_of(4);
    }

    for (_, content) in streams {
        data.extend_from_slice(content);
        pad4(&mut data);
    }

    data
}

fn heap_streams(heaps: &Heaps) -> Vec<(&'static str, Vec<u8>)> {
    let mut strings = heaps.strings.clone();
    pad4(&mut strings);
    let mut blobs = heaps.blobs.clone();
    pad4(&mut blobs);

    vec![
        ("#Strings", strings),
        ("#GUID", heaps.guids.clone()),
        ("#Blob", blobs),
    ]
}

/// Builds a standalone Portable PDB
pub(crate) struct PdbBuilder {
    id: [u8; 16],
    heaps: Heaps,
    tables: Tables,
    methods: u32,
}

impl PdbBuilder {
    pub(crate) fn new(id: [u8; 16]) -> Self {
        PdbBuilder {
            id,
            heaps: Heaps::new(),
            tables: Tables::default(),
            methods: 0,
        }
    }

    /// Add a `Document` row for a `/` separated path, returning its rid
    pub(crate) fn document(&mut self, path: &str) -> u32 {
        let mut name = vec![b'/'];
        for part in path.split('/') {
            let index = self.heaps.blob(part.as_bytes());
            name.extend_from_slice(&compressed_uint(index));
        }

        let name = self.heaps.blob(&name);
        // SHA256 and C#
        let hash_algorithm = self.heaps.guid([0x03; 16]);
        let language = self.heaps.guid([0x3F; 16]);
        self.tables
            .push(TableId::Document, &[name, hash_algorithm, 0, language])
    }

    /// Add the `MethodDebugInformation` row of the next method.
    ///
    /// Points are `(il_offset, document, start_line)`, a line of [`HIDDEN_LINE`] adds a hidden
    /// point. Visible points span columns 9 to 20 of their line.
    pub(crate) fn method(&mut self, points: &[(u32, u32, u32)]) -> u32 {
        self.methods += 1;

        if points.is_empty() {
            return self.tables.push(TableId::MethodDebugInformation, &[0, 0]);
        }

        let single_document = points.iter().all(|point| point.1 == points[0].1);
        let row_document = if single_document { points[0].1 } else { 0 };

        let mut blob = compressed_uint(0);
        if row_document == 0 {
            blob.extend_from_slice(&compressed_uint(points[0].1));
        }

        let mut document = points[0].1;
        let mut previous_il = 0;
        let mut previous_visible: Option<u32> = None;
        for (index, (il_offset, point_document, line)) in points.iter().enumerate() {
            if *point_document != document {
                blob.extend_from_slice(&compressed_uint(0));
                blob.extend_from_slice(&compressed_uint(*point_document));
                document = *point_document;
            }

            let delta = if index == 0 {
                *il_offset
            } else {
                il_offset - previous_il
            };
            blob.extend_from_slice(&compressed_uint(delta));
            previous_il = *il_offset;

            if *line == HIDDEN_LINE {
                blob.extend_from_slice(&[0, 0]);
                continue;
            }

            blob.extend_from_slice(&compressed_uint(0));
            blob.extend_from_slice(&compressed_uint(11));
            match previous_visible {
                None => {
                    blob.extend_from_slice(&compressed_uint(*line));
                    blob.extend_from_slice(&compressed_uint(9));
                }
                Some(previous) => {
                    blob.extend_from_slice(&compressed_int(*line as i32 - previous as i32));
                    blob.extend_from_slice(&compressed_int(0));
                }
            }
            previous_visible = Some(*line);
        }

        let blob = self.heaps.blob(&blob);
        self.tables
            .push(TableId::MethodDebugInformation, &[row_document, blob])
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut pdb = self.id.to_vec();
        pdb.extend_from_slice(&1u32.to_le_bytes());
        pdb.extend_from_slice(&0u32.to_le_bytes());
        pdb.extend_from_slice(&(1u64 << TableId::MethodDef as u64).to_le_bytes());
        pdb.extend_from_slice(&self.methods.to_le_bytes());

        let mut streams = vec![("#Pdb", pdb), ("#~", self.tables.build())];
        streams.extend(heap_streams(&self.heaps));
        metadata_root("PDB v1.0", &streams)
    }
}

/// A method added to a [`ModuleBuilder`]
pub(crate) struct TestMethod {
    pub(crate) name: String,
    pub(crate) signature: Vec<u8>,
    pub(crate) flags: u32,
    pub(crate) impl_flags: u32,
    pub(crate) code: Option<Vec<u8>>,
}

impl TestMethod {
    /// `public static void name()` with the given IL code
    pub(crate) fn new(name: &str, code: &[u8]) -> Self {
        TestMethod {
            name: name.to_string(),
            signature: vec![0x00, 0x00, 0x01],
            flags: 0x0096,
            impl_flags: 0,
            code: Some(code.to_vec()),
        }
    }
}

struct TestType {
    namespace: String,
    name: String,
    enclosing: Option<usize>,
    methods: Vec<TestMethod>,
}

/// Builds a PE image carrying metadata, method bodies and debug directory entries
pub(crate) struct ModuleBuilder {
    types: Vec<TestType>,
    type_refs: Vec<(String, String)>,
    generic_params: Vec<(usize, u32, String)>,
    codeview: Option<([u8; 16], String)>,
    embedded: Option<Vec<u8>>,
}

impl ModuleBuilder {
    /// A module with the `<Module>` type in row 1
    pub(crate) fn new() -> Self {
        ModuleBuilder {
            types: vec![TestType {
                namespace: String::new(),
                name: "<Module>".to_string(),
                enclosing: None,
                methods: Vec::new(),
            }],
            type_refs: Vec::new(),
            generic_params: Vec::new(),
            codeview: None,
            embedded: None,
        }
    }

    /// Add a top level type, returning its handle (the `TypeDef` rid minus one)
    pub(crate) fn type_def(&mut self, namespace: &str, name: &str) -> usize {
        self.types.push(TestType {
            namespace: namespace.to_string(),
            name: name.to_string(),
            enclosing: None,
            methods: Vec::new(),
        });
        self.types.len() - 1
    }

    /// Add a type nested in `enclosing`
    pub(crate) fn nested_type(&mut self, enclosing: usize, name: &str) -> usize {
        let handle = self.type_def("", name);
        self.types[handle].enclosing = Some(enclosing);
        handle
    }

    /// Add a `TypeRef` scoped to the module, returning its rid
    pub(crate) fn type_ref(&mut self, namespace: &str, name: &str) -> u32 {
        self.type_refs
            .push((namespace.to_string(), name.to_string()));
        self.type_refs.len() as u32
    }

    /// Declare generic parameter `number` of a type
    pub(crate) fn generic_param(&mut self, owner: usize, number: u32, name: &str) {
        self.generic_params
            .push((owner, number, name.to_string()));
    }

    /// Add `public static void name()` to `owner`
    pub(crate) fn method(&mut self, owner: usize, name: &str, code: &[u8]) {
        self.add_method(owner, TestMethod::new(name, code));
    }

    pub(crate) fn add_method(&mut self, owner: usize, method: TestMethod) {
        self.types[owner].methods.push(method);
    }

    /// Record a CodeView debug entry naming the PDB
    pub(crate) fn codeview(&mut self, guid: [u8; 16], path: &str) {
        self.codeview = Some((guid, path.to_string()));
    }

    /// Embed a Portable PDB into the debug directory
    pub(crate) fn embed_pdb(&mut self, pdb: &[u8]) {
        use flate2::{write::DeflateEncoder, Compression};
        use std::io::Write;

        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(pdb).unwrap();

        let mut record = b"MPDB".to_vec();
        record.extend_from_slice(&(pdb.len() as u32).to_le_bytes());
        record.extend_from_slice(&encoder.finish().unwrap());
        self.embedded = Some(record);
    }

    fn body(code: &[u8]) -> Vec<u8> {
        if code.len() < 64 {
            let mut body = vec![((code.len() as u8) << 2) | 0x02];
            body.extend_from_slice(code);
            body
        } else {
            let mut body = Vec::new();
            body.extend_from_slice(&0x3003u16.to_le_bytes());
            body.extend_from_slice(&8u16.to_le_bytes());
            body.extend_from_slice(&(code.len() as u32).to_le_bytes());
            body.extend_from_slice(&0u32.to_le_bytes());
            body.extend_from_slice(code);
            body
        }
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut text = vec![0u8; 72];

        // Method bodies follow the CLI header
        let mut rvas = Vec::new();
        for ty in &self.types {
            for method in &ty.methods {
                match &method.code {
                    Some(code) => {
                        pad4(&mut text);
                        rvas.push(TEXT_RVA + text.len() as u32);
                        text.extend_from_slice(&Self::body(code));
                    }
                    None => rvas.push(0),
                }
            }
        }
        pad4(&mut text);

        let mut heaps = Heaps::new();
        let mut tables = Tables::default();
        let mvid = heaps.guid([0x42; 16]);
        let module_name = heaps.string("Crafted.dll");
        tables.push(TableId::Module, &[0, module_name, mvid, 0, 0]);

        for (namespace, name) in &self.type_refs {
            let name = heaps.string(name);
            let namespace = heaps.string(namespace);
            let scope = coded(CodedIndexType::ResolutionScope, TableId::Module, 1);
            tables.push(TableId::TypeRef, &[scope, name, namespace]);
        }

        let mut method_rid = 1;
        for ty in &self.types {
            let name = heaps.string(&ty.name);
            let namespace = heaps.string(&ty.namespace);
            tables.push(TableId::TypeDef, &[0x0010_0001, name, namespace, 0, 1, method_rid]);

            for method in &ty.methods {
                let name = heaps.string(&method.name);
                let signature = heaps.blob(&method.signature);
                tables.push(
                    TableId::MethodDef,
                    &[
                        rvas[method_rid as usize - 1],
                        method.impl_flags,
                        method.flags,
                        name,
                        signature,
                        1,
                    ],
                );
                method_rid += 1;
            }
        }

        for (handle, ty) in self.types.iter().enumerate() {
            if let Some(enclosing) = ty.enclosing {
                tables.push(
                    TableId::NestedClass,
                    &[handle as u32 + 1, enclosing as u32 + 1],
                );
            }
        }

        for (owner, number, name) in &self.generic_params {
            let owner = coded(
                CodedIndexType::TypeOrMethodDef,
                TableId::TypeDef,
                *owner as u32 + 1,
            );
            let name = heaps.string(name);
            tables.push(TableId::GenericParam, &[*number, 0, owner, name]);
        }

        let mut streams = vec![("#~", tables.build())];
        streams.extend(heap_streams(&heaps));
        let metadata = metadata_root("v4.0.30319", &streams);

        let metadata_rva = TEXT_RVA + text.len() as u32;
        text.extend_from_slice(&metadata);
        pad4(&mut text);

        // CLI header
        text[0..4].copy_from_slice(&72u32.to_le_bytes());
        text[4..6].copy_from_slice(&2u16.to_le_bytes());
        text[6..8].copy_from_slice(&5u16.to_le_bytes());
        text[8..12].copy_from_slice(&metadata_rva.to_le_bytes());
        text[12..16].copy_from_slice(&(metadata.len() as u32).to_le_bytes());
        text[16..20].copy_from_slice(&1u32.to_le_bytes());

        let mut records = Vec::new();
        if let Some((guid, path)) = &self.codeview {
            let mut record = b"RSDS".to_vec();
            record.extend_from_slice(guid);
            record.extend_from_slice(&1u32.to_le_bytes());
            record.extend_from_slice(path.as_bytes());
            record.push(0);
            records.push((2u32, record));
        }
        if let Some(record) = &self.embedded {
            records.push((17u32, record.clone()));
        }

        let mut directories = vec![(CLR_DIRECTORY, TEXT_RVA, 72)];
        if !records.is_empty() {
            let directory_offset = text.len();
            let directory_size = records.len() * 28;
            text.resize(directory_offset + directory_size, 0);

            for (index, (kind, record)) in records.iter().enumerate() {
                pad4(&mut text);
                let data_offset = text.len() as u32;
                text.extend_from_slice(record);

                let entry = directory_offset + index * 28;
                text[entry + 12..entry + 16].copy_from_slice(&kind.to_le_bytes());
                text[entry + 16..entry + 20].copy_from_slice(&(record.len() as u32).to_le_bytes());
                text[entry + 20..entry + 24]
                    .copy_from_slice(&(TEXT_RVA + data_offset).to_le_bytes());
                text[entry + 24..entry + 28]
                    .copy_from_slice(&(TEXT_OFFSET + data_offset).to_le_bytes());
            }

            directories.push((
                DEBUG_DIRECTORY,
                TEXT_RVA + directory_offset as u32,
                directory_size as u32,
            ));
        }

        build_pe(&text, &directories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::parser::Parser;

    #[test]
    fn compressed_encoders() {
        for value in [0u32, 3, 0x7F, 0x80, 0x3FFF, 0x4000, 0x1FFF_FFFF] {
            let data = compressed_uint(value);
            assert_eq!(Parser::new(&data).read_compressed_uint().unwrap(), value);
        }

        for value in [0i32, 3, -3, 63, -64, 64, -65, 8191, -8192, 8192, -268_435_456] {
            let data = compressed_int(value);
            assert_eq!(Parser::new(&data).read_compressed_int().unwrap(), value);
        }
    }
}
