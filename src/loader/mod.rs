//! Producing [`ModuleGraph`]s from files.
//!
//! The comparison engine only sees [`ModuleGraph`] values. Where they come from is hidden
//! behind the [`ModuleLoader`] trait:
//!
//! - [`CilLoader`] reads a .NET module and its Portable PDB
//! - [`SnapshotLoader`] reads a JSON snapshot written by [`ModuleGraph::write_json`]
//! - [`AutoLoader`] picks one of both based on the file extension
//!
//! # Examples
//!
//! ```rust,no_run
//! use pdbcompare::{AutoLoader, LoaderOptions, ModuleLoader};
//! use std::path::Path;
//!
//! let loader = AutoLoader::new(LoaderOptions {
//!     include_nested: true,
//!     ..LoaderOptions::default()
//! });
//! let graph = loader.load(Path::new("App.dll"))?;
//! println!("{}: {} types", graph.name, graph.types.len());
//! # Ok::<(), pdbcompare::Error>(())
//! ```

use std::{
    fs,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    file::File,
    graph::{InstructionEntry, MethodEntry, ModuleGraph, SourcePosition, TypeEntry},
    metadata::{
        module::ModuleView,
        names::MetadataNames,
        pdb::{DebugSymbols, PortablePdb},
        sequencepoints::SequencePoint,
        tables::{MethodDefRaw, MetadataTable, TypeDefRaw},
    },
    Result,
};

/// Source of module graphs
pub trait ModuleLoader: Send + Sync {
    /// Load the module at `path`
    ///
    /// # Errors
    /// Returns an error if the module or its debug symbols can not be read.
    fn load(&self, path: &Path) -> Result<ModuleGraph>;
}

/// Options of [`CilLoader`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Use this Portable PDB instead of searching for one
    pub pdb: Option<PathBuf>,
    /// Read debug symbols at all, without them no instruction carries a source position
    pub read_symbols: bool,
    /// Include nested types in the graph, by default only top-level types are listed
    pub include_nested: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        LoaderOptions {
            pdb: None,
            read_symbols: true,
            include_nested: false,
        }
    }
}

/// Loads .NET modules together with their Portable PDB
#[derive(Debug, Clone, Default)]
pub struct CilLoader {
    options: LoaderOptions,
}

impl CilLoader {
    /// Create a loader with the given options
    #[must_use]
    pub fn new(options: LoaderOptions) -> Self {
        CilLoader { options }
    }

    /// Build the graph of an already parsed module.
    ///
    /// Sequence points of `symbols` are attached to the instruction starting at their IL
    /// offset. Points without such an instruction are dropped.
    ///
    /// # Errors
    /// Returns an error if a table row, a signature or a method body is malformed, or if a
    /// sequence point refers to an unknown document.
    pub fn load_module(
        &self,
        name: &str,
        module: &ModuleView,
        symbols: Option<&DebugSymbols>,
    ) -> Result<ModuleGraph> {
        let types = module.with_metadata(|metadata| -> Result<Vec<TypeEntry>> {
            let tables = metadata.tables()?;
            let names = MetadataNames::new(metadata)?;

            let Some(typedefs) = tables.table::<TypeDefRaw>() else {
                return Ok(Vec::new());
            };
            let methods = tables.table::<MethodDefRaw>();

            let rows = typedefs.iter().collect::<Result<Vec<_>>>()?;
            let mut types = Vec::with_capacity(rows.len());
            for (index, row) in rows.iter().enumerate() {
                if !self.options.include_nested && names.is_nested(row.rid) {
                    continue;
                }

                let mut entry = TypeEntry {
                    name: names.type_def_name(row.rid)?,
                    methods: Vec::new(),
                };

                if let Some(methods) = &methods {
                    let next = rows.get(index + 1).map(|next| next.method_list);
                    for rid in method_range(row.method_list, next, methods) {
                        let method = methods.try_get(rid)?;
                        entry
                            .methods
                            .push(self.method_entry(module, &names, &method, row.rid, symbols)?);
                    }
                }

                types.push(entry);
            }

            Ok(types)
        })?;

        Ok(ModuleGraph {
            name: name.to_string(),
            types,
        })
    }

    fn method_entry(
        &self,
        module: &ModuleView,
        names: &MetadataNames,
        method: &MethodDefRaw,
        declaring_rid: u32,
        symbols: Option<&DebugSymbols>,
    ) -> Result<MethodEntry> {
        let mut entry = MethodEntry {
            signature: names.method_name(method, declaring_rid)?,
            has_body: method.has_body(),
            instructions: Vec::new(),
        };

        if !entry.has_body {
            return Ok(entry);
        }

        entry.instructions = module
            .method_instructions(method.rva)?
            .into_iter()
            .map(|offset| InstructionEntry {
                offset,
                position: None,
            })
            .collect();

        let Some(symbols) = symbols else {
            return Ok(entry);
        };
        let Some(points) = symbols.sequence_points(method.rid) else {
            return Ok(entry);
        };

        for point in &points.0 {
            if let Ok(index) = entry
                .instructions
                .binary_search_by_key(&point.il_offset, |instruction| instruction.offset)
            {
                entry.instructions[index].position = Some(source_position(symbols, point)?);
            }
        }

        Ok(entry)
    }
}

/// The `MethodDef` rows owned by a type: from its `method_list` up to the next type's
fn method_range(
    start: u32,
    next: Option<u32>,
    methods: &MetadataTable<MethodDefRaw>,
) -> std::ops::Range<u32> {
    let limit = methods.row_count() + 1;
    let start = start.clamp(1, limit);
    let end = next.unwrap_or(limit).clamp(start, limit);
    start..end
}

fn source_position(symbols: &DebugSymbols, point: &SequencePoint) -> Result<SourcePosition> {
    let document = symbols.document(point.document).ok_or_else(|| {
        malformed_error!(
            "Sequence point at IL_{:04x} refers to unknown document {}",
            point.il_offset,
            point.document
        )
    })?;

    Ok(SourcePosition {
        document: document.to_string(),
        start_line: point.start_line,
        start_column: point.start_column,
        end_line: (!point.is_hidden).then_some(point.end_line),
        end_column: (!point.is_hidden).then_some(point.end_column),
    })
}

impl ModuleLoader for CilLoader {
    fn load(&self, path: &Path) -> Result<ModuleGraph> {
        let file = Arc::new(File::from_file(path)?);

        let symbols = if self.options.read_symbols {
            let (pdb, _) = PortablePdb::locate(&file, path, self.options.pdb.as_deref())?;
            Some(pdb.read_symbols()?)
        } else {
            None
        };

        let module = ModuleView::from_arc(file)?;
        self.load_module(&module_name(path), &module, symbols.as_ref())
    }
}

/// Loads JSON snapshots written by [`ModuleGraph::write_json`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotLoader;

impl ModuleLoader for SnapshotLoader {
    fn load(&self, path: &Path) -> Result<ModuleGraph> {
        let reader = BufReader::new(fs::File::open(path)?);
        ModuleGraph::read_json(reader)
    }
}

/// Uses [`SnapshotLoader`] for `.json` files and [`CilLoader`] for everything else
#[derive(Debug, Clone, Default)]
pub struct AutoLoader {
    cil: CilLoader,
}

impl AutoLoader {
    /// Create a loader passing `options` on to [`CilLoader`]
    #[must_use]
    pub fn new(options: LoaderOptions) -> Self {
        AutoLoader {
            cil: CilLoader::new(options),
        }
    }
}

impl ModuleLoader for AutoLoader {
    fn load(&self, path: &Path) -> Result<ModuleGraph> {
        let is_snapshot = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

        if is_snapshot {
            SnapshotLoader.load(path)
        } else {
            self.cil.load(path)
        }
    }
}

fn module_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}
