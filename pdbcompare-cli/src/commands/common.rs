use std::path::Path;

use anyhow::Context;
use pdbcompare::{AutoLoader, LoaderOptions, ModuleGraph, ModuleLoader};

use crate::app::LoadOptions;

/// Build the loader options for one module.
pub fn loader_options(pdb: Option<&Path>, read_symbols: bool, load: &LoadOptions) -> LoaderOptions {
    LoaderOptions {
        pdb: pdb.map(Path::to_path_buf),
        read_symbols,
        include_nested: load.include_nested,
    }
}

/// Load a module or JSON snapshot into a graph.
pub fn load_graph(path: &Path, options: LoaderOptions) -> anyhow::Result<ModuleGraph> {
    let graph = AutoLoader::new(options)
        .load(path)
        .with_context(|| format!("failed to load module: {}", path.display()))?;

    log::debug!(
        "Loaded {} with {} types and {} methods",
        path.display(),
        graph.types.len(),
        graph.method_count()
    );
    Ok(graph)
}
