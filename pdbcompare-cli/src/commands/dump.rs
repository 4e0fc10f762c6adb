use std::{
    fs,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use pdbcompare::{compare::first_sequence_point, ModuleGraph};
use serde::Serialize;

use crate::{
    app::{GlobalOptions, LoadOptions},
    commands::common::{load_graph, loader_options},
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct MethodRow {
    signature: String,
    has_body: bool,
    instructions: usize,
    document: Option<String>,
    line: Option<u32>,
}

#[derive(Debug, Serialize)]
struct MethodsOutput {
    methods: Vec<MethodRow>,
    count: usize,
}

pub fn run(
    path: &Path,
    output: Option<&Path>,
    pdb: Option<&Path>,
    read_symbols: bool,
    methods: bool,
    load: &LoadOptions,
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    let graph = load_graph(path, loader_options(pdb, read_symbols, load))?;

    if methods {
        return print_methods(&graph, opts);
    }

    match output {
        Some(target) => {
            let file = fs::File::create(target)
                .with_context(|| format!("failed to create snapshot: {}", target.display()))?;
            let mut writer = BufWriter::new(file);
            graph.write_json(&mut writer)?;
            writer.flush()?;
            log::info!("Wrote snapshot of {} to {}", path.display(), target.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            graph.write_json(&mut stdout)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

fn print_methods(graph: &ModuleGraph, opts: &GlobalOptions) -> anyhow::Result<()> {
    let methods: Vec<MethodRow> = graph
        .types
        .iter()
        .flat_map(|entry| entry.methods.iter())
        .map(|method| {
            let first = first_sequence_point(method);
            MethodRow {
                signature: method.signature.clone(),
                has_body: method.has_body,
                instructions: method.instructions.len(),
                document: first.map(|position| position.document.clone()),
                line: first.map(|position| position.start_line),
            }
        })
        .collect();

    let data = MethodsOutput {
        count: methods.len(),
        methods,
    };

    print_output(&data, opts, |data| {
        let mut table = TabWriter::new(vec![
            ("METHOD", Align::Left),
            ("BODY", Align::Left),
            ("INSTRS", Align::Right),
            ("FIRST SEQUENCE POINT", Align::Left),
        ]);
        for row in &data.methods {
            let first = match (&row.document, row.line) {
                (Some(document), Some(line)) => format!("{document}:{line}"),
                _ => "-".to_string(),
            };
            table.row(vec![
                row.signature.clone(),
                if row.has_body { "yes" } else { "no" }.to_string(),
                row.instructions.to_string(),
                first,
            ]);
        }
        table.print();
        println!();
        println!("{} method(s)", data.count);
    })
}
