use std::path::Path;

use pdbcompare::{CompareOptions, Comparer};

use crate::{
    app::{GlobalOptions, LoadOptions},
    commands::common::{load_graph, loader_options},
    output::{log_findings, print_output, print_summary},
};

pub struct CompareArgs<'a> {
    pub compare_start_lines: bool,
    pub parallel: bool,
    pub first_pdb: Option<&'a Path>,
    pub second_pdb: Option<&'a Path>,
    pub summary: bool,
    pub load: &'a LoadOptions,
}

/// Compare two modules and return the exit code, the number of errors capped at 255.
pub fn run(
    first: &Path,
    second: &Path,
    args: &CompareArgs<'_>,
    opts: &GlobalOptions,
) -> anyhow::Result<i32> {
    let first_graph = load_graph(first, loader_options(args.first_pdb, true, args.load))?;
    let second_graph = load_graph(second, loader_options(args.second_pdb, true, args.load))?;

    let comparer = Comparer::new(CompareOptions {
        compare_start_lines: args.compare_start_lines,
        parallel: args.parallel,
    });
    let report = comparer.compare_modules(&first_graph, &second_graph);

    print_output(&report, opts, |report| {
        log_findings(report);
        if args.summary {
            print_summary(report);
        }
    })?;

    if report.is_consistent() {
        log::info!("{} and {} are consistent", first.display(), second.display());
    }

    Ok(exit_code(report.error_count()))
}

/// Process exit status for `error_count` errors.
///
/// Only the low 8 bits of a status reach the parent process, so the count saturates at 255.
pub fn exit_code(error_count: usize) -> i32 {
    u8::try_from(error_count).unwrap_or(u8::MAX).into()
}
