//! Comparison of two modules.

use rayon::prelude::*;

use crate::{
    compare::{
        identity::key_map, types::compare_types, AssemblySlot, CompareOptions, Finding, Report,
    },
    graph::{ModuleGraph, TypeEntry},
};

/// Compare every type of `source` against the type of the same name in `rewritten`.
///
/// With [`CompareOptions::parallel`] the type pairs are compared on the rayon thread pool. The
/// findings are still reported in the order of `source.types`.
#[must_use]
pub fn compare_modules(
    source: &ModuleGraph,
    rewritten: &ModuleGraph,
    options: &CompareOptions,
) -> Report {
    let types = key_map(&rewritten.types);
    let compare = |entry: &TypeEntry| match types.get(entry.name.as_str()) {
        Some(other) => compare_types(entry, other, options),
        None => Report::from(Finding::MissingType {
            type_name: entry.name.clone(),
            slot: AssemblySlot::Second,
        }),
    };

    let reports: Vec<Report> = if options.parallel {
        source.types.par_iter().map(compare).collect()
    } else {
        source.types.iter().map(compare).collect()
    };

    let mut report = Report::new();
    for partial in reports {
        report.append(partial);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        compare::FindingKind,
        graph::{InstructionEntry, MethodEntry, SourcePosition},
    };

    fn graph(types: &[(&str, &[&str])]) -> ModuleGraph {
        ModuleGraph {
            name: "M.dll".to_string(),
            types: types
                .iter()
                .map(|(name, methods)| TypeEntry {
                    name: (*name).to_string(),
                    methods: methods
                        .iter()
                        .map(|method| MethodEntry {
                            signature: format!("System.Void {name}::{method}()"),
                            has_body: true,
                            instructions: vec![InstructionEntry {
                                offset: 0,
                                position: Some(SourcePosition::new("m.cs", 3)),
                            }],
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn missing_type_has_no_method_findings() {
        let source = graph(&[("A", &["X", "Y"]), ("B", &["Z"])]);
        let rewritten = graph(&[("B", &["Z"])]);

        let report = compare_modules(&source, &rewritten, &CompareOptions::default());
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.findings()[0].kind(), FindingKind::MissingType);
        assert_eq!(report.findings()[1].kind(), FindingKind::Matched);
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn extra_rewritten_types_ignored() {
        let source = graph(&[("A", &["X"])]);
        let rewritten = graph(&[("A", &["X"]), ("Injected", &["Hook"])]);

        let report = compare_modules(&source, &rewritten, &CompareOptions::default());
        assert!(report.is_consistent());
    }

    #[test]
    fn parallel_preserves_order() {
        let names: Vec<String> = (0..64).map(|index| format!("T{index}")).collect();
        let types: Vec<(&str, &[&str])> = names
            .iter()
            .enumerate()
            .filter(|(index, _)| index % 3 != 0)
            .map(|(_, name)| (name.as_str(), &["M"][..]))
            .collect();
        let all: Vec<(&str, &[&str])> = names
            .iter()
            .map(|name| (name.as_str(), &["M"][..]))
            .collect();

        let source = graph(&all);
        let rewritten = graph(&types);

        let sequential = compare_modules(&source, &rewritten, &CompareOptions::default());
        let parallel = compare_modules(
            &source,
            &rewritten,
            &CompareOptions {
                parallel: true,
                ..CompareOptions::default()
            },
        );

        assert_eq!(sequential, parallel);
        assert_eq!(sequential.error_count(), 22);
    }
}
