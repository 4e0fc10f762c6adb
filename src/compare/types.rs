//! Comparison of two copies of one type.

use crate::{
    compare::{
        identity::key_map, method::compare_methods, AssemblySlot, CompareOptions, Finding, Report,
    },
    graph::TypeEntry,
};

/// Compare every method with a body of `source` against its copy in `rewritten`.
///
/// Methods are matched by signature. Source methods without a body or without instructions
/// are skipped.
#[must_use]
pub fn compare_types(
    source: &TypeEntry,
    rewritten: &TypeEntry,
    options: &CompareOptions,
) -> Report {
    let methods = key_map(&rewritten.methods);
    let mut report = Report::new();

    for method in &source.methods {
        if !method.has_body || method.instructions.is_empty() {
            continue;
        }

        let name = method.signature.as_str();
        let Some(other) = methods.get(name) else {
            report.push(Finding::MissingMethod {
                method: name.to_string(),
                slot: AssemblySlot::Second,
            });
            continue;
        };

        if !other.has_body {
            report.push(Finding::MissingBody {
                method: name.to_string(),
                slot: AssemblySlot::Second,
            });
            continue;
        }

        report.append(compare_methods(method, other, name, options));
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

    fn method(name: &str, has_body: bool, line: Option<u32>) -> MethodEntry {
        MethodEntry {
            signature: format!("System.Void T::{name}()"),
            has_body,
            instructions: if has_body {
                vec![InstructionEntry {
                    offset: 0,
                    position: line.map(|line| SourcePosition::new("t.cs", line)),
                }]
            } else {
                Vec::new()
            },
        }
    }

    fn entry(methods: Vec<MethodEntry>) -> TypeEntry {
        TypeEntry {
            name: "T".to_string(),
            methods,
        }
    }

    #[test]
    fn missing_method() {
        let source = entry(vec![method("A", true, Some(1)), method("B", true, Some(2))]);
        let rewritten = entry(vec![method("A", true, Some(1))]);

        let report = compare_types(&source, &rewritten, &CompareOptions::default());
        assert_eq!(report.error_count(), 1);
        assert_eq!(
            report.findings()[1],
            Finding::MissingMethod {
                method: "System.Void T::B()".to_string(),
                slot: AssemblySlot::Second,
            }
        );
    }

    #[test]
    fn missing_body() {
        let source = entry(vec![method("A", true, Some(1))]);
        let rewritten = entry(vec![method("A", false, None)]);

        let report = compare_types(&source, &rewritten, &CompareOptions::default());
        assert_eq!(report.findings()[0].kind(), FindingKind::MissingBody);
        assert_eq!(report.error_count(), 1);
    }

    #[test]
    fn bodiless_source_methods_skipped() {
        let mut empty = method("C", true, None);
        empty.instructions.clear();
        let source = entry(vec![method("A", false, None), empty]);

        let report = compare_types(&source, &entry(Vec::new()), &CompareOptions::default());
        assert!(report.is_empty());
    }

    #[test]
    fn duplicate_rewritten_signature_last_wins() {
        let source = entry(vec![method("A", true, Some(1))]);
        let rewritten = entry(vec![method("A", true, Some(1)), method("A", false, None)]);

        let report = compare_types(&source, &rewritten, &CompareOptions::default());
        assert_eq!(report.findings()[0].kind(), FindingKind::MissingBody);
    }
}
