//! Comparison of two copies of one method.

use crate::{
    compare::{
        extract::{first_sequence_point, sequence_points},
        AssemblySlot, CompareOptions, Finding, Report,
    },
    graph::MethodEntry,
};

/// Compare the first sequence points of a method and its rewritten copy.
///
/// Only the first position of each side is compared by document and start line. When both
/// agree, every position of the rewritten copy has to name the same document.
#[must_use]
pub fn compare_methods(
    source: &MethodEntry,
    rewritten: &MethodEntry,
    method_name: &str,
    options: &CompareOptions,
) -> Report {
    let (first, second) = match (first_sequence_point(source), first_sequence_point(rewritten)) {
        (None, None) => {
            return Report::from(Finding::NoSequencePoints {
                method: method_name.to_string(),
            })
        }
        (None, Some(_)) => {
            return Report::from(Finding::AsymmetricSequencePoints {
                method: method_name.to_string(),
                missing_in: AssemblySlot::First,
            })
        }
        (Some(_), None) => {
            return Report::from(Finding::AsymmetricSequencePoints {
                method: method_name.to_string(),
                missing_in: AssemblySlot::Second,
            })
        }
        (Some(first), Some(second)) => (first, second),
    };

    if first.document != second.document {
        return Report::from(Finding::DifferentSourceFile {
            method: method_name.to_string(),
            first_url: first.document.clone(),
            second_url: second.document.clone(),
        });
    }

    if options.compare_start_lines && first.start_line != second.start_line {
        return Report::from(Finding::DifferentStartLine {
            method: method_name.to_string(),
            first_line: first.start_line,
            second_line: second.start_line,
        });
    }

    let mut report = Report::from(Finding::Matched {
        method: method_name.to_string(),
    });
    report.append(verify_all_sequence_points(
        rewritten,
        method_name,
        AssemblySlot::Second,
        &second.document,
    ));
    report
}

/// Report every sequence point of `method` whose document differs from `reference_url`
#[must_use]
pub fn verify_all_sequence_points(
    method: &MethodEntry,
    method_name: &str,
    slot: AssemblySlot,
    reference_url: &str,
) -> Report {
    sequence_points(method)
        .filter(|position| position.document != reference_url)
        .map(|position| Finding::InconsistentDocumentWithinMethod {
            method: method_name.to_string(),
            line: position.start_line,
            url: position.document.clone(),
            reference_url: reference_url.to_string(),
            slot,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        compare::FindingKind,
        graph::{InstructionEntry, SourcePosition},
    };

    const NAME: &str = "System.Void T::M()";

    fn method(points: &[(&str, u32)]) -> MethodEntry {
        MethodEntry {
            signature: NAME.to_string(),
            has_body: true,
            instructions: points
                .iter()
                .enumerate()
                .map(|(offset, (document, line))| InstructionEntry {
                    offset: offset as u32,
                    position: (!document.is_empty())
                        .then(|| SourcePosition::new(*document, *line)),
                })
                .collect(),
        }
    }

    fn kinds(report: &Report) -> Vec<FindingKind> {
        report.findings().iter().map(Finding::kind).collect()
    }

    #[test]
    fn neither_has_points() {
        let report = compare_methods(
            &method(&[("", 0)]),
            &method(&[("", 0)]),
            NAME,
            &CompareOptions::default(),
        );
        assert_eq!(kinds(&report), [FindingKind::NoSequencePoints]);
        assert_eq!(report.error_count(), 0);
    }

    #[test]
    fn one_side_missing() {
        let options = CompareOptions::default();
        let with = method(&[("a.cs", 5)]);
        let without = method(&[("", 0)]);

        let report = compare_methods(&without, &with, NAME, &options);
        assert_eq!(report.error_count(), 1);
        assert_eq!(
            report.findings()[0],
            Finding::AsymmetricSequencePoints {
                method: NAME.to_string(),
                missing_in: AssemblySlot::First,
            }
        );

        let report = compare_methods(&with, &without, NAME, &options);
        assert_eq!(report.error_count(), 1);
        assert!(matches!(
            report.findings()[0],
            Finding::AsymmetricSequencePoints {
                missing_in: AssemblySlot::Second,
                ..
            }
        ));
    }

    #[test]
    fn different_document_stops() {
        let report = compare_methods(
            &method(&[("a.cs", 5)]),
            &method(&[("A.cs", 5), ("c.cs", 6)]),
            NAME,
            &CompareOptions::default(),
        );
        assert_eq!(kinds(&report), [FindingKind::DifferentSourceFile]);
        assert_eq!(report.error_count(), 1);
    }

    #[test]
    fn start_line_comparison() {
        let source = method(&[("", 0), ("a.cs", 5)]);
        let rewritten = method(&[("a.cs", 6)]);

        let report = compare_methods(&source, &rewritten, NAME, &CompareOptions::default());
        assert_eq!(kinds(&report), [FindingKind::DifferentStartLine]);
        assert_eq!(report.error_count(), 1);

        let options = CompareOptions {
            compare_start_lines: false,
            ..CompareOptions::default()
        };
        let report = compare_methods(&source, &rewritten, NAME, &options);
        assert_eq!(kinds(&report), [FindingKind::Matched]);
        assert_eq!(report.error_count(), 0);
    }

    #[test]
    fn inconsistent_document_in_rewritten() {
        let report = compare_methods(
            &method(&[("a.cs", 5), ("a.cs", 7)]),
            &method(&[("a.cs", 5), ("b.cs", 9)]),
            NAME,
            &CompareOptions::default(),
        );

        assert_eq!(report.error_count(), 1);
        assert_eq!(
            report.findings()[1],
            Finding::InconsistentDocumentWithinMethod {
                method: NAME.to_string(),
                line: 9,
                url: "b.cs".to_string(),
                reference_url: "a.cs".to_string(),
                slot: AssemblySlot::Second,
            }
        );
    }

    #[test]
    fn source_side_not_verified() {
        let report = compare_methods(
            &method(&[("a.cs", 5), ("x.cs", 7), ("y.cs", 8)]),
            &method(&[("a.cs", 5), ("a.cs", 9)]),
            NAME,
            &CompareOptions::default(),
        );
        assert_eq!(kinds(&report), [FindingKind::Matched]);
    }

    #[test]
    fn verify_counts_every_point() {
        let report = verify_all_sequence_points(
            &method(&[("b.cs", 1), ("a.cs", 2), ("c.cs", 3)]),
            NAME,
            AssemblySlot::First,
            "a.cs",
        );
        assert_eq!(report.error_count(), 2);
    }
}
