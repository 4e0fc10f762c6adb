//! Sequence points of a method, in instruction order.

use crate::graph::{MethodEntry, SourcePosition};

/// The position attached to the first instruction carrying one
#[must_use]
pub fn first_sequence_point(method: &MethodEntry) -> Option<&SourcePosition> {
    sequence_points(method).next()
}

/// Every attached position in instruction order. The iterator can be cloned to restart it.
pub fn sequence_points(method: &MethodEntry) -> impl Iterator<Item = &SourcePosition> + Clone {
    method
        .instructions
        .iter()
        .filter_map(|instruction| instruction.position.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::InstructionEntry;

    fn instruction(offset: u32, position: Option<(&str, u32)>) -> InstructionEntry {
        InstructionEntry {
            offset,
            position: position.map(|(document, line)| SourcePosition::new(document, line)),
        }
    }

    #[test]
    fn first_and_all() {
        let method = MethodEntry {
            signature: "System.Void T::M()".to_string(),
            has_body: true,
            instructions: vec![
                instruction(0, None),
                instruction(1, Some(("a.cs", 5))),
                instruction(2, None),
                instruction(6, Some(("b.cs", 9))),
            ],
        };

        assert_eq!(first_sequence_point(&method).unwrap().start_line, 5);

        let points = sequence_points(&method);
        let lines: Vec<_> = points.clone().map(|point| point.start_line).collect();
        assert_eq!(lines, [5, 9]);
        assert_eq!(points.count(), 2);
    }

    #[test]
    fn none_attached() {
        let method = MethodEntry {
            signature: "System.Void T::M()".to_string(),
            has_body: true,
            instructions: vec![instruction(0, None)],
        };

        assert!(first_sequence_point(&method).is_none());
        assert_eq!(sequence_points(&method).count(), 0);
    }
}
