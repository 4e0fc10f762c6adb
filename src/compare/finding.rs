//! Findings reported by the comparison.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Which of the two compared modules a finding refers to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, EnumIter,
)]
pub enum AssemblySlot {
    /// The original module
    First,
    /// The rewritten module
    Second,
}

/// How a finding is reported, from least to most severe
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    EnumIter,
)]
pub enum Severity {
    /// Confirmation that something matched
    Debug,
    /// Noteworthy, possibly still counted as an error
    Info,
    /// Something is missing
    Warning,
    /// The debug information diverges
    Error,
}

/// One divergence (or confirmation) found while comparing two modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Finding {
    /// A type of the first module does not exist in the second one
    MissingType {
        /// Full name of the type
        type_name: String,
        /// Module lacking the type
        slot: AssemblySlot,
    },
    /// A method with a body does not exist in the second module
    MissingMethod {
        /// Signature of the method
        method: String,
        /// Module lacking the method
        slot: AssemblySlot,
    },
    /// A method exists in both modules, but lost its body
    MissingBody {
        /// Signature of the method
        method: String,
        /// Module lacking the body
        slot: AssemblySlot,
    },
    /// Neither copy of a method carries a sequence point
    NoSequencePoints {
        /// Signature of the method
        method: String,
    },
    /// Only one copy of a method carries sequence points
    AsymmetricSequencePoints {
        /// Signature of the method
        method: String,
        /// Module without sequence points
        missing_in: AssemblySlot,
    },
    /// The first sequence points name different documents
    DifferentSourceFile {
        /// Signature of the method
        method: String,
        /// Document in the first module
        first_url: String,
        /// Document in the second module
        second_url: String,
    },
    /// The first sequence points start on different lines
    DifferentStartLine {
        /// Signature of the method
        method: String,
        /// Start line in the first module
        first_line: u32,
        /// Start line in the second module
        second_line: u32,
    },
    /// A sequence point names another document than the first one of its method
    InconsistentDocumentWithinMethod {
        /// Signature of the method
        method: String,
        /// Start line of the offending sequence point
        line: u32,
        /// Document of the offending sequence point
        url: String,
        /// Document of the method's first sequence point
        reference_url: String,
        /// Module containing the method
        slot: AssemblySlot,
    },
    /// The first sequence points of a method agree
    Matched {
        /// Signature of the method
        method: String,
    },
}

/// The kinds of [`Finding`], without their data
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    EnumIter,
)]
#[allow(missing_docs)]
pub enum FindingKind {
    MissingType,
    MissingMethod,
    MissingBody,
    NoSequencePoints,
    AsymmetricSequencePoints,
    DifferentSourceFile,
    DifferentStartLine,
    InconsistentDocumentWithinMethod,
    Matched,
}

impl Finding {
    /// The kind of this finding
    #[must_use]
    pub fn kind(&self) -> FindingKind {
        match self {
            Finding::MissingType { .. } => FindingKind::MissingType,
            Finding::MissingMethod { .. } => FindingKind::MissingMethod,
            Finding::MissingBody { .. } => FindingKind::MissingBody,
            Finding::NoSequencePoints { .. } => FindingKind::NoSequencePoints,
            Finding::AsymmetricSequencePoints { .. } => FindingKind::AsymmetricSequencePoints,
            Finding::DifferentSourceFile { .. } => FindingKind::DifferentSourceFile,
            Finding::DifferentStartLine { .. } => FindingKind::DifferentStartLine,
            Finding::InconsistentDocumentWithinMethod { .. } => {
                FindingKind::InconsistentDocumentWithinMethod
            }
            Finding::Matched { .. } => FindingKind::Matched,
        }
    }

    /// Severity the finding is reported at
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.kind().severity()
    }

    /// Returns true if the finding counts towards the error total
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind().is_error()
    }
}

impl FindingKind {
    /// Severity findings of this kind are reported at
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            FindingKind::Matched => Severity::Debug,
            FindingKind::NoSequencePoints | FindingKind::DifferentStartLine => Severity::Info,
            FindingKind::MissingType | FindingKind::AsymmetricSequencePoints => Severity::Warning,
            FindingKind::MissingMethod
            | FindingKind::MissingBody
            | FindingKind::DifferentSourceFile
            | FindingKind::InconsistentDocumentWithinMethod => Severity::Error,
        }
    }

    /// Returns true if findings of this kind count towards the error total
    #[must_use]
    pub fn is_error(self) -> bool {
        !matches!(self, FindingKind::NoSequencePoints | FindingKind::Matched)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::MissingType { type_name, slot } => {
                write!(f, "Missing type {type_name} in {slot}")
            }
            Finding::MissingMethod { method, slot } => write!(f, "{method} not found in {slot}"),
            Finding::MissingBody { method, slot } => {
                write!(f, "{method} does not have a body in {slot}")
            }
            Finding::NoSequencePoints { method } => {
                write!(f, "Skipping {method} - neither have sequence points")
            }
            Finding::AsymmetricSequencePoints { method, missing_in } => {
                write!(f, "Missing sequence point in {method} in {missing_in}")
            }
            Finding::DifferentSourceFile {
                method,
                first_url,
                second_url,
            } => write!(
                f,
                "Different source file for {method}: {first_url} vs {second_url}"
            ),
            Finding::DifferentStartLine {
                method,
                first_line,
                second_line,
            } => write!(
                f,
                "OK? - Different start line for {method}: {first_line} vs {second_line}"
            ),
            Finding::InconsistentDocumentWithinMethod {
                method,
                line,
                url,
                reference_url,
                slot,
            } => write!(
                f,
                "A sequence point in {method}:{line} in {slot} had a different url than the \
                 first one ({url} vs {reference_url})"
            ),
            Finding::Matched { method } => write!(f, "OK - {method} same"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn severity_table() {
        let errors: Vec<_> = FindingKind::iter().filter(|kind| kind.is_error()).collect();
        assert_eq!(errors.len(), 7);

        assert_eq!(FindingKind::MissingType.severity(), Severity::Warning);
        assert_eq!(FindingKind::DifferentStartLine.severity(), Severity::Info);
        assert!(FindingKind::DifferentStartLine.is_error());
        assert!(!FindingKind::NoSequencePoints.is_error());
        assert!(Severity::Debug < Severity::Error);
    }

    #[test]
    fn display() {
        let finding = Finding::InconsistentDocumentWithinMethod {
            method: "System.Void T::M()".to_string(),
            line: 9,
            url: "b.cs".to_string(),
            reference_url: "a.cs".to_string(),
            slot: AssemblySlot::Second,
        };
        assert_eq!(
            finding.to_string(),
            "A sequence point in System.Void T::M():9 in Second had a different url than the \
             first one (b.cs vs a.cs)"
        );
        assert_eq!(finding.severity(), Severity::Error);

        let finding = Finding::MissingType {
            type_name: "Ns.T".to_string(),
            slot: AssemblySlot::Second,
        };
        assert_eq!(finding.to_string(), "Missing type Ns.T in Second");
        assert_eq!(finding.kind().to_string(), "MissingType");
    }

    #[test]
    fn serialize_tagged() {
        let finding = Finding::Matched {
            method: "System.Void T::M()".to_string(),
        };
        let json = serde_json::to_string(&finding).unwrap();
        assert_eq!(json, r#"{"kind":"Matched","method":"System.Void T::M()"}"#);
        assert_eq!(serde_json::from_str::<Finding>(&json).unwrap(), finding);
    }
}
