//! Sequence points of Portable PDB `MethodDebugInformation` rows.
//!
//! A sequence points blob maps IL offsets of one method to source locations. It starts with a
//! small header, followed by delta encoded records:
//!
//! ```text
//! Blob   ::= header record (record | document-record)*
//! header ::= LocalSignature [InitialDocument]
//! record ::= δILOffset ΔLines ΔColumns [δStartLine δStartColumn]
//! ```
//!
//! - `InitialDocument` is only present if the row itself does not name a document.
//! - A `δILOffset` of 0 after the first record introduces a document-record, switching the
//!   document of all following points.
//! - `ΔLines == 0 && ΔColumns == 0` marks a hidden point, which carries no start position.
//! - The start position of the first visible point is absolute, later ones are signed deltas
//!   relative to the previous visible point.
//!
//! # Examples
//!
//! ```rust
//! use pdbcompare::metadata::sequencepoints::parse_sequence_points;
//!
//! // no locals, document 1, il 0: line 10 col 2 to line 10 col 7
//! let blob = [0x00, 0x01, 0x00, 0x00, 0x05, 0x0A, 0x02];
//! let points = parse_sequence_points(&blob, 0)?;
//! assert_eq!(points.0.len(), 1);
//! assert_eq!(points.0[0].document, 1);
//! assert_eq!((points.0[0].start_line, points.0[0].end_column), (10, 7));
//! # Ok::<(), pdbcompare::Error>(())
//! ```
//!
//! # References
//!
//! - [PortablePDB Spec](https://github.com/dotnet/runtime/blob/main/docs/design/specs/PortablePdb-Metadata.md#sequence-points)

use crate::{file::parser::Parser, Result};

/// Line number of hidden sequence points
pub const HIDDEN_LINE: u32 = 0x00FE_EFEE;

/// Largest valid line number
const MAX_LINE: i64 = 0x2000_0000 - 1;

/// Largest valid column number
const MAX_COLUMN: i64 = 0x1_0000 - 1;

/// A single mapping from an IL offset to a source location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePoint {
    /// Offset in the method's IL stream
    pub il_offset: u32,
    /// `Document` row of the source file
    pub document: u32,
    /// Starting line, [`HIDDEN_LINE`] for hidden points
    pub start_line: u32,
    /// Starting column
    pub start_column: u32,
    /// Ending line
    pub end_line: u32,
    /// Ending column
    pub end_column: u32,
    /// True if this point hides the instructions from the debugger
    pub is_hidden: bool,
}

/// The sequence points of one method, in blob order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequencePoints(pub Vec<SequencePoint>);

impl SequencePoints {
    /// Returns the sequence point for a given IL offset, if any.
    #[must_use]
    pub fn find_by_il_offset(&self, il_offset: u32) -> Option<&SequencePoint> {
        self.0.iter().find(|sp| sp.il_offset == il_offset)
    }
}

fn checked_position(previous: u32, delta: i32, max: i64, what: &str) -> Result<u32> {
    let value = i64::from(previous) + i64::from(delta);
    if !(0..=max).contains(&value) {
        return Err(malformed_error!(
            "Sequence point {} out of range - {} + {}",
            what,
            previous,
            delta
        ));
    }

    u32::try_from(value).map_err(|_| malformed_error!("Sequence point {} out of range", what))
}

/// Parses a sequence points blob.
///
/// `document` is the `Document` column of the owning `MethodDebugInformation` row; when it is 0
/// the initial document is read from the blob header.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] on truncated blobs, [`crate::Error::Malformed`] if
/// offsets do not increase or a position leaves the valid range.
pub fn parse_sequence_points(blob: &[u8], document: u32) -> Result<SequencePoints> {
    let mut parser = Parser::new(blob);
    let mut points = Vec::new();

    if blob.is_empty() {
        return Ok(SequencePoints(points));
    }

    let _local_signature = parser.read_compressed_uint()?;
    let mut current_document = if document == 0 {
        parser.read_compressed_uint()?
    } else {
        document
    };

    let mut il_offset = 0u32;
    let mut previous_visible: Option<(u32, u32)> = None;
    let mut first = true;

    while parser.has_more_data() {
        let il_delta = parser.read_compressed_uint()?;
        if !first && il_delta == 0 {
            current_document = parser.read_compressed_uint()?;
            continue;
        }

        il_offset = if first {
            il_delta
        } else {
            il_offset
                .checked_add(il_delta)
                .ok_or_else(|| malformed_error!("Sequence point IL offset overflow"))?
        };
        first = false;

        let delta_lines = parser.read_compressed_uint()?;
        let delta_columns = if delta_lines == 0 {
            i64::from(parser.read_compressed_uint()?)
        } else {
            i64::from(parser.read_compressed_int()?)
        };

        if delta_lines == 0 && delta_columns == 0 {
            points.push(SequencePoint {
                il_offset,
                document: current_document,
                start_line: HIDDEN_LINE,
                start_column: 0,
                end_line: HIDDEN_LINE,
                end_column: 0,
                is_hidden: true,
            });
            continue;
        }

        let (start_line, start_column) = match previous_visible {
            None => (
                parser.read_compressed_uint()?,
                parser.read_compressed_uint()?,
            ),
            Some((line, column)) => (
                checked_position(line, parser.read_compressed_int()?, MAX_LINE, "line")?,
                checked_position(column, parser.read_compressed_int()?, MAX_COLUMN, "column")?,
            ),
        };
        previous_visible = Some((start_line, start_column));

        let end_line = i64::from(start_line) + i64::from(delta_lines);
        let end_column = i64::from(start_column) + delta_columns;
        if end_line > MAX_LINE || !(0..=MAX_COLUMN).contains(&end_column) {
            return Err(malformed_error!(
                "Sequence point end out of range - {}:{}",
                end_line,
                end_column
            ));
        }

        points.push(SequencePoint {
            il_offset,
            document: current_document,
            start_line,
            start_column,
            end_line: u32::try_from(end_line)
                .map_err(|_| malformed_error!("Sequence point end line out of range"))?,
            end_column: u32::try_from(end_column)
                .map_err(|_| malformed_error!("Sequence point end column out of range"))?,
            is_hidden: false,
        });
    }

    Ok(SequencePoints(points))
}
