//! Standard breadboard layout
//!
//! Row tokens and column ranges of the full-size board that hole snapping
//! produces labels for: two power rails on top, two five-row main blocks, two
//! power rails on the bottom. Used to diagnose hole labels at the request
//! boundary; canonicalization does not depend on it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Holes per rail row.
pub const RAIL_COLUMNS: u32 = 50;
/// Holes per main-area row.
pub const MAIN_COLUMNS: u32 = 63;

/// A physical row of the board, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardRow {
    UpperMinus,
    UpperPlus,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    LowerPlus,
    LowerMinus,
}

impl BoardRow {
    pub const ALL: [BoardRow; 14] = [
        BoardRow::UpperMinus,
        BoardRow::UpperPlus,
        BoardRow::A,
        BoardRow::B,
        BoardRow::C,
        BoardRow::D,
        BoardRow::E,
        BoardRow::F,
        BoardRow::G,
        BoardRow::H,
        BoardRow::I,
        BoardRow::J,
        BoardRow::LowerPlus,
        BoardRow::LowerMinus,
    ];

    /// Label prefix used for holes in this row.
    pub fn token(self) -> &'static str {
        match self {
            BoardRow::UpperMinus => "U-",
            BoardRow::UpperPlus => "U+",
            BoardRow::A => "A",
            BoardRow::B => "B",
            BoardRow::C => "C",
            BoardRow::D => "D",
            BoardRow::E => "E",
            BoardRow::F => "F",
            BoardRow::G => "G",
            BoardRow::H => "H",
            BoardRow::I => "I",
            BoardRow::J => "J",
            BoardRow::LowerPlus => "L+",
            BoardRow::LowerMinus => "L-",
        }
    }

    pub fn is_rail(self) -> bool {
        matches!(
            self,
            BoardRow::UpperMinus | BoardRow::UpperPlus | BoardRow::LowerPlus | BoardRow::LowerMinus
        )
    }

    pub fn columns(self) -> u32 {
        if self.is_rail() {
            RAIL_COLUMNS
        } else {
            MAIN_COLUMNS
        }
    }

    /// Longest row token that prefixes `label`, with the remainder.
    fn split_label(label: &str) -> Option<(BoardRow, &str)> {
        // Rail tokens are two characters and must win over any one-letter row.
        let mut rows = Self::ALL;
        rows.sort_by_key(|r| std::cmp::Reverse(r.token().len()));
        rows.into_iter()
            .find_map(|row| label.strip_prefix(row.token()).map(|rest| (row, rest)))
    }
}

impl std::fmt::Display for BoardRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HoleLabelError {
    #[error("empty hole label")]
    Empty,

    #[error("unknown board row in hole label '{0}'")]
    UnknownRow(String),

    #[error("hole label '{0}' has no valid column number")]
    BadColumn(String),

    #[error("column {column} is out of range for row {row} (0..{limit})")]
    ColumnOutOfRange { row: BoardRow, column: u32, limit: u32 },
}

/// A hole label split into row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoleLabel {
    pub row: BoardRow,
    pub column: u32,
}

impl HoleLabel {
    /// Parse a label such as `"C12"` or `"U+7"`.
    ///
    /// Columns are zero-based.
    pub fn parse(label: &str) -> Result<Self, HoleLabelError> {
        if label.is_empty() {
            return Err(HoleLabelError::Empty);
        }
        let (row, rest) = BoardRow::split_label(label)
            .ok_or_else(|| HoleLabelError::UnknownRow(label.to_string()))?;

        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HoleLabelError::BadColumn(label.to_string()));
        }
        let column: u32 = rest
            .parse()
            .map_err(|_| HoleLabelError::BadColumn(label.to_string()))?;

        let limit = row.columns();
        if column >= limit {
            return Err(HoleLabelError::ColumnOutOfRange { row, column, limit });
        }

        Ok(Self { row, column })
    }
}

impl std::fmt::Display for HoleLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.row, self.column)
    }
}
