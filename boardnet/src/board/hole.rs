//! Hole canonicalization.
//!
//! Maps a physical hole label to the electrical bus it belongs to. In the main
//! area every hole of rows `A`-`E` that shares a column number sits on the same
//! metal strip, and likewise for rows `F`-`J`. Rail contacts (`U+`, `L-`, ...)
//! run the whole length of the board, so the two-character rail token is the
//! bus.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A physical hole label as produced by hole snapping, e.g. `"C12"` or `"U+7"`.
///
/// Opaque and case-sensitive.
pub type PhysicalHole = String;

/// First row letter of the upper main-area block.
const UPPER_BLOCK_START: u8 = b'A';
/// First row letter of the lower main-area block.
const LOWER_BLOCK_START: u8 = b'F';
/// One past the last row letter of the lower block.
const LOWER_BLOCK_END: u8 = b'K';

/// Canonical representative of a set of holes that are always electrically
/// identical by breadboard construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElectricalBus(String);

impl ElectricalBus {
    /// Wrap an already-canonical bus label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The sentinel bus for an empty hole label.
    ///
    /// Every empty label aliases onto this bus.
    pub fn sentinel() -> Self {
        Self(String::new())
    }

    pub fn is_sentinel(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElectricalBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ElectricalBus {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Map a physical hole label to its electrical bus.
///
/// Total and deterministic: depends on the label alone.
///
/// - `A`..`E` prefix: bus is `"A" + rest`
/// - `F`..`J` prefix: bus is `"F" + rest`
/// - anything else: the first two characters, verbatim
/// - empty label: [`ElectricalBus::sentinel`]
///
/// Labels outside the standard board grammar (a lone character, a non-letter
/// prefix) fall into the passthrough arm and get whatever their first two
/// characters are. Callers that care should check the label with
/// [`HoleLabel::parse`](super::layout::HoleLabel::parse) first.
pub fn canonicalize(hole: &str) -> ElectricalBus {
    let Some(first) = hole.chars().next() else {
        return ElectricalBus::sentinel();
    };
    let rest = &hole[first.len_utf8()..];

    if first.is_ascii() {
        let b = first as u8;
        if (UPPER_BLOCK_START..LOWER_BLOCK_START).contains(&b) {
            return ElectricalBus(format!("{}{}", UPPER_BLOCK_START as char, rest));
        }
        if (LOWER_BLOCK_START..LOWER_BLOCK_END).contains(&b) {
            return ElectricalBus(format!("{}{}", LOWER_BLOCK_START as char, rest));
        }
    }

    ElectricalBus(hole.chars().take(2).collect())
}
