//! Packed source locations
//!
//! Every token and instruction carries a single `u32` that encodes both the
//! originating file and the line inside it: `(file_id << 24) | line`. This lets
//! diagnostics recover the file of an imported source without a side table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoded `(file id, line number)` pair
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SourceLine(u32);

impl SourceLine {
    /// Bit offset of the file id
    pub const FILE_SHIFT: u32 = 24;

    /// Mask selecting the line number
    pub const LINE_MASK: u32 = (1 << Self::FILE_SHIFT) - 1;

    /// Highest file id that fits into the encoding
    pub const MAX_FILE_ID: u32 = u8::MAX as u32;

    /// Encode a file id and a line number.
    ///
    /// Line numbers beyond 2^24 - 1 saturate; file ids are truncated to 8 bits.
    pub fn new(file_id: u32, line: u32) -> Self {
        let file = (file_id & Self::MAX_FILE_ID) << Self::FILE_SHIFT;
        SourceLine(file | line.min(Self::LINE_MASK))
    }

    /// Rebuild from the raw packed value
    pub fn from_raw(raw: u32) -> Self {
        SourceLine(raw)
    }

    /// The raw packed value
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Id of the file this line belongs to
    pub fn file_id(self) -> u32 {
        self.0 >> Self::FILE_SHIFT
    }

    /// 1-based line number inside the file
    pub fn line(self) -> u32 {
        self.0 & Self::LINE_MASK
    }

    /// Same file, next line
    pub fn next_line(self) -> Self {
        SourceLine::new(self.file_id(), self.line() + 1)
    }
}

impl fmt::Display for SourceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file_id() == 0 {
            write!(f, "{}", self.line())
        } else {
            write!(f, "{}#{}", self.file_id(), self.line())
        }
    }
}
