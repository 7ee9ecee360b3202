//! Header region detection.
//!
//! A header row is expected to look like "all strings" once its fields are
//! classified, while data rows don't. Each sampled row is scored against a
//! synthetic all-`String` row and the run of best scoring rows closest to the
//! data is taken as the header.
use std::fmt;

use tracing::debug;

use crate::datatype::TypeTag;
use crate::similarity::slice_similarity;

/// Row range holding the header, 0-based and inclusive.
///
/// Both ends are `None` when no header was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderExtents {
    pub first: Option<usize>,
    pub last: Option<usize>,
}

impl HeaderExtents {
    pub const NONE: HeaderExtents = HeaderExtents {
        first: None,
        last: None,
    };

    pub const fn new(first: usize, last: usize) -> Self {
        HeaderExtents {
            first: Some(first),
            last: Some(last),
        }
    }

    pub const fn is_none(&self) -> bool {
        self.first.is_none() || self.last.is_none()
    }

    /// Extents as signed indices, with -1 meaning "no header".
    pub fn as_signed(&self) -> (i64, i64) {
        let to_signed = |v: Option<usize>| v.map(|v| v as i64).unwrap_or(-1);
        (to_signed(self.first), to_signed(self.last))
    }
}

impl fmt::Display for HeaderExtents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.first, self.last) {
            (Some(first), Some(last)) => write!(f, "[{first}, {last}]"),
            _ => write!(f, "none"),
        }
    }
}

/// Find the header rows among the type vectors of sampled rows.
///
/// Returns `HeaderExtents::NONE` when the best scoring row is the last
/// sampled row, since there would be no data left below the header.
pub fn detect_header_extents(rows: &[Vec<TypeTag>]) -> HeaderExtents {
    let num_cols = rows.iter().map(|row| row.len()).max().unwrap_or(0);
    if rows.is_empty() || num_cols == 0 {
        return HeaderExtents::NONE;
    }

    let all_strings = vec![TypeTag::String; num_cols];
    let scores: Vec<f64> = rows
        .iter()
        .map(|row| slice_similarity(row, &all_strings))
        .collect();

    let max_score = scores.iter().copied().fold(f64::MIN, f64::max);

    // Last row reaching the best score.
    let last = match scores.iter().rposition(|s| *s == max_score) {
        Some(last) => last,
        None => return HeaderExtents::NONE,
    };

    if last == rows.len() - 1 {
        debug!(max_score, "best header candidate is the last sampled row, no header detected");
        return HeaderExtents::NONE;
    }

    // Extend upwards while the preceding rows score just as well.
    let mut first = last;
    while first > 0 && scores[first - 1] == max_score {
        first -= 1;
    }

    debug!(first, last, max_score, "detected header rows");

    HeaderExtents::new(first, last)
}
