//! Dense bin sequences: gap filling over sparse grouped counts.
//!
//! The grouped-count query omits bins with no matching records, but the
//! caller's contract is one fully dense array. [`DenseBins`] walks the
//! sparse results once and injects zero-count fillers for every skipped
//! index, then keeps emitting trailing fillers until the advisory total
//! is reached.

use serde::{Deserialize, Serialize};

use super::planner::GroupSpec;

/// One histogram bin: a half-open interval `[bin_start, bin_end)` plus the
/// count of records whose field value falls inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bin {
    /// Zero-based sequential index, unique and gapless across the output.
    pub bin_idx: usize,
    /// Inclusive lower bound, in the field's native unit.
    pub bin_start: i64,
    /// Exclusive upper bound. Absent only for the final custom filler bin,
    /// which represents "bin_start and above".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_end: Option<i64>,
    pub count: u64,
}

/// Expand sparse grouped counts into a dense, index-ordered bin sequence.
///
/// `sparse` must be ordered by ascending `bin_idx`, as the grouped-count
/// query guarantees. The result is a finite, single-pass iterator; callers
/// materialize it once.
pub fn fill_missing_bins(sparse: Vec<Bin>, spec: &GroupSpec, total_bins: usize) -> DenseBins<'_> {
    DenseBins {
        sparse: sparse.into_iter(),
        pending: None,
        spec,
        cursor: 0,
        total_bins,
    }
}

/// Iterator produced by [`fill_missing_bins`].
pub struct DenseBins<'a> {
    sparse: std::vec::IntoIter<Bin>,
    pending: Option<Bin>,
    spec: &'a GroupSpec,
    cursor: usize,
    total_bins: usize,
}

impl DenseBins<'_> {
    fn filler(&self, idx: usize) -> Bin {
        match self.spec {
            GroupSpec::Even { bin_size } => {
                let bin_start = idx as i64 * bin_size;
                Bin {
                    bin_idx: idx,
                    bin_start,
                    bin_end: Some(bin_start + bin_size),
                    count: 0,
                }
            }
            GroupSpec::Custom { breaks, .. } => Bin {
                bin_idx: idx,
                // Indices past the breakpoint list never occur for
                // well-formed input; the total equals the break count.
                bin_start: breaks.get(idx).copied().unwrap_or_default(),
                bin_end: breaks.get(idx + 1).copied(),
                count: 0,
            },
        }
    }
}

impl Iterator for DenseBins<'_> {
    type Item = Bin;

    fn next(&mut self) -> Option<Bin> {
        let Some(bin) = self.pending.take().or_else(|| self.sparse.next()) else {
            // Sparse input exhausted; trailing fillers up to the total.
            if self.cursor < self.total_bins {
                let filler = self.filler(self.cursor);
                self.cursor += 1;
                return Some(filler);
            }
            return None;
        };

        if bin.bin_idx > self.cursor {
            self.pending = Some(bin);
            let filler = self.filler(self.cursor);
            self.cursor += 1;
            Some(filler)
        } else {
            self.cursor = self.cursor.max(bin.bin_idx) + 1;
            Some(bin)
        }
    }
}
