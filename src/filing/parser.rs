//! Period index of a filing's summary (`M`) and computation (`N`) blocks

use std::collections::BTreeMap;

use log::debug;

use super::record::{FilingDocument, FilingLine};
use super::separator::detect_decimal_separator;
use crate::money::DecimalSeparator;
use crate::period::PeriodKey;

pub const SUMMARY_OPEN: &str = "M010";
pub const SUMMARY_CLOSE: &str = "M990";
pub const COMPUTATION_OPEN: &str = "N030";
pub const COMPUTATION_CLOSE: &str = "N990";

/// Inclusive line span of one block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub start: usize,
    pub end: usize,
}

impl BlockRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Block ranges of one family, keyed by period
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockRanges {
    ranges: BTreeMap<PeriodKey, BlockRange>,
}

impl BlockRanges {
    pub fn get(&self, period: PeriodKey) -> Option<BlockRange> {
        self.ranges.get(&period).copied()
    }

    /// Record a block; a later block for the same period replaces the earlier one
    pub fn insert(&mut self, period: PeriodKey, range: BlockRange) {
        self.ranges.insert(period, range);
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Move every range starting after `point` down by `count` lines
    pub fn shift_after(&mut self, point: usize, count: usize) {
        for range in self.ranges.values_mut() {
            if range.start > point {
                range.start += count;
                range.end += count;
            }
        }
    }
}

/// Open-block tracker for one block family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockTracker {
    #[default]
    Closed,
    Open { period: PeriodKey, start: usize },
}

impl BlockTracker {
    /// An opening record was seen. Without a recognisable period the block is
    /// not tracked.
    pub fn open(&mut self, period: Option<PeriodKey>, start: usize) {
        *self = match period {
            Some(period) => BlockTracker::Open { period, start },
            None => BlockTracker::Closed,
        };
    }

    /// A closing record was seen; returns the completed block, if one was open
    pub fn close(&mut self, end: usize) -> Option<(PeriodKey, BlockRange)> {
        match std::mem::take(self) {
            BlockTracker::Open { period, start } => Some((period, BlockRange::new(start, end))),
            BlockTracker::Closed => None,
        }
    }
}

/// A filing with its block index and number format
#[derive(Debug, Clone)]
pub struct ParsedFiling {
    pub document: FilingDocument,
    pub summary_ranges: BlockRanges,
    pub computation_ranges: BlockRanges,
    pub separator: DecimalSeparator,
}

/// Period key of a block-opening record: the first of fields 2 to 7 that reads
/// `ANUAL` or `1T`..`4T`
pub fn extract_period(line: &FilingLine) -> Option<PeriodKey> {
    line.fields()
        .iter()
        .take(8)
        .skip(2)
        .find_map(|field| PeriodKey::from_token(field))
}

/// Parse raw filing text into its block index
pub fn parse(text: &str) -> ParsedFiling {
    parse_document(FilingDocument::from_text(text))
}

/// Index an already split document
pub fn parse_document(document: FilingDocument) -> ParsedFiling {
    let mut summary_ranges = BlockRanges::default();
    let mut computation_ranges = BlockRanges::default();
    let mut summary = BlockTracker::Closed;
    let mut computation = BlockTracker::Closed;

    for (index, line) in document.lines().iter().enumerate() {
        match line.record_type() {
            Some(SUMMARY_OPEN) => summary.open(extract_period(line), index),
            Some(SUMMARY_CLOSE) => {
                if let Some((period, range)) = summary.close(index) {
                    summary_ranges.insert(period, range);
                }
            }
            Some(COMPUTATION_OPEN) => computation.open(extract_period(line), index),
            Some(COMPUTATION_CLOSE) => {
                if let Some((period, range)) = computation.close(index) {
                    computation_ranges.insert(period, range);
                }
            }
            _ => {}
        }
    }

    if let BlockTracker::Open { period, start } = summary {
        debug!("Dropping unterminated {} block for {} at line {}", SUMMARY_OPEN, period, start);
    }
    if let BlockTracker::Open { period, start } = computation {
        debug!("Dropping unterminated {} block for {} at line {}", COMPUTATION_OPEN, period, start);
    }

    let separator = detect_decimal_separator(document.lines());

    ParsedFiling {
        document,
        summary_ranges,
        computation_ranges,
        separator,
    }
}
