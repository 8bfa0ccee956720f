//! Pipe-delimited ECF filings: record model, block index and rewriting

mod parser;
mod record;
mod rewriter;
mod separator;

pub use parser::{
    extract_period, parse, parse_document, BlockRange, BlockRanges, BlockTracker, ParsedFiling, COMPUTATION_CLOSE,
    COMPUTATION_OPEN, SUMMARY_CLOSE, SUMMARY_OPEN,
};
pub use record::{FilingDocument, FilingLine, LINE_TERMINATOR};
pub use rewriter::{rewrite, shift_ranges_after, AdjustmentDescriptor, FilingRewriter};
pub use separator::detect_decimal_separator;
