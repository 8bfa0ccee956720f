//! Applies period adjustments to a parsed filing and recomputes its trailers

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::parser::{BlockRanges, ParsedFiling};
use super::record::{FilingDocument, FilingLine};
use crate::benefit::AdjustmentPeriod;
use crate::money::{format_amount, DecimalSeparator};

pub const IRPJ_COMPUTATION: &str = "N630";
pub const CSLL_COMPUTATION: &str = "N670";
pub const IRPJ_ADJUSTMENT: &str = "M410";
pub const CSLL_ADJUSTMENT: &str = "M510";
pub const ADJUSTMENT_MARKER: &str = "|M415|";

/// Lines added to the summary block per adjustment
const INSERTED_PER_ADJUSTMENT: usize = 2;

/// Code and description written into the inserted adjustment records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentDescriptor {
    pub irpj_code: String,
    pub csll_code: String,
    pub description: String,
}

/// Shift both range families after an insertion of `count` lines at `point`
pub fn shift_ranges_after(summary: &mut BlockRanges, computation: &mut BlockRanges, point: usize, count: usize) {
    summary.shift_after(point, count);
    computation.shift_after(point, count);
}

/// Owns one filing for the duration of a rewrite
pub struct FilingRewriter {
    document: FilingDocument,
    summary_ranges: BlockRanges,
    computation_ranges: BlockRanges,
    separator: DecimalSeparator,
}

impl FilingRewriter {
    pub fn new(parsed: ParsedFiling) -> Self {
        Self {
            document: parsed.document,
            summary_ranges: parsed.summary_ranges,
            computation_ranges: parsed.computation_ranges,
            separator: parsed.separator,
        }
    }

    pub fn document(&self) -> &FilingDocument {
        &self.document
    }

    pub fn summary_ranges(&self) -> &BlockRanges {
        &self.summary_ranges
    }

    pub fn computation_ranges(&self) -> &BlockRanges {
        &self.computation_ranges
    }

    fn amount(&self, value: f64) -> String {
        format_amount(value, self.separator)
    }

    /// Patch the computation block of the adjustment's period and insert the
    /// adjustment records into its summary block. Periods the filing does not
    /// contain are skipped.
    pub fn apply_adjustment(&mut self, adjustment: &AdjustmentPeriod, descriptor: &AdjustmentDescriptor) {
        let period = adjustment.period;

        match self.computation_ranges.get(period) {
            Some(range) => self.patch_computation(range.indices(), adjustment),
            None => debug!("No computation block for period {}", period),
        }

        let Some(range) = self.summary_ranges.get(period) else {
            debug!("No summary block for period {}", period);
            return;
        };

        let insert_at = range
            .indices()
            .find(|&i| self.document.get(i).is_some_and(|l| l.starts_with(ADJUSTMENT_MARKER)))
            .unwrap_or(range.end);

        let loss = self.amount(adjustment.generated_loss);
        let records = vec![
            FilingLine::record(
                IRPJ_ADJUSTMENT,
                [descriptor.irpj_code.as_str(), descriptor.description.as_str(), loss.as_str()],
            ),
            FilingLine::record(
                CSLL_ADJUSTMENT,
                [descriptor.csll_code.as_str(), descriptor.description.as_str(), loss.as_str()],
            ),
        ];
        self.document.insert_lines(insert_at, records);
        trace!("Inserted adjustment records for {} at line {}", period, insert_at);

        shift_ranges_after(
            &mut self.summary_ranges,
            &mut self.computation_ranges,
            insert_at,
            INSERTED_PER_ADJUSTMENT,
        );
    }

    fn patch_computation(&mut self, indices: std::ops::RangeInclusive<usize>, adjustment: &AdjustmentPeriod) {
        let irpj_base = self.amount(adjustment.irpj_base);
        let irpj_flat = self.amount(adjustment.irpj_flat);
        let irpj_surtax = self.amount(adjustment.irpj_surtax);
        let csll_base = self.amount(adjustment.csll_base);
        let csll_total = self.amount(adjustment.csll_total);

        for index in indices {
            let Some(line) = self.document.get_mut(index) else {
                break;
            };
            let value = match (line.record_type(), line.field(2)) {
                (Some(IRPJ_COMPUTATION), Some("1")) => &irpj_base,
                (Some(IRPJ_COMPUTATION), Some("3")) => &irpj_flat,
                (Some(IRPJ_COMPUTATION), Some("4")) => &irpj_surtax,
                (Some(CSLL_COMPUTATION), Some("1")) => &csll_base,
                (Some(CSLL_COMPUTATION), Some("2")) => &csll_total,
                _ => continue,
            };
            line.set_field(4, value.clone());
        }
    }

    /// Rewrite the `0990`, `M990`, `9990` and `9999` counters from the records
    /// seen so far, dropping everything after `9999`
    pub fn recompute_trailers(&mut self) {
        let mut counts = TrailerCounts::default();
        let mut terminator = None;

        for (index, line) in self.document.iter_mut().enumerate() {
            let Some(record_type) = line.counted_type() else {
                continue;
            };
            counts.record(&record_type);

            match record_type.as_str() {
                "0990" => *line = FilingLine::record("0990", [counts.zero.to_string()]),
                "M990" => *line = FilingLine::record("M990", [counts.summary.to_string()]),
                "9990" => *line = FilingLine::record("9990", [counts.closing.to_string()]),
                "9999" => {
                    *line = FilingLine::record("9999", [counts.total.to_string()]);
                    terminator = Some(index);
                    break;
                }
                _ => {}
            }
        }

        if let Some(index) = terminator {
            self.document.truncate_after(index);
        }
    }

    pub fn into_document(self) -> FilingDocument {
        self.document
    }
}

#[derive(Debug, Default)]
struct TrailerCounts {
    zero: usize,
    summary: usize,
    closing: usize,
    total: usize,
}

impl TrailerCounts {
    fn record(&mut self, record_type: &str) {
        self.total += 1;
        match record_type.chars().next() {
            Some('0') => self.zero += 1,
            Some('M') => self.summary += 1,
            Some('9') => self.closing += 1,
            _ => {}
        }
    }
}

/// Apply `adjustments` in order, then recompute the trailers
pub fn rewrite(parsed: ParsedFiling, adjustments: &[AdjustmentPeriod], descriptor: &AdjustmentDescriptor) -> FilingDocument {
    let mut rewriter = FilingRewriter::new(parsed);
    for adjustment in adjustments {
        rewriter.apply_adjustment(adjustment, descriptor);
    }
    rewriter.recompute_trailers();
    rewriter.into_document()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filing::parser::{parse, BlockRange};
    use crate::period::{AssessmentMethod, PeriodKey};

    fn descriptor() -> AdjustmentDescriptor {
        AdjustmentDescriptor {
            irpj_code: "900".to_string(),
            csll_code: "901".to_string(),
            description: "Perda por Evaporação".to_string(),
        }
    }

    fn adjustment(period: PeriodKey) -> AdjustmentPeriod {
        AdjustmentPeriod {
            fiscal_year: 2022,
            method: AssessmentMethod::Quarterly,
            period,
            generated_loss: 30.0,
            irpj_base: 5000.0,
            irpj_flat: 750.0,
            irpj_surtax: 0.0,
            csll_base: 5000.0,
            csll_total: 450.0,
        }
    }

    fn text_lines(doc: &FilingDocument) -> Vec<String> {
        doc.lines().iter().map(|l| l.to_string()).collect()
    }

    const QUARTER_FILING: &str = "|0000|LECF|0010|2022|\r\n\
|0010|X|\r\n\
|0990|99|\r\n\
|M001|0|\r\n\
|M010|01012022|31032022|1T|\r\n\
|M300|1|LUCRO|10000,00|\r\n\
|M350|1|LUCRO|10000,00|\r\n\
|M415|1|X|\r\n\
|M990|99|\r\n\
|N001|0|\r\n\
|N030|01012022|31032022|1T|\r\n\
|N630|1|BASE|10000,00|\r\n\
|N630|2|OUTRO|1,00|\r\n\
|N630|3|IRPJ 15|1500,00|\r\n\
|N630|4|ADICIONAL|0,00|\r\n\
|N670|1|BASE CSLL|10000,00|\r\n\
|N670|2|CSLL|900,00|\r\n\
|N990|99|\r\n\
|9990|99|\r\n\
|9999|99|\r\n";

    #[test]
    fn test_end_to_end_single_quarter() {
        let parsed = parse(QUARTER_FILING);
        assert_eq!(parsed.document.len(), 20);

        let doc = rewrite(parsed, &[adjustment(PeriodKey::Q1)], &descriptor());
        let lines = text_lines(&doc);

        assert_eq!(lines.len(), 22);
        assert_eq!(lines[7], "|M410|900|Perda por Evaporação|30,00|");
        assert_eq!(lines[8], "|M510|901|Perda por Evaporação|30,00|");
        assert_eq!(lines[9], "|M415|1|X|");
        assert_eq!(lines[13], "|N630|1|BASE|5000,00|");
        assert_eq!(lines[14], "|N630|2|OUTRO|1,00|");
        assert_eq!(lines[15], "|N630|3|IRPJ 15|750,00|");
        assert_eq!(lines[16], "|N630|4|ADICIONAL|0,00|");
        assert_eq!(lines[17], "|N670|1|BASE CSLL|5000,00|");
        assert_eq!(lines[18], "|N670|2|CSLL|450,00|");

        assert_eq!(lines[2], "|0990|3|");
        assert_eq!(lines[10], "|M990|8|");
        assert_eq!(lines[20], "|9990|1|");
        assert_eq!(lines[21], "|9999|22|");
    }

    #[test]
    fn test_insert_at_block_end_without_marker() {
        let text = "|M010|1T|\n|M300|1|X|10,00|\n|M990|0|\n|9999|0|";
        let doc = rewrite(parse(text), &[adjustment(PeriodKey::Q1)], &descriptor());

        assert_eq!(
            text_lines(&doc),
            vec![
                "|M010|1T|",
                "|M300|1|X|10,00|",
                "|M410|900|Perda por Evaporação|30,00|",
                "|M510|901|Perda por Evaporação|30,00|",
                "|M990|5|",
                "|9999|6|",
            ]
        );
    }

    #[test]
    fn test_zero_adjustments_only_touch_trailers() {
        let parsed = parse(QUARTER_FILING);
        let original = text_lines(&parsed.document);
        let lines = text_lines(&rewrite(parsed, &[], &descriptor()));

        assert_eq!(lines.len(), original.len());
        for (index, (before, after)) in original.iter().zip(&lines).enumerate() {
            match index {
                2 => assert_eq!(after, "|0990|3|"),
                8 => assert_eq!(after, "|M990|6|"),
                18 => assert_eq!(after, "|9990|1|"),
                19 => assert_eq!(after, "|9999|20|"),
                _ => assert_eq!(before, after),
            }
        }
    }

    #[test]
    fn test_offset_invariant_across_periods() {
        let text = "|M010|1T|\n|M990|\n|N030|1T|\n|N990|\n|M010|2T|\n|M990|\n|N030|2T|\n|N630|1|B|1,00|\n|N990|\n|9999|";
        let mut rewriter = FilingRewriter::new(parse(text));
        let q2_summary = rewriter.summary_ranges().get(PeriodKey::Q2).unwrap();
        let q2_computation = rewriter.computation_ranges().get(PeriodKey::Q2).unwrap();

        rewriter.apply_adjustment(&adjustment(PeriodKey::Q1), &descriptor());

        assert_eq!(rewriter.summary_ranges().get(PeriodKey::Q1), Some(BlockRange::new(0, 1)));
        assert_eq!(
            rewriter.summary_ranges().get(PeriodKey::Q2),
            Some(BlockRange::new(q2_summary.start + 2, q2_summary.end + 2))
        );
        assert_eq!(
            rewriter.computation_ranges().get(PeriodKey::Q2),
            Some(BlockRange::new(q2_computation.start + 2, q2_computation.end + 2))
        );

        rewriter.apply_adjustment(&adjustment(PeriodKey::Q2), &descriptor());
        let lines = text_lines(rewriter.document());
        assert_eq!(lines[7], "|M410|900|Perda por Evaporação|30,00|");
        assert_eq!(lines[9], "|M990|");
        assert_eq!(lines[11], "|N630|1|B|5000,00|");
    }

    #[test]
    fn test_missing_period_is_skipped() {
        let parsed = parse(QUARTER_FILING);
        let doc = rewrite(parsed, &[adjustment(PeriodKey::Q3)], &descriptor());
        assert_eq!(doc.len(), 20);
        assert!(!text_lines(&doc).iter().any(|l| l.starts_with("|M410|")));
    }

    #[test]
    fn test_summary_block_without_computation_block() {
        let text = "|M010|1T|\n|M300|1|X|10,00|\n|M990|\n|N030|2T|\n|N630|1|B|1,00|\n|N990|\n|9999|";
        let mut rewriter = FilingRewriter::new(parse(text));
        rewriter.apply_adjustment(&adjustment(PeriodKey::Q1), &descriptor());

        assert_eq!(
            text_lines(rewriter.document()),
            vec![
                "|M010|1T|",
                "|M300|1|X|10,00|",
                "|M410|900|Perda por Evaporação|30,00|",
                "|M510|901|Perda por Evaporação|30,00|",
                "|M990|",
                "|N030|2T|",
                "|N630|1|B|1,00|",
                "|N990|",
                "|9999|",
            ]
        );
    }

    #[test]
    fn test_dot_separator_and_non_finite_values() {
        let text = "|M010|ANUAL|\n|M990|\n|N030|ANUAL|\n|N630|1|B|1.00|\n|N630|3|I|1.00|\n|N990|\n|9999|";
        let mut adj = adjustment(PeriodKey::Annual);
        adj.irpj_base = f64::NAN;
        adj.irpj_flat = 12.5;

        let lines = text_lines(&rewrite(parse(text), &[adj], &descriptor()));
        assert_eq!(lines[1], "|M410|900|Perda por Evaporação|30.00|");
        assert_eq!(lines[5], "|N630|1|B|0.00|");
        assert_eq!(lines[6], "|N630|3|I|12.50|");
    }

    #[test]
    fn test_content_after_terminator_is_dropped() {
        let text = "|0000|X|\n|0990|0|\nfree text\n|9999|0|\n|9999|0|\ntrailing";
        let lines = text_lines(&rewrite(parse(text), &[], &descriptor()));
        assert_eq!(lines, vec!["|0000|X|", "|0990|2|", "free text", "|9999|3|"]);
    }
}
