//! Runs the parse-rewrite cycle over every filing of a request

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::request::{FilingSource, RectificationRequest};
use super::store::FilingStore;
use crate::benefit::AdjustmentPeriod;
use crate::error::{RectifierError, Result};
use crate::filing::{parse, rewrite, AdjustmentDescriptor};

/// Amended filing of one fiscal year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RectifiedFiling {
    pub fiscal_year: i32,
    pub file_name: String,
    pub contents: String,
}

pub fn rectified_file_name(fiscal_year: i32) -> String {
    format!("{}-RETIFICADORA.txt", fiscal_year)
}

/// Rewrite one filing's text with the given adjustments
pub fn rectify_filing(text: &str, adjustments: &[AdjustmentPeriod], descriptor: &AdjustmentDescriptor) -> String {
    rewrite(parse(text), adjustments, descriptor).to_text()
}

/// Rectify every filing of `request` that has adjustments for its fiscal year.
///
/// Filings that cannot be fetched or have no adjustments are skipped. Fails
/// with [`RectifierError::NothingToProcess`] when no filing was rectified.
pub fn run_batch<S: FilingStore>(request: &RectificationRequest, store: &S) -> Result<Vec<RectifiedFiling>> {
    let descriptor = request.descriptor();
    info!(
        "Rectifying {} filing(s) for company {}",
        request.files.len(),
        request.company_id
    );

    let outputs: Vec<RectifiedFiling> = request
        .files
        .par_iter()
        .filter_map(|source| rectify_source(source, request, store, &descriptor))
        .collect();

    if outputs.is_empty() {
        return Err(RectifierError::NothingToProcess);
    }
    info!("Rectified {} filing(s)", outputs.len());
    Ok(outputs)
}

fn rectify_source<S: FilingStore>(
    source: &FilingSource,
    request: &RectificationRequest,
    store: &S,
    descriptor: &AdjustmentDescriptor,
) -> Option<RectifiedFiling> {
    let adjustments = request.adjustments_for(source.fiscal_year);
    if adjustments.is_empty() {
        info!("No adjustments for fiscal year {}, skipping", source.fiscal_year);
        return None;
    }

    let bytes = match store.fetch(&source.file_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Skipping fiscal year {}: {}", source.fiscal_year, e);
            return None;
        }
    };
    let text = String::from_utf8_lossy(&bytes);

    info!(
        "Fiscal year {}: applying {} adjustment(s) to {}",
        source.fiscal_year,
        adjustments.len(),
        source.file_path
    );
    Some(RectifiedFiling {
        fiscal_year: source.fiscal_year,
        file_name: rectified_file_name(source.fiscal_year),
        contents: rectify_filing(&text, &adjustments, descriptor),
    })
}

/// Write each output under `dir`, returning the written paths
pub fn write_outputs(dir: &Path, outputs: &[RectifiedFiling]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    outputs
        .iter()
        .map(|output| -> Result<PathBuf> {
            let path = dir.join(&output.file_name);
            fs::write(&path, &output.contents)?;
            Ok(path)
        })
        .collect()
}
