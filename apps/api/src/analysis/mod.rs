// Résumé analysis pipeline: PDF text extraction, skill matching, result composition.
// Handlers own upload validation and scratch-file lifetime; everything below is synchronous.

pub mod catalog;
pub mod composer;
pub mod extractor;
pub mod handlers;
pub mod matcher;
pub mod scratch;

use std::path::Path;

use crate::analysis::composer::{compose, AnalysisOutcome};
use crate::analysis::extractor::extract_text;
use crate::analysis::matcher::SkillMatcher;
use crate::errors::AppError;

/// Runs extract → match → compose over the PDF at `path`.
pub fn analyze_file(path: &Path, matcher: &SkillMatcher) -> Result<AnalysisOutcome, AppError> {
    let text = extract_text(path)?;
    let skills = matcher.find_skills(&text);
    Ok(compose(skills))
}
