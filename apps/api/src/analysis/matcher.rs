//! Skill Matcher — whole-word, case-insensitive catalog lookup over extracted text.
//!
//! Every catalog entry is compiled into one `RegexSet`, so a document is scanned once
//! regardless of catalog size. A match needs a non-word character (or the text edge)
//! on both sides of the entry: `go` does not fire inside `going`, while `c++` still
//! fires in `c++ developer`. Multi-word entries must match as a whole phrase.

use std::collections::BTreeSet;

use regex::RegexSet;

pub struct SkillMatcher {
    patterns: RegexSet,
    /// Title-cased display names, index-aligned with `patterns`.
    titles: Vec<String>,
}

impl SkillMatcher {
    pub fn new<S: AsRef<str>>(catalog: &[S]) -> Result<Self, regex::Error> {
        let patterns = RegexSet::new(
            catalog
                .iter()
                .map(|skill| format!(r"(?i)(?:^|\W){}(?:\W|$)", regex::escape(skill.as_ref()))),
        )?;
        let titles = catalog.iter().map(|s| title_case(s.as_ref())).collect();
        Ok(Self { patterns, titles })
    }

    /// Returns the title-cased names of every catalog skill found in `text`,
    /// deduplicated and sorted lexicographically.
    pub fn find_skills(&self, text: &str) -> Vec<String> {
        self.patterns
            .matches(text)
            .into_iter()
            .map(|i| self.titles[i].clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Uppercases each letter that follows a non-letter and lowercases the rest.
/// `scikit-learn` → `Scikit-Learn`, `machine learning` → `Machine Learning`, `c#` → `C#`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}
