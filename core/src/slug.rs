use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ToolkitError;
use crate::types::Tools;

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug pattern"));

/// Lower-cases `s`, collapses every run of non `[a-z0-9]` characters into one
/// hyphen, and trims hyphens from both ends.
pub fn slugify(s: &str) -> Result<String, ToolkitError> {
    if s.is_empty() {
        return Err(ToolkitError::EmptyInput);
    }

    let lowered = s.to_lowercase();
    let slug = NON_ALPHANUMERIC.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        return Err(ToolkitError::EmptySlugResult);
    }

    Ok(slug.to_string())
}

impl Tools {
    pub fn slugify(&self, s: &str) -> Result<String, ToolkitError> {
        slugify(s)
    }
}
