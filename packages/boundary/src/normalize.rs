//! District name normalization.
//!
//! Report-origin district names and boundary-file district names come from
//! independently maintained sources, so both sides are reduced to a shared
//! normalized key before comparison. Two names denote the same district iff
//! their normalized forms are equal, by contract rather than ad hoc string
//! comparison at call sites.

use regex::Regex;
use std::sync::LazyLock;

/// Regex to strip punctuation characters that do not contribute to
/// district name matching.
static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.,#'’`/\\\-()]+").expect("valid regex"));

/// Honorific suffixes stripped from the end of district names. Many
/// barangays are named after people ("Barangay A. Santos Sr.") and the
/// suffix spelling varies between name lists.
const HONORIFIC_SUFFIXES: &[&str] = &["sr", "jr"];

/// Normalizes a district name into its matching key.
///
/// The pipeline:
/// 1. Lowercase
/// 2. Fold diacritics (ñ→n, é→e, ...)
/// 3. Strip punctuation (`.`, `,`, `#`, `'`, `/`, `\`, `-`, parens)
/// 4. Drop trailing honorific suffixes ("sr", "jr")
/// 5. Collapse whitespace and trim
#[must_use]
pub fn normalize_name(input: &str) -> String {
    let folded: String = input.chars().flat_map(fold_char).collect();
    let no_punct = PUNCTUATION_RE.replace_all(&folded, " ");

    let mut tokens: Vec<&str> = no_punct.split_whitespace().collect();
    while tokens.last().is_some_and(|t| HONORIFIC_SUFFIXES.contains(t)) {
        tokens.pop();
    }

    tokens.join(" ")
}

fn fold_char(c: char) -> impl Iterator<Item = char> {
    c.to_lowercase().map(fold_diacritic)
}

/// Maps accented Latin characters common in Filipino and Spanish-derived
/// place names to their ASCII base letter.
const fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_collapses_whitespace() {
        assert_eq!(normalize_name("  San   Isidro "), "san isidro");
    }

    #[test]
    fn strips_punctuation() {
        assert_eq!(normalize_name("Sto. Niño"), "sto nino");
    }

    #[test]
    fn folds_diacritics() {
        assert_eq!(normalize_name("Peñafrancia"), "penafrancia");
        assert_eq!(normalize_name("Penafrancia"), "penafrancia");
    }

    #[test]
    fn strips_trailing_honorifics() {
        assert_eq!(normalize_name("A. Santos Sr."), "a santos");
        assert_eq!(normalize_name("A. Santos Jr"), "a santos");
        assert_eq!(
            normalize_name("Barangay San Isidro Jr."),
            normalize_name("barangay  san isidro jr")
        );
    }

    #[test]
    fn keeps_interior_honorific_tokens() {
        // "Jr" mid-name is part of the name, not a suffix.
        assert_eq!(normalize_name("Jr Borja Street"), "jr borja street");
    }

    #[test]
    fn independently_sourced_spellings_share_a_key() {
        assert_eq!(
            normalize_name("BAGONG SILANGAN"),
            normalize_name("Bagong  Silangan")
        );
    }
}
