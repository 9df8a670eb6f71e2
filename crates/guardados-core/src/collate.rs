//! Spanish locale-aware string ordering.
//!
//! Approximates a Spanish collator at the levels the topic vocabulary
//! needs:
//!
//! 1. Primary: case and accents ignored, `ñ` sorted as its own letter
//!    between `n` and `o`.
//! 2. Secondary: lower-cased form with accents kept (`cafe` < `café`).
//! 3. Final: raw string comparison, so the ordering is total.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

const COMBINING_TILDE: char = '\u{0303}';

/// Compare two strings the way a Spanish, case-insensitive collator would.
pub fn spanish_cmp(a: &str, b: &str) -> Ordering {
    primary_weights(a)
        .cmp(&primary_weights(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

fn primary_weights(s: &str) -> Vec<u32> {
    let mut weights = Vec::with_capacity(s.len());
    let mut chars = s.to_lowercase().nfd().collect::<Vec<char>>().into_iter().peekable();
    while let Some(c) = chars.next() {
        if ('\u{0300}'..='\u{036f}').contains(&c) {
            continue;
        }
        if c == 'n' && chars.peek() == Some(&COMBINING_TILDE) {
            chars.next();
            weights.push(('n' as u32) * 2 + 1);
            continue;
        }
        weights.push((c as u32) * 2);
    }
    weights
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut xs: Vec<&str>) -> Vec<&str> {
        xs.sort_by(|a, b| spanish_cmp(a, b));
        xs
    }

    #[test]
    fn test_case_insensitive_primary() {
        assert_eq!(sorted(vec!["bici", "Arte", "cultura"]), vec!["Arte", "bici", "cultura"]);
    }

    #[test]
    fn test_accents_ignored_at_primary_level() {
        assert_eq!(sorted(vec!["Ópera", "noche", "ocio"]), vec!["noche", "ocio", "Ópera"]);
    }

    #[test]
    fn test_enye_sorts_after_n() {
        assert_eq!(sorted(vec!["ñu", "oca", "nube"]), vec!["nube", "ñu", "oca"]);
        assert_eq!(sorted(vec!["caña", "cana", "capa"]), vec!["cana", "caña", "capa"]);
    }

    #[test]
    fn test_unaccented_before_accented() {
        assert_eq!(spanish_cmp("cafe", "café"), Ordering::Less);
    }

    #[test]
    fn test_total_order() {
        assert_eq!(spanish_cmp("Salud", "Salud"), Ordering::Equal);
        assert_ne!(spanish_cmp("Salud", "salud"), Ordering::Equal);
    }
}
