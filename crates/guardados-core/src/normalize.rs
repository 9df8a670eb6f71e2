//! Topic normalization and tag extraction.
//!
//! [`normalize`] maps a free-text tag to its comparison key: lower-case,
//! canonically decomposed (NFD) with combining diacritical marks
//! (U+0300–U+036F) removed, then trimmed. `"Política"`, `"POLITICA"` and
//! `"politica"` all share the key `"politica"`.
//!
//! Normalization is pure. Memoization lives behind the [`Normalizer`]
//! trait so callers choose between [`PureNormalizer`] (no state) and a
//! [`NormalizationCache`] they own and may clear at any time.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Default number of cached keys before the cache is cleared.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Shortest tag kept by [`TagPolicy::Filtered`], in characters.
pub const MIN_TAG_CHARS: usize = 3;

/// Spanish function words dropped by [`TagPolicy::Filtered`].
///
/// Stored as normalized keys (lower-case, no accents).
const STOPWORDS: &[&str] = &[
    // articles
    "el", "la", "los", "las", "un", "una", "unos", "unas", "lo", "al", "del",
    // prepositions
    "a", "ante", "bajo", "cabe", "con", "contra", "de", "desde", "durante", "en", "entre",
    "hacia", "hasta", "mediante", "para", "por", "segun", "sin", "so", "sobre", "tras",
    // conjunctions
    "y", "e", "ni", "o", "u", "pero", "sino", "mas", "aunque", "porque", "pues", "que",
    "si", "como", "cuando", "donde", "mientras",
    // pronouns
    "yo", "tu", "ella", "ello", "nosotros", "nosotras", "vosotros", "vosotras", "ellos",
    "ellas", "usted", "ustedes", "me", "te", "se", "nos", "os", "le", "les", "mi", "mis",
    "tus", "su", "sus", "nuestro", "nuestra", "nuestros", "nuestras", "vuestro", "vuestra",
    "cual", "cuales", "quien", "quienes", "cuyo", "cuya",
    // demonstratives
    "este", "esta", "estos", "estas", "ese", "esa", "esos", "esas", "aquel", "aquella",
    "aquellos", "aquellas", "esto", "eso", "aquello",
    // adverbs
    "no", "ya", "muy", "menos", "tambien", "tampoco", "bien", "mal", "aqui", "alli", "ahi",
    "hoy", "ayer", "siempre", "nunca", "solo", "casi", "tan", "tanto", "asi", "luego",
    "despues", "antes", "todavia", "aun",
    // auxiliary and common verbs
    "ser", "es", "son", "era", "eran", "fue", "fueron", "sea", "estar", "estan", "estaba",
    "ha", "han", "has", "he", "hay", "habia", "haber", "tener", "tiene", "tienen", "hacer",
    "hace", "puede", "pueden", "va", "van",
];

/// Compute the comparison key for a topic.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_diacritic(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Whether a normalized key is a Spanish stopword.
pub fn is_stopword(key: &str) -> bool {
    STOPWORDS.contains(&key)
}

/// Which tokens of a topic string become tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagPolicy {
    /// Every non-empty whitespace-separated token.
    #[default]
    All,
    /// Also drop tokens under [`MIN_TAG_CHARS`] characters and stopwords.
    Filtered,
}

impl fmt::Display for TagPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagPolicy::All => f.write_str("all"),
            TagPolicy::Filtered => f.write_str("filtered"),
        }
    }
}

impl FromStr for TagPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(TagPolicy::All),
            "filtered" => Ok(TagPolicy::Filtered),
            other => anyhow::bail!("Unknown tag policy: '{}'. Use all or filtered.", other),
        }
    }
}

/// Split a raw topic string into tags.
///
/// Splits on runs of whitespace and drops empty pieces. Under
/// [`TagPolicy::Filtered`], short tokens and stopwords are dropped here,
/// so they never reach grouping, counting, or the topic vocabulary.
pub fn extract_tags(topic_string: &str, policy: TagPolicy) -> Vec<String> {
    topic_string
        .split_whitespace()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .filter(|tag| match policy {
            TagPolicy::All => true,
            TagPolicy::Filtered => {
                tag.chars().count() >= MIN_TAG_CHARS && !is_stopword(&normalize(tag))
            }
        })
        .map(str::to_string)
        .collect()
}

/// Source of normalized keys used by the pipeline.
pub trait Normalizer {
    /// Return the comparison key for `raw`. Must agree with [`normalize`].
    fn normalize_key(&mut self, raw: &str) -> String;
}

/// Stateless normalizer: every call recomputes the key.
#[derive(Debug, Clone, Copy, Default)]
pub struct PureNormalizer;

impl Normalizer for PureNormalizer {
    fn normalize_key(&mut self, raw: &str) -> String {
        normalize(raw)
    }
}

/// Memoizing normalizer keyed by the exact raw string.
///
/// Two raw strings that normalize identically get separate entries. When
/// inserting would exceed `capacity`, the whole map is cleared first;
/// keys are always recomputable, so a clear never changes results.
#[derive(Debug, Clone)]
pub struct NormalizationCache {
    entries: HashMap<String, String>,
    capacity: usize,
}

impl NormalizationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for NormalizationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl Normalizer for NormalizationCache {
    fn normalize_key(&mut self, raw: &str) -> String {
        if let Some(key) = self.entries.get(raw) {
            return key.clone();
        }
        if self.entries.len() >= self.capacity {
            tracing::debug!(capacity = self.capacity, "normalization cache full, clearing");
            self.entries.clear();
        }
        let key = normalize(raw);
        self.entries.insert(raw.to_string(), key.clone());
        key
    }
}
