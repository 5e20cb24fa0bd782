//! Text normalization and query matching.
//!
//! Normalization lower-cases, trims, and optionally folds Turkish letters to
//! their Latin base so that `"Yıldız"` and `"yildiz"` compare equal. The
//! [`TextMatcher`] decides whether a query matches a target string in either
//! strict-substring or fuzzy-subsequence mode.

/// Normalizes text for comparison: trim, lowercase, and — when `turkish` is
/// set — fold ç/ğ/ı/ö/ş/ü (and their uppercase forms, including the dotted
/// and dotless I) to their closest Latin base letter.
///
/// Pure and total; applying it twice yields the same string as applying it
/// once.
pub fn normalize(text: &str, turkish: bool) -> String {
    let trimmed = text.trim();
    if !turkish {
        return trimmed.to_lowercase();
    }

    trimmed
        .chars()
        .flat_map(|c| {
            let folded = match c {
                'ç' | 'Ç' => 'c',
                'ğ' | 'Ğ' => 'g',
                'ı' | 'I' | 'İ' => 'i',
                'ö' | 'Ö' => 'o',
                'ş' | 'Ş' => 's',
                'ü' | 'Ü' => 'u',
                other => other,
            };
            folded.to_lowercase()
        })
        .collect()
}

/// Decides whether a query matches a target string.
///
/// In substring mode the normalized target must contain the normalized
/// query contiguously. In fuzzy mode the query's characters only need to
/// appear in the target in order — `"ayd"` matches `"ahmet yıldız"`. The
/// empty query matches everything in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextMatcher {
    /// Use fuzzy subsequence matching instead of substring containment.
    pub fuzzy: bool,
    /// Fold Turkish characters during normalization.
    pub turkish: bool,
}

impl TextMatcher {
    /// Creates a matcher with the given modes.
    pub fn new(fuzzy: bool, turkish: bool) -> Self {
        TextMatcher { fuzzy, turkish }
    }

    /// Normalizes text according to this matcher's Turkish mode.
    pub fn normalize(&self, text: &str) -> String {
        normalize(text, self.turkish)
    }

    /// Returns `true` if the query matches the target.
    pub fn matches(&self, query: &str, target: &str) -> bool {
        let query = self.normalize(query);
        if query.is_empty() {
            return true;
        }
        let target = self.normalize(target);

        if self.fuzzy {
            is_subsequence(&query, &target)
        } else {
            target.contains(&query)
        }
    }
}

/// Single forward walk: advance the query cursor whenever the current
/// target character matches it; the query matches iff the cursor reaches
/// the end.
fn is_subsequence(query: &str, target: &str) -> bool {
    let mut pending = query.chars().peekable();
    for c in target.chars() {
        if pending.peek() == Some(&c) {
            pending.next();
        }
        if pending.peek().is_none() {
            return true;
        }
    }
    pending.peek().is_none()
}

/// Normalizes text with Turkish folding on.
///
/// Utility export for UI pieces (e.g. match highlighting) that need the
/// same normalization the engine applies.
pub fn normalize_text(text: &str) -> String {
    normalize(text, true)
}

/// Fuzzy-matches a query against a target with Turkish folding on.
pub fn fuzzy_match(query: &str, target: &str) -> bool {
    TextMatcher::new(true, true).matches(query, target)
}
