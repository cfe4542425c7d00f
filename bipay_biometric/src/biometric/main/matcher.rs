//! Prefix-similarity matching.
//!
//! This is the demo matcher: it compares a short pattern taken from the head of
//! each template and scores it by shared prefix length. It is not minutiae
//! matching and must not be used as an authentication factor.

use rand::Rng;

const PATTERN_PREFIX_CHARS: usize = 20;
const PERTURBATION: f64 = 0.05;

/// Extract the comparison key from template data.
///
/// With an underscore present, this is the first two `_`-separated segments
/// joined by `_`; otherwise it is the first 20 characters.
pub fn extract_pattern(template_data: &str) -> String {
    if template_data.contains('_') {
        let mut segments = template_data.split('_');
        let first = segments.next().unwrap_or_default();
        let second = segments.next().unwrap_or_default();
        format!("{first}_{second}")
    } else {
        template_data.chars().take(PATTERN_PREFIX_CHARS).collect()
    }
}

/// Length in characters of the longest common prefix of `a` and `b`.
pub fn longest_common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

/// Similarity before perturbation: 1.0 for identical patterns, otherwise
/// `2 * lcp / (len(a) + len(b))`.
pub fn raw_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let total = a.chars().count() + b.chars().count();
    (2 * longest_common_prefix_len(a, b)) as f64 / total as f64
}

/// Score two patterns. Non-identical patterns get uniform noise in
/// `[-0.05, 0.05)` and the result is clamped to `[0, 1]`.
pub(crate) fn calculate_similarity<R: Rng + ?Sized>(a: &str, b: &str, rng: &mut R) -> f64 {
    if a == b {
        return 1.0;
    }
    let variance = rng.gen_range(-PERTURBATION..PERTURBATION);
    (raw_similarity(a, b) + variance).clamp(0.0, 1.0)
}
