/// Default number of term occurrences kept in an excerpt.
pub const DEFAULT_MAX_OCCURRENCES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    /// Document text from the start through the end of the last kept occurrence.
    pub text: String,
    /// Length in chars of every segment produced by the split, in order.
    pub block_lengths: Vec<usize>,
}

/// Splits `full_text` on up to `max_occurrences` literal occurrences of `term` and keeps
/// everything before the trailing segment, with the term put back after each kept segment.
///
/// When the term never occurs there is a single segment and the excerpt is empty.
pub fn extract(full_text: &str, term: &str, max_occurrences: usize) -> Excerpt {
    let segments: Vec<&str> = if term.is_empty() {
        vec![full_text]
    } else {
        full_text
            .splitn(max_occurrences.saturating_add(1), term)
            .collect()
    };

    let block_lengths = segments.iter().map(|s| s.chars().count()).collect();

    let kept = &segments[..segments.len() - 1];
    let mut text = String::with_capacity(kept.iter().map(|s| s.len() + term.len()).sum());
    for segment in kept {
        text.push_str(segment);
        text.push_str(term);
    }

    Excerpt {
        text,
        block_lengths,
    }
}

/// Counts non-overlapping literal occurrences of `term`.
pub fn count_occurrences(text: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }
    text.matches(term).count()
}
