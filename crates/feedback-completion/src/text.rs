//! Reply text shaping.

/// Truncates text to at most `limit` characters without splitting a
/// word.
///
/// Text that already fits is returned unchanged. Otherwise the cut
/// happens at the last whitespace inside the limit (the whitespace
/// itself is dropped), or hard at the limit when the leading run has no
/// whitespace at all. Characters are counted, not bytes, since that is
/// what the marketplace's reply-length limit counts.
pub fn truncate_at_word(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }

    let prefix: String = text.chars().take(limit).collect();
    match prefix.rfind(|c: char| c.is_whitespace()) {
        Some(cut) => prefix[..cut].to_string(),
        None => prefix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_unchanged() {
        assert_eq!(truncate_at_word("thank you", 700), "thank you");
    }

    #[test]
    fn text_exactly_at_limit_is_unchanged() {
        assert_eq!(truncate_at_word("12345", 5), "12345");
    }

    #[test]
    fn surrounding_whitespace_survives_when_text_fits() {
        assert_eq!(truncate_at_word("  hi  ", 10), "  hi  ");
    }

    #[test]
    fn cuts_at_word_boundary() {
        assert_eq!(truncate_at_word("thank you kindly", 11), "thank you");
    }

    #[test]
    fn never_splits_a_word() {
        let result = truncate_at_word("thanks again friend", 12);
        assert_eq!(result, "thanks");
        assert!(result.chars().count() <= 12);
    }

    #[test]
    fn hard_cut_without_whitespace() {
        assert_eq!(truncate_at_word("abcdefghij", 4), "abcd");
    }

    #[test]
    fn counts_characters_not_bytes() {
        // Each of these is multiple bytes but one character.
        assert_eq!(truncate_at_word("ドメイン", 4), "ドメイン");
        assert_eq!(truncate_at_word("ドメインメモ", 4), "ドメイン");
        assert_eq!(truncate_at_word("ドメ イン", 3), "ドメ");
    }

    #[test]
    fn result_never_exceeds_limit() {
        let text = "one two three four five six seven eight nine ten";
        for limit in 0..text.len() + 2 {
            assert!(truncate_at_word(text, limit).chars().count() <= limit);
        }
    }

    #[test]
    fn zero_limit_yields_empty() {
        assert_eq!(truncate_at_word("anything", 0), "");
        assert_eq!(truncate_at_word("", 0), "");
    }
}
