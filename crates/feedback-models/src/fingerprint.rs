//! Review content fingerprinting.

use sha2::{Digest, Sha256};

/// Digests review content into a stable hex fingerprint.
///
/// The input is `"{stars}|{text}"` with an absent rating rendered as the
/// empty string and the text trimmed, so a review edit that only adds
/// surrounding whitespace does not count as a change.
pub fn review_fingerprint(stars: Option<u8>, text: Option<&str>) -> String {
    let stars = stars.map(|s| s.to_string()).unwrap_or_default();
    let text = text.map(str::trim).unwrap_or("");

    let mut hasher = Sha256::new();
    hasher.update(stars.as_bytes());
    hasher.update(b"|");
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_for_identical_content() {
        assert_eq!(
            review_fingerprint(Some(5), Some("great!")),
            review_fingerprint(Some(5), Some("great!"))
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(
            review_fingerprint(Some(5), Some("  great!  ")),
            review_fingerprint(Some(5), Some("great!"))
        );
    }

    #[test]
    fn stars_change_the_fingerprint() {
        assert_ne!(
            review_fingerprint(Some(5), Some("great!")),
            review_fingerprint(Some(4), Some("great!"))
        );
    }

    #[test]
    fn text_changes_the_fingerprint() {
        assert_ne!(
            review_fingerprint(Some(5), Some("great!")),
            review_fingerprint(Some(5), Some("fine"))
        );
    }

    #[test]
    fn absent_parts_render_empty() {
        assert_eq!(
            review_fingerprint(None, None),
            review_fingerprint(None, Some("   "))
        );
        assert_ne!(review_fingerprint(None, None), review_fingerprint(Some(5), None));
    }

    #[test]
    fn fingerprint_is_sha256_hex() {
        let fp = review_fingerprint(Some(5), Some("great!"));
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
