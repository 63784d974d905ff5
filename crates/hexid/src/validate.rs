use crate::HexId;

/// Reports whether `candidate` is a syntactically well-formed canonical id.
///
/// True iff the string is exactly 20 characters and every character is a
/// digit or a lowercase letter. This is the historical acceptance rule for
/// the canonical no-tag form; it does not interpret the content (use
/// [`HexId::decode`] for a strict parse) and it does not cover the
/// 24-character tagged variant.
///
/// # Example
///
/// ```
/// use hexid::is_valid;
///
/// assert!(is_valid("00000001000001000000"));
/// assert!(!is_valid("00000001000001"));
/// assert!(!is_valid("00000001000001BADBAD"));
/// ```
pub fn is_valid(candidate: &str) -> bool {
    candidate.len() == HexId::ENCODED_LEN
        && candidate
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_ids() {
        assert!(is_valid("00000001000001000000"));
        assert!(is_valid("05f5e100abcdef000001"));
        // The historical rule accepts any lowercase letter, not only a-f.
        assert!(is_valid("zzzzzzzzzzzzzzzzzzzz"));
    }

    #[test]
    fn rejects_wrong_lengths() {
        assert!(!is_valid(""));
        assert!(!is_valid("0000000100000100000")); // 19
        assert!(!is_valid("000000010000010000000")); // 21
        assert!(!is_valid("00000001000001beef000000")); // tagged form
    }

    #[test]
    fn rejects_bad_characters() {
        assert!(!is_valid("00000001000001BADBAD"));
        assert!(!is_valid("00000001-00001000000"));
        assert!(!is_valid("00000001 00001000000"));
        assert!(!is_valid("0000000100000100000\u{e9}"));
    }
}
