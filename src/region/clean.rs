//! Marker stripping.

use super::token::TAG;

/// Remove every bracketed marker or annotation token and trim the result.
///
/// Removal repeats until no token is left, so joining the text around a
/// removed token can never leave a new token behind. Characters that are not
/// part of a token, including a lone `<` or `>`, are kept as they are.
///
/// # Example
/// ```
/// use solsplit::region::clean;
///
/// assert_eq!(clean("  <sub_id = 1>foo<sub_id end> "), "foo");
/// assert_eq!(clean("a < b"), "a < b");
/// ```
pub fn clean(text: &str) -> String {
    let mut current = text.to_string();
    while TAG.is_match(&current) {
        current = TAG.replace_all(&current, "").into_owned();
    }
    current.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_sub_id_markers() {
        assert_eq!(clean("<sub_id = 1>foo<sub_id end>"), "foo");
    }

    #[test]
    fn test_clean_preserves_operators() {
        assert_eq!(clean("if a < b and c > d"), "if a < b and c > d");
        assert_eq!(clean("x<5"), "x<5");
    }

    #[test]
    fn test_clean_nested_tokens() {
        // Removing the inner token joins "<s" and "ub_id end>" into a new token.
        assert_eq!(clean("<s<x>ub_id end>tail"), "tail");
    }

    #[test]
    fn test_clean_trims() {
        assert_eq!(clean("  \n<note> text \t"), "text");
        assert_eq!(clean("<sol_end>"), "");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let samples = [
            "<sub_id = 1>foo<sub_id end>",
            "a < b",
            "<s<x>ub_id end>tail",
            "  spaced  ",
            "<<a>b>c",
            "",
        ];
        for sample in samples {
            let once = clean(sample);
            assert_eq!(clean(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
