//! Marker tokenizer.
//!
//! Splits block text into marker tokens and plain text spans. The grammar:
//!
//! | Token | Form |
//! |---|---|
//! | region start | `<sol_start id=N>` |
//! | region end | `<sol_end>` |
//! | sub-id open | `<sub_id = N>` |
//! | sub-id close | `<sub_id end>` |
//!
//! `N` is a run of ASCII digits. Whitespace around `=` and before `>` is
//! tolerated. A bracketed token whose name begins like a marker but does not
//! fit the grammar is [`Token::Malformed`]; any other `<name ...>` token is an
//! [`Token::Annotation`].

use once_cell::sync::Lazy;
use regex::Regex;

/// Any bracketed token: `<` followed by a letter, `_` or `/`, up to the next `>`.
pub(crate) static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<([A-Za-z_/][^<>]*)>").unwrap());

static START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^sol_start\s+id\s*=\s*([0-9]+)\s*$").unwrap());
static END: Lazy<Regex> = Lazy::new(|| Regex::new(r"^sol_end\s*$").unwrap());
static SUB_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^sub_id\s*=\s*([0-9]+)\s*$").unwrap());
static SUB_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^sub_id\s+end\s*$").unwrap());

const MARKER_NAMES: [&str; 3] = ["sol_start", "sol_end", "sub_id"];

/// A token of block text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// `<sol_start id=N>`
    StartRegion(&'a str),
    /// `<sol_end>`
    EndRegion,
    /// `<sub_id = N>`
    SubIdOpen(&'a str),
    /// `<sub_id end>`
    SubIdClose,
    /// Marker-like token outside the grammar
    Malformed(&'a str),
    /// Any other bracketed token
    Annotation(&'a str),
    /// Plain text between tokens
    Text(&'a str),
}

impl Token<'_> {
    /// Check if this token opens or closes a region.
    pub fn is_region_marker(&self) -> bool {
        matches!(self, Token::StartRegion(_) | Token::EndRegion)
    }

    /// Check if this token is any kind of marker, well-formed or not.
    pub fn is_marker(&self) -> bool {
        matches!(
            self,
            Token::StartRegion(_)
                | Token::EndRegion
                | Token::SubIdOpen(_)
                | Token::SubIdClose
                | Token::Malformed(_)
        )
    }
}

/// Split text into tokens, in order. Empty text spans are not emitted.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in TAG.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            tokens.push(Token::Text(&text[last..whole.start()]));
        }
        tokens.push(classify(whole.as_str(), inner.as_str()));
        last = whole.end();
    }

    if last < text.len() {
        tokens.push(Token::Text(&text[last..]));
    }
    tokens
}

/// Classify a bracketed token given its full text and the part inside `<` `>`.
fn classify<'a>(raw: &'a str, inner: &'a str) -> Token<'a> {
    if let Some(id) = START.captures(inner).and_then(|c| c.get(1)) {
        return Token::StartRegion(id.as_str());
    }
    if END.is_match(inner) {
        return Token::EndRegion;
    }
    if let Some(id) = SUB_OPEN.captures(inner).and_then(|c| c.get(1)) {
        return Token::SubIdOpen(id.as_str());
    }
    if SUB_CLOSE.is_match(inner) {
        return Token::SubIdClose;
    }
    if MARKER_NAMES.iter().any(|name| inner.starts_with(name)) {
        Token::Malformed(raw)
    } else {
        Token::Annotation(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_markers() {
        assert_eq!(
            tokenize("<sol_start id=7>Text A<sol_end>"),
            vec![
                Token::StartRegion("7"),
                Token::Text("Text A"),
                Token::EndRegion
            ]
        );
    }

    #[test]
    fn test_whitespace_tolerance() {
        assert_eq!(
            tokenize("<sol_start  id = 12 >"),
            vec![Token::StartRegion("12")]
        );
        assert_eq!(tokenize("<sol_end >"), vec![Token::EndRegion]);
        assert_eq!(tokenize("<sub_id=3>"), vec![Token::SubIdOpen("3")]);
        assert_eq!(tokenize("<sub_id = 3 >"), vec![Token::SubIdOpen("3")]);
        assert_eq!(tokenize("<sub_id  end>"), vec![Token::SubIdClose]);
    }

    #[test]
    fn test_malformed_markers() {
        assert_eq!(
            tokenize("<sol_start id=abc>"),
            vec![Token::Malformed("<sol_start id=abc>")]
        );
        assert_eq!(
            tokenize("<sol_start>"),
            vec![Token::Malformed("<sol_start>")]
        );
        assert_eq!(
            tokenize("<sol_end now>"),
            vec![Token::Malformed("<sol_end now>")]
        );
        assert!(Token::Malformed("x").is_marker());
        assert!(!Token::Malformed("x").is_region_marker());
    }

    #[test]
    fn test_annotations_and_math() {
        assert_eq!(
            tokenize("a < b and <b>bold</b>"),
            vec![
                Token::Text("a < b and "),
                Token::Annotation("<b>"),
                Token::Text("bold"),
                Token::Annotation("</b>")
            ]
        );
        assert_eq!(tokenize("x<5 and y>3"), vec![Token::Text("x<5 and y>3")]);
    }

    #[test]
    fn test_empty_text() {
        assert!(tokenize("").is_empty());
    }
}
