//! Chirp profanity filter.

/// Words replaced in chirp bodies.
pub const BANNED_WORDS: &[&str] = &["kerfuffle", "sharbert", "fornax"];

/// Replacement for a banned word.
pub const MASK: &str = "****";

/// Result of censoring a chirp body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Censored {
    /// Cleaned body.
    pub text: String,
    /// Whether any word was replaced.
    pub was_censored: bool,
}

/// Replace banned words in `body` with [`MASK`].
///
/// The body is split on single spaces and each piece compared
/// case-insensitively. Punctuation attached to a word keeps it from
/// matching, so `Sharbert!` survives.
///
/// # Examples
///
/// ```
/// use chirpy::profanity::{censor, BANNED_WORDS};
///
/// let out = censor("what a Kerfuffle today", BANNED_WORDS);
/// assert_eq!(out.text, "what a **** today");
/// assert!(out.was_censored);
/// ```
pub fn censor(body: &str, banned: &[&str]) -> Censored {
    let mut was_censored = false;
    let words: Vec<&str> = body
        .split(' ')
        .map(|word| {
            if banned.iter().any(|b| b.eq_ignore_ascii_case(word)) {
                was_censored = true;
                MASK
            } else {
                word
            }
        })
        .collect();

    Censored {
        text: words.join(" "),
        was_censored,
    }
}
