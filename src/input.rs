// Input helpers: email validation and redemption-code normalization.
// Both functions are pure and total so the interactive flow can call
// them on anything the user types without worrying about failures.

use once_cell::sync::Lazy;
use regex::Regex;

/// Syntactic email check: `local@domain.tld` where the local part allows
/// letters, digits and `. _ % + -`, the domain contains at least one dot,
/// and the final label is two or more letters. No DNS or mailbox lookup.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// Returns whether `email` looks like a plausible address. The whole
/// string must match; embedded whitespace, a second `@` or a missing
/// TLD label all yield `false`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Normalize a redemption code into its canonical display form.
///
/// All non-alphanumeric characters are stripped and the rest uppercased.
/// A cleaned length of exactly 12 is regrouped as `XXXX-XXXX-XXXX`; any
/// other length is returned cleaned but otherwise untouched (no padding,
/// no truncation). Idempotent: dashes added here are stripped again on
/// a second pass before regrouping.
pub fn normalize_code(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.len() == 12 {
        format!("{}-{}-{}", &cleaned[..4], &cleaned[4..8], &cleaned[8..])
    } else {
        cleaned
    }
}
