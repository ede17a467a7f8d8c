//! Heuristics for reading spoken Spanish answers.
//!
//! Transcripts arrive as free text from the speech recognizer, so these
//! helpers match loosely: keywords are searched as whole words and phone
//! numbers are rebuilt from whatever digits were recognized.

use super::session::Role;

/// Words accepted as an affirmative answer at the confirmation step
const YES_MARKERS: &[&str] = &[
    " sí ",
    " si ",
    " correcto ",
    " vale ",
    " de acuerdo ",
    " afirmativo ",
];

/// Words accepted as a negative answer at the confirmation step
const NO_MARKERS: &[&str] = &[" no ", " negativo ", " no quiero ", " no gracias "];

/// Minimum number of digits for a Spanish phone number
const MIN_PHONE_DIGITS: usize = 9;

/// Spain's international dialing prefix
const SPAIN_PREFIX: &str = "34";

pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Normalize and replace punctuation with spaces, padded so every word is
/// surrounded by a space on both sides.
fn padded_words(s: &str) -> String {
    let cleaned: String = normalize(s)
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    format!(" {} ", cleaned)
}

/// Rebuild a dialable phone number from a transcript.
///
/// Nine bare digits are treated as a national number and get `+34`; numbers
/// already carrying the `34` prefix get a `+`; numbers starting with `0` are
/// returned as dialed.
pub fn extract_phone(s: &str) -> Option<String> {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < MIN_PHONE_DIGITS {
        return None;
    }

    if digits.starts_with(SPAIN_PREFIX) && digits.len() >= MIN_PHONE_DIGITS + 2 {
        return Some(format!("+{}", digits));
    }
    if digits.starts_with('0') {
        return Some(digits);
    }
    if digits.len() == MIN_PHONE_DIGITS {
        return Some(format!("+{}{}", SPAIN_PREFIX, digits));
    }
    Some(format!("+{}", digits))
}

pub fn looks_yes(s: &str) -> bool {
    let padded = padded_words(s);
    YES_MARKERS.iter().any(|m| padded.contains(m))
}

pub fn looks_no(s: &str) -> bool {
    let padded = padded_words(s);
    NO_MARKERS.iter().any(|m| padded.contains(m))
}

pub fn role_from_text(s: &str) -> Option<Role> {
    let s = normalize(s);
    let owner_word = s
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word.starts_with("propiet"));

    if owner_word || s.contains("dueñ") {
        return Some(Role::Owner);
    }
    if s.contains("inquil") || s.contains("alquil") {
        return Some(Role::Tenant);
    }
    None
}

/// Uppercase the first letter of every run of letters and lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
