//! Palindrome detection for message content.
//!
//! A palindrome reads the same backward as forward, such as "madam" or
//! "racecar". Sentence-length palindromes are recognized with allowances
//! for capital letters, punctuation and word dividers, e.g.
//! "A man, a plan, a canal, Panama!".

/// Returns true if the given string is a palindrome.
///
/// Only English alphanumeric characters are considered: every character
/// outside `{a-z, A-Z, 0-9}` is ignored, and case is ignored. A string
/// that is empty after normalization is vacuously a palindrome.
pub fn is_palindrome(input: &str) -> bool {
    let normalized: Vec<char> = input
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let reversed: Vec<char> = normalized.iter().rev().copied().collect();

    normalized == reversed
}
