use crate::constants::STATE_LENGTH;

/// Generates a random OAuth `state` value
///
/// The value is `STATE_LENGTH` characters of `A-Z`, `a-z` and `0-9`, safe to
/// put in a query string without escaping.
#[must_use]
pub fn generate_state() -> String {
    let alphabet: Vec<char> = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789"
        .chars()
        .collect();
    nanoid::nanoid!(STATE_LENGTH, &alphabet)
}
