//! Parsers for free-text answers to server prompts
//!
//! Slot numbers are 1-based on the wire and returned 1-based; callers
//! decide what a slot refers to (catalog entry or roster member).

use crate::ParseError;

/// Parse a roster choice such as `1 2 3` or `4,1,2`
///
/// Exactly `count` slot numbers in `1..=max` are required. Duplicates are
/// passed through so the registry can reject them with a precise reason.
pub fn parse_selection(input: &str, max: usize, count: usize) -> Result<Vec<usize>, ParseError> {
    let tokens: Vec<&str> = input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .collect();

    if tokens.is_empty() {
        return Err(ParseError::EmptyMessage);
    }

    if tokens.len() != count {
        return Err(ParseError::InvalidFormat(format!(
            "expected {} choices, got {}",
            count,
            tokens.len()
        )));
    }

    tokens.into_iter().map(|token| parse_slot(token, max)).collect()
}

/// Parse a single slot number in `1..=max`
pub fn parse_slot(input: &str, max: usize) -> Result<usize, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::EmptyMessage);
    }

    let value = input
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidFormat(format!("not a number: {}", input)))?;

    if value == 0 || value > max {
        return Err(ParseError::OutOfRange { value, max });
    }

    Ok(value)
}

/// Interpret a switch offer answer; only `Y` (any case) means yes
pub fn parse_confirm(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("y")
}
