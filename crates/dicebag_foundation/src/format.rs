//! Signed modifier text shared by display and command parsing.

use crate::error::{Error, Result};

/// Formats a modifier with an explicit sign: `+3`, `+0`, `-2`.
#[must_use]
pub fn format_modifier(modifier: i64) -> String {
    if modifier >= 0 {
        format!("+{modifier}")
    } else {
        modifier.to_string()
    }
}

/// Parses a modifier token.
///
/// The token must start with `+` or `-` so that it can be told apart from a
/// face count or face value in the same argument position.
///
/// # Errors
///
/// Returns `InvalidArgument` if the sign is missing or the digits don't parse.
pub fn parse_modifier(token: &str) -> Result<i64> {
    if !is_modifier_token(token) {
        return Err(Error::invalid_argument(format!(
            "modifier must start with '+' or '-': {token}"
        )));
    }
    token
        .parse::<i64>()
        .map_err(|_| Error::invalid_argument(format!("wrong parameter type: {token}")))
}

/// Returns true if the token is shaped like a modifier (leading sign).
#[must_use]
pub fn is_modifier_token(token: &str) -> bool {
    token.starts_with('+') || token.starts_with('-')
}
