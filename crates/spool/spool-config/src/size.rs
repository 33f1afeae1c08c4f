//! Human-friendly byte sizes: `4096`, `64k`, `1M`, `2g`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeError {
    #[error("empty size")]
    Empty,
    #[error("badly formed size: {0}")]
    Malformed(String),
    #[error("size too large: {0}")]
    Overflow(String),
    #[error("size must be non-zero")]
    Zero,
}

/// Parses a decimal byte count with an optional binary suffix (`k`, `m`,
/// `g`, `t`, case-insensitive).
///
/// # Example
/// ```
/// use spool_config::parse_size;
/// assert_eq!(parse_size("64k"), Ok(64 * 1024));
/// assert_eq!(parse_size("3M"), Ok(3 * 1024 * 1024));
/// assert!(parse_size("1.5m").is_err());
/// ```
pub fn parse_size(text: &str) -> Result<usize, SizeError> {
    if text.is_empty() {
        return Err(SizeError::Empty);
    }
    let split = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let (digits, suffix) = text.split_at(split);
    if digits.is_empty() {
        return Err(SizeError::Malformed(text.to_owned()));
    }

    let shift = match suffix.to_ascii_lowercase().as_str() {
        "" => 0,
        "k" => 10,
        "m" => 20,
        "g" => 30,
        "t" => 40,
        _ => return Err(SizeError::Malformed(text.to_owned())),
    };

    let base: usize = digits
        .parse()
        .map_err(|_| SizeError::Overflow(text.to_owned()))?;
    let size = base
        .checked_mul(1usize << shift)
        .ok_or_else(|| SizeError::Overflow(text.to_owned()))?;
    if size == 0 {
        return Err(SizeError::Zero);
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_and_suffixed() {
        assert_eq!(parse_size("1"), Ok(1));
        assert_eq!(parse_size("1024"), Ok(1024));
        assert_eq!(parse_size("2k"), Ok(2048));
        assert_eq!(parse_size("2K"), Ok(2048));
        assert_eq!(parse_size("1g"), Ok(1 << 30));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_size(""), Err(SizeError::Empty));
        assert!(matches!(parse_size("k"), Err(SizeError::Malformed(_))));
        assert!(matches!(parse_size("12kb"), Err(SizeError::Malformed(_))));
        assert!(matches!(parse_size("-5"), Err(SizeError::Malformed(_))));
        assert!(matches!(parse_size(" 5"), Err(SizeError::Malformed(_))));
        assert_eq!(parse_size("0k"), Err(SizeError::Zero));
    }

    #[test]
    fn rejects_overflow() {
        assert!(matches!(
            parse_size("99999999999999999999999"),
            Err(SizeError::Overflow(_))
        ));
        assert!(matches!(
            parse_size("18446744073709551615t"),
            Err(SizeError::Overflow(_))
        ));
    }
}
