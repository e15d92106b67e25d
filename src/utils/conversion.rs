use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub(crate) enum ConversionError {
    /// Happens if the decoded bytes are not valid UTF-8 (the [String] contains the input)
    InvalidEncoding(String),
}

impl Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionError::InvalidEncoding(e) => write!(f, "Invalid encoding! ({e})"),
        }
    }
}

/// Decodes a form encoded value (`+` is a space, `%XX` is a byte)
pub(crate) fn decode_form_value(value: &str) -> Result<String, ConversionError> {
    let value = value.replace('+', " ");
    percent_decode_str(&value)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ConversionError::InvalidEncoding(value.to_owned()))
}

/// Drops every character outside of ASCII
pub(crate) fn strip_non_ascii(value: &str) -> String {
    value.chars().filter(char::is_ascii).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plus_and_percent() {
        assert_eq!(decode_form_value("Jane+Q.+Doe").unwrap(), "Jane Q. Doe");
        assert_eq!(decode_form_value("O%27Brien%2C+Pat").unwrap(), "O'Brien, Pat");
        assert_eq!(decode_form_value("plain").unwrap(), "plain");
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert!(decode_form_value("%FF%FE").is_err());
    }

    #[test]
    fn strips_non_ascii() {
        assert_eq!(strip_non_ascii("\u{a0}\u{a0}06"), "06");
        assert_eq!(strip_non_ascii("caf\u{e9}"), "caf");
    }
}
