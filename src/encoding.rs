use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, EncodeError};

/// Character encoding used to turn fast-binary output into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Ascii,
    Latin1,
}

impl TextEncoding {
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Ascii => "ascii",
            TextEncoding::Latin1 => "latin-1",
        }
    }

    /// Decode `bytes` into an owned string.
    ///
    /// Latin-1 maps every byte to the code point of the same value, so it
    /// never fails; multi-byte UTF-8 sequences come out as one char per byte.
    pub fn decode(self, bytes: Vec<u8>) -> Result<String, EncodeError> {
        match self {
            TextEncoding::Utf8 => {
                String::from_utf8(bytes).map_err(|_| EncodeError::Decode { encoding: self })
            }
            TextEncoding::Ascii => {
                if !bytes.is_ascii() {
                    return Err(EncodeError::Decode { encoding: self });
                }
                String::from_utf8(bytes).map_err(|_| EncodeError::Decode { encoding: self })
            }
            TextEncoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = ConfigError;

    /// Accepts the usual spellings, e.g. `UTF-8`, `utf8`, `latin_1`, `iso-8859-1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "utf8" => Ok(TextEncoding::Utf8),
            "ascii" | "usascii" => Ok(TextEncoding::Ascii),
            "latin1" | "iso88591" | "l1" => Ok(TextEncoding::Latin1),
            _ => Err(ConfigError::UnknownEncoding(s.to_string())),
        }
    }
}
