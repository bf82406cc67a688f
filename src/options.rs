use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::ConfigError;

bitflags! {
    /// Native option bits understood by the fast-binary backend.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Opt: u16 {
        const INDENT_2 = 1 << 0;
        const NON_STR_KEYS = 1 << 1;
        const APPEND_NEWLINE = 1 << 2;
        const NAIVE_UTC = 1 << 3;
        const OMIT_MICROSECONDS = 1 << 4;
        const PASSTHROUGH_STRUCT = 1 << 5;
        const PASSTHROUGH_DATETIME = 1 << 6;
        const SERIALIZE_STRUCT = 1 << 7;
        const SERIALIZE_NUMARRAY = 1 << 8;
        const SERIALIZE_UUID = 1 << 9;
        const SORT_KEYS = 1 << 10;
        const STRICT_INTEGER = 1 << 11;
        const UTC_Z = 1 << 12;
    }
}

/// Named boolean toggles that can be switched on in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionFlag {
    Indent2,
    NonStrKeys,
    AppendNewline,
    NaiveUtc,
    OmitMicroseconds,
    PassthroughStruct,
    PassthroughDatetime,
    SerializeStruct,
    SerializeNumArray,
    SerializeUuid,
    SortKeys,
    StrictInteger,
    UtcZ,
}

impl OptionFlag {
    /// Every flag, in the order the bitmask is accumulated.
    pub const ALL: [OptionFlag; 13] = [
        OptionFlag::Indent2,
        OptionFlag::NonStrKeys,
        OptionFlag::AppendNewline,
        OptionFlag::NaiveUtc,
        OptionFlag::OmitMicroseconds,
        OptionFlag::PassthroughStruct,
        OptionFlag::PassthroughDatetime,
        OptionFlag::SerializeStruct,
        OptionFlag::SerializeNumArray,
        OptionFlag::SerializeUuid,
        OptionFlag::SortKeys,
        OptionFlag::StrictInteger,
        OptionFlag::UtcZ,
    ];

    pub fn bit(self) -> Opt {
        match self {
            OptionFlag::Indent2 => Opt::INDENT_2,
            OptionFlag::NonStrKeys => Opt::NON_STR_KEYS,
            OptionFlag::AppendNewline => Opt::APPEND_NEWLINE,
            OptionFlag::NaiveUtc => Opt::NAIVE_UTC,
            OptionFlag::OmitMicroseconds => Opt::OMIT_MICROSECONDS,
            OptionFlag::PassthroughStruct => Opt::PASSTHROUGH_STRUCT,
            OptionFlag::PassthroughDatetime => Opt::PASSTHROUGH_DATETIME,
            OptionFlag::SerializeStruct => Opt::SERIALIZE_STRUCT,
            OptionFlag::SerializeNumArray => Opt::SERIALIZE_NUMARRAY,
            OptionFlag::SerializeUuid => Opt::SERIALIZE_UUID,
            OptionFlag::SortKeys => Opt::SORT_KEYS,
            OptionFlag::StrictInteger => Opt::STRICT_INTEGER,
            OptionFlag::UtcZ => Opt::UTC_Z,
        }
    }

    /// Short, upper-case name used in configuration keys.
    pub fn name(self) -> &'static str {
        match self {
            OptionFlag::Indent2 => "INDENT_2",
            OptionFlag::NonStrKeys => "NON_STR_KEYS",
            OptionFlag::AppendNewline => "APPEND_NEWLINE",
            OptionFlag::NaiveUtc => "NAIVE_UTC",
            OptionFlag::OmitMicroseconds => "OMIT_MICROSECONDS",
            OptionFlag::PassthroughStruct => "PASSTHROUGH_STRUCT",
            OptionFlag::PassthroughDatetime => "PASSTHROUGH_DATETIME",
            OptionFlag::SerializeStruct => "SERIALIZE_STRUCT",
            OptionFlag::SerializeNumArray => "SERIALIZE_NUMARRAY",
            OptionFlag::SerializeUuid => "SERIALIZE_UUID",
            OptionFlag::SortKeys => "SORT_KEYS",
            OptionFlag::StrictInteger => "STRICT_INTEGER",
            OptionFlag::UtcZ => "UTC_Z",
        }
    }

    /// Environment variable that toggles this flag, e.g. `LOGGING_OPT_SORT_KEYS`.
    pub fn env_key(self) -> String {
        format!("{}{}", crate::env::LOGGING_OPT_PREFIX, self.name())
    }
}

impl fmt::Display for OptionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptionFlag {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase().replace('-', "_");
        let bare = upper
            .strip_prefix(crate::env::LOGGING_OPT_PREFIX)
            .unwrap_or(&upper);

        OptionFlag::ALL
            .into_iter()
            .find(|flag| flag.name() == bare)
            .ok_or_else(|| ConfigError::UnknownOption(s.to_string()))
    }
}

/// Configured on/off state of every [`OptionFlag`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionFlags {
    enabled: [bool; OptionFlag::ALL.len()],
}

impl OptionFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`OptionFlags::set`].
    pub fn with(mut self, flag: OptionFlag) -> Self {
        self.set(flag, true);
        self
    }

    pub fn set(&mut self, flag: OptionFlag, on: bool) {
        self.enabled[flag as usize] = on;
    }

    pub fn is_enabled(&self, flag: OptionFlag) -> bool {
        self.enabled[flag as usize]
    }

    pub fn enabled(&self) -> impl Iterator<Item = OptionFlag> + '_ {
        OptionFlag::ALL
            .into_iter()
            .filter(move |flag| self.is_enabled(*flag))
    }

    /// Fold every enabled flag into the native bitmask.
    ///
    /// Returns [`Opt::empty`] when nothing is enabled.
    pub fn to_bits(&self) -> Opt {
        self.enabled()
            .fold(Opt::empty(), |acc, flag| acc | flag.bit())
    }
}

impl FromIterator<OptionFlag> for OptionFlags {
    fn from_iter<I: IntoIterator<Item = OptionFlag>>(iter: I) -> Self {
        iter.into_iter().fold(OptionFlags::new(), OptionFlags::with)
    }
}
