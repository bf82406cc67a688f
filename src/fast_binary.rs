use serde::Serialize;
use sonic_rs::format::PrettyFormatter;

use crate::backend::BackendKind;
use crate::encode::EncodePolicy;
use crate::encoding::TextEncoding;
use crate::error::EncodeError;
use crate::options::{Opt, OptionFlags};
use crate::record::Record;
use crate::serializer::JsonSerializer;

/// Encode function chosen once when the serializer is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dumps {
    /// No option bits set: plain compact encoding.
    Default,
    /// Every call passes the bound option bits.
    WithOptions(Opt),
}

impl Dumps {
    pub fn resolve(flags: &OptionFlags) -> Self {
        let bits = flags.to_bits();
        if bits.is_empty() {
            Dumps::Default
        } else {
            Dumps::WithOptions(bits)
        }
    }

    pub fn bits(&self) -> Opt {
        match self {
            Dumps::Default => Opt::empty(),
            Dumps::WithOptions(bits) => *bits,
        }
    }
}

/// Byte-oriented serializer driven by option bits.
///
/// Date-times, UUIDs and structs are encoded natively; numeric arrays and
/// non-string keys need their option. The output bytes are decoded with the
/// configured [`TextEncoding`]. Pretty printing comes only from
/// [`Opt::INDENT_2`], never from development mode.
#[derive(Debug, Clone)]
pub struct FastBinarySerializer {
    dumps: Dumps,
    policy: EncodePolicy,
    encoding: TextEncoding,
}

impl FastBinarySerializer {
    pub fn new(flags: &OptionFlags, encoding: TextEncoding) -> Self {
        let dumps = Dumps::resolve(flags);
        FastBinarySerializer {
            dumps,
            policy: EncodePolicy::native(dumps.bits()),
            encoding,
        }
    }

    pub fn dumps(&self) -> Dumps {
        self.dumps
    }

    /// Encode `record` into raw bytes without decoding.
    pub fn to_vec(&self, record: &Record) -> Result<Vec<u8>, EncodeError> {
        let value = self.policy.record(record);
        let bits = match self.dumps {
            Dumps::Default => {
                return sonic_rs::to_vec(&value)
                    .map_err(|e| EncodeError::type_error(BackendKind::FastBinary, e));
            }
            Dumps::WithOptions(bits) => bits,
        };

        let mut buf = Vec::with_capacity(256);
        let written = if bits.contains(Opt::INDENT_2) {
            let formatter = PrettyFormatter::with_indent(b"  ");
            let mut ser = sonic_rs::Serializer::with_formatter(&mut buf, formatter);
            value.serialize(&mut ser)
        } else {
            let mut ser = sonic_rs::Serializer::new(&mut buf);
            value.serialize(&mut ser)
        };
        written.map_err(|e| EncodeError::type_error(BackendKind::FastBinary, e))?;

        if bits.contains(Opt::APPEND_NEWLINE) {
            buf.push(b'\n');
        }
        Ok(buf)
    }
}

impl JsonSerializer for FastBinarySerializer {
    fn kind(&self) -> BackendKind {
        BackendKind::FastBinary
    }

    fn to_json(&self, record: &Record) -> Result<String, EncodeError> {
        let bytes = self.to_vec(record)?;
        self.encoding.decode(bytes)
    }
}
