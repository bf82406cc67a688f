//! Backend-neutral `Serialize` view over a [`Record`].
//!
//! Every backend drives the same wrappers; what differs is the
//! [`EncodePolicy`]. The fast-binary backend gets the native type support
//! and the option bits, the text backends get the strict policy which only
//! admits plain JSON shapes with string keys.

use std::borrow::Cow;

use chrono::Timelike;
use serde::ser::{Error as _, SerializeMap, SerializeSeq, Serializer};
use serde::Serialize;

use crate::options::Opt;
use crate::record::Record;
use crate::value::{DateTimeValue, Key, Map, NumArray, NumData, Value};

/// Largest integer magnitude accepted under [`Opt::STRICT_INTEGER`].
pub const STRICT_INTEGER_MAX: i64 = (1 << 53) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EncodePolicy {
    opts: Opt,
    native_types: bool,
}

impl EncodePolicy {
    /// Plain JSON only: string keys, no date-times, UUIDs, arrays or structs.
    pub(crate) fn strict() -> Self {
        EncodePolicy {
            opts: Opt::empty(),
            native_types: false,
        }
    }

    /// Native types enabled, shaped by `opts`.
    pub(crate) fn native(opts: Opt) -> Self {
        EncodePolicy {
            opts,
            native_types: true,
        }
    }

    pub(crate) fn record<'a>(&'a self, record: &'a Record) -> EncodableMap<'a> {
        EncodableMap {
            entries: Entries::Map(record),
            policy: self,
        }
    }

    fn value<'a>(&'a self, value: &'a Value) -> Encodable<'a> {
        Encodable {
            value,
            policy: self,
        }
    }

    fn unsupported(&self, value: &Value) -> String {
        format!("value of type {} is not JSON serializable", value.type_name())
    }

    fn check_native(&self, value: &Value, passthrough: Opt) -> Result<(), String> {
        if self.native_types && !self.opts.intersects(passthrough) {
            Ok(())
        } else {
            Err(self.unsupported(value))
        }
    }

    fn check_integer(&self, magnitude_ok: bool) -> Result<(), String> {
        if self.opts.contains(Opt::STRICT_INTEGER) && !magnitude_ok {
            Err("integer exceeds 53-bit range".to_string())
        } else {
            Ok(())
        }
    }

    /// Text form of a map key, or an error when the key is not allowed.
    fn key_text<'k>(&self, key: &'k Key) -> Result<Cow<'k, str>, String> {
        if let Key::Str(s) = key {
            return Ok(Cow::Borrowed(s));
        }
        if !(self.native_types && self.opts.contains(Opt::NON_STR_KEYS)) {
            return Err(format!(
                "map key must be a string, found {} key {key}",
                key.type_name()
            ));
        }

        let text = match key {
            Key::Str(_) => unreachable!("handled above"),
            Key::Int(i) => i.to_string(),
            Key::Float(x) => format_float_key(*x),
            Key::Bool(b) => b.to_string(),
            Key::Null => "null".to_string(),
            Key::Uuid(u) => u.hyphenated().to_string(),
            Key::DateTime(dt) => format_datetime(dt, self.opts),
        };
        Ok(Cow::Owned(text))
    }
}

/// Shortest round-trip rendering of a float key: integral values keep a
/// fractional digit (`2.0`) and large magnitudes use exponent form (`1e300`).
fn format_float_key(x: f64) -> String {
    if !x.is_finite() {
        return "null".to_string();
    }
    let magnitude = x.abs();
    if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-5) {
        format!("{x:e}")
    } else if x.fract() == 0.0 {
        format!("{x:.1}")
    } else {
        x.to_string()
    }
}

/// RFC 3339 rendering of a date-time, shaped by the date-time option bits.
pub(crate) fn format_datetime(dt: &DateTimeValue, opts: Opt) -> String {
    let naive = dt.naive();
    let mut out = naive.format("%Y-%m-%dT%H:%M:%S").to_string();

    let micros = naive.nanosecond() / 1_000 % 1_000_000;
    if micros != 0 && !opts.contains(Opt::OMIT_MICROSECONDS) {
        out.push_str(&format!(".{micros:06}"));
    }

    let offset = match dt.offset_seconds() {
        Some(seconds) => Some(seconds),
        None if opts.contains(Opt::NAIVE_UTC) => Some(0),
        None => None,
    };

    match offset {
        None => {}
        Some(0) if opts.contains(Opt::UTC_Z) => out.push('Z'),
        Some(seconds) => {
            let sign = if seconds < 0 { '-' } else { '+' };
            let seconds = seconds.unsigned_abs();
            out.push_str(&format!(
                "{sign}{:02}:{:02}",
                seconds / 3600,
                seconds % 3600 / 60
            ));
            if seconds % 60 != 0 {
                out.push_str(&format!(":{:02}", seconds % 60));
            }
        }
    }

    out
}

pub(crate) struct Encodable<'a> {
    value: &'a Value,
    policy: &'a EncodePolicy,
}

impl Serialize for Encodable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let policy = self.policy;
        match self.value {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => {
                policy
                    .check_integer(i.unsigned_abs() <= STRICT_INTEGER_MAX as u64)
                    .map_err(S::Error::custom)?;
                serializer.serialize_i64(*i)
            }
            Value::UInt(u) => {
                policy
                    .check_integer(*u <= STRICT_INTEGER_MAX as u64)
                    .map_err(S::Error::custom)?;
                serializer.serialize_u64(*u)
            }
            Value::Float(x) => serialize_float(*x, serializer),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&policy.value(item))?;
                }
                seq.end()
            }
            Value::Map(map) => EncodableMap {
                entries: Entries::Map(map),
                policy,
            }
            .serialize(serializer),
            Value::DateTime(dt) => {
                policy
                    .check_native(self.value, Opt::PASSTHROUGH_DATETIME)
                    .map_err(S::Error::custom)?;
                serializer.serialize_str(&format_datetime(dt, policy.opts))
            }
            Value::Uuid(u) => {
                policy
                    .check_native(self.value, Opt::empty())
                    .map_err(S::Error::custom)?;
                serializer.serialize_str(&u.hyphenated().to_string())
            }
            Value::NumArray(array) => {
                if !(policy.native_types && policy.opts.contains(Opt::SERIALIZE_NUMARRAY)) {
                    return Err(S::Error::custom(policy.unsupported(self.value)));
                }
                NumSlice::whole(array).serialize(serializer)
            }
            Value::Struct(st) => {
                policy
                    .check_native(self.value, Opt::PASSTHROUGH_STRUCT)
                    .map_err(S::Error::custom)?;
                EncodableMap {
                    entries: Entries::Fields(&st.fields),
                    policy,
                }
                .serialize(serializer)
            }
        }
    }
}

fn serialize_float<S: Serializer>(x: f64, serializer: S) -> Result<S::Ok, S::Error> {
    if x.is_finite() {
        serializer.serialize_f64(x)
    } else {
        serializer.serialize_unit()
    }
}

enum Entries<'a> {
    Map(&'a Map),
    Fields(&'a [(String, Value)]),
}

pub(crate) struct EncodableMap<'a> {
    entries: Entries<'a>,
    policy: &'a EncodePolicy,
}

impl Serialize for EncodableMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let policy = self.policy;
        let mut entries: Vec<(Cow<'_, str>, &Value)> = match self.entries {
            Entries::Map(map) => map
                .iter()
                .map(|(k, v)| policy.key_text(k).map(|k| (k, v)))
                .collect::<Result<_, _>>()
                .map_err(S::Error::custom)?,
            Entries::Fields(fields) => fields
                .iter()
                .map(|(k, v)| (Cow::Borrowed(k.as_str()), v))
                .collect(),
        };

        if policy.opts.contains(Opt::SORT_KEYS) {
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        }

        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in &entries {
            map.serialize_entry(key, &policy.value(value))?;
        }
        map.end()
    }
}

/// Row-major view of a sub-array; serializes as nested sequences.
struct NumSlice<'a> {
    shape: &'a [usize],
    data: &'a NumData,
    offset: usize,
}

impl<'a> NumSlice<'a> {
    fn whole(array: &'a NumArray) -> Self {
        NumSlice {
            shape: array.shape(),
            data: array.data(),
            offset: 0,
        }
    }
}

impl Serialize for NumSlice<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Some((&len, inner)) = self.shape.split_first() else {
            return match self.data {
                NumData::Bool(v) => serializer.serialize_bool(v[self.offset]),
                NumData::I64(v) => serializer.serialize_i64(v[self.offset]),
                NumData::F64(v) => serialize_float(v[self.offset], serializer),
            };
        };

        let stride: usize = inner.iter().product();
        let mut seq = serializer.serialize_seq(Some(len))?;
        for i in 0..len {
            seq.serialize_element(&NumSlice {
                shape: inner,
                data: self.data,
                offset: self.offset + i * stride,
            })?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate};
    use rstest::rstest;

    fn naive(micros: u32) -> DateTimeValue {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_micro_opt(14, 5, 6, micros))
            .map(DateTimeValue::Naive)
            .unwrap()
    }

    fn aware(text: &str) -> DateTimeValue {
        DateTimeValue::Aware(DateTime::parse_from_rfc3339(text).unwrap())
    }

    fn encode(policy: &EncodePolicy, record: &Record) -> Result<String, serde_json::Error> {
        serde_json::to_string(&policy.record(record))
    }

    #[rstest]
    #[case::naive_plain(naive(0), Opt::empty(), "2024-03-09T14:05:06")]
    #[case::naive_micros(naive(120), Opt::empty(), "2024-03-09T14:05:06.000120")]
    #[case::naive_omit_micros(naive(120), Opt::OMIT_MICROSECONDS, "2024-03-09T14:05:06")]
    #[case::naive_utc(naive(0), Opt::NAIVE_UTC, "2024-03-09T14:05:06+00:00")]
    #[case::naive_utc_z(naive(0), Opt::NAIVE_UTC | Opt::UTC_Z, "2024-03-09T14:05:06Z")]
    #[case::naive_z_only(naive(0), Opt::UTC_Z, "2024-03-09T14:05:06")]
    #[case::aware_utc(aware("2024-03-09T14:05:06Z"), Opt::empty(), "2024-03-09T14:05:06+00:00")]
    #[case::aware_utc_z(aware("2024-03-09T14:05:06Z"), Opt::UTC_Z, "2024-03-09T14:05:06Z")]
    #[case::aware_negative(aware("2024-03-09T14:05:06-05:30"), Opt::UTC_Z, "2024-03-09T14:05:06-05:30")]
    fn should_format_datetimes(
        #[case] dt: DateTimeValue,
        #[case] opts: Opt,
        #[case] expected: &str,
    ) {
        assert_eq!(format_datetime(&dt, opts), expected);
    }

    #[test]
    fn should_reject_non_string_key_under_strict_policy() {
        // given
        let mut record = Record::new();
        record.insert(1, "one");

        // when
        let result = encode(&EncodePolicy::strict(), &record);

        // then
        let err = result.unwrap_err().to_string();
        assert!(err.contains("map key must be a string"), "{err}");
    }

    #[test]
    fn should_require_option_for_non_string_keys_on_native_policy() {
        // given
        let mut record = Record::new();
        record.insert(true, "yes");

        // when
        let without = encode(&EncodePolicy::native(Opt::empty()), &record);
        let with = encode(&EncodePolicy::native(Opt::NON_STR_KEYS), &record);

        // then
        assert!(without.is_err());
        assert_eq!(with.unwrap(), r#"{"true":"yes"}"#);
    }

    #[rstest]
    #[case::int(Key::Int(-7), "-7")]
    #[case::integral_float(Key::Float(2.0), "2.0")]
    #[case::float(Key::Float(0.25), "0.25")]
    #[case::large_integral_float(Key::Float(1e16), "1e16")]
    #[case::huge_float(Key::Float(1e300), "1e300")]
    #[case::tiny_float(Key::Float(2.5e-7), "2.5e-7")]
    #[case::nan_float(Key::Float(f64::NAN), "null")]
    #[case::null(Key::Null, "null")]
    #[case::datetime(Key::DateTime(naive(0)), "2024-03-09T14:05:06")]
    fn should_coerce_non_string_keys(#[case] key: Key, #[case] expected: &str) {
        // given
        let policy = EncodePolicy::native(Opt::NON_STR_KEYS);

        // when
        let text = policy.key_text(&key).unwrap();

        // then
        assert_eq!(text, expected);
    }

    #[test]
    fn should_sort_nested_maps_with_sort_keys() {
        // given
        let mut inner = Map::new();
        inner.insert("z", 1);
        inner.insert("a", 2);
        let mut record = Record::new();
        record.insert("b", inner);
        record.insert("a", Value::Null);

        // when
        let text = encode(&EncodePolicy::native(Opt::SORT_KEYS), &record).unwrap();

        // then
        assert_eq!(text, r#"{"a":null,"b":{"a":2,"z":1}}"#);
    }

    #[rstest]
    #[case::max_ok(STRICT_INTEGER_MAX, true)]
    #[case::min_ok(-STRICT_INTEGER_MAX, true)]
    #[case::too_big(STRICT_INTEGER_MAX + 1, false)]
    #[case::too_small(i64::MIN, false)]
    fn should_bound_integers_when_strict(#[case] value: i64, #[case] accepted: bool) {
        // given
        let mut record = Record::new();
        record.insert("n", value);

        // when
        let strict = encode(&EncodePolicy::native(Opt::STRICT_INTEGER), &record);
        let relaxed = encode(&EncodePolicy::native(Opt::empty()), &record);

        // then
        assert_eq!(strict.is_ok(), accepted);
        assert!(relaxed.is_ok());
    }

    #[test]
    fn should_encode_non_finite_floats_as_null() {
        // given
        let mut record = Record::new();
        record.insert("nan", f64::NAN);
        record.insert("inf", f64::INFINITY);

        // when
        let text = encode(&EncodePolicy::strict(), &record).unwrap();

        // then
        assert_eq!(text, r#"{"nan":null,"inf":null}"#);
    }

    #[test]
    fn should_nest_numeric_arrays_by_shape() {
        // given
        let array = NumArray::new(vec![2, 3], vec![1_i64, 2, 3, 4, 5, 6]).unwrap();
        let mut record = Record::new();
        record.insert("m", array);

        // when
        let gated = encode(&EncodePolicy::native(Opt::empty()), &record);
        let text = encode(&EncodePolicy::native(Opt::SERIALIZE_NUMARRAY), &record).unwrap();

        // then
        assert!(gated.is_err());
        assert_eq!(text, r#"{"m":[[1,2,3],[4,5,6]]}"#);
    }

    #[test]
    fn should_honour_struct_passthrough() {
        // given
        let point = crate::value::StructValue::new("Point")
            .field("x", 1)
            .field("y", 2);
        let mut record = Record::new();
        record.insert("p", point);

        // when
        let native = encode(&EncodePolicy::native(Opt::empty()), &record).unwrap();
        let passthrough = encode(&EncodePolicy::native(Opt::PASSTHROUGH_STRUCT), &record);
        let strict = encode(&EncodePolicy::strict(), &record);

        // then
        assert_eq!(native, r#"{"p":{"x":1,"y":2}}"#);
        assert!(passthrough.is_err());
        assert!(strict.is_err());
    }
}
