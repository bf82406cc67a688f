use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use uuid::Uuid;

/// A single value inside a [`Record`](crate::record::Record).
///
/// Besides the plain JSON shapes this carries a few richer types that only
/// some backends know how to encode (date-times, UUIDs, numeric arrays and
/// named structures). Backends that lack support reject them with a type
/// error instead of guessing a representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Array(Vec<Value>),
    Map(Map),
    DateTime(DateTimeValue),
    Uuid(Uuid),
    NumArray(NumArray),
    Struct(StructValue),
}

impl Value {
    /// Type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::DateTime(_) => "datetime",
            Value::Uuid(_) => "uuid",
            Value::NumArray(_) => "numeric array",
            Value::Struct(_) => "struct",
        }
    }
}

/// Map key. Anything other than [`Key::Str`] needs the non-string-keys
/// option on the fast-binary backend; every other backend rejects it.
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Uuid(Uuid),
    DateTime(DateTimeValue),
}

impl Key {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Key::Str(_) => "string",
            Key::Int(_) => "integer",
            Key::Float(_) => "float",
            Key::Bool(_) => "bool",
            Key::Null => "null",
            Key::Uuid(_) => "uuid",
            Key::DateTime(_) => "datetime",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Str(s) => write!(f, "{s:?}"),
            Key::Int(i) => write!(f, "{i}"),
            Key::Float(x) => write!(f, "{x}"),
            Key::Bool(b) => write!(f, "{b}"),
            Key::Null => f.write_str("null"),
            Key::Uuid(u) => write!(f, "{u}"),
            Key::DateTime(dt) => write!(f, "{dt:?}"),
        }
    }
}

/// Insertion-ordered map. Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    entries: Vec<(Key, Value)>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Map {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert `value` under `key`, returning the previous value if any.
    ///
    /// Lookup is a linear scan, so building a map of `n` entries is
    /// quadratic. Log records hold a handful of fields; use a dedicated
    /// map type for anything large.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Look up a string key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&Key, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Date-time value, either naive (no zone) or with a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeValue {
    Naive(NaiveDateTime),
    Aware(DateTime<FixedOffset>),
}

impl DateTimeValue {
    pub fn naive(&self) -> NaiveDateTime {
        match self {
            DateTimeValue::Naive(dt) => *dt,
            DateTimeValue::Aware(dt) => dt.naive_local(),
        }
    }

    /// Offset from UTC in seconds, `None` for naive values.
    pub fn offset_seconds(&self) -> Option<i32> {
        match self {
            DateTimeValue::Naive(_) => None,
            DateTimeValue::Aware(dt) => Some(dt.offset().local_minus_utc()),
        }
    }
}

impl From<NaiveDateTime> for DateTimeValue {
    fn from(dt: NaiveDateTime) -> Self {
        DateTimeValue::Naive(dt)
    }
}

impl From<DateTime<FixedOffset>> for DateTimeValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        DateTimeValue::Aware(dt)
    }
}

impl From<DateTime<Utc>> for DateTimeValue {
    fn from(dt: DateTime<Utc>) -> Self {
        DateTimeValue::Aware(dt.fixed_offset())
    }
}

/// Flat element storage of a [`NumArray`].
#[derive(Debug, Clone, PartialEq)]
pub enum NumData {
    Bool(Vec<bool>),
    I64(Vec<i64>),
    F64(Vec<f64>),
}

impl NumData {
    pub fn len(&self) -> usize {
        match self {
            NumData::Bool(v) => v.len(),
            NumData::I64(v) => v.len(),
            NumData::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<bool>> for NumData {
    fn from(v: Vec<bool>) -> Self {
        NumData::Bool(v)
    }
}

impl From<Vec<i64>> for NumData {
    fn from(v: Vec<i64>) -> Self {
        NumData::I64(v)
    }
}

impl From<Vec<f64>> for NumData {
    fn from(v: Vec<f64>) -> Self {
        NumData::F64(v)
    }
}

/// Dense row-major numeric array with an explicit shape.
#[derive(Debug, Clone, PartialEq)]
pub struct NumArray {
    shape: Vec<usize>,
    data: NumData,
}

impl NumArray {
    /// Build an array, returning `None` if the shape does not cover the data exactly.
    ///
    /// An empty shape describes a scalar and needs exactly one element. A
    /// shape whose element count overflows `usize` is rejected.
    pub fn new(shape: Vec<usize>, data: impl Into<NumData>) -> Option<Self> {
        let data = data.into();
        let expected = shape
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))?;
        (expected == data.len()).then_some(NumArray { shape, data })
    }

    /// One-dimensional array over `data`.
    pub fn vector(data: impl Into<NumData>) -> Self {
        let data = data.into();
        NumArray {
            shape: vec![data.len()],
            data,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &NumData {
        &self.data
    }
}

/// Named immutable structure; encoded as a map of its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    pub name: String,
    pub fields: Vec<(String, Value)>,
}

impl StructValue {
    pub fn new(name: impl Into<String>) -> Self {
        StructValue {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => UInt,
    u16 => UInt,
    u32 => UInt,
    u64 => UInt,
    f32 => Float,
    f64 => Float,
    String => Str,
    &str => Str,
    Map => Map,
    DateTimeValue => DateTime,
    NaiveDateTime => DateTime,
    DateTime<FixedOffset> => DateTime,
    DateTime<Utc> => DateTime,
    Uuid => Uuid,
    NumArray => NumArray,
    StructValue => Struct,
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    n.as_f64().map_or(Value::Null, Value::Float)
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Map(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Int(i.into())
    }
}

impl From<f64> for Key {
    fn from(x: f64) -> Self {
        Key::Float(x)
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Key::Bool(b)
    }
}

impl From<()> for Key {
    fn from(_: ()) -> Self {
        Key::Null
    }
}

impl From<Uuid> for Key {
    fn from(u: Uuid) -> Self {
        Key::Uuid(u)
    }
}

impl From<DateTimeValue> for Key {
    fn from(dt: DateTimeValue) -> Self {
        Key::DateTime(dt)
    }
}
