pub use crate::value::Map;

/// Structured representation of one log event, ready to be serialized.
///
/// Built by the caller per event, borrowed by a
/// [`JsonSerializer`](crate::serializer::JsonSerializer) for the duration of
/// one call and dropped afterwards.
pub type Record = Map;

/// Build a [`Record`] from `key => value` pairs.
///
/// ```
/// use log_json_serializer::record;
///
/// let rec = record! { "level" => "ERROR", "line" => 42 };
/// assert_eq!(rec.len(), 2);
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::record::Record::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut rec = $crate::record::Record::new();
        $(
            rec.insert($key, $value);
        )+
        rec
    }};
}
