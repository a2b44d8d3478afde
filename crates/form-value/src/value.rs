//! Form value trees
//!
//! Provides [`FormValue`], the tagged union every engine operation works on.

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as JsonValue;

use crate::error::ValueError;

/// Insertion-ordered object members
pub type ObjectMap = IndexMap<String, FormValue>;

/// Largest magnitude (exclusive) that still serializes as a JSON integer
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// A JSON-like value tree as collected from a form
///
/// Unlike [`serde_json::Value`] this keeps two things a form model needs:
/// an explicit `Undefined` (a field that was never set, distinct from
/// `Null`) and a `Date` leaf.
///
/// # Invariants
/// - `Date` values carry millisecond precision
/// - `Object` keys keep insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FormValue {
    /// Absent value
    #[default]
    Undefined,
    /// Explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// IEEE-754 double
    Number(f64),
    /// String
    String(String),
    /// UTC instant, millisecond precision
    Date(DateTime<Utc>),
    /// Ordered list
    Array(Vec<FormValue>),
    /// String-keyed map, insertion ordered
    Object(ObjectMap),
}

/// Tag of a [`FormValue`], used in logs and errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`FormValue::Undefined`]
    Undefined,
    /// [`FormValue::Null`]
    Null,
    /// [`FormValue::Bool`]
    Bool,
    /// [`FormValue::Number`]
    Number,
    /// [`FormValue::String`]
    String,
    /// [`FormValue::Date`]
    Date,
    /// [`FormValue::Array`]
    Array,
    /// [`FormValue::Object`]
    Object,
}

impl ValueKind {
    /// Lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Date => "date",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FormValue {
    /// Empty object `{}`
    #[inline]
    #[must_use]
    pub fn empty_object() -> Self {
        Self::Object(ObjectMap::new())
    }

    /// Date leaf, truncated to millisecond precision
    #[must_use]
    pub fn date(instant: DateTime<Utc>) -> Self {
        let millis = instant.timestamp_millis();
        Self::Date(DateTime::from_timestamp_millis(millis).unwrap_or(instant))
    }

    /// Date leaf from epoch milliseconds
    ///
    /// Returns `None` when the instant is out of range.
    #[inline]
    #[must_use]
    pub fn date_from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self::Date)
    }

    /// Parse an RFC 3339 timestamp into a date leaf
    ///
    /// # Errors
    /// Returns error if `text` is not a valid RFC 3339 timestamp
    pub fn parse_date(text: &str) -> Result<Self, ValueError> {
        DateTime::parse_from_rfc3339(text)
            .map(|instant| Self::date(instant.with_timezone(&Utc)))
            .map_err(|e| ValueError::InvalidDate(format!("{text}: {e}")))
    }

    /// Parse JSON text
    ///
    /// # Errors
    /// Returns error if the text is not valid JSON
    pub fn from_json_str(json: &str) -> Result<Self, ValueError> {
        serde_json::from_str(json).map_err(ValueError::InvalidJson)
    }

    /// Parse YAML text
    ///
    /// # Errors
    /// Returns error if the text is not valid YAML or has non-string keys
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ValueError> {
        serde_yaml::from_str(yaml).map_err(ValueError::InvalidYaml)
    }

    /// Convert to a [`serde_json::Value`]
    ///
    /// Follows the serialization rules: undefined members are dropped,
    /// undefined elements and non-finite numbers become `null`, dates become
    /// RFC 3339 strings.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Undefined | Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Number(n) => number_to_json(*n),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Date(d) => JsonValue::String(format_date(d)),
            Self::Array(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => JsonValue::Object(
                map.iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Tag of this value
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Undefined => ValueKind::Undefined,
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Date(_) => ValueKind::Date,
            Self::Array(_) => ValueKind::Array,
            Self::Object(_) => ValueKind::Object,
        }
    }

    /// Check for `Undefined`
    #[inline]
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Check for `Null`
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check for `Null` or `Undefined`
    #[inline]
    #[must_use]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }

    /// String contents, if a string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value, if a number
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean value, if a boolean
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Instant, if a date
    #[inline]
    #[must_use]
    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }

    /// Elements, if an array
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<FormValue>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Members, if an object
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectMap> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Member lookup on an object; `None` for any other value
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FormValue> {
        self.as_object().and_then(|map| map.get(key))
    }
}

fn format_date(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Integral value that fits an `i64`, if any
#[allow(clippy::cast_possible_truncation)]
fn as_integer(n: f64) -> Option<i64> {
    (n.is_finite() && n.fract() == 0.0 && n >= -I64_BOUND && n < I64_BOUND).then(|| n as i64)
}

fn number_to_json(n: f64) -> JsonValue {
    match as_integer(n) {
        Some(i) => JsonValue::from(i),
        None => serde_json::Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number),
    }
}

impl Display for FormValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl Serialize for FormValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Undefined | Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => match as_integer(*n) {
                Some(i) => serializer.serialize_i64(i),
                None if n.is_finite() => serializer.serialize_f64(*n),
                None => serializer.serialize_unit(),
            },
            Self::String(s) => serializer.serialize_str(s),
            Self::Date(d) => serializer.serialize_str(&format_date(d)),
            Self::Array(items) => serializer.collect_seq(items),
            Self::Object(map) => {
                let len = map.values().filter(|v| !v.is_undefined()).count();
                let mut state = serializer.serialize_map(Some(len))?;
                for (key, value) in map.iter().filter(|(_, v)| !v.is_undefined()) {
                    state.serialize_entry(key, value)?;
                }
                state.end()
            }
        }
    }
}

struct FormValueVisitor;

impl<'de> Visitor<'de> for FormValueVisitor {
    type Value = FormValue;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON-like value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<FormValue, E> {
        Ok(FormValue::Bool(v))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<FormValue, E> {
        Ok(FormValue::Number(v as f64))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<FormValue, E> {
        Ok(FormValue::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<FormValue, E> {
        Ok(FormValue::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<FormValue, E> {
        Ok(FormValue::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<FormValue, E> {
        Ok(FormValue::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<FormValue, E> {
        Ok(FormValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<FormValue, E> {
        Ok(FormValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<FormValue, D::Error> {
        FormValue::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<FormValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(FormValue::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FormValue, A::Error> {
        let mut map = ObjectMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, FormValue>()? {
            map.insert(key, value);
        }
        Ok(FormValue::Object(map))
    }
}

impl<'de> Deserialize<'de> for FormValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FormValueVisitor)
    }
}

impl From<JsonValue> for FormValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            JsonValue::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&FormValue> for JsonValue {
    fn from(value: &FormValue) -> Self {
        value.to_json()
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for FormValue {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i32> for FormValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for FormValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for FormValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<u64> for FormValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: u64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<Utc>> for FormValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::date(value)
    }
}

impl From<Vec<FormValue>> for FormValue {
    fn from(value: Vec<FormValue>) -> Self {
        Self::Array(value)
    }
}

impl From<ObjectMap> for FormValue {
    fn from(value: ObjectMap) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<FormValue>> From<Option<T>> for FormValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl FromIterator<FormValue> for FormValue {
    fn from_iter<I: IntoIterator<Item = FormValue>>(iter: I) -> Self {
        Self::Array(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, FormValue)> for FormValue {
    fn from_iter<I: IntoIterator<Item = (K, FormValue)>>(iter: I) -> Self {
        Self::Object(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn from_json_keeps_key_order() {
        let value = FormValue::from(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn parse_json_text() {
        let value = FormValue::from_json_str(r#"{"name": "Acme", "seats": 12, "tags": []}"#).unwrap();
        assert_eq!(value.get("name"), Some(&FormValue::from("Acme")));
        assert_eq!(value.get("seats"), Some(&FormValue::Number(12.0)));
        assert_eq!(value.get("tags"), Some(&FormValue::Array(Vec::new())));
    }

    #[test]
    fn parse_invalid_json_fails() {
        assert!(matches!(
            FormValue::from_json_str("{not json"),
            Err(ValueError::InvalidJson(_))
        ));
    }

    #[test]
    fn parse_yaml_text() {
        let value = FormValue::from_yaml_str("org:\n  name: Acme\n  active: true\n").unwrap();
        assert_eq!(
            value,
            FormValue::from(json!({"org": {"name": "Acme", "active": true}}))
        );
    }

    #[test]
    fn undefined_members_are_not_serialized() {
        let mut map = ObjectMap::new();
        map.insert("kept".into(), FormValue::from("x"));
        map.insert("gone".into(), FormValue::Undefined);
        map.insert("list".into(), FormValue::Array(vec![FormValue::Undefined, 1.into()]));
        let text = serde_json::to_string(&FormValue::Object(map)).unwrap();
        assert_eq!(text, r#"{"kept":"x","list":[null,1]}"#);
    }

    #[test]
    fn numbers_serialize_like_json() {
        let value = FormValue::Array(vec![
            30.into(),
            FormValue::Number(1.5),
            FormValue::Number(-0.0),
            FormValue::Number(f64::NAN),
        ]);
        assert_eq!(serde_json::to_string(&value).unwrap(), "[30,1.5,0,null]");
        assert_eq!(value.to_json(), json!([30, 1.5, 0, null]));
    }

    #[test]
    fn dates_serialize_as_rfc3339_millis() {
        let value = FormValue::date_from_millis(1_700_000_000_123).unwrap();
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#""2023-11-14T22:13:20.123Z""#
        );
    }

    #[test]
    fn date_is_truncated_to_millis() {
        let precise = DateTime::from_timestamp(1_700_000_000, 123_456_789).unwrap();
        let value = FormValue::date(precise);
        assert_eq!(value.as_date().unwrap().timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn parse_date_roundtrips_display() {
        let value = FormValue::parse_date("2024-02-29T12:00:00.250Z").unwrap();
        assert_eq!(value.to_string(), r#""2024-02-29T12:00:00.250Z""#);
        assert!(matches!(
            FormValue::parse_date("yesterday"),
            Err(ValueError::InvalidDate(_))
        ));
    }

    #[test]
    fn option_none_is_null() {
        assert_eq!(FormValue::from(None::<String>), FormValue::Null);
        assert_eq!(FormValue::from(Some("x")), FormValue::from("x"));
    }

    #[test]
    fn kind_names() {
        assert_eq!(FormValue::Undefined.kind().to_string(), "undefined");
        assert_eq!(FormValue::empty_object().kind(), ValueKind::Object);
        assert_eq!(FormValue::from(true).kind().as_str(), "boolean");
    }

    #[test]
    fn collect_into_object_and_array() {
        let object: FormValue = vec![("a", FormValue::from(1)), ("b", FormValue::Null)]
            .into_iter()
            .collect();
        assert_eq!(object, FormValue::from(json!({"a": 1, "b": null})));

        let array: FormValue = (1..=3).map(FormValue::from).collect();
        assert_eq!(array, FormValue::from(json!([1, 2, 3])));
    }
}
