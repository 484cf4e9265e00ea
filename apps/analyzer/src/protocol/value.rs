//! Recursive tagged value tree produced by the binary decoder.

use serde_json::{Map, Number, Value};

/// Wire type tags of the tagged binary format.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TypeTag {
    Null,
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Str,
    BoolArray,
    ByteArray,
    ShortArray,
    IntArray,
    LongArray,
    FloatArray,
    DoubleArray,
    StrArray,
    Array,
    Object,
    Class,
    Text,
}

impl TypeTag {
    pub fn from_u8(tag: u8) -> Option<TypeTag> {
        let t = match tag {
            0 => TypeTag::Null,
            1 => TypeTag::Bool,
            2 => TypeTag::Byte,
            3 => TypeTag::Short,
            4 => TypeTag::Int,
            5 => TypeTag::Long,
            6 => TypeTag::Float,
            7 => TypeTag::Double,
            8 => TypeTag::Str,
            9 => TypeTag::BoolArray,
            10 => TypeTag::ByteArray,
            11 => TypeTag::ShortArray,
            12 => TypeTag::IntArray,
            13 => TypeTag::LongArray,
            14 => TypeTag::FloatArray,
            15 => TypeTag::DoubleArray,
            16 => TypeTag::StrArray,
            17 => TypeTag::Array,
            18 => TypeTag::Object,
            19 => TypeTag::Class,
            20 => TypeTag::Text,
            _ => return None,
        };
        Some(t)
    }

    pub const fn as_u8(self) -> u8 {
        match self {
            TypeTag::Null => 0,
            TypeTag::Bool => 1,
            TypeTag::Byte => 2,
            TypeTag::Short => 3,
            TypeTag::Int => 4,
            TypeTag::Long => 5,
            TypeTag::Float => 6,
            TypeTag::Double => 7,
            TypeTag::Str => 8,
            TypeTag::BoolArray => 9,
            TypeTag::ByteArray => 10,
            TypeTag::ShortArray => 11,
            TypeTag::IntArray => 12,
            TypeTag::LongArray => 13,
            TypeTag::FloatArray => 14,
            TypeTag::DoubleArray => 15,
            TypeTag::StrArray => 16,
            TypeTag::Array => 17,
            TypeTag::Object => 18,
            TypeTag::Class => 19,
            TypeTag::Text => 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    BoolArray(Vec<bool>),
    ByteArray(Vec<u8>),
    ShortArray(Vec<i16>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    FloatArray(Vec<f32>),
    DoubleArray(Vec<f64>),
    StrArray(Vec<String>),
    Array(Vec<DecodedValue>),
    /// Named fields in wire order.
    Object(Vec<(String, DecodedValue)>),
}

impl DecodedValue {
    /// Field lookup on objects; `None` for every other variant.
    pub fn get(&self, key: &str) -> Option<&DecodedValue> {
        match self {
            DecodedValue::Object(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let fields: &[(String, DecodedValue)] = match self {
            DecodedValue::Object(fields) => fields,
            _ => &[],
        };
        fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_object(&self) -> bool {
        matches!(self, DecodedValue::Object(_))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            DecodedValue::Byte(v) => Some(i64::from(v)),
            DecodedValue::Short(v) => Some(i64::from(v)),
            DecodedValue::Int(v) => Some(i64::from(v)),
            DecodedValue::Long(v) => Some(v),
            DecodedValue::Bool(v) => Some(i64::from(v)),
            DecodedValue::Str(ref s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodedValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view over any homogeneous integer array or a heterogeneous array of integers.
    pub fn as_i64_vec(&self) -> Option<Vec<i64>> {
        match self {
            DecodedValue::ByteArray(v) => Some(v.iter().map(|&b| i64::from(b as i8)).collect()),
            DecodedValue::ShortArray(v) => Some(v.iter().map(|&x| i64::from(x)).collect()),
            DecodedValue::IntArray(v) => Some(v.iter().map(|&x| i64::from(x)).collect()),
            DecodedValue::LongArray(v) => Some(v.clone()),
            DecodedValue::Array(items) => items.iter().map(DecodedValue::as_i64).collect(),
            _ => None,
        }
    }

    pub fn as_str_vec(&self) -> Option<Vec<&str>> {
        match self {
            DecodedValue::StrArray(v) => Some(v.iter().map(String::as_str).collect()),
            DecodedValue::Array(items) => items.iter().map(DecodedValue::as_str).collect(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DecodedValue]> {
        match self {
            DecodedValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// JSON view of the tree; non-finite floats become `null`.
    pub fn to_json(&self) -> Value {
        fn float(v: f64) -> Value {
            Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
        }
        match self {
            DecodedValue::Null => Value::Null,
            DecodedValue::Bool(v) => Value::Bool(*v),
            DecodedValue::Byte(v) => Value::from(*v),
            DecodedValue::Short(v) => Value::from(*v),
            DecodedValue::Int(v) => Value::from(*v),
            DecodedValue::Long(v) => Value::from(*v),
            DecodedValue::Float(v) => float(f64::from(*v)),
            DecodedValue::Double(v) => float(*v),
            DecodedValue::Str(s) => Value::String(s.clone()),
            DecodedValue::BoolArray(v) => Value::from(v.clone()),
            DecodedValue::ByteArray(v) => Value::from(v.clone()),
            DecodedValue::ShortArray(v) => Value::from(v.clone()),
            DecodedValue::IntArray(v) => Value::from(v.clone()),
            DecodedValue::LongArray(v) => Value::from(v.clone()),
            DecodedValue::FloatArray(v) => {
                Value::Array(v.iter().map(|&x| float(f64::from(x))).collect())
            }
            DecodedValue::DoubleArray(v) => Value::Array(v.iter().map(|&x| float(x)).collect()),
            DecodedValue::StrArray(v) => Value::from(v.clone()),
            DecodedValue::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            DecodedValue::Object(fields) => {
                let mut map = Map::with_capacity(fields.len());
                for (k, v) in fields {
                    map.insert(k.clone(), v.to_json());
                }
                Value::Object(map)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(fields: Vec<(&str, DecodedValue)>) -> DecodedValue {
        DecodedValue::Object(fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    #[test]
    fn tag_round_trip() {
        for raw in 0..=20u8 {
            let tag = TypeTag::from_u8(raw).unwrap();
            assert_eq!(tag.as_u8(), raw);
        }
        assert_eq!(TypeTag::from_u8(21), None);
    }

    #[test]
    fn lookups_and_views() {
        let v = obj(vec![
            ("a", DecodedValue::Short(7)),
            ("t", DecodedValue::IntArray(vec![12, -1, 3, 4])),
            ("b", DecodedValue::ByteArray(vec![0xFF, 2])),
            ("n", DecodedValue::StrArray(vec!["x".into(), "y".into()])),
        ]);
        assert_eq!(v.get("a").and_then(DecodedValue::as_i64), Some(7));
        assert_eq!(
            v.get("t").and_then(DecodedValue::as_i64_vec),
            Some(vec![12, -1, 3, 4])
        );
        assert_eq!(
            v.get("b").and_then(DecodedValue::as_i64_vec),
            Some(vec![-1, 2])
        );
        assert_eq!(
            v.get("n").and_then(DecodedValue::as_str_vec),
            Some(vec!["x", "y"])
        );
        assert_eq!(v.keys().collect::<Vec<_>>(), vec!["a", "t", "b", "n"]);
        assert!(DecodedValue::Int(1).get("a").is_none());
    }

    #[test]
    fn json_view_keeps_structure() {
        let v = obj(vec![
            ("c", DecodedValue::Str("a_bid".into())),
            ("f", DecodedValue::Double(f64::NAN)),
        ]);
        assert_eq!(
            v.to_json(),
            serde_json::json!({"c": "a_bid", "f": null})
        );
    }
}
