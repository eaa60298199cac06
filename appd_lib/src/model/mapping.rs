//! Field-map driven decoding.

use serde_json::{Map, Value};

use crate::error::{DecodeError, Error};

/// One entry of a field map: attribute name and wire key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub attr: &'static str,
    pub wire: &'static str,
}

impl Field {
    pub const fn new(attr: &'static str, wire: &'static str) -> Self {
        Self { attr, wire }
    }

    /// JSON key to read; an empty wire name means the attribute name itself.
    pub fn wire_key(&self) -> &'static str {
        if self.wire.is_empty() {
            self.attr
        } else {
            self.wire
        }
    }
}

/// A model decoded from a JSON object through a static field map.
pub trait FieldMapped: Default + Sized {
    const TYPE_NAME: &'static str;
    const FIELDS: &'static [Field];

    /// Assign one mapped attribute from its raw JSON value.
    fn assign(&mut self, attr: &'static str, value: &Value) -> Result<(), Error>;

    /// Runs after every mapped field has been assigned.
    fn decode_extra(&mut self, _object: &Map<String, Value>) -> Result<(), Error> {
        Ok(())
    }

    fn from_json(value: &Value) -> Result<Self, Error> {
        decode(value)
    }
}

/// Build a default `T` and populate it from `value` using `T::FIELDS`.
pub fn decode<T: FieldMapped>(value: &Value) -> Result<T, Error> {
    let object = value
        .as_object()
        .ok_or_else(|| DecodeError::NotAnObject(json_kind(value)))?;
    let mut item = T::default();
    for field in T::FIELDS {
        let key = field.wire_key();
        let raw = object.get(key).ok_or(DecodeError::MissingField {
            type_name: T::TYPE_NAME,
            field: key,
        })?;
        item.assign(field.attr, raw)?;
    }
    item.decode_extra(object)?;
    Ok(item)
}

/// Name of a JSON value's kind, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Conversion from a raw JSON value into an attribute type.
pub trait FromWire: Sized {
    fn from_wire(attr: &'static str, value: &Value) -> Result<Self, Error>;
}

fn mismatch(attr: &'static str, expected: &'static str, value: &Value) -> Error {
    DecodeError::InvalidType {
        attribute: attr,
        expected,
        found: json_kind(value),
    }
    .into()
}

macro_rules! impl_from_wire {
    ( $( $ty:ty => $conv:ident, $expected:literal ),* $(,)? ) => {
        $(
            impl FromWire for $ty {
                fn from_wire(attr: &'static str, value: &Value) -> Result<Self, Error> {
                    value
                        .$conv()
                        .map(Into::into)
                        .ok_or_else(|| mismatch(attr, $expected, value))
                }
            }
        )*
    };
}

impl_from_wire! {
    i64 => as_i64, "integer",
    u64 => as_u64, "unsigned integer",
    f64 => as_f64, "number",
    bool => as_bool, "boolean",
    String => as_str, "string",
}

impl FromWire for Value {
    fn from_wire(_attr: &'static str, value: &Value) -> Result<Self, Error> {
        Ok(value.clone())
    }
}

impl<T: FromWire> FromWire for Option<T> {
    fn from_wire(attr: &'static str, value: &Value) -> Result<Self, Error> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_wire(attr, value).map(Some)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq)]
    struct Probe {
        id: i64,
        label: String,
        note: Option<String>,
        nested_seen: bool,
    }

    impl FieldMapped for Probe {
        const TYPE_NAME: &'static str = "Probe";
        const FIELDS: &'static [Field] = &[
            Field::new("id", ""),
            Field::new("label", "displayName"),
            Field::new("note", ""),
        ];

        fn assign(&mut self, attr: &'static str, value: &Value) -> Result<(), Error> {
            match attr {
                "id" => self.id = FromWire::from_wire(attr, value)?,
                "label" => self.label = FromWire::from_wire(attr, value)?,
                "note" => self.note = FromWire::from_wire(attr, value)?,
                _ => unreachable!(),
            }
            Ok(())
        }

        fn decode_extra(&mut self, object: &Map<String, Value>) -> Result<(), Error> {
            self.nested_seen = object.contains_key("nested");
            Ok(())
        }
    }

    #[test]
    fn wire_key_defaults_to_attribute() {
        assert_eq!(Field::new("id", "").wire_key(), "id");
        assert_eq!(Field::new("tier_id", "tierId").wire_key(), "tierId");
    }

    #[test]
    fn decode_copies_mapped_fields_and_ignores_others() {
        let probe: Probe = decode(&json!({
            "id": 7,
            "displayName": "seven",
            "note": null,
            "unmapped": [1, 2, 3],
            "nested": {}
        }))
        .unwrap();
        assert_eq!(
            probe,
            Probe {
                id: 7,
                label: "seven".to_string(),
                note: None,
                nested_seen: true,
            }
        );
    }

    #[test]
    fn missing_wire_key_fails() {
        let err = decode::<Probe>(&json!({"id": 7, "note": "x"})).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::MissingField {
                type_name: "Probe",
                field: "displayName"
            })
        ));
    }

    #[test]
    fn wrong_type_names_attribute() {
        let err = decode::<Probe>(&json!({"id": "7", "displayName": "x", "note": null}))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::InvalidType {
                attribute: "id",
                expected: "integer",
                found: "string"
            })
        ));
    }

    #[test]
    fn non_object_is_rejected() {
        let err = decode::<Probe>(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::NotAnObject("array"))));
    }

    #[test]
    fn floats_accept_integers() {
        assert_eq!(f64::from_wire("avg", &json!(100)).unwrap(), 100.0);
    }
}
