//! Attributes restricted to a fixed set of controller enumeration values.

use std::fmt;
use std::marker::PhantomData;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{DecodeError, Error, ValidationError};
use crate::model::mapping::{json_kind, FromWire};

/// The allowed values of one constrained attribute.
pub trait Domain {
    /// Attribute name reported in validation errors.
    const ATTRIBUTE: &'static str;
    const ALLOWED: &'static [&'static str];
}

/// Check `value` against `allowed`.
///
/// An absent or empty value always passes and means "unset"; anything else
/// must be a member of `allowed`. Returns the value to store.
pub fn validate_enum(
    attribute: &'static str,
    value: Option<&str>,
    allowed: &'static [&'static str],
) -> Result<Option<String>, ValidationError> {
    match value {
        None | Some("") => Ok(None),
        Some(v) if allowed.contains(&v) => Ok(Some(v.to_string())),
        Some(v) => Err(ValidationError::InvalidEnumValue {
            attribute,
            allowed,
            value: v.to_string(),
        }),
    }
}

/// A string attribute whose value is always unset or a member of `D::ALLOWED`.
pub struct Constrained<D> {
    value: Option<String>,
    domain: PhantomData<D>,
}

impl<D: Domain> Constrained<D> {
    pub fn new() -> Self {
        Self {
            value: None,
            domain: PhantomData,
        }
    }

    /// Build a set value, rejecting anything outside the domain.
    pub fn try_new(value: &str) -> Result<Self, ValidationError> {
        let mut c = Self::new();
        c.set(Some(value))?;
        Ok(c)
    }

    /// Assign a new value. On rejection the previous value is kept.
    pub fn set(&mut self, value: Option<&str>) -> Result<(), ValidationError> {
        self.value = validate_enum(D::ATTRIBUTE, value, D::ALLOWED)?;
        Ok(())
    }

    pub fn get(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn allowed() -> &'static [&'static str] {
        D::ALLOWED
    }
}

impl<D: Domain> Default for Constrained<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for Constrained<D> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            domain: PhantomData,
        }
    }
}

impl<D> PartialEq for Constrained<D> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<D> Eq for Constrained<D> {}

impl<D> PartialEq<&str> for Constrained<D> {
    fn eq(&self, other: &&str) -> bool {
        self.value.as_deref() == Some(*other)
    }
}

impl<D> fmt::Debug for Constrained<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.value, f)
    }
}

impl<D> fmt::Display for Constrained<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value.as_deref().unwrap_or(""))
    }
}

impl<D> Serialize for Constrained<D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<D: Domain> FromWire for Constrained<D> {
    fn from_wire(attr: &'static str, value: &Value) -> Result<Self, Error> {
        let mut c = Self::new();
        match value {
            Value::Null => {}
            Value::String(s) => c.set(Some(s.as_str()))?,
            other => {
                return Err(DecodeError::InvalidType {
                    attribute: attr,
                    expected: "string",
                    found: json_kind(other),
                }
                .into())
            }
        }
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    domain!(Frequency, "frequency", ["ONE_MIN", "TEN_MIN", "SIXTY_MIN"]);

    #[test]
    fn allowed_values_are_stored() {
        for v in Constrained::<Frequency>::allowed() {
            let c = Constrained::<Frequency>::try_new(v).unwrap();
            assert_eq!(c.get(), Some(*v));
        }
    }

    #[test]
    fn empty_and_absent_unset_the_value() {
        let mut c = Constrained::<Frequency>::try_new("TEN_MIN").unwrap();
        c.set(Some("")).unwrap();
        assert!(!c.is_set());
        c.set(Some("ONE_MIN")).unwrap();
        c.set(None).unwrap();
        assert_eq!(c.get(), None);
    }

    #[test]
    fn rejected_value_keeps_previous() {
        let mut c = Constrained::<Frequency>::try_new("SIXTY_MIN").unwrap();
        let err = c.set(Some("FIVE_MIN")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidEnumValue {
                attribute: "frequency",
                allowed: &["ONE_MIN", "TEN_MIN", "SIXTY_MIN"],
                value: "FIVE_MIN".to_string(),
            }
        );
        assert_eq!(c, "SIXTY_MIN");
    }

    #[test]
    fn decoding_validates_and_accepts_null() {
        assert!(Constrained::<Frequency>::from_wire("frequency", &json!(null))
            .unwrap()
            .get()
            .is_none());
        assert!(matches!(
            Constrained::<Frequency>::from_wire("frequency", &json!("HOURLY")),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            Constrained::<Frequency>::from_wire("frequency", &json!(1)),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn validate_enum_free_function() {
        assert_eq!(validate_enum("x", Some(""), &["A"]).unwrap(), None);
        assert_eq!(
            validate_enum("x", Some("A"), &["A"]).unwrap(),
            Some("A".to_string())
        );
        assert!(validate_enum("x", Some("B"), &["A"]).is_err());
    }
}
