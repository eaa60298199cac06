//! Ordered collections of field-mapped models.

use std::ops::Index;

use serde::Serialize;
use serde_json::Value;

use crate::error::{DecodeError, Error};
use crate::model::mapping::{decode, json_kind, FieldMapped, FromWire};

/// One input element when building a collection: an already-built item or a raw JSON object.
#[derive(Debug, Clone)]
pub enum Element<T> {
    Item(T),
    Raw(Value),
}

impl<T> From<T> for Element<T> {
    fn from(item: T) -> Self {
        Self::Item(item)
    }
}

/// An ordered sequence of one model type.
///
/// Filtering never touches the receiver; it clones the matching items into a new collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// New collection with the items matching `predicate`, in their original order.
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        T: Clone,
        P: FnMut(&T) -> bool,
    {
        self.items
            .iter()
            .filter(|item| predicate(*item))
            .cloned()
            .collect()
    }

    /// First item matching `predicate`, or `NotFound` keyed by `key`.
    pub fn find_unique<P>(&self, key: &str, mut predicate: P) -> Result<&T, Error>
    where
        P: FnMut(&T) -> bool,
    {
        self.items
            .iter()
            .find(|item| predicate(*item))
            .ok_or_else(|| Error::not_found(key))
    }
}

impl<T: FieldMapped> Collection<T> {
    /// Decode a JSON array, one item per element.
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        let array = value
            .as_array()
            .ok_or_else(|| DecodeError::NotAnArray(json_kind(value)))?;
        array.iter().map(decode::<T>).collect()
    }

    /// Build from a mix of ready items and raw objects still to be decoded.
    pub fn from_elements<I>(elements: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Element<T>>,
    {
        elements
            .into_iter()
            .map(|element| match element {
                Element::Item(item) => Ok(item),
                Element::Raw(raw) => decode::<T>(&raw),
            })
            .collect()
    }
}

impl<T: FieldMapped> FromWire for Collection<T> {
    fn from_wire(_attr: &'static str, value: &Value) -> Result<Self, Error> {
        Self::from_json(value)
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Index<usize> for Collection<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Application, Applications};
    use serde_json::json;

    fn apps() -> Applications {
        Collection::from_json(&json!([
            {"id": 4, "name": "ECommerce", "description": null},
            {"id": 5, "name": "Fulfillment", "description": "old"},
            {"id": 6, "name": "Fulfillment", "description": null}
        ]))
        .unwrap()
    }

    #[test]
    fn decodes_each_element_in_order() {
        let apps = apps();
        assert_eq!(apps.len(), 3);
        assert_eq!(apps[0].id, 4);
        assert_eq!(apps[2].id, 6);
    }

    #[test]
    fn filter_returns_new_collection_and_leaves_source() {
        let apps = apps();
        let before = apps.clone();
        let hits = apps.filter(|a| a.name == "Fulfillment");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, 5);
        assert_eq!(hits[1].id, 6);
        assert_eq!(apps, before);
    }

    #[test]
    fn find_unique_returns_first_match() {
        let apps = apps();
        assert_eq!(apps.find_unique("Fulfillment", |a| a.name == "Fulfillment").unwrap().id, 5);
        let err = apps.find_unique("Nope", |a| a.name == "Nope").unwrap_err();
        assert!(matches!(err, Error::NotFound { key } if key == "Nope"));
    }

    #[test]
    fn mixes_items_and_raw_objects() {
        let ready = Application {
            id: 1,
            name: "Ready".to_string(),
            description: None,
        };
        let apps = Collection::from_elements(vec![
            Element::from(ready.clone()),
            Element::Raw(json!({"id": 2, "name": "Raw", "description": null})),
        ])
        .unwrap();
        assert_eq!(apps[0], ready);
        assert_eq!(apps[1].name, "Raw");
    }

    #[test]
    fn non_array_is_rejected() {
        let err = Applications::from_json(&json!({"id": 1})).unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::NotAnArray("object"))));
    }

    #[test]
    fn one_bad_element_fails_the_whole_decode() {
        let err = Applications::from_json(&json!([
            {"id": 1, "name": "ok", "description": null},
            {"id": 2, "description": null}
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::MissingField { field: "name", .. })
        ));
    }
}
