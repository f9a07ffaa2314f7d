use std::fmt::{Debug, Display, Formatter};

use crate::bson::Value;
use crate::errors::{BsonError, BsonResult, ErrorKind};

/// A named value inside a [Document].
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    name: String,
    value: Value,
}

impl Element {
    pub fn new(name: &str, value: Value) -> Self {
        Element {
            name: name.to_string(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    pub fn into_parts(self) -> (String, Value) {
        (self.name, self.value)
    }
}

impl Debug for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\": {}", self.name, self.value.to_debug_string(0))
    }
}

/// An ordered sequence of named values.
///
/// Insertion order is preserved and is the order elements are written in.
/// Whether an element name may occur more than once is fixed when the
/// document is created and checked on every insertion.
///
/// # Examples
///
/// ```rust
/// use bsonkit::bson::{Document, Value};
///
/// let mut document = Document::new();
/// document.insert("b", Value::Int32(1)).unwrap();
/// document.insert("a", Value::Int32(2)).unwrap();
/// assert_eq!(document.names().collect::<Vec<_>>(), vec!["b", "a"]);
///
/// // names are unique unless the document was created to allow duplicates
/// assert!(document.insert("a", Value::Null).is_err());
///
/// let mut lenient = Document::with_options(true);
/// lenient.insert("a", Value::Int32(1)).unwrap();
/// lenient.insert("a", Value::Int32(2)).unwrap();
/// assert_eq!(lenient.len(), 2);
/// ```
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    elements: Vec<Element>,
    allow_duplicate_names: bool,
}

impl Document {
    /// Creates an empty document that rejects duplicate element names.
    pub fn new() -> Self {
        Document {
            elements: Vec::new(),
            allow_duplicate_names: false,
        }
    }

    /// Creates an empty document with the given duplicate-name policy.
    pub fn with_options(allow_duplicate_names: bool) -> Self {
        Document {
            elements: Vec::new(),
            allow_duplicate_names,
        }
    }

    pub fn allow_duplicate_names(&self) -> bool {
        self.allow_duplicate_names
    }

    /// Appends an element.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::DuplicateName` if the document rejects duplicates
    /// and `name` is already present. The document is left unchanged.
    pub fn insert(&mut self, name: &str, value: Value) -> BsonResult<()> {
        self.check_duplicate(name)?;
        self.elements.push(Element::new(name, value));
        Ok(())
    }

    /// Inserts an element at `index`, shifting later elements.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::Argument` if `index` is past the end, or
    /// `ErrorKind::DuplicateName` as for [Document::insert].
    pub fn insert_at(&mut self, index: usize, name: &str, value: Value) -> BsonResult<()> {
        if index > self.elements.len() {
            log::error!(
                "Insert position {} is out of range for a document of {} elements",
                index,
                self.elements.len()
            );
            return Err(BsonError::new(
                &format!(
                    "Insert position {} is out of range for a document of {} elements",
                    index,
                    self.elements.len()
                ),
                ErrorKind::Argument,
            ));
        }

        self.check_duplicate(name)?;
        self.elements.insert(index, Element::new(name, value));
        Ok(())
    }

    /// Replaces the value of the first element called `name`, or appends a
    /// new element if there is none.
    pub fn set(&mut self, name: &str, value: Value) {
        match self.get_mut(name) {
            Some(existing) => *existing = value,
            None => self.elements.push(Element::new(name, value)),
        }
    }

    /// Returns the value of the first element called `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.get_element(name).map(|element| &element.value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.elements
            .iter_mut()
            .find(|element| element.name == name)
            .map(|element| &mut element.value)
    }

    pub fn get_element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|element| element.name == name)
    }

    /// Returns the index of the first element called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.elements.iter().position(|element| element.name == name)
    }

    pub fn element_at(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Removes every element called `name` and returns the first removed value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.position(name)?;
        let removed = self.elements.remove(index);
        self.elements.retain(|element| element.name != name);
        Some(removed.value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|element| element.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    fn check_duplicate(&self, name: &str) -> BsonResult<()> {
        if !self.allow_duplicate_names && self.contains_key(name) {
            log::error!("Duplicate element name '{}'", name);
            return Err(BsonError::new(
                &format!("Duplicate element name '{}'", name),
                ErrorKind::DuplicateName,
            ));
        }
        Ok(())
    }

    pub(crate) fn to_pretty_json(&self, indent: usize) -> String {
        if self.elements.is_empty() {
            return "{}".to_string();
        }

        let mut json_string = String::with_capacity(self.elements.len() * 30 + indent * 2);
        json_string.push_str("{\n");
        let indent_str = " ".repeat(indent + 2);
        for element in &self.elements {
            json_string.push_str(&format!(
                "{}\"{}\": {},\n",
                indent_str,
                element.name,
                element.value.to_pretty_json(indent + 2)
            ));
        }

        json_string.pop();
        json_string.pop();
        json_string.push_str(&format!("\n{}}}", " ".repeat(indent)));
        json_string
    }

    pub(crate) fn to_debug_string(&self, indent: usize) -> String {
        if self.elements.is_empty() {
            return "{}".to_string();
        }

        let mut debug_string = String::new();
        debug_string.push_str("{\n");
        let indent_str = " ".repeat(indent + 2);
        for element in &self.elements {
            debug_string.push_str(&format!(
                "{}\"{}\": {},\n",
                indent_str,
                element.name,
                element.value.to_debug_string(indent + 2)
            ));
        }

        debug_string.pop();
        debug_string.pop();
        debug_string.push_str(&format!("\n{}}}", " ".repeat(indent)));
        debug_string
    }
}

// The duplicate-name policy is not part of a document's content.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_pretty_json(0))
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_debug_string(0))
    }
}

impl IntoIterator for Document {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// Strips the quotes `stringify!` leaves around string-literal keys.
#[doc(hidden)]
pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a [Document] with JSON-like syntax.
///
/// Keys may be identifiers or string literals; nested `{ }` become embedded
/// documents and `[ ]` become arrays. Element order follows the source.
///
/// # Examples
///
/// ```rust
/// use bsonkit::doc;
///
/// let empty = doc! {};
/// assert!(empty.is_empty());
///
/// let document = doc! {
///     "_id": 1,
///     name: "Alice",
///     address: { city: "Paris", zip: [7, 5, 0] },
/// };
/// assert_eq!(document.names().collect::<Vec<_>>(), vec!["_id", "name", "address"]);
/// ```
#[macro_export]
macro_rules! doc {
    ({}) => {
        $crate::bson::Document::new()
    };

    () => {
        $crate::bson::Document::new()
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::doc!($($key : $value),*)
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::bson::Document::new();
            $(
                doc.insert(&$crate::bson::normalize(stringify!($key)), $crate::doc_value!($value))
                .expect(&format!("Failed to insert value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Helper macro to convert values for the doc! macro.
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        {
            $crate::bson::Value::Document($crate::doc!{ $($key : $value),* })
        }
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::bson::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::bson::Value::from($value)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    fn set_up() -> Document {
        doc! {
            score: 1034,
            location: {
                state: "NY",
                city: "New York",
                address: {
                    line1: "40",
                    house: ["1", "2", "3"],
                    zip: 10001,
                },
            },
            category: ["food", "produce", "grocery"],
        }
    }

    #[test]
    fn test_doc_macro_preserves_order() {
        let document = set_up();
        assert_eq!(
            document.names().collect::<Vec<_>>(),
            vec!["score", "location", "category"]
        );
        let location = document.get("location").and_then(|v| v.as_document()).unwrap();
        assert_eq!(location.get("city"), Some(&Value::from("New York")));
        let address = location.get("address").and_then(|v| v.as_document()).unwrap();
        assert_eq!(address.get("house").and_then(|v| v.as_array()).unwrap().len(), 3);
    }

    #[test]
    fn test_doc_macro_with_quoted_keys() {
        let document = doc! { "_id": 1, "a b": true };
        assert_eq!(document.names().collect::<Vec<_>>(), vec!["_id", "a b"]);
    }

    #[test]
    fn test_insert_rejects_duplicates_and_leaves_document_unchanged() {
        let mut document = doc! { a: 1, b: 2 };
        let err = document.insert("a", Value::Int32(3)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::DuplicateName);
        assert_eq!(document.len(), 2);
        assert_eq!(document.get("a"), Some(&Value::Int32(1)));
    }

    #[test]
    fn test_insert_allows_duplicates_when_enabled() {
        let mut document = Document::with_options(true);
        document.insert("a", Value::Int32(1)).unwrap();
        document.insert("a", Value::Int32(2)).unwrap();
        assert_eq!(document.len(), 2);
        assert_eq!(document.get("a"), Some(&Value::Int32(1)));
        assert!(document.allow_duplicate_names());
    }

    #[test]
    fn test_insert_at() {
        let mut document = doc! { a: 1, b: 2 };
        document.insert_at(0, "_id", Value::Int32(0)).unwrap();
        assert_eq!(document.names().collect::<Vec<_>>(), vec!["_id", "a", "b"]);

        document.insert_at(3, "c", Value::Int32(3)).unwrap();
        assert_eq!(document.position("c"), Some(3));
    }

    #[test]
    fn test_insert_at_out_of_range() {
        let mut document = doc! { a: 1 };
        let err = document.insert_at(5, "b", Value::Int32(2)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Argument);
        assert_eq!(document.len(), 1);
    }

    #[test]
    fn test_insert_at_rejects_duplicates() {
        let mut document = doc! { a: 1 };
        let err = document.insert_at(0, "a", Value::Int32(2)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::DuplicateName);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut document = doc! { a: 1, b: 2, c: 3 };
        document.set("b", Value::from("two"));
        assert_eq!(document.position("b"), Some(1));
        assert_eq!(document.get("b"), Some(&Value::from("two")));

        document.set("d", Value::Int32(4));
        assert_eq!(document.position("d"), Some(3));
    }

    #[test]
    fn test_remove() {
        let mut document = Document::with_options(true);
        document.insert("a", Value::Int32(1)).unwrap();
        document.insert("b", Value::Int32(2)).unwrap();
        document.insert("a", Value::Int32(3)).unwrap();

        assert_eq!(document.remove("a"), Some(Value::Int32(1)));
        assert_eq!(document.names().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(document.remove("missing"), None);
    }

    #[test]
    fn test_element_access() {
        let document = doc! { a: 1 };
        let element = document.get_element("a").unwrap();
        assert_eq!(element.name(), "a");
        assert_eq!(element.value(), &Value::Int32(1));
        assert_eq!(document.element_at(0), Some(element));
        assert!(document.element_at(1).is_none());
    }

    #[test]
    fn test_iteration() {
        let document = doc! { x: 1, y: 2 };
        let names: Vec<String> = (&document).into_iter().map(|e| e.name().to_string()).collect();
        assert_eq!(names, vec!["x", "y"]);

        let values: Vec<Value> = document.into_iter().map(|e| e.into_parts().1).collect();
        assert_eq!(values, vec![Value::Int32(1), Value::Int32(2)]);
    }

    #[test]
    fn test_equality_ignores_policy() {
        let mut lenient = Document::with_options(true);
        lenient.insert("a", Value::Int32(1)).unwrap();
        assert_eq!(lenient, doc! { a: 1 });
        assert_ne!(doc! { a: 1, b: 2 }, doc! { b: 2, a: 1 });
    }

    #[test]
    fn test_display() {
        let document = doc! { a: 1, b: { c: "d" } };
        assert_eq!(
            document.to_string(),
            "{\n  \"a\": 1,\n  \"b\": {\n    \"c\": \"d\"\n  }\n}"
        );
        assert_eq!(Document::new().to_string(), "{}");
    }

    #[test]
    fn test_debug() {
        let document = doc! { a: 1 };
        assert_eq!(format!("{:?}", document), "{\n  \"a\": i32(1)\n}");
    }
}
