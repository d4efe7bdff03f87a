//! The ASTERIX record abstraction: a decoded surveillance message represented
//! as a two-level textual mapping, `{item_name -> {element_name -> value}}`,
//! plus the category and data-source id every record carries regardless of
//! category.
//!
//! This mirrors the shape decoders actually hand back (field/value pairs,
//! already parsed out of the binary frame) rather than modeling a struct
//! per ASTERIX data item.

use std::collections::HashMap;

/// A single textual value carried by a data element.
///
/// Decoders hand back already-parsed strings; numeric/hex/octal
/// interpretation happens at the point of use via the `as_*` helpers below,
/// since the same element name can mean different things across categories.
#[derive(Debug, Clone, PartialEq)]
pub struct DataElement(pub String);

impl DataElement {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse as a base-10 unsigned integer.
    pub fn as_u32(&self) -> Option<u32> {
        self.0.trim().parse().ok()
    }

    /// Parse as a base-10 floating-point number.
    pub fn as_f64(&self) -> Option<f64> {
        self.0.trim().parse().ok()
    }

    /// Parse as a hexadecimal integer (no "0x" prefix), e.g. a mode-S address.
    pub fn as_hex_u32(&self) -> Option<u32> {
        u32::from_str_radix(self.0.trim(), 16).ok()
    }

    /// Parse as an octal integer (no "0o" prefix), e.g. a mode-3A code.
    pub fn as_octal_u16(&self) -> Option<u16> {
        u16::from_str_radix(self.0.trim(), 8).ok()
    }

    /// Parse as a boolean encoded as "0"/"1".
    pub fn as_bool_bit(&self) -> Option<bool> {
        match self.0.trim() {
            "0" => Some(false),
            "1" => Some(true),
            _ => None,
        }
    }
}

/// A named group of data elements (an ASTERIX "data item", e.g. `I010`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataItem {
    elements: HashMap<String, DataElement>,
}

impl DataItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, element: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.elements
            .insert(element.into(), DataElement(value.into()));
        self
    }

    pub fn get(&self, element: &str) -> Option<&DataElement> {
        self.elements.get(element)
    }

    pub fn has(&self, element: &str) -> bool {
        self.elements.contains_key(element)
    }
}

/// A decoded surveillance record: category, data-source id, coarse timestamp,
/// and the `{item -> {element -> value}}` mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub category: u8,
    pub items: HashMap<String, DataItem>,
}

impl Record {
    pub fn new(category: u8) -> Self {
        Self {
            category,
            items: HashMap::new(),
        }
    }

    pub fn with_item(mut self, name: impl Into<String>, item: DataItem) -> Self {
        self.items.insert(name.into(), item);
        self
    }

    /// True iff the named data item is present at all.
    pub fn has_item(&self, item: &str) -> bool {
        self.items.contains_key(item)
    }

    /// True iff the named data item is present and carries the named element.
    pub fn has(&self, item: &str, element: &str) -> bool {
        self.items
            .get(item)
            .map(|i| i.has(element))
            .unwrap_or(false)
    }

    /// Read a single element's value, if both the item and element are present.
    pub fn get(&self, item: &str, element: &str) -> Option<&DataElement> {
        self.items.get(item).and_then(|i| i.get(element))
    }

    pub fn item(&self, item: &str) -> Option<&DataItem> {
        self.items.get(item)
    }
}
