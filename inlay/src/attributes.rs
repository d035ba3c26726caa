// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use hashbrown::HashMap;

use crate::Font;

/// Key of a run attribute.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    /// The font used to lay out text and size attachments.
    Font,
    /// Foreground color.
    Foreground,
    /// Link destination.
    Link,
    /// An application-defined attribute.
    Custom(Arc<str>),
}

/// Value of a run attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    /// A font.
    Font(Font),
    /// An RGBA color.
    Color([u8; 4]),
    /// A string, such as a link destination.
    Text(Arc<str>),
    /// A number.
    Number(f64),
}

/// The attributes of a run: a map with unique keys.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    map: HashMap<AttributeKey, AttributeValue>,
}

impl Attributes {
    /// Creates an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the set with the font attribute set to `font`.
    #[must_use]
    pub fn with_font(mut self, font: Font) -> Self {
        self.insert(AttributeKey::Font, AttributeValue::Font(font));
        self
    }

    /// Returns the set with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: AttributeKey, value: AttributeValue) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets `key` to `value`, returning the previous value.
    pub fn insert(&mut self, key: AttributeKey, value: AttributeValue) -> Option<AttributeValue> {
        self.map.insert(key, value)
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &AttributeKey) -> Option<AttributeValue> {
        self.map.remove(key)
    }

    /// The value of `key`.
    pub fn get(&self, key: &AttributeKey) -> Option<&AttributeValue> {
        self.map.get(key)
    }

    /// The font attribute, if set to a font.
    pub fn font(&self) -> Option<&Font> {
        match self.map.get(&AttributeKey::Font)? {
            AttributeValue::Font(font) => Some(font),
            _ => None,
        }
    }

    /// The number of attributes.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over the attributes in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&AttributeKey, &AttributeValue)> {
        self.map.iter()
    }
}
