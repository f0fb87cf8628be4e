// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::Point;
use mapstory_geom::Envelope;

use crate::{Geometry, Style};

/// Identity of a feature within its provider.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(pub u64);

/// Attribute value attached to a feature.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    /// Text.
    Text(String),
    /// Floating point number.
    Number(f64),
    /// Integer.
    Integer(i64),
    /// Boolean flag.
    Bool(bool),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.into())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// An identity-bearing geometry plus the styles to draw it with, in order.
#[derive(Clone, Debug)]
pub struct Feature {
    /// Identity.
    pub id: FeatureId,
    /// Geometry.
    pub geometry: Geometry,
    /// Styles applied in order on draw, after the layer style.
    pub styles: Vec<Style>,
    /// Named attribute values.
    pub attributes: HashMap<String, AttributeValue>,
}

impl Feature {
    /// Creates an unstyled feature without attributes.
    pub fn new(id: FeatureId, geometry: impl Into<Geometry>) -> Self {
        Self {
            id,
            geometry: geometry.into(),
            styles: Vec::new(),
            attributes: HashMap::new(),
        }
    }

    /// Appends a style.
    #[must_use]
    pub fn with_style(mut self, style: impl Into<Style>) -> Self {
        self.styles.push(style.into());
        self
    }

    /// Sets an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Looks up an attribute.
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Bounding envelope of the geometry.
    pub fn envelope(&self) -> Option<Envelope> {
        self.geometry.envelope()
    }

    /// Center of the geometry's bounding envelope.
    pub fn centroid(&self) -> Option<Point> {
        self.geometry.centroid()
    }
}
