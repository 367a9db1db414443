//! Element tree produced by the Uni parser.
//!
//! A document is a forest: an ordered list of top-level elements. Each element
//! has an ordered attribute list (duplicates allowed) and ordered children.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A parsed Uni document.
pub type Forest = Vec<Element>;

/// A node in the forest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Element {
    pub attributes: Vec<Attribute>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self {
            attributes,
            children: Vec::new(),
        }
    }

    pub fn with_children(attributes: Vec<Attribute>, children: Vec<Element>) -> Self {
        Self {
            attributes,
            children,
        }
    }
}

/// A named attribute on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
}

impl Attribute {
    /// `name`
    pub fn missing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::Missing,
        }
    }

    /// `name=value`
    pub fn scalar(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::Scalar(value.into()),
        }
    }

    /// `name=(item item ...)`
    pub fn list<I, S>(name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            value: AttributeValue::List(items.into_iter().map(Into::into).collect()),
        }
    }
}

/// Value of an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "value", rename_all = "lowercase"))]
pub enum AttributeValue {
    /// Bare name, no `=`.
    Missing,
    Scalar(String),
    List(Vec<String>),
}
