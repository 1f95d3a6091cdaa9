//! Explicitly typed values
//!
//! A [`SoapVal`] carries its own element name, schema type, namespaces and
//! attributes. When the encoder meets one it hands over completely: the
//! name the caller passed for the slot is ignored.

use indexmap::IndexMap;

use crate::encoder::{ElementHints, Encoder, Use};
use crate::value::Value;

/// Value with explicit name, type and namespace hints
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SoapVal {
    /// Element name
    pub name: Option<String>,
    /// Schema type name (local part)
    pub type_name: Option<String>,
    /// Wrapped value
    pub value: Value,
    /// Namespace of the element name
    pub element_ns: Option<String>,
    /// Namespace of the type
    pub type_ns: Option<String>,
    /// Extra attributes
    pub attributes: IndexMap<String, String>,
}

impl SoapVal {
    /// Create a typed value
    pub fn new(
        name: impl Into<String>,
        type_name: Option<&str>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            type_name: type_name.map(str::to_string),
            value: value.into(),
            ..Default::default()
        }
    }

    /// Set the element namespace
    pub fn with_element_ns(mut self, namespace: impl Into<String>) -> Self {
        self.element_ns = Some(namespace.into());
        self
    }

    /// Set the type namespace
    pub fn with_type_ns(mut self, namespace: impl Into<String>) -> Self {
        self.type_ns = Some(namespace.into());
        self
    }

    /// Add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Hints describing the element this value encodes to
    pub fn hints(&self) -> ElementHints {
        ElementHints {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            name_ns: self.element_ns.clone(),
            type_ns: self.type_ns.clone(),
            attributes: self.attributes.clone(),
        }
    }

    /// Encode this value with `encoder`
    pub fn serialize(&self, encoder: &mut Encoder, use_: Use) -> String {
        encoder.encode_soapval(self, use_)
    }
}
