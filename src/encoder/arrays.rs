//! Array encoding
//!
//! Sequences and integer-keyed mappings encode as SOAP arrays. In encoded
//! mode the wrapping element carries `SOAP-ENC:arrayType="T[n]"` where `T`
//! is inferred from the distinct kinds of the items.

use indexmap::IndexSet;

use super::{ElementHints, Encoder, Tag, Use};
use crate::config::ArrayItemNaming;
use crate::names;
use crate::value::{classify_mapping, MappingKind, Value};

/// Array type emitted for an array of untyped structs. Such arrays need
/// explicitly typed items to get a meaningful `arrayType`.
pub const UNNAMED_STRUCT_TYPE: &str = "unnamed_struct_use_soapval";

/// Kind of an array item, as far as array type inference cares
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ItemKind {
    /// Scalar with a built-in type name
    Native(&'static str),
    /// Nested array
    SimpleArray,
    /// Nested struct without a type
    Struct,
    /// Null item
    Nil,
    /// Item with a type of its own
    Declared {
        type_name: String,
        type_ns: Option<String>,
    },
}

impl ItemKind {
    pub(crate) fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Nil,
            Value::Bool(_) => Self::Native("boolean"),
            Value::Int(_) => Self::Native("integer"),
            Value::UInt(_) => Self::Native("unsignedLong"),
            Value::Float(_) => Self::Native("double"),
            Value::Text(_) => Self::Native("string"),
            Value::Bytes(_) => Self::Native("base64Binary"),
            Value::Sequence(_) => Self::SimpleArray,
            Value::Mapping(mapping) => match classify_mapping(mapping) {
                MappingKind::Simple => Self::SimpleArray,
                MappingKind::Struct => Self::Struct,
            },
            Value::Composite(composite) if composite.type_name.is_empty() => Self::Struct,
            Value::Composite(composite) => Self::Declared {
                type_name: composite.type_name.clone(),
                type_ns: None,
            },
            Value::Typed(val) => match val.type_name.as_deref().filter(|t| !t.is_empty()) {
                Some(type_name) => Self::Declared {
                    type_name: type_name.to_string(),
                    type_ns: val.type_ns.clone(),
                },
                None => Self::of(&val.value),
            },
            Value::Opaque { kind, .. } => Self::Declared {
                type_name: kind.clone(),
                type_ns: None,
            },
        }
    }
}

impl Encoder {
    pub(super) fn serialize_array(
        &mut self,
        tag: &Tag,
        hints: &ElementHints,
        items: &[&Value],
        use_: Use,
    ) -> String {
        self.log.debug("serialize_val: serialize array");

        if self.repeats_items(use_) {
            return self.serialize_repeated(hints, items, use_);
        }
        self.serialize_wrapped_array(tag, items, use_)
    }

    fn repeats_items(&self, use_: Use) -> bool {
        use_.is_literal() && self.config.literal_array_items() == ArrayItemNaming::ElementName
    }

    fn serialize_wrapped_array(&mut self, tag: &Tag, items: &[&Value], use_: Use) -> String {
        let item_hints = ElementHints::named("item");
        let mut kinds = IndexSet::new();
        let mut content = String::new();
        for item in items {
            kinds.insert(ItemKind::of(item));
            let xml = match array_items(item) {
                Some(nested) if self.repeats_items(use_) => {
                    let item_tag = self.open_tag(item, &item_hints);
                    self.serialize_wrapped_array(&item_tag, &nested, use_)
                }
                _ => self.serialize_val(item, &item_hints, use_, false),
            };
            content.push_str(&xml);
        }

        let mut xmlns = tag.xmlns.clone();
        let type_attr = if use_.is_literal() {
            String::new()
        } else if !tag.type_attr.is_empty() {
            tag.type_attr.clone()
        } else {
            let array_type = if items.is_empty() {
                "xsd:anyType".to_string()
            } else {
                self.array_type_name(&kinds, &mut xmlns)
            };
            self.mark_used("xsi");
            self.mark_used("SOAP-ENC");
            // the array type is a QName in attribute content
            if let Some(prefix) = names::prefix_of(&array_type) {
                self.mark_used(prefix);
            }
            format!(
                " xsi:type=\"SOAP-ENC:Array\" SOAP-ENC:arrayType=\"{}[{}]\"",
                array_type,
                items.len()
            )
        };

        format!(
            "<{}{}{}{}>{}</{}>",
            tag.name, xmlns, type_attr, tag.atts, content, tag.name
        )
    }

    /// Literal arrays with [`ArrayItemNaming::ElementName`]: one element per
    /// item, each named like the array, and no wrapper. Items that are arrays
    /// themselves keep a wrapper so their boundaries survive.
    fn serialize_repeated(&mut self, hints: &ElementHints, items: &[&Value], use_: Use) -> String {
        let item_hints = ElementHints {
            name: hints.name.clone(),
            name_ns: hints.name_ns.clone(),
            attributes: hints.attributes.clone(),
            ..Default::default()
        };
        items
            .iter()
            .map(|item| match array_items(item) {
                Some(nested) => {
                    let item_tag = self.open_tag(item, &item_hints);
                    self.serialize_wrapped_array(&item_tag, &nested, use_)
                }
                None => self.serialize_val(item, &item_hints, use_, false),
            })
            .collect()
    }

    fn array_type_name(&mut self, kinds: &IndexSet<ItemKind>, xmlns: &mut String) -> String {
        if kinds.len() > 1 {
            return "xsd:anyType".to_string();
        }
        let Some(kind) = kinds.first() else {
            return "xsd:anyType".to_string();
        };

        let schema = self.config.schema_version().to_string();
        match kind {
            ItemKind::Native(type_name) if self.typemap.contains(&schema, type_name) => {
                xsd_array_type(type_name)
            }
            ItemKind::Native(type_name) => type_name.to_string(),
            ItemKind::SimpleArray => "SOAP-ENC:Array".to_string(),
            ItemKind::Struct => UNNAMED_STRUCT_TYPE.to_string(),
            ItemKind::Nil => "xsd:anyType".to_string(),
            ItemKind::Declared { type_name, .. } if self.typemap.contains(&schema, type_name) => {
                xsd_array_type(type_name)
            }
            ItemKind::Declared { type_name, type_ns } => {
                match type_ns.as_deref().filter(|ns| !ns.is_empty()) {
                    Some(ns) if self.namespaces.namespace_for_prefix("xsd") == Some(ns) => {
                        format!("xsd:{}", type_name)
                    }
                    Some(ns) => {
                        let prefix = self.mint_prefix("ns");
                        xmlns.push_str(&format!(" xmlns:{}=\"{}\"", prefix, ns));
                        format!("{}:{}", prefix, type_name)
                    }
                    None => type_name.clone(),
                }
            }
        }
    }
}

/// Items of a value that encodes as an array
fn array_items(value: &Value) -> Option<Vec<&Value>> {
    match value {
        Value::Sequence(items) => Some(items.iter().collect()),
        Value::Mapping(mapping) if classify_mapping(mapping) == MappingKind::Simple => {
            Some(mapping.values().collect())
        }
        _ => None,
    }
}

// The schema spells the native "integer" kind as xsd:int in array types
fn xsd_array_type(type_name: &str) -> String {
    if type_name == "integer" {
        "xsd:int".to_string()
    } else {
        format!("xsd:{}", type_name)
    }
}
