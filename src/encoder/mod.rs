//! Value encoder
//!
//! Serializes a [`Value`] into SOAP 1.1 markup, either in the self-describing
//! `encoded` style (every element annotated with `xsi:type`) or in the
//! `literal` style (no type annotations, the schema is authoritative).
//!
//! The encoding rule is picked top to bottom, first match wins:
//!
//! 1. explicitly typed values ([`SoapVal`]) encode themselves
//! 2. null becomes an empty element (`xsi:nil="true"` when encoded)
//! 3. scalars with a declared built-in type use that type
//! 4. other scalars use the type of their runtime kind
//! 5. composites become an element per field
//! 6. sequences and integer-keyed mappings become arrays
//! 7. other mappings become structs
//! 8. anything else becomes a [`Diagnostic`] placeholder
//!
//! Encoding never fails. Every decision is written to the encoder's
//! [`DebugLog`].

mod arrays;
mod structs;

pub use arrays::UNNAMED_STRUCT_TYPE;

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::EncoderConfig;
use crate::error::{Error, Result};
use crate::names;
use crate::namespaces::NamespaceRegistry;
use crate::soapval::SoapVal;
use crate::trace::DebugLog;
use crate::typemap::TypeMap;
use crate::value::{classify_mapping, MappingKind, Value};

/// Text that starts every diagnostic placeholder
pub const DIAGNOSTIC_PREFIX: &str = "not detected, got ";

/// WSDL `use` of a message part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Use {
    /// SOAP section 5 encoding, elements carry `xsi:type`
    #[default]
    Encoded,
    /// Schema-conformant markup without type annotations
    Literal,
}

impl Use {
    /// Keyword of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Encoded => "encoded",
            Self::Literal => "literal",
        }
    }

    /// Check for literal mode
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal)
    }
}

impl fmt::Display for Use {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Use {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "encoded" => Ok(Self::Encoded),
            "literal" => Ok(Self::Literal),
            other => Err(Error::Value(format!("unknown use '{}'", other))),
        }
    }
}

/// Name, type and namespace hints for one element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementHints {
    /// Element name (local part)
    pub name: Option<String>,
    /// Schema type name (local part)
    pub type_name: Option<String>,
    /// Namespace of the element name
    pub name_ns: Option<String>,
    /// Namespace of the type
    pub type_ns: Option<String>,
    /// Extra attributes, emitted in order
    pub attributes: IndexMap<String, String>,
}

impl ElementHints {
    /// Hints without a name
    pub fn new() -> Self {
        Self::default()
    }

    /// Hints with just an element name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set the type name
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Set the element namespace
    pub fn with_name_ns(mut self, namespace: impl Into<String>) -> Self {
        self.name_ns = Some(namespace.into());
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
}

/// Placeholder emitted for a value the encoder could not classify
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Kind of the offending value
    pub kind: String,
    /// Printable form of the value, entity-expanded as in the markup
    pub repr: String,
}

impl Diagnostic {
    /// Find a placeholder in encoder output
    pub fn parse(markup: &str) -> Option<Self> {
        let start = markup.find(DIAGNOSTIC_PREFIX)? + DIAGNOSTIC_PREFIX.len();
        let rest = &markup[start..];
        let rest = rest.split('<').next().unwrap_or(rest);
        let (kind, repr) = rest.split_once(" for ")?;
        Some(Self {
            kind: kind.to_string(),
            repr: repr.to_string(),
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} for {}", DIAGNOSTIC_PREFIX, self.kind, self.repr)
    }
}

/// Pieces of an element's start tag, resolved once per value
#[derive(Debug, Clone, Default)]
pub(crate) struct Tag {
    /// Possibly prefixed element name
    pub name: String,
    /// Inline `xmlns:` declarations
    pub xmlns: String,
    /// Serialized caller attributes
    pub atts: String,
    /// Declared ` xsi:type="..."`, empty when no typed namespace was given
    pub type_attr: String,
}

impl Tag {
    fn wrap(&self, type_attr: &str, content: &str) -> String {
        format!(
            "<{}{}{}{}>{}</{}>",
            self.name, self.xmlns, type_attr, self.atts, content, self.name
        )
    }

    fn empty(&self, type_attr: &str, tail: &str) -> String {
        format!("<{}{}{}{}{}/>", self.name, self.xmlns, type_attr, self.atts, tail)
    }
}

/// SOAP value encoder.
///
/// Owns the namespace registry and debug log used while encoding. One
/// encoder must not be shared by concurrent encode calls: synthetic prefix
/// numbering and namespace usage tracking are scoped to a single call.
#[derive(Debug, Clone)]
pub struct Encoder {
    pub(crate) config: EncoderConfig,
    pub(crate) namespaces: NamespaceRegistry,
    typemap: TypeMap,
    pub(crate) log: DebugLog,
    prefix_counter: usize,
    depth: usize,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    /// Create an encoder with the default configuration
    pub fn new() -> Self {
        Self::with_config(EncoderConfig::default())
    }

    /// Create an encoder with a custom configuration
    pub fn with_config(config: EncoderConfig) -> Self {
        let log = DebugLog::new(config.debug_level(), config.title());
        Self {
            config,
            namespaces: NamespaceRegistry::new(),
            typemap: TypeMap::new(),
            log,
            prefix_counter: 0,
            depth: 0,
        }
    }

    /// Replace the namespace registry
    pub fn with_namespaces(mut self, namespaces: NamespaceRegistry) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Get the namespace registry
    pub fn namespaces(&self) -> &NamespaceRegistry {
        &self.namespaces
    }

    /// Get the namespace registry mutably
    pub fn namespaces_mut(&mut self) -> &mut NamespaceRegistry {
        &mut self.namespaces
    }

    /// Get the type map
    pub fn typemap(&self) -> &TypeMap {
        &self.typemap
    }

    /// Get the debug log
    pub fn debug_log(&self) -> &DebugLog {
        &self.log
    }

    /// Get the debug log mutably
    pub fn debug_log_mut(&mut self) -> &mut DebugLog {
        &mut self.log
    }

    /// Expand `&`, `'`, `"`, `<` and `>` to entities, unless entity
    /// expansion is switched off in the configuration
    pub fn expand_entities(&self, text: &str) -> String {
        if self.config.char_encoding() {
            quick_xml::escape::escape(text).into_owned()
        } else {
            text.to_string()
        }
    }

    /// Encode a value as one element
    pub fn encode(&mut self, value: &Value, hints: &ElementHints, use_: Use) -> String {
        self.enter();
        let xml = self.serialize_val(value, hints, use_, false);
        self.leave();
        xml
    }

    /// Encode a value as an element called `name`
    pub fn encode_named(&mut self, value: &Value, name: &str, use_: Use) -> String {
        self.encode(value, &ElementHints::named(name), use_)
    }

    /// Encode a typed value with its own hints
    pub fn encode_soapval(&mut self, val: &SoapVal, use_: Use) -> String {
        self.enter();
        let xml = self.serialize_val(&val.value, &val.hints(), use_, true);
        self.leave();
        xml
    }

    /// Start of an encoding call; the outermost call restarts prefix numbering
    pub(crate) fn enter(&mut self) {
        if self.depth == 0 {
            self.prefix_counter = 0;
        }
        self.depth += 1;
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Mint a prefix that is neither registered nor used earlier in this call
    pub(crate) fn mint_prefix(&mut self, stem: &str) -> String {
        loop {
            self.prefix_counter += 1;
            let prefix = format!("{}{}", stem, self.prefix_counter);
            if !self.namespaces.contains_prefix(&prefix) {
                return prefix;
            }
        }
    }

    /// Record a registered prefix as referenced by the output
    pub(crate) fn mark_used(&mut self, prefix: &str) {
        self.namespaces.prefix_for_namespace_or_prefix(prefix);
    }

    pub(crate) fn serialize_val(
        &mut self,
        value: &Value,
        hints: &ElementHints,
        use_: Use,
        unwrapping: bool,
    ) -> String {
        self.log.debug(format!(
            "in serialize_val: name={}, type={}, name_ns={}, type_ns={}, use={}, soapval={}",
            hints.name.as_deref().unwrap_or(""),
            hints.type_name.as_deref().unwrap_or(""),
            hints.name_ns.as_deref().unwrap_or(""),
            hints.type_ns.as_deref().unwrap_or(""),
            use_,
            unwrapping
        ));
        if self.log.enabled() {
            self.log.append(format!("value={:?}\n", value));
            self.log.append(format!("attributes={:?}\n", hints.attributes));
        }

        if let Value::Typed(val) = value {
            if !unwrapping {
                return self.serialize_nested_soapval(val, use_);
            }
        }

        let tag = self.open_tag(value, hints);
        let declared = self.declared_primitive(hints);

        let xml = match value {
            Value::Null => {
                self.log.debug("serialize_val: serialize null");
                if use_.is_literal() {
                    tag.empty("", "")
                } else {
                    self.mark_used("xsi");
                    tag.empty(&tag.type_attr, " xsi:nil=\"true\"")
                }
            }
            scalar if scalar.is_scalar() && declared.is_some() => {
                self.log
                    .debug("serialize_val: serialize xsd built-in primitive type");
                let type_name = declared.unwrap_or_default();
                let text = self.scalar_text(scalar, type_name == "boolean");
                self.primitive(&tag, &type_name, &text, use_)
            }
            Value::Bool(b) => {
                self.log.debug("serialize_val: serialize boolean");
                self.primitive(&tag, "boolean", if *b { "true" } else { "false" }, use_)
            }
            Value::Int(i) => {
                self.log.debug("serialize_val: serialize int");
                self.primitive(&tag, "int", &i.to_string(), use_)
            }
            Value::UInt(u) => {
                self.log.debug("serialize_val: serialize unsignedLong");
                self.primitive(&tag, "unsignedLong", &u.to_string(), use_)
            }
            Value::Float(f) => {
                self.log.debug("serialize_val: serialize float");
                self.primitive(&tag, "float", &format_float(*f), use_)
            }
            Value::Text(s) => {
                self.log.debug("serialize_val: serialize string");
                let text = self.expand_entities(s);
                self.primitive(&tag, "string", &text, use_)
            }
            Value::Bytes(b) => {
                self.log.debug("serialize_val: serialize base64Binary");
                self.primitive(&tag, "base64Binary", &STANDARD.encode(b), use_)
            }
            Value::Typed(val) => {
                self.log.debug("serialize_val: serialize soapval object");
                let inner = self.serialize_nested_soapval(val, use_);
                self.wrap_complex(&tag, &inner, use_)
            }
            Value::Composite(composite) => self.serialize_composite(&tag, composite, use_),
            Value::Sequence(items) => {
                let items: Vec<&Value> = items.iter().collect();
                self.serialize_array(&tag, hints, &items, use_)
            }
            Value::Mapping(mapping) => {
                let forced_array = hints
                    .type_name
                    .as_deref()
                    .map_or(false, |t| t.starts_with("ArrayOf"));
                if forced_array || classify_mapping(mapping) == MappingKind::Simple {
                    let items: Vec<&Value> = mapping.values().collect();
                    self.serialize_array(&tag, hints, &items, use_)
                } else {
                    self.serialize_struct(&tag, hints, mapping, use_)
                }
            }
            Value::Opaque { kind, repr } => {
                self.log.debug("serialize_val: serialize unknown");
                Diagnostic {
                    kind: kind.clone(),
                    repr: self.expand_entities(repr),
                }
                .to_string()
            }
        };

        self.log.debug(format!("serialize_val returning {}", xml));
        xml
    }

    /// Encode a typed value, tracing into a nested log that is folded back
    /// into this encoder's log afterwards
    fn serialize_nested_soapval(&mut self, val: &SoapVal, use_: Use) -> String {
        self.log.debug("serialize_val: serialize soapval");
        let child = self.log.child();
        let parent = std::mem::replace(&mut self.log, child);
        let xml = self.encode_soapval(val, use_);
        let mut nested = std::mem::replace(&mut self.log, parent);
        self.log.absorb(&mut nested);
        self.log
            .debug(format!("serialize_val of soapval returning {}", xml));
        xml
    }

    fn open_tag(&mut self, value: &Value, hints: &ElementHints) -> Tag {
        let supplied = non_empty(&hints.name);
        let mut name = match (supplied, value) {
            (None, Value::Composite(composite)) if !composite.type_name.is_empty() => {
                self.log.debug(format!(
                    "serialize_val: used type name {} as element name",
                    composite.type_name
                ));
                composite.type_name.clone()
            }
            _ => names::element_name(supplied),
        };
        if !names::is_valid_qname(&name) {
            self.log
                .debug(format!("serialize_val: '{}' is not a valid XML name", name));
        }

        let mut xmlns = String::new();
        if let Some(namespace) = non_empty(&hints.name_ns) {
            let prefix = self.mint_prefix("nu");
            name = format!("{}:{}", prefix, name);
            xmlns.push_str(&format!(" xmlns:{}=\"{}\"", prefix, namespace));
        }

        let type_prefix = match non_empty(&hints.type_ns) {
            Some(namespace) if self.namespaces.namespace_for_prefix("xsd") == Some(namespace) => {
                Some("xsd".to_string())
            }
            Some(namespace) => {
                let prefix = self.mint_prefix("ns");
                xmlns.push_str(&format!(" xmlns:{}=\"{}\"", prefix, namespace));
                Some(prefix)
            }
            None => None,
        };

        let type_attr = match (non_empty(&hints.type_name), type_prefix) {
            (Some(type_name), Some(prefix)) => {
                self.mark_used("xsi");
                self.mark_used(&prefix);
                format!(" xsi:type=\"{}:{}\"", prefix, type_name)
            }
            _ => String::new(),
        };

        let atts = hints
            .attributes
            .iter()
            .map(|(k, v)| format!(" {}=\"{}\"", k, self.expand_entities(v)))
            .collect();

        Tag {
            name,
            xmlns,
            atts,
            type_attr,
        }
    }

    /// Declared type name, when it is in the active schema's type table
    fn declared_primitive(&self, hints: &ElementHints) -> Option<String> {
        non_empty(&hints.type_name)
            .filter(|t| self.typemap.contains(self.config.schema_version(), t))
            .map(str::to_string)
    }

    fn scalar_text(&self, value: &Value, boolean_type: bool) -> String {
        match value {
            Value::Bool(b) if boolean_type => b.to_string(),
            Value::Bool(b) => u8::from(*b).to_string(),
            Value::Int(i) => i.to_string(),
            Value::UInt(u) => u.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Text(s) => self.expand_entities(s),
            Value::Bytes(b) => STANDARD.encode(b),
            _ => String::new(),
        }
    }

    fn primitive(&mut self, tag: &Tag, xsd_type: &str, text: &str, use_: Use) -> String {
        if use_.is_literal() {
            return tag.wrap("", text);
        }
        self.mark_used("xsi");
        self.mark_used("xsd");
        tag.wrap(&format!(" xsi:type=\"xsd:{}\"", xsd_type), text)
    }

    fn wrap_complex(&self, tag: &Tag, content: &str, use_: Use) -> String {
        let type_attr = if use_.is_literal() { "" } else { &tag.type_attr };
        tag.wrap(type_attr, content)
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

/// Lexical form of a float as XML Schema reads it
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "INF" } else { "-INF" };
        text.to_string()
    } else {
        f.to_string()
    }
}
