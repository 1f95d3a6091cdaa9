//! XML namespace handling
//!
//! This module provides the namespace registry used while encoding: a
//! prefix to URI table seeded with the SOAP bindings, bidirectional lookup,
//! qualified-name contraction/expansion and tracking of the namespaces that
//! were actually referenced during an encoding pass.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::names::{is_valid_ncname, local_part, prefix_of};

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// SOAP 1.1 envelope namespace
pub const SOAP_ENV_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// SOAP 1.1 encoding namespace
pub const SOAP_ENC_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/encoding/";

/// XML Schema namespace (2001 recommendation)
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XML Schema namespace (2000/10 candidate recommendation)
pub const XSD_2000_NAMESPACE: &str = "http://www.w3.org/2000/10/XMLSchema";

/// XML Schema namespace (1999 working draft)
pub const XSD_1999_NAMESPACE: &str = "http://www.w3.org/1999/XMLSchema";

/// XML Schema instance namespace
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// SOAP interop test namespace
pub const SOAP_INTEROP_NAMESPACE: &str = "http://soapinterop.org/xsd";

/// Apache SOAP namespace hosting the key/value `Map` type
pub const APACHE_MAP_NAMESPACE: &str = "http://xml.apache.org/xml-soap";

/// Registry of namespace prefix bindings.
///
/// Prefixes are unique; a URI may be bound to several prefixes, in which
/// case lookups return the first-declared one. Declaration order is kept
/// because it is the order in which `xmlns:` attributes are emitted.
#[derive(Debug, Clone)]
pub struct NamespaceRegistry {
    /// Mapping from prefix to namespace URI
    bindings: IndexMap<Prefix, NamespaceUri>,
    /// Bindings hit by a successful prefix lookup
    used: IndexMap<Prefix, NamespaceUri>,
}

impl NamespaceRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            bindings: IndexMap::new(),
            used: IndexMap::new(),
        }
    }

    /// Create a registry seeded with the four SOAP bindings
    /// (`SOAP-ENV`, `xsd`, `xsi`, `SOAP-ENC`)
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("SOAP-ENV", SOAP_ENV_NAMESPACE);
        registry.register("xsd", XSD_NAMESPACE);
        registry.register("xsi", XSI_NAMESPACE);
        registry.register("SOAP-ENC", SOAP_ENC_NAMESPACE);
        registry
    }

    /// Bind a prefix, replacing any previous binding in place
    pub fn register(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.bindings.insert(prefix.into(), namespace.into());
    }

    /// Remove a prefix binding
    pub fn remove(&mut self, prefix: &str) -> Option<NamespaceUri> {
        self.used.shift_remove(prefix);
        self.bindings.shift_remove(prefix)
    }

    /// Check whether a prefix is bound
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.bindings.contains_key(prefix)
    }

    /// Iterate over the bindings in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, n)| (p.as_str(), n.as_str()))
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the registry has no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Get the namespace bound to a prefix
    pub fn namespace_for_prefix(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(|s| s.as_str())
    }

    /// Alias of [`namespace_for_prefix`](Self::namespace_for_prefix)
    pub fn resolve_uri(&self, prefix: &str) -> Option<&str> {
        self.namespace_for_prefix(prefix)
    }

    /// Find the first prefix whose URI *or* whose prefix equals `key`.
    ///
    /// Callers pass either a namespace URI or a prefix they already hold.
    /// A hit marks the binding as used.
    pub fn prefix_for_namespace_or_prefix(&mut self, key: &str) -> Option<String> {
        let (prefix, namespace) = self
            .bindings
            .iter()
            .find(|(p, n)| key == n.as_str() || key == p.as_str())?;
        let (prefix, namespace) = (prefix.clone(), namespace.clone());
        self.used.insert(prefix.clone(), namespace);
        Some(prefix)
    }

    /// Alias of [`prefix_for_namespace_or_prefix`](Self::prefix_for_namespace_or_prefix)
    pub fn resolve_prefix(&mut self, uri_or_prefix: &str) -> Option<String> {
        self.prefix_for_namespace_or_prefix(uri_or_prefix)
    }

    /// Replace the namespace part of `namespace:local` by its prefix.
    ///
    /// The split happens on the last colon, so URIs containing colons work.
    /// Names whose namespace has no binding are returned unchanged.
    pub fn contract_qname(&mut self, qname: &str) -> String {
        match prefix_of(qname) {
            Some(namespace) => match self.prefix_for_namespace_or_prefix(namespace) {
                Some(prefix) => format!("{}:{}", prefix, local_part(qname)),
                None => qname.to_string(),
            },
            None => qname.to_string(),
        }
    }

    /// Replace the prefix of `prefix:local` by its namespace URI.
    ///
    /// Strings starting with `http://` are taken to be expanded already.
    /// Unbound prefixes are returned unchanged.
    pub fn expand_qname(&self, qname: &str) -> String {
        if qname.starts_with("http://") {
            return qname.to_string();
        }
        match qname.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() => match self.bindings.get(prefix) {
                Some(namespace) => format!("{}:{}", namespace, local),
                None => qname.to_string(),
            },
            _ => qname.to_string(),
        }
    }

    /// Bindings recorded as used since the last [`clear_used`](Self::clear_used)
    pub fn used(&self) -> &IndexMap<Prefix, NamespaceUri> {
        &self.used
    }

    /// Forget usage tracking
    pub fn clear_used(&mut self) {
        self.used.clear();
    }

    /// Merge caller-supplied bindings over this registry.
    ///
    /// Existing prefixes keep their position but take the caller's URI; new
    /// prefixes are appended in the caller's order.
    pub fn merged<'a, I>(&self, extra: I) -> IndexMap<Prefix, NamespaceUri>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut merged = self.bindings.clone();
        for (prefix, namespace) in extra {
            merged.insert(prefix.clone(), namespace.clone());
        }
        merged
    }
}

/// Parse a `prefix=uri` binding
pub fn parse_binding(binding: &str) -> Result<(Prefix, NamespaceUri)> {
    let (prefix, uri) = binding
        .split_once('=')
        .ok_or_else(|| Error::Namespace(format!("expected prefix=uri, got '{}'", binding)))?;
    if !is_valid_ncname(prefix) {
        return Err(Error::Namespace(format!("invalid prefix '{}'", prefix)));
    }
    if uri.is_empty() {
        return Err(Error::Namespace(format!("empty namespace for prefix '{}'", prefix)));
    }
    Ok((prefix.to_string(), uri.to_string()))
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
