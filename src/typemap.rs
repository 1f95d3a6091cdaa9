//! Schema type map
//!
//! A static table, keyed by schema namespace and then by type name, giving
//! the native kind a schema type maps onto. The encoder consults the table
//! of the active schema version to decide whether a declared type is a
//! built-in primitive.

use std::collections::HashMap;
use std::fmt;

use crate::namespaces::{
    APACHE_MAP_NAMESPACE, SOAP_ENC_NAMESPACE, SOAP_INTEROP_NAMESPACE, XSD_1999_NAMESPACE,
    XSD_2000_NAMESPACE, XSD_NAMESPACE,
};

/// Native kind a schema type maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeKind {
    /// Text
    String,
    /// `true`/`false`
    Boolean,
    /// Floating point number
    Double,
    /// Whole number
    Integer,
    /// Ordered collection
    Array,
    /// Named fields
    Struct,
    /// Key/value pairs
    Map,
    /// Known type without a native counterpart
    Unmapped,
}

impl NativeKind {
    /// Name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Double => "double",
            Self::Integer => "integer",
            Self::Array => "array",
            Self::Struct => "struct",
            Self::Map => "map",
            Self::Unmapped => "",
        }
    }
}

impl fmt::Display for NativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Table = HashMap<&'static str, NativeKind>;

fn table(entries: &[(&'static str, NativeKind)]) -> Table {
    entries.iter().copied().collect()
}

lazy_static::lazy_static! {
    static ref TABLES: HashMap<&'static str, Table> = {
        use NativeKind::*;

        let mut tables = HashMap::new();
        tables.insert(XSD_NAMESPACE, table(&[
            ("string", String),
            ("boolean", Boolean),
            ("float", Double),
            ("double", Double),
            ("decimal", Double),
            ("duration", Unmapped),
            ("dateTime", String),
            ("time", String),
            ("date", String),
            ("gYearMonth", Unmapped),
            ("gYear", Unmapped),
            ("gMonthDay", Unmapped),
            ("gDay", Unmapped),
            ("gMonth", Unmapped),
            ("hexBinary", String),
            ("base64Binary", String),
            // abstract "any" types
            ("anyType", String),
            ("anySimpleType", String),
            // derived datatypes
            ("normalizedString", String),
            ("token", String),
            ("language", Unmapped),
            ("NMTOKEN", Unmapped),
            ("NMTOKENS", Unmapped),
            ("Name", Unmapped),
            ("NCName", Unmapped),
            ("ID", Unmapped),
            ("IDREF", Unmapped),
            ("IDREFS", Unmapped),
            ("ENTITY", Unmapped),
            ("ENTITIES", Unmapped),
            ("integer", Integer),
            ("nonPositiveInteger", Integer),
            ("negativeInteger", Integer),
            ("long", Integer),
            ("int", Integer),
            ("short", Integer),
            ("byte", Integer),
            ("nonNegativeInteger", Integer),
            ("unsignedLong", Unmapped),
            ("unsignedInt", Unmapped),
            ("unsignedShort", Unmapped),
            ("unsignedByte", Unmapped),
            ("positiveInteger", Unmapped),
        ]));

        let legacy = [
            ("i4", Unmapped),
            ("int", Integer),
            ("boolean", Boolean),
            ("string", String),
            ("double", Double),
            ("float", Double),
            ("dateTime", String),
            ("timeInstant", String),
            ("base64Binary", String),
            ("base64", String),
            ("ur-type", Array),
        ];
        tables.insert(XSD_2000_NAMESPACE, table(&legacy));
        tables.insert(XSD_1999_NAMESPACE, table(&legacy));

        tables.insert(SOAP_INTEROP_NAMESPACE, table(&[("SOAPStruct", Struct)]));
        tables.insert(SOAP_ENC_NAMESPACE, table(&[
            ("base64", String),
            ("array", Array),
            ("Array", Array),
        ]));
        tables.insert(APACHE_MAP_NAMESPACE, table(&[("Map", Map)]));
        tables
    };
}

/// Read-only view over the static type tables
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeMap;

impl TypeMap {
    /// Create a view over the built-in tables
    pub fn new() -> Self {
        Self
    }

    /// Look up the native kind of `type_name` in the `schema` table
    pub fn lookup(&self, schema: &str, type_name: &str) -> Option<NativeKind> {
        TABLES.get(schema)?.get(type_name).copied()
    }

    /// Whether `type_name` is present in the `schema` table, mapped or not
    pub fn contains(&self, schema: &str, type_name: &str) -> bool {
        self.lookup(schema, type_name).is_some()
    }

    /// Whether a table exists for `schema`
    pub fn has_schema(&self, schema: &str) -> bool {
        TABLES.contains_key(schema)
    }

    /// Schema namespaces with a table
    pub fn schemas(&self) -> impl Iterator<Item = &'static str> {
        TABLES.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xsd_2001_lookup() {
        let map = TypeMap::new();
        assert_eq!(map.lookup(XSD_NAMESPACE, "string"), Some(NativeKind::String));
        assert_eq!(map.lookup(XSD_NAMESPACE, "int"), Some(NativeKind::Integer));
        assert_eq!(map.lookup(XSD_NAMESPACE, "integer"), Some(NativeKind::Integer));
        assert_eq!(map.lookup(XSD_NAMESPACE, "float"), Some(NativeKind::Double));
        assert_eq!(map.lookup(XSD_NAMESPACE, "SOAPStruct"), None);
    }

    #[test]
    fn test_unmapped_counts_as_present() {
        let map = TypeMap::new();
        assert_eq!(map.lookup(XSD_NAMESPACE, "gYear"), Some(NativeKind::Unmapped));
        assert!(map.contains(XSD_NAMESPACE, "gYear"));
    }

    #[test]
    fn test_legacy_schemas() {
        let map = TypeMap::new();
        assert_eq!(map.lookup(XSD_1999_NAMESPACE, "ur-type"), Some(NativeKind::Array));
        assert_eq!(map.lookup(XSD_2000_NAMESPACE, "timeInstant"), Some(NativeKind::String));
        assert!(!map.contains(XSD_2000_NAMESPACE, "token"));
    }

    #[test]
    fn test_special_namespaces() {
        let map = TypeMap::new();
        assert_eq!(map.lookup(APACHE_MAP_NAMESPACE, "Map"), Some(NativeKind::Map));
        assert_eq!(map.lookup(SOAP_ENC_NAMESPACE, "Array"), Some(NativeKind::Array));
        assert_eq!(map.lookup(SOAP_INTEROP_NAMESPACE, "SOAPStruct"), Some(NativeKind::Struct));
        assert!(!map.has_schema("urn:nothing"));
        assert_eq!(map.schemas().count(), 6);
    }
}
