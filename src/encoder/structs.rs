//! Struct encoding
//!
//! Name-keyed mappings and composites encode as an element with one child
//! per entry. A mapping typed as the Apache `Map` encodes each entry as an
//! `<item><key/><value/></item>` triple instead.

use super::{ElementHints, Encoder, Tag, Use};
use crate::namespaces::APACHE_MAP_NAMESPACE;
use crate::value::{Composite, Mapping, Value};

impl Encoder {
    pub(super) fn serialize_struct(
        &mut self,
        tag: &Tag,
        hints: &ElementHints,
        mapping: &Mapping,
        use_: Use,
    ) -> String {
        self.log.debug("serialize_val: serialize struct");

        let key_value_pairs = hints.type_name.as_deref() == Some("Map")
            && hints.type_ns.as_deref() == Some(APACHE_MAP_NAMESPACE);

        let mut content = String::new();
        for (key, value) in mapping {
            if key_value_pairs {
                content.push_str("<item>");
                content.push_str(&self.serialize_val(
                    &Value::Text(key.clone()),
                    &ElementHints::named("key"),
                    use_,
                    false,
                ));
                content.push_str(&self.serialize_val(
                    value,
                    &ElementHints::named("value"),
                    use_,
                    false,
                ));
                content.push_str("</item>");
            } else {
                content.push_str(&self.serialize_val(
                    value,
                    &ElementHints::named(key.as_str()),
                    use_,
                    false,
                ));
            }
        }

        self.wrap_complex(tag, &content, use_)
    }

    pub(super) fn serialize_composite(
        &mut self,
        tag: &Tag,
        composite: &Composite,
        use_: Use,
    ) -> String {
        self.log.debug("serialize_val: serialize object");

        let content: String = composite
            .fields
            .iter()
            .map(|(field, value)| {
                self.serialize_val(value, &ElementHints::named(field.as_str()), use_, false)
            })
            .collect();

        self.wrap_complex(tag, &content, use_)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::XSD_NAMESPACE;

    #[test]
    fn test_struct_encoded() {
        let value = Value::mapping([("name", Value::from("Ann")), ("age", Value::from(31))]);
        let xml = Encoder::new().encode_named(&value, "person", Use::Encoded);
        assert_eq!(
            xml,
            r#"<person><name xsi:type="xsd:string">Ann</name><age xsi:type="xsd:int">31</age></person>"#
        );
    }

    #[test]
    fn test_struct_literal_drops_declared_type() {
        let value = Value::mapping([("id", 1)]);
        let hints = ElementHints::named("rec").with_type("Rec").with_type_ns("urn:t");
        let xml = Encoder::new().encode(&value, &hints, Use::Literal);
        assert_eq!(xml, r#"<rec xmlns:ns1="urn:t"><id>1</id></rec>"#);
    }

    #[test]
    fn test_struct_with_numeric_key() {
        let value = Value::mapping([("0", 1), ("name", 2)]);
        let xml = Encoder::new().encode_named(&value, "s", Use::Literal);
        assert_eq!(xml, "<s><__numeric_0>1</__numeric_0><name>2</name></s>");
    }

    #[test]
    fn test_apache_map_pairs() {
        let value = Value::mapping([("color", "red"), ("size", "L")]);
        let hints = ElementHints::named("attrs")
            .with_type("Map")
            .with_type_ns(APACHE_MAP_NAMESPACE);
        let xml = Encoder::new().encode(&value, &hints, Use::Encoded);
        assert_eq!(
            xml,
            concat!(
                r#"<attrs xmlns:ns1="http://xml.apache.org/xml-soap" xsi:type="ns1:Map">"#,
                r#"<item><key xsi:type="xsd:string">color</key><value xsi:type="xsd:string">red</value></item>"#,
                r#"<item><key xsi:type="xsd:string">size</key><value xsi:type="xsd:string">L</value></item>"#,
                "</attrs>"
            )
        );
    }

    #[test]
    fn test_map_type_needs_apache_namespace() {
        let value = Value::mapping([("color", "red")]);
        let hints = ElementHints::named("attrs").with_type("Map").with_type_ns(XSD_NAMESPACE);
        let xml = Encoder::new().encode(&value, &hints, Use::Literal);
        assert_eq!(xml, "<attrs><color>red</color></attrs>");
    }

    #[test]
    fn test_composite_encoded_with_declared_type() {
        let point = Composite::new("Point").with_field("x", 1);
        let hints = ElementHints::new().with_type("Point").with_type_ns("urn:geo");
        let xml = Encoder::new().encode(&Value::from(point), &hints, Use::Encoded);
        assert_eq!(
            xml,
            r#"<Point xmlns:ns1="urn:geo" xsi:type="ns1:Point"><x xsi:type="xsd:int">1</x></Point>"#
        );
    }

    #[test]
    fn test_empty_composite() {
        let xml = Encoder::new().encode(&Value::from(Composite::new("Empty")), &ElementHints::new(), Use::Encoded);
        assert_eq!(xml, "<Empty></Empty>");
    }
}
