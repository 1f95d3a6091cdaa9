//! SOAP envelope assembly
//!
//! Wraps an already encoded body, and optional headers, in the
//! `SOAP-ENV:Envelope` skeleton with the namespace declarations of the
//! encoder's registry merged with the caller's.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::encoder::{ElementHints, Encoder, Use};
use crate::error::{Error, Result};
use crate::namespaces::SOAP_ENC_NAMESPACE;
use crate::value::{Mapping, Value};

/// Longest body prefix written to the debug trace
const TRACED_BODY_CHARS: usize = 1000;

/// WSDL binding style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    /// Remote procedure call
    #[default]
    Rpc,
    /// Document
    Document,
}

impl Style {
    /// Keyword of the style
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rpc => "rpc",
            Self::Document => "document",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rpc" => Ok(Self::Rpc),
            "document" => Ok(Self::Document),
            other => Err(Error::Value(format!("unknown style '{}'", other))),
        }
    }
}

/// Header block content
#[derive(Debug, Clone, PartialEq)]
pub enum Headers {
    /// Markup used verbatim
    Markup(String),
    /// Entries encoded one element each, named after their key
    Values(Mapping),
}

impl Headers {
    /// Check if there is nothing to put in a header block
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Markup(markup) => markup.is_empty(),
            Self::Values(values) => values.is_empty(),
        }
    }
}

impl From<&str> for Headers {
    fn from(markup: &str) -> Self {
        Self::Markup(markup.to_string())
    }
}

impl From<String> for Headers {
    fn from(markup: String) -> Self {
        Self::Markup(markup)
    }
}

impl From<Mapping> for Headers {
    fn from(values: Mapping) -> Self {
        Self::Values(values)
    }
}

/// A message to be wrapped in an envelope
#[derive(Debug, Clone)]
pub struct Envelope {
    body: String,
    headers: Option<Headers>,
    namespaces: IndexMap<String, String>,
    style: Style,
    use_: Use,
    encoding_style: Option<String>,
}

impl Envelope {
    /// Envelope around an encoded body, using SOAP encoding style
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            headers: None,
            namespaces: IndexMap::new(),
            style: Style::default(),
            use_: Use::default(),
            encoding_style: Some(SOAP_ENC_NAMESPACE.to_string()),
        }
    }

    /// Set the header block content
    pub fn with_headers(mut self, headers: impl Into<Headers>) -> Self {
        self.headers = Some(headers.into());
        self
    }

    /// Declare an extra namespace; overrides a registry prefix of the same name
    pub fn with_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespaces.insert(prefix.into(), uri.into());
        self
    }

    /// Set the binding style
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the use applied to header values
    pub fn with_use(mut self, use_: Use) -> Self {
        self.use_ = use_;
        self
    }

    /// Set the encoding style; `None` or an empty string omits the attribute,
    /// as literal messages require
    pub fn with_encoding_style(mut self, encoding_style: Option<&str>) -> Self {
        self.encoding_style = encoding_style.map(str::to_string);
        self
    }

    /// Get the body
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Get the header content
    pub fn headers(&self) -> Option<&Headers> {
        self.headers.as_ref()
    }

    /// Get the extra namespaces
    pub fn namespaces(&self) -> &IndexMap<String, String> {
        &self.namespaces
    }

    /// Get the style
    pub fn style(&self) -> Style {
        self.style
    }

    /// Get the use
    pub fn use_(&self) -> Use {
        self.use_
    }

    /// Get the encoding style
    pub fn encoding_style(&self) -> Option<&str> {
        self.encoding_style.as_deref().filter(|s| !s.is_empty())
    }
}

impl Encoder {
    /// Serialize a complete SOAP message.
    ///
    /// Namespace usage tracking is reset once the envelope is assembled.
    pub fn serialize_envelope(&mut self, envelope: &Envelope) -> String {
        self.enter();
        let traced_body: String = envelope.body.chars().take(TRACED_BODY_CHARS).collect();
        self.log.debug(format!(
            "In serialize_envelope length={} body (max {} characters)={} style={} use={} encodingStyle={}",
            envelope.body.len(),
            TRACED_BODY_CHARS,
            traced_body,
            envelope.style,
            envelope.use_,
            envelope.encoding_style().unwrap_or("")
        ));
        if self.log.enabled() {
            self.log.append(format!("headers: {:?}\n", envelope.headers));
            self.log.append(format!("namespaces: {:?}\n", envelope.namespaces));
        }

        let headers = match &envelope.headers {
            Some(headers) if !headers.is_empty() => {
                let xml = self.serialize_headers(headers, envelope.use_);
                format!("<SOAP-ENV:Header>{}</SOAP-ENV:Header>", xml)
            }
            _ => String::new(),
        };

        let mut ns_string = String::new();
        for (prefix, uri) in self.declared_namespaces(envelope) {
            ns_string.push_str(&format!(" xmlns:{}=\"{}\"", prefix, uri));
        }
        if let Some(style) = envelope.encoding_style() {
            ns_string = format!(" SOAP-ENV:encodingStyle=\"{}\"{}", style, ns_string);
        }

        self.namespaces.clear_used();
        self.leave();

        format!(
            "<?xml version=\"1.0\" encoding=\"{}\"?><SOAP-ENV:Envelope{}>{}<SOAP-ENV:Body>{}</SOAP-ENV:Body></SOAP-ENV:Envelope>",
            self.config.charset(),
            ns_string,
            headers,
            envelope.body
        )
    }

    fn serialize_headers(&mut self, headers: &Headers, use_: Use) -> String {
        match headers {
            Headers::Markup(markup) => markup.clone(),
            Headers::Values(values) => {
                let xml: String = values
                    .iter()
                    .map(|(name, value)| self.serialize_header_value(name, value, use_))
                    .collect();
                self.log
                    .debug(format!("In serialize_envelope, serialized array of headers to {}", xml));
                xml
            }
        }
    }

    fn serialize_header_value(&mut self, name: &str, value: &Value, use_: Use) -> String {
        // typed values carry their own name
        let hints = match value {
            Value::Typed(_) => ElementHints::new(),
            _ => ElementHints::named(name),
        };
        self.serialize_val(value, &hints, use_, false)
    }

    fn declared_namespaces(&self, envelope: &Envelope) -> IndexMap<String, String> {
        let merged = self.namespaces.merged(&envelope.namespaces);
        if !self.config.prune_unused_namespaces() {
            return merged;
        }
        let used = self.namespaces.used();
        merged
            .into_iter()
            .filter(|(prefix, _)| {
                prefix == "SOAP-ENV"
                    || used.contains_key(prefix)
                    || envelope.namespaces.contains_key(prefix)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncoderConfig;
    use crate::soapval::SoapVal;

    const NS: &str = concat!(
        r#" xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/""#,
        r#" xmlns:xsd="http://www.w3.org/2001/XMLSchema""#,
        r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#,
        r#" xmlns:SOAP-ENC="http://schemas.xmlsoap.org/soap/encoding/""#
    );

    #[test]
    fn test_style_keywords() {
        assert_eq!("document".parse::<Style>().unwrap(), Style::Document);
        assert!("message".parse::<Style>().is_err());
        assert_eq!(Style::default().to_string(), "rpc");
    }

    #[test]
    fn test_envelope_without_headers() {
        let xml = Encoder::new().serialize_envelope(&Envelope::new("<a/>"));
        assert_eq!(
            xml,
            format!(
                concat!(
                    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                    r#"<SOAP-ENV:Envelope SOAP-ENV:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/"{}>"#,
                    "<SOAP-ENV:Body><a/></SOAP-ENV:Body></SOAP-ENV:Envelope>"
                ),
                NS
            )
        );
        assert!(!xml.contains("Header"));
    }

    #[test]
    fn test_empty_headers_emit_no_block() {
        let mut encoder = Encoder::new();
        let xml = encoder.serialize_envelope(&Envelope::new("").with_headers(""));
        assert!(!xml.contains("SOAP-ENV:Header"));
        let xml = encoder.serialize_envelope(&Envelope::new("").with_headers(Mapping::new()));
        assert!(!xml.contains("SOAP-ENV:Header"));
        assert!(xml.contains("<SOAP-ENV:Body></SOAP-ENV:Body>"));
    }

    #[test]
    fn test_markup_headers_verbatim() {
        let xml = Encoder::new()
            .serialize_envelope(&Envelope::new("").with_headers("<token>abc</token>"));
        assert!(xml.contains("<SOAP-ENV:Header><token>abc</token></SOAP-ENV:Header><SOAP-ENV:Body>"));
    }

    #[test]
    fn test_value_headers_encoded() {
        let mut headers = Mapping::new();
        headers.insert("token".to_string(), Value::from("abc"));
        headers.insert(
            "ignored".to_string(),
            Value::from(SoapVal::new("locale", None, "en")),
        );
        let xml = Encoder::new()
            .serialize_envelope(&Envelope::new("").with_headers(headers).with_use(Use::Literal));
        assert!(xml.contains(
            "<SOAP-ENV:Header><token>abc</token><locale>en</locale></SOAP-ENV:Header>"
        ));
    }

    #[test]
    fn test_literal_envelope_omits_encoding_style() {
        let xml = Encoder::new().serialize_envelope(
            &Envelope::new("<a/>")
                .with_use(Use::Literal)
                .with_style(Style::Document)
                .with_encoding_style(None),
        );
        assert!(!xml.contains("encodingStyle"));
        let xml = Encoder::new().serialize_envelope(&Envelope::new("").with_encoding_style(Some("")));
        assert!(!xml.contains("encodingStyle"));
    }

    #[test]
    fn test_caller_namespaces_merge() {
        let xml = Encoder::new().serialize_envelope(
            &Envelope::new("")
                .with_namespace("tns", "urn:service")
                .with_namespace("xsd", "urn:override"),
        );
        assert!(xml.contains(r#" xmlns:xsd="urn:override" xmlns:xsi="#));
        assert!(xml.contains(r#" xmlns:SOAP-ENC="http://schemas.xmlsoap.org/soap/encoding/" xmlns:tns="urn:service">"#));
        assert!(!xml.contains("http://www.w3.org/2001/XMLSchema\""));
    }

    #[test]
    fn test_charset_from_config() {
        let mut encoder = Encoder::with_config(EncoderConfig::new().with_charset("ISO-8859-1"));
        let xml = encoder.serialize_envelope(&Envelope::new(""));
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="ISO-8859-1"?>"#));
    }

    #[test]
    fn test_pruned_namespaces() {
        let config = EncoderConfig::new().with_prune_unused_namespaces(true);
        let mut encoder = Encoder::with_config(config);

        let body = encoder.encode_named(&Value::from("x"), "a", Use::Literal);
        let xml = encoder.serialize_envelope(&Envelope::new(body).with_encoding_style(None));
        assert!(xml.contains(r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/">"#));

        let body = encoder.encode_named(&Value::from("x"), "a", Use::Encoded);
        let xml = encoder.serialize_envelope(&Envelope::new(body).with_namespace("tns", "urn:t"));
        assert!(xml.contains(r#" xmlns:xsd="#));
        assert!(xml.contains(r#" xmlns:xsi="#));
        assert!(xml.contains(r#" xmlns:tns="urn:t""#));
        assert!(!xml.contains(r#" xmlns:SOAP-ENC="#));
        assert!(encoder.namespaces().used().is_empty());
    }

    #[test]
    fn test_pruning_keeps_xsd_for_array_types() {
        let config = EncoderConfig::new().with_prune_unused_namespaces(true);
        let mut encoder = Encoder::with_config(config);

        let body = encoder.encode_named(&Value::Sequence(vec![]), "list", Use::Encoded);
        assert!(body.contains(r#"SOAP-ENC:arrayType="xsd:anyType[0]""#));
        let xml = encoder.serialize_envelope(&Envelope::new(body));
        assert!(xml.contains(r#" xmlns:xsd="http://www.w3.org/2001/XMLSchema""#));
        assert!(xml.contains(r#" xmlns:SOAP-ENC="#));

        let nulls = Value::from(vec![Value::Null, Value::Null]);
        let body = encoder.encode_named(&nulls, "list", Use::Encoded);
        assert!(body.contains(r#"SOAP-ENC:arrayType="xsd:anyType[2]""#));
        let xml = encoder.serialize_envelope(&Envelope::new(body));
        assert!(xml.contains(r#" xmlns:xsd="http://www.w3.org/2001/XMLSchema""#));
        assert!(xml.contains(r#" xmlns:xsi="#));
    }

    #[test]
    fn test_envelope_trace() {
        let mut encoder = Encoder::with_config(EncoderConfig::new().with_debug_level(1));
        encoder.serialize_envelope(&Envelope::new("<a/>"));
        assert!(encoder
            .debug_log()
            .as_str()
            .contains("In serialize_envelope length=4 body (max 1000 characters)=<a/> style=rpc use=encoded"));
    }
}
