//! SOAP faults

use std::fmt;

use crate::encoder::{ElementHints, Encoder, Use};
use crate::error::Error;
use crate::namespaces::SOAP_ENC_NAMESPACE;
use crate::value::Value;

/// Fault code classes defined by SOAP 1.1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultCode {
    /// The message was malformed or lacked information
    Client,
    /// The message could not be processed
    Server,
}

impl FaultCode {
    /// Code qualified with the envelope prefix
    pub fn qualified(&self) -> &'static str {
        match self {
            Self::Client => "SOAP-ENV:Client",
            Self::Server => "SOAP-ENV:Server",
        }
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualified())
    }
}

/// A SOAP fault
#[derive(Debug, Clone, PartialEq)]
pub struct Fault {
    /// Fault code, e.g. `SOAP-ENV:Client`
    pub code: String,
    /// URI of the node that raised the fault, may be empty
    pub actor: String,
    /// Human readable explanation
    pub string: String,
    /// Application specific detail, encoded like any other value
    pub detail: Value,
}

impl Fault {
    /// Create a fault
    pub fn new(
        code: impl Into<String>,
        actor: impl Into<String>,
        string: impl Into<String>,
        detail: impl Into<Value>,
    ) -> Self {
        Self {
            code: code.into(),
            actor: actor.into(),
            string: string.into(),
            detail: detail.into(),
        }
    }

    /// Fault blaming the sender
    pub fn client(message: impl Into<String>) -> Self {
        Self::new(FaultCode::Client.qualified(), "", message, "")
    }

    /// Fault blaming the receiver
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(FaultCode::Server.qualified(), "", message, "")
    }

    /// Set the actor
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    /// Set the detail
    pub fn with_detail(mut self, detail: impl Into<Value>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Report a crate error to the peer.
    ///
    /// Bad input is the client's fault, everything else the server's.
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::Value(_) | Error::Name(_) | Error::Json(_) => Self::client(err.to_string()),
            _ => Self::server(err.to_string()),
        }
    }

    /// Serialize as a complete message with a default encoder
    pub fn serialize(&self) -> String {
        Encoder::new().encode_fault(self)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.string)
    }
}

impl Encoder {
    /// Serialize a fault as a complete SOAP message.
    ///
    /// Fault messages always use SOAP encoding and declare every registered
    /// namespace.
    pub fn encode_fault(&mut self, fault: &Fault) -> String {
        self.enter();
        self.log.debug(format!("in encode_fault: {}", fault));

        let ns_string: String = self
            .namespaces
            .iter()
            .map(|(prefix, uri)| format!("\n xmlns:{}=\"{}\"", prefix, uri))
            .collect();

        let fields = [
            ("faultcode", Value::Text(fault.code.clone())),
            ("faultactor", Value::Text(fault.actor.clone())),
            ("faultstring", Value::Text(fault.string.clone())),
        ];
        let mut content: String = fields
            .iter()
            .map(|(name, value)| self.serialize_val(value, &ElementHints::named(*name), Use::Encoded, false))
            .collect();
        content.push_str(&self.serialize_val(
            &fault.detail,
            &ElementHints::named("detail"),
            Use::Encoded,
            false,
        ));

        self.leave();

        format!(
            concat!(
                "<?xml version=\"1.0\" encoding=\"{}\"?>",
                "<SOAP-ENV:Envelope SOAP-ENV:encodingStyle=\"{}\"{}>\n",
                "<SOAP-ENV:Body><SOAP-ENV:Fault>{}</SOAP-ENV:Fault></SOAP-ENV:Body></SOAP-ENV:Envelope>"
            ),
            self.config.charset(),
            SOAP_ENC_NAMESPACE,
            ns_string,
            content
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::value::Mapping;

    #[test]
    fn test_fault_layout() {
        let xml = Fault::client("Missing parameter").serialize();
        assert!(xml.starts_with(concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<SOAP-ENV:Envelope SOAP-ENV:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/""#,
            "\n xmlns:SOAP-ENV=\"http://schemas.xmlsoap.org/soap/envelope/\"",
            "\n xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\""
        )));
        assert!(xml.ends_with(concat!(
            ">\n<SOAP-ENV:Body><SOAP-ENV:Fault>",
            r#"<faultcode xsi:type="xsd:string">SOAP-ENV:Client</faultcode>"#,
            r#"<faultactor xsi:type="xsd:string"></faultactor>"#,
            r#"<faultstring xsi:type="xsd:string">Missing parameter</faultstring>"#,
            r#"<detail xsi:type="xsd:string"></detail>"#,
            "</SOAP-ENV:Fault></SOAP-ENV:Body></SOAP-ENV:Envelope>"
        )));
    }

    #[test]
    fn test_fault_text_is_escaped() {
        let xml = Fault::server("a < b").with_actor("urn:x&y").serialize();
        assert!(xml.contains("<faultstring xsi:type=\"xsd:string\">a &lt; b</faultstring>"));
        assert!(xml.contains("<faultactor xsi:type=\"xsd:string\">urn:x&amp;y</faultactor>"));
    }

    #[test]
    fn test_structured_detail() {
        let mut detail = Mapping::new();
        detail.insert("reason".to_string(), Value::from("quota"));
        let xml = Fault::new("SOAP-ENV:Server", "", "Busy", detail).serialize();
        assert!(xml.contains(
            r#"<detail><reason xsi:type="xsd:string">quota</reason></detail>"#
        ));
    }

    #[test]
    fn test_null_detail() {
        let xml = Fault::client("x").with_detail(Value::Null).serialize();
        assert!(xml.contains(r#"<detail xsi:nil="true"/>"#));
    }

    #[test]
    fn test_from_error() {
        let fault = Fault::from_error(&Error::Value("unknown use 'x'".to_string()));
        assert_eq!(fault.code, "SOAP-ENV:Client");
        assert_eq!(fault.string, "value error: unknown use 'x'");

        let fault = Fault::from_error(&Error::Config(ConfigError::new("bad")));
        assert_eq!(fault.code, FaultCode::Server.to_string());
    }

    #[test]
    fn test_registry_drives_declarations() {
        let mut encoder = Encoder::new();
        encoder.namespaces_mut().register("tns", "urn:svc");
        let xml = encoder.encode_fault(&Fault::client("x"));
        assert!(xml.contains("\n xmlns:tns=\"urn:svc\">\n<SOAP-ENV:Body>"));
    }
}
