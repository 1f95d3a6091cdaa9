//! # soapenc
//!
//! Type-directed SOAP 1.1 value encoder.
//!
//! Turns dynamically typed values into SOAP markup, either SOAP-encoded
//! (every element carries `xsi:type`, arrays carry `SOAP-ENC:arrayType`) or
//! literal (plain schema-conformant XML), and wraps them in envelopes and
//! faults.
//!
//! ## Features
//!
//! - Encoded and literal serialization of scalars, arrays, structs and maps
//! - Explicitly typed values ([`SoapVal`]) with their own names and namespaces
//! - Namespace registry with synthetic prefix allocation
//! - XML Schema type tables for the 1999, 2000 and 2001 schema namespaces
//! - Envelope and fault assembly
//! - Debug trace of every encoding decision
//!
//! ## Example
//!
//! ```rust
//! use soapenc::{Encoder, Envelope, Use, Value};
//!
//! let mut encoder = Encoder::new();
//! let body = encoder.encode_named(&Value::from(42), "answer", Use::Encoded);
//! assert_eq!(body, r#"<answer xsi:type="xsd:int">42</answer>"#);
//!
//! let message = encoder.serialize_envelope(&Envelope::new(body));
//! assert!(message.contains("<SOAP-ENV:Body><answer"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod config;
pub mod trace;

// Names, namespaces and types
pub mod namespaces;
pub mod names;
pub mod typemap;

// Values
pub mod value;
pub mod soapval;

// Serialization
pub mod encoder;
pub mod envelope;
pub mod fault;

// Re-exports for convenience
pub use config::{ArrayItemNaming, EncoderConfig};
pub use encoder::{Diagnostic, ElementHints, Encoder, Use};
pub use envelope::{Envelope, Headers, Style};
pub use error::{Error, Result};
pub use fault::{Fault, FaultCode};
pub use namespaces::NamespaceRegistry;
pub use soapval::SoapVal;
pub use trace::DebugLog;
pub use typemap::{NativeKind, TypeMap};
pub use value::{Composite, Mapping, Value};

/// Version of the soapenc library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
