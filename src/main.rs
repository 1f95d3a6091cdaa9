//! Command-line interface for soapenc

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::Read;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use soapenc::names::validate_qname;
#[cfg(feature = "cli")]
use soapenc::namespaces::{parse_binding, SOAP_ENC_NAMESPACE};
#[cfg(feature = "cli")]
use soapenc::{ElementHints, Encoder, EncoderConfig, Envelope, Fault, Result, Use, Value};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "soapenc")]
#[command(author, version, about = "SOAP 1.1 value encoder", long_about = None)]
struct Cli {
    /// Encoder configuration file (JSON)
    #[arg(short, long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Print the debug trace to stderr as an XML comment
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a JSON value as SOAP markup
    Encode {
        /// JSON input file, `-` for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Element name
        #[arg(short, long)]
        name: Option<String>,

        /// Declared schema type
        #[arg(short = 't', long = "type")]
        type_name: Option<String>,

        /// Namespace of the declared type
        #[arg(long)]
        type_ns: Option<String>,

        /// Namespace of the element name
        #[arg(long)]
        name_ns: Option<String>,

        /// Use: encoded or literal
        #[arg(short, long = "use", default_value = "encoded")]
        use_: String,

        /// Wrap the element in a complete envelope
        #[arg(short, long)]
        envelope: bool,

        /// Omit SOAP-ENV:encodingStyle from the envelope
        #[arg(long)]
        no_encoding_style: bool,

        /// Extra envelope namespace as prefix=uri (repeatable)
        #[arg(long = "namespace", value_name = "PREFIX=URI")]
        namespaces: Vec<String>,
    },

    /// Serialize a SOAP fault
    Fault {
        /// Fault code
        #[arg(long, default_value = "SOAP-ENV:Server")]
        code: String,

        /// Fault string
        #[arg(short, long)]
        message: String,

        /// Fault actor
        #[arg(short, long, default_value = "")]
        actor: String,

        /// Fault detail (JSON)
        #[arg(short, long)]
        detail: Option<String>,
    },
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    let result = load_config(cli.config.as_ref(), cli.debug).and_then(|config| {
        let mut encoder = Encoder::with_config(config);
        let xml = match cli.command {
            Commands::Encode {
                file,
                name,
                type_name,
                type_ns,
                name_ns,
                use_,
                envelope,
                no_encoding_style,
                namespaces,
            } => {
                let hints = ElementHints {
                    name,
                    type_name,
                    name_ns,
                    type_ns,
                    ..Default::default()
                };
                let options = EnvelopeOptions {
                    enabled: envelope,
                    no_encoding_style,
                    namespaces,
                };
                cmd_encode(&mut encoder, file, hints, &use_, options)
            }
            Commands::Fault {
                code,
                message,
                actor,
                detail,
            } => cmd_fault(&mut encoder, code, message, actor, detail),
        }?;
        println!("{}", xml);
        if cli.debug {
            eprintln!("{}", encoder.debug_log().as_xml_comment());
        }
        Ok(())
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn load_config(path: Option<&PathBuf>, debug: bool) -> Result<EncoderConfig> {
    let config = match path {
        Some(path) => EncoderConfig::from_json_str(&fs::read_to_string(path)?)?,
        None => EncoderConfig::default(),
    };
    if debug && config.debug_level() == 0 {
        return Ok(config.with_debug_level(1));
    }
    Ok(config)
}

#[cfg(feature = "cli")]
fn read_input(file: &PathBuf) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        Ok(input)
    } else {
        Ok(fs::read_to_string(file)?)
    }
}

#[cfg(feature = "cli")]
struct EnvelopeOptions {
    enabled: bool,
    no_encoding_style: bool,
    namespaces: Vec<String>,
}

#[cfg(feature = "cli")]
fn cmd_encode(
    encoder: &mut Encoder,
    file: PathBuf,
    hints: ElementHints,
    use_: &str,
    envelope: EnvelopeOptions,
) -> Result<String> {
    let use_: Use = use_.parse()?;
    if let Some(name) = hints.name.as_deref() {
        validate_qname(name)?;
    }
    let bindings = envelope
        .namespaces
        .iter()
        .map(String::as_str)
        .map(parse_binding)
        .collect::<Result<Vec<_>>>()?;

    let json: serde_json::Value = serde_json::from_str(&read_input(&file)?)?;
    let value = Value::from(json);

    let body = encoder.encode(&value, &hints, use_);
    if !envelope.enabled {
        return Ok(body);
    }

    let encoding_style = if envelope.no_encoding_style || use_.is_literal() {
        None
    } else {
        Some(SOAP_ENC_NAMESPACE)
    };
    let message = bindings.into_iter().fold(
        Envelope::new(body)
            .with_use(use_)
            .with_encoding_style(encoding_style),
        |message, (prefix, uri)| message.with_namespace(prefix, uri),
    );
    Ok(encoder.serialize_envelope(&message))
}

#[cfg(feature = "cli")]
fn cmd_fault(
    encoder: &mut Encoder,
    code: String,
    message: String,
    actor: String,
    detail: Option<String>,
) -> Result<String> {
    let detail = match detail {
        Some(json) => Value::from(serde_json::from_str::<serde_json::Value>(&json)?),
        None => Value::from(""),
    };
    Ok(encoder.encode_fault(&Fault::new(code, actor, message, detail)))
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
