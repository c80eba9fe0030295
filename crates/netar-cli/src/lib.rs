//! CLI logic for the NETAR topology translator.
//!
//! One invocation runs one conversion: read the input file, convert it in
//! the chosen [`Direction`], and write the result to the output file or to
//! standard output.

pub mod error_adapter;

mod args;
mod config;
mod output;

pub use args::{Args, Direction};

use std::{fs, io, path::Path, str};

use log::info;

use netar::{Converter, NetarError, Outcome, Warning};

/// Run the NETAR CLI application
///
/// Warnings raised along the way are logged and do not fail the run.
///
/// # Errors
///
/// Returns `NetarError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - DSL parse errors
/// - XML schema and encode errors
pub fn run(args: &Args) -> Result<(), NetarError> {
    info!(
        direction = args.direction.as_str(),
        input_path = args.input;
        "Converting topology"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let converter = Converter::new(app_config);

    let input = fs::read(&args.input)?;
    let (text, warnings) = convert(&converter, args.direction, &input)?.into_parts();

    match &args.output {
        Some(path) => output::write_atomic(Path::new(path), text.as_bytes())?,
        None => output::write_stdout(text.as_bytes())?,
    }

    info!(
        output_path = args.output.as_deref().unwrap_or("-"),
        warnings = warnings.len();
        "Conversion finished"
    );

    Ok(())
}

/// Convert input bytes in the given direction.
///
/// Warnings from every stage are carried in the returned [`Outcome`], in the
/// order they were raised.
///
/// # Errors
///
/// Returns `NetarError::Io` when DSL input is not UTF-8, and the converter's
/// error for anything the conversion itself rejects.
pub fn convert(
    converter: &Converter,
    direction: Direction,
    input: &[u8],
) -> Result<Outcome<String>, NetarError> {
    let network = if direction.reads_dsl() {
        let source = str::from_utf8(input)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        converter.parse_dsl(source)?
    } else {
        converter.decode_xml(input)?
    };

    let text = match direction {
        Direction::XmlToDsl => network.map(|network| converter.emit_dsl(&network)),
        Direction::DslToXml => network
            .try_map(|network| converter.encode_xml(&network))?
            .and_then(|xml| xml),
        // Parsing or decoding already reported every dangling endpoint.
        Direction::DslToGraph | Direction::XmlToGraph => network
            .try_map(|network| converter.graph_json(&network))?
            .and_then(|json| {
                json.retain_warnings(|warning| {
                    !matches!(warning, Warning::UnresolvedReference { .. })
                })
            }),
    };

    Ok(text)
}
