use clap::Parser;
use ncl_model::{load_file, Config, NclDocument, NclError};
use std::path::{Path, PathBuf};
use std::process;

/// Load NCL documents, report problems and print them back in canonical form.
#[derive(Debug, Parser)]
#[command(name = "ncl-format", version)]
struct Args {
    /// NCL files to process
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// YAML file with writer and loader settings
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Only load and validate; do not print the documents
    #[arg(long)]
    check: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("✗ {}:", path.display());
                print_error(&e);
                process::exit(2);
            }
        },
        None => Config::default(),
    };

    let mut exit_code = 0;
    for path in &args.files {
        match process_file(path, &config) {
            Ok(doc) => {
                if !report(path, &doc) {
                    exit_code = 1;
                }
                if !args.check {
                    print!("{}", doc.to_xml(&config.writer));
                }
            }
            Err(e) => {
                eprintln!("✗ {} has errors:", path.display());
                print_error(&e);
                exit_code = 1;
            }
        }
    }

    process::exit(exit_code);
}

fn process_file(path: &Path, config: &Config) -> Result<NclDocument, NclError> {
    load_file(path, &config.loader)
}

/// Print the validation diagnostics. Returns false when there are errors.
fn report(path: &Path, doc: &NclDocument) -> bool {
    let report = doc.validate(doc.root());
    if report.is_valid() && report.warnings.is_empty() {
        eprintln!("✓ {} is valid", path.display());
        return true;
    }
    if report.is_valid() {
        eprintln!("✓ {} is valid with warnings:", path.display());
    } else {
        eprintln!("✗ {} has errors:", path.display());
    }
    for error in &report.errors {
        eprintln!("  error: {}", error);
    }
    for warning in &report.warnings {
        eprintln!("  warning: {}", warning);
    }
    report.is_valid()
}

fn print_error(error: &NclError) {
    match error {
        NclError::XmlError(msg) => {
            eprintln!("  XML error:");
            eprintln!("    {}", msg);
        }
        NclError::UnexpectedElement { tag, parent } => {
            eprintln!("  Unexpected element <{}> inside <{}>", tag, parent);
        }
        NclError::MissingAttribute { tag, attribute } => {
            eprintln!(
                "  Missing required attribute '{}' on <{}>",
                attribute, tag
            );
        }
        NclError::InvalidAttribute {
            tag,
            attribute,
            value,
            reason,
        } => {
            eprintln!(
                "  Invalid value '{}' for attribute '{}' on <{}>:",
                value, attribute, tag
            );
            eprintln!("    {}", reason);
        }
        NclError::UnknownReference { tag, value } => {
            eprintln!("  <{}> refers to '{}', which does not exist", tag, value);
        }
        NclError::UnknownAlias { alias } => {
            eprintln!("  No import declares the alias '{}'", alias);
        }
        NclError::SourceUnavailable { uri, reason } => {
            eprintln!("  Could not read imported document '{}':", uri);
            eprintln!("    {}", reason);
        }
        NclError::CircularImport { uri } => {
            eprintln!("  Import of '{}' is circular", uri);
        }
        NclError::ImportDepthExceeded { max_depth } => {
            eprintln!("  Maximum import depth ({}) exceeded", max_depth);
        }
        _ => {
            eprintln!("  {}", error);
        }
    }
}
