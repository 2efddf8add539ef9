//! validate-config - check a YAML/JSON configuration against a configsuite schema

use anyhow::{Context, Result, bail};
use clap::Parser;
use configsuite::{ConfigSuite, SchemaNode, ValidationError, describe};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yaml_rust2::{Yaml, YamlLoader};

/// Validate a configuration file against a schema description
#[derive(Parser, Debug)]
#[command(name = "validate-config")]
#[command(about = "Validate YAML/JSON configurations against configsuite schemas", long_about = None)]
struct Args {
    /// Path to the configuration to validate
    #[arg(long, value_name = "FILE", required_unless_present = "describe")]
    input: Option<PathBuf>,

    /// Path to the schema description
    #[arg(long, value_name = "FILE")]
    schema: PathBuf,

    /// Print errors (or the snapshot, when valid) as JSON
    #[arg(long)]
    json: bool,

    /// Print an outline of the schema and exit
    #[arg(long)]
    describe: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "validate_config=info,configsuite=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Returns whether the configuration was valid
fn run() -> Result<bool> {
    let args = Args::parse();

    let description = load_document(&args.schema)?;
    let schema = SchemaNode::from_description(&description)
        .with_context(|| format!("Failed to load schema from {}", args.schema.display()))?;

    if args.describe {
        print!("{}", describe(&schema));
        return Ok(true);
    }

    let Some(input) = args.input.as_deref() else {
        bail!("--input is required unless --describe is given");
    };
    let raw = load_document(input)?;
    let suite = ConfigSuite::new(raw, schema);
    info!(
        input = %input.display(),
        errors = suite.errors().len(),
        "validation finished"
    );

    match suite.snapshot() {
        Ok(snapshot) if args.json => {
            println!("{}", serde_json::to_string_pretty(&snapshot.to_json())?);
        }
        Ok(_) => {
            println!("✓ Validation successful");
            println!("  Input: {}", input.display());
            println!("  Schema: {}", args.schema.display());
        }
        Err(_) if args.json => {
            println!("{}", serde_json::to_string_pretty(suite.errors())?);
        }
        Err(_) => eprint!("{}", render_errors(suite.errors())),
    }

    Ok(suite.valid())
}

fn load_document(path: &Path) -> Result<Yaml> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    debug!(path = %path.display(), bytes = content.len(), "loaded file");
    parse_single_document(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse `content`, which must hold exactly one YAML (or JSON) document
fn parse_single_document(content: &str) -> Result<Yaml> {
    let mut documents = YamlLoader::load_from_str(content)?;
    match documents.len() {
        1 => Ok(documents.remove(0)),
        0 => bail!("expected one document, found none"),
        n => bail!("expected one document, found {}", n),
    }
}

/// One line per error: `[code] path: message`
fn render_errors(errors: &[ValidationError]) -> String {
    let mut out = String::new();
    for error in errors {
        out.push_str(&format!(
            "[{}] {}: {}\n",
            error.error_code(),
            error.key_path,
            error.message()
        ));
    }
    out.push_str(&format!("✖ {} validation error(s)\n", errors.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use configsuite::validate;

    #[test]
    fn test_args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_describe_does_not_need_input() {
        let args = Args::try_parse_from(["validate-config", "--schema", "s.yml", "--describe"]);
        assert!(args.is_ok());

        let args = Args::try_parse_from(["validate-config", "--schema", "s.yml"]);
        assert!(args.is_err());
    }

    #[test]
    fn test_parse_single_document() {
        assert_eq!(parse_single_document("a: 1").unwrap()["a"], Yaml::Integer(1));
        assert_eq!(
            parse_single_document("{\"a\": [true]}").unwrap()["a"][0],
            Yaml::Boolean(true)
        );
    }

    #[test]
    fn test_parse_rejects_multiple_documents() {
        let err = parse_single_document("a: 1\n---\nb: 2\n").unwrap_err();
        assert_eq!(err.to_string(), "expected one document, found 2");

        let err = parse_single_document("").unwrap_err();
        assert_eq!(err.to_string(), "expected one document, found none");
    }

    #[test]
    fn test_render_errors() {
        let schema = SchemaNode::named_dict()
            .field("name", SchemaNode::string())
            .field("tags", SchemaNode::list(SchemaNode::string()).optional())
            .build()
            .unwrap();
        let raw = parse_single_document("tags: [a, 2]\nextra: 1\n").unwrap();

        insta::assert_snapshot!(render_errors(&validate(&raw, &schema)), @r"
[CS-1-18] (root): Unknown key 'extra'
[CS-1-10] (root): Missing required key 'name'
[CS-1-11] tags.[1]: Expected string, got integer
✖ 3 validation error(s)
");
    }
}
