// src/main.rs
use clap::Parser;
use issue_form_parser::storage::{self, StorageManager};
use issue_form_parser::utils::{self, AppError};
use issue_form_parser::{extract_with_template, parse_template, ParseOptions};
use tokio::io::AsyncReadExt;

// Fallbacks when the corresponding flags are omitted (e.g. inside a workflow step)
const ISSUE_BODY_ENV: &str = "ISSUE_BODY";
const TEMPLATE_PATH_ENV: &str = "ISSUE_FORM_TEMPLATE";

/// Command Line Interface for the issue form parser
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Issue body (Markdown) file; `-` reads stdin. Defaults to the ISSUE_BODY env var
    #[arg(short, long)]
    issue: Option<String>,

    /// Issue form template (YAML) file. Defaults to the ISSUE_FORM_TEMPLATE env var
    #[arg(short, long)]
    template: Option<String>,

    /// Slugify headings into keys when no template is used
    #[arg(short, long)]
    slugify: bool,

    /// Print the normalized template instead of parsing an issue
    #[arg(long)]
    template_only: bool,

    /// Write JSON into this directory instead of stdout
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::debug!("Starting with args: {:?}", args);

    // 3. Load and normalize the template, if any
    let template_path = args.template.clone().or_else(|| std::env::var(TEMPLATE_PATH_ENV).ok());
    let template_source = match &template_path {
        Some(path) => {
            tracing::info!("Reading issue form template from {}", path);
            Some(tokio::fs::read_to_string(path).await?)
        }
        None => None,
    };
    let template = parse_template(template_source.as_deref())?;
    tracing::info!("Template declares {} fields", template.len());

    let store = match &args.output_dir {
        Some(dir) => Some(StorageManager::new(dir)?),
        None => None,
    };

    if args.template_only {
        return match store {
            Some(store) => {
                store.save_parsed_template(&template, args.pretty)?;
                Ok(())
            }
            None => {
                println!("{}", storage::to_json(&template, args.pretty)?);
                Ok(())
            }
        };
    }

    // 4. Read the issue body
    let issue = read_issue(args.issue.as_deref()).await?;
    tracing::info!("Read issue body ({} bytes)", issue.len());

    // 5. Extract fields
    let options = ParseOptions { slugify: args.slugify };
    let parsed = extract_with_template(&issue, template_source.as_deref(), &template, options)
        .map_err(issue_form_parser::ParseError::from)?;
    tracing::info!("Extracted {} fields", parsed.len());

    // 6. Emit
    match store {
        Some(store) => {
            store.save_parsed_issue(&parsed, args.pretty)?;
        }
        None => println!("{}", storage::to_json(&parsed, args.pretty)?),
    }

    Ok(())
}

async fn read_issue(path: Option<&str>) -> Result<String, AppError> {
    match path {
        Some("-") => {
            let mut body = String::new();
            tokio::io::stdin().read_to_string(&mut body).await?;
            Ok(body)
        }
        Some(path) => Ok(tokio::fs::read_to_string(path).await?),
        None => std::env::var(ISSUE_BODY_ENV).map_err(|_| {
            AppError::Config(format!("No issue body given: pass --issue or set {}", ISSUE_BODY_ENV))
        }),
    }
}
