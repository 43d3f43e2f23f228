//! `devis-render` - turn a JSON invoice or estimate into a PDF file

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use devis_layout::{render_document, DocumentInput, LayoutConfig};

const EXAMPLE_INPUT: &str = r#"{
  "kind": "estimate",
  "header": {
    "doc_number": "D-2024-017",
    "issue_date": "2024-03-04",
    "expiry_date": "2024-04-03",
    "project": "Rénovation cuisine"
  },
  "client": {
    "name": "Mme Lefèvre",
    "address": "12 avenue des Tilleuls\n91000 Évry",
    "email": "c.lefevre@example.fr",
    "phone": "06 12 34 56 78"
  },
  "items": [
    {
      "description": "Pose de prises murales dans la cuisine et le salon",
      "quantity": 6,
      "quantity_unit": "unite",
      "unit_price": "45.00",
      "tax_rate_percent": 10
    },
    {
      "description": "Passage de câbles en goulotte",
      "quantity": "12.5",
      "quantity_unit": "meter",
      "unit_price": "8.40",
      "tax_rate_percent": 10
    },
    {
      "description": "Tableau électrique complet",
      "quantity": 1,
      "quantity_unit": "ensemble",
      "unit_price": "890",
      "tax_rate_percent": 20
    }
  ]
}
"#;

#[derive(Parser)]
#[command(name = "devis-render")]
#[command(about = "Render an invoice or estimate from JSON to PDF")]
#[command(version)]
struct Cli {
    /// Input document (JSON)
    #[arg(required_unless_present = "example")]
    input: Option<PathBuf>,

    /// Output PDF path
    #[arg(short, long, default_value = "out.pdf")]
    output: PathBuf,

    /// Layout configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a sample input document and exit
    #[arg(long)]
    example: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    if cli.example {
        print!("{}", EXAMPLE_INPUT);
        return Ok(());
    }
    let Some(input_path) = cli.input else {
        bail!("an input document is required");
    };

    let config = match &cli.config {
        Some(path) => LayoutConfig::load(path)
            .with_context(|| format!("loading layout config {}", path.display()))?,
        None => LayoutConfig::default(),
    };

    let text = fs::read_to_string(&input_path)
        .with_context(|| format!("reading {}", input_path.display()))?;
    let input: DocumentInput = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", input_path.display()))?;

    let bytes = render_document(&input, &config)
        .with_context(|| format!("rendering {}", input.header.doc_number))?;
    fs::write(&cli.output, &bytes)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    eprintln!(
        "{} {} -> {} ({} bytes)",
        input.kind.title(),
        input.header.doc_number,
        cli.output.display(),
        bytes.len()
    );
    Ok(())
}
