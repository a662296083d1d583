//! CLI binary for vergabedoc.
//!
//! A thin shim over the library crate that maps CLI flags to `ExportConfig`,
//! runs the requested exports, and prints their outcome messages.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vergabedoc::format::{format_currency, parse_iso_date, sanitize_filename};
use vergabedoc::{
    compose_for, export_docx, export_pdf, load_form, ExportConfig, ExportOutcome, Specification,
    SpecificationForm, WkhtmlRasterizer,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

/// Complete sample form, taken from the historical generator's test data.
/// `--sample > form.json` gives users a working starting point.
const SAMPLE_FORM: &str = r#"{
  "userRole": "einkauf",
  "projectTitle": "Testprojekt Fassadeninstandsetzung",
  "vergabeNr": "2024-TEST-001",
  "serviceType": "vob",
  "contractForm": "einzelauftrag",
  "location": "Campus Deutz, Köln",
  "currentSituation": "Die Fassade des Gebäudes zeigt erhebliche Schäden durch Witterungseinflüsse. Es sind Risse und Abplatzungen sichtbar, die eine zeitnahe Instandsetzung erforderlich machen.",
  "stlbNumber": "663",
  "serviceDefinition": "Instandsetzung der Außenfassade inklusive Reinigung, Spachtelung und Neuanstrich. Die Arbeiten umfassen eine Fläche von ca. 500 m² und sind nach VOB/B durchzuführen.",
  "startDate": "2024-04-01",
  "endDate": "2024-06-30",
  "bidderRequirements": [
    { "description": "Nachweis über Eintragung in die Handwerksrolle" },
    { "description": "Mindestens 5 Jahre Erfahrung in Fassadenarbeiten" },
    { "description": "Referenzprojekte vergleichbarer Größenordnung" }
  ],
  "serviceRequirements": [
    { "description": "Verwendung umweltfreundlicher Materialien nach DIN-Norm" },
    { "description": "Einhaltung der Arbeitssicherheitsvorschriften" },
    { "description": "Wöchentliche Baustellenberichte" }
  ],
  "costRows": [
    { "description": "Gerüststellung", "quantity": 500, "unit": "m²", "unitPrice": 12.50 },
    { "description": "Fassadenreinigung", "quantity": 500, "unit": "m²", "unitPrice": 8.00 },
    { "description": "Spachtelarbeiten", "quantity": 500, "unit": "m²", "unitPrice": 15.00 },
    { "description": "Grundierung", "quantity": 500, "unit": "m²", "unitPrice": 6.50 },
    { "description": "Neuanstrich (2-fach)", "quantity": 500, "unit": "m²", "unitPrice": 18.00 }
  ],
  "contractVolume": 30000,
  "contractDuration": 1,
  "paymentTerms": "30 Tage netto",
  "customPaymentTerms": "",
  "warrantyPeriod": "24 Monate",
  "customWarranty": 24,
  "contactPerson": "Max Mustermann",
  "contactEmail": "max.mustermann@th-koeln.de",
  "contactPhone": "+49 221 8275-1234",
  "guidelinesUnderstood": true,
  "equalTreatment": true,
  "transparency": true,
  "attachments": [
    { "name": "Lageplan.pdf", "description": "Lageplan des Gebäudes mit markierten Fassadenabschnitten" },
    { "name": "Fotos_Schaeden.pdf", "description": "Fotodokumentation der aktuellen Schäden" },
    { "name": "Technische_Spezifikation.pdf", "description": "Detaillierte technische Anforderungen" }
  ]
}"#;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Generate PDF and Word next to the form
  vergabedoc form.json

  # PDF only, into a directory
  vergabedoc form.json -f pdf -o export/

  # Custom filenames and footer label
  vergabedoc form.json --pdf-name Angebot.pdf --label "Vergabestelle TH Köln"

  # Reproducible output (pinned footer date)
  vergabedoc form.json --date 2024-03-15

  # Write the HTML preview page instead of exporting
  vergabedoc form.json -f html

  # Look at what was parsed without exporting
  vergabedoc form.json --inspect
  vergabedoc form.json --json | jq '.sections[].title'

  # Start from a complete sample form
  vergabedoc --sample > form.json

FORM DATA:
  The input is the saved JSON state of the procurement web form (camelCase
  keys: projectTitle, vergabeNr, serviceType, costRows, ...). Empty strings
  and missing keys mean "not filled in": the affected sections are left out
  entirely and the remaining ones are numbered consecutively. Legacy field
  shapes (flat bidder requirements, `service` instead of `description` in
  cost rows, numeric quantities) are accepted.

ENVIRONMENT VARIABLES:
  VERGABEDOC_FORMAT      Default for -f/--format
  VERGABEDOC_OUTPUT_DIR  Default for -o/--output-dir
  VERGABEDOC_LABEL       Default for --label
  WKHTMLTOIMAGE          Path to the wkhtmltoimage binary
  RUST_LOG               Log filter override (tracing-subscriber EnvFilter)

SETUP:
  PDF export renders the document through wkhtmltoimage:
    Debian/Ubuntu:  apt install wkhtmltopdf
    macOS:          brew install wkhtmltopdf
  Word and HTML output need no external tools.
"#;

/// Generate German procurement documents from form data.
#[derive(Parser, Debug)]
#[command(
    name = "vergabedoc",
    version,
    about = "Generate Leistungsbeschreibung documents (PDF, Word) from form data",
    long_about = "Generate German procurement service specifications (Leistungsbeschreibung) \
from the JSON state of the procurement web form. Produces a paginated A4 PDF via \
wkhtmltoimage, a Word (.docx) document, or the HTML preview page.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Form-data JSON file.
    #[arg(required_unless_present = "sample")]
    form: Option<PathBuf>,

    /// Artifacts to produce.
    #[arg(short, long, value_enum, default_value = "all", env = "VERGABEDOC_FORMAT")]
    format: FormatArg,

    /// Output directory for generated files.
    #[arg(short, long, default_value = ".", env = "VERGABEDOC_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// PDF filename (default: Leistungsbeschreibung.pdf).
    #[arg(long, value_name = "NAME")]
    pdf_name: Option<String>,

    /// Word filename (default: Leistungsbeschreibung.docx).
    #[arg(long, value_name = "NAME")]
    docx_name: Option<String>,

    /// Generator label shown in the document footer.
    #[arg(long, env = "VERGABEDOC_LABEL")]
    label: Option<String>,

    /// Page margins in millimetres.
    #[arg(long, default_value_t = 25.0)]
    margins: f32,

    /// JPEG quality of the PDF page images (1-100).
    #[arg(long, default_value_t = 98,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Capture scale factor (0.5-4.0); higher is sharper and larger.
    #[arg(long, default_value_t = 2.0)]
    scale: f32,

    /// Path to the wkhtmltoimage binary.
    #[arg(long, env = "WKHTMLTOIMAGE", value_name = "PATH")]
    wkhtmltoimage: Option<PathBuf>,

    /// Pin the footer date instead of using today.
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<String>,

    /// Print a summary of the parsed form, no export.
    #[arg(long)]
    inspect: bool,

    /// Print the composed document model as JSON, no export.
    #[arg(long)]
    json: bool,

    /// Print a complete sample form to stdout and exit.
    #[arg(long)]
    sample: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq)]
enum FormatArg {
    Pdf,
    Docx,
    Html,
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if cli.sample {
        println!("{SAMPLE_FORM}");
        return Ok(());
    }

    // ── Load form and build config ───────────────────────────────────────
    let form_path = cli.form.clone().context("FORM argument is required")?;
    let form = load_form(&form_path)?;
    let config = build_config(&cli)?;

    // ── Preview modes ────────────────────────────────────────────────────
    if cli.json {
        let doc = compose_for(&form, &config);
        println!(
            "{}",
            serde_json::to_string_pretty(&doc).context("Failed to serialise document model")?
        );
        return Ok(());
    }
    if cli.inspect {
        print_summary(&form, &config);
        return Ok(());
    }

    // ── Run exports ──────────────────────────────────────────────────────
    let mut all_ok = true;

    if matches!(cli.format, FormatArg::Pdf | FormatArg::All) {
        all_ok &= report(&export_pdf(&form, &config).await);
    }
    if matches!(cli.format, FormatArg::Docx | FormatArg::All) {
        all_ok &= report(&export_docx(&form, &config).await);
    }
    if cli.format == FormatArg::Html {
        let doc = compose_for(&form, &config);
        let html = vergabedoc::pipeline::html::render_html(&doc);
        let path = config
            .output_dir
            .join(format!("{}.html", sanitize_filename(&doc.title)));
        std::fs::create_dir_all(&config.output_dir)
            .and_then(|_| std::fs::write(&path, html))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!(
            "{} HTML-Vorschau geschrieben: {}",
            green("✔"),
            bold(&path.display().to_string())
        );
    }

    if !all_ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Print an outcome line; returns whether the export succeeded.
fn report(outcome: &ExportOutcome) -> bool {
    if outcome.success {
        println!("{} {}", green("✔"), outcome.message);
    } else {
        eprintln!("{} {}", red("✘"), outcome.message);
    }
    outcome.success
}

/// Map CLI args to `ExportConfig`.
fn build_config(cli: &Cli) -> Result<ExportConfig> {
    let mut builder = ExportConfig::builder()
        .output_dir(&cli.output_dir)
        .margins_mm(cli.margins)
        .jpeg_quality(cli.quality)
        .raster_scale(cli.scale);

    if let Some(ref name) = cli.pdf_name {
        builder = builder.pdf_filename(name.as_str());
    }
    if let Some(ref name) = cli.docx_name {
        builder = builder.docx_filename(name.as_str());
    }
    if let Some(ref label) = cli.label {
        builder = builder.generator_label(label.as_str());
    }
    if let Some(ref binary) = cli.wkhtmltoimage {
        builder = builder.rasterizer(Arc::new(WkhtmlRasterizer::with_binary(binary)));
    }
    if let Some(ref date) = cli.date {
        let date = parse_iso_date(date)
            .with_context(|| format!("Invalid --date '{date}', expected YYYY-MM-DD"))?;
        builder = builder.today(date);
    }

    builder.build().context("Invalid configuration")
}

/// `--inspect`: what was parsed, which sections it produces, what it sums to.
fn print_summary(form: &SpecificationForm, config: &ExportConfig) {
    let spec = Specification::from_form(form);
    let doc = compose_for(form, config);

    println!("{} {}", cyan("◆"), bold(&doc.title));
    println!(
        "Role:         {}",
        if spec.user_role.is_procurement() {
            "einkauf"
        } else {
            "fachabteilung"
        }
    );
    if let Some(ref nr) = spec.vergabe_nr {
        println!("Reference:    {nr}");
    }
    println!("Sections:");
    for section in &doc.sections {
        println!("  {}", section.heading());
    }
    if !spec.cost_rows.is_empty() {
        println!(
            "Cost rows:    {} (total {} €)",
            spec.cost_rows.len(),
            format_currency(spec.total_cost())
        );
    }
    if !spec.attachments.is_empty() {
        println!("Attachments:  {}", spec.attachments.len());
    }
    println!("Footer:       {}", doc.footer);
}
