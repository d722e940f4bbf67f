use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resumegen::config::Config;
use resumegen::generation::Generator;
use resumegen::models::DocumentKind;
use resumegen::pdf;
use resumegen::render::Renderer;
use resumegen::storage::{load_json, save_html};

/// Generate resumes and cover letters in HTML and PDF from JSON data.
#[derive(Parser, Debug)]
#[command(name = "resumegen", version, arg_required_else_help = true)]
struct Cli {
    /// Directory holding the default inputs and outputs. Defaults to DATA_DIR or `data`.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a resume in HTML and PDF format from a JSON input file.
    GenerateResume {
        /// Path to the resume JSON file. Defaults to '<data>/resume.json'.
        #[arg(long)]
        resume_path: Option<PathBuf>,

        /// Path to the personal information JSON file. Defaults to '<data>/personal_info.json'.
        #[arg(long)]
        info_path: Option<PathBuf>,

        /// Path to save the generated HTML file. Defaults to '<data>/resume.html'.
        #[arg(long)]
        out_html: Option<PathBuf>,

        /// Path to save the generated PDF file. Defaults to '<data>/resume.pdf'.
        #[arg(long)]
        out_pdf: Option<PathBuf>,
    },

    /// Generate a cover letter in HTML and PDF format from a JSON input file.
    GenerateCoverLetter {
        /// Path to the cover letter JSON file. Defaults to '<data>/cover_letter.json'.
        #[arg(long)]
        letter_path: Option<PathBuf>,

        /// Path to the personal information JSON file. Defaults to '<data>/personal_info.json'.
        #[arg(long)]
        info_path: Option<PathBuf>,

        /// Path to save the generated HTML file. Defaults to '<data>/cover_letter.html'.
        #[arg(long)]
        out_html: Option<PathBuf>,

        /// Path to save the generated PDF file. Defaults to '<data>/cover_letter.pdf'.
        #[arg(long)]
        out_pdf: Option<PathBuf>,

        /// Date printed on the letter (DD-MM-YYYY). Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
}

/// Fully resolved inputs and outputs for one CLI run.
struct Paths {
    input: PathBuf,
    info: PathBuf,
    out_html: PathBuf,
    out_pdf: PathBuf,
}

impl Paths {
    fn resolve(
        data_dir: &Path,
        kind: DocumentKind,
        input: Option<PathBuf>,
        info: Option<PathBuf>,
        out_html: Option<PathBuf>,
        out_pdf: Option<PathBuf>,
    ) -> Result<Self> {
        let stem = kind.as_str();
        let pick = |given: Option<PathBuf>, default: String| -> Result<PathBuf> {
            let path = given.unwrap_or_else(|| data_dir.join(default));
            std::path::absolute(&path)
                .with_context(|| format!("cannot resolve path {}", path.display()))
        };
        Ok(Self {
            input: pick(input, format!("{stem}.json"))?,
            info: pick(info, "personal_info.json".to_string())?,
            out_html: pick(out_html, format!("{stem}.html"))?,
            out_pdf: pick(out_pdf, format!("{stem}.pdf"))?,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}=warn", env!("CARGO_PKG_NAME")))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());

    let (kind, paths, date) = match cli.command {
        Command::GenerateResume {
            resume_path,
            info_path,
            out_html,
            out_pdf,
        } => (
            DocumentKind::Resume,
            Paths::resolve(
                &data_dir,
                DocumentKind::Resume,
                resume_path,
                info_path,
                out_html,
                out_pdf,
            )?,
            None,
        ),
        Command::GenerateCoverLetter {
            letter_path,
            info_path,
            out_html,
            out_pdf,
            date,
        } => (
            DocumentKind::CoverLetter,
            Paths::resolve(
                &data_dir,
                DocumentKind::CoverLetter,
                letter_path,
                info_path,
                out_html,
                out_pdf,
            )?,
            date,
        ),
    };

    run(&config, kind, &paths, date.as_deref()).await
}

async fn run(config: &Config, kind: DocumentKind, paths: &Paths, date: Option<&str>) -> Result<()> {
    let renderer = Renderer::from_dir(&config.template_dir)?;
    let converter = pdf::from_config(&config.pdf_backend());
    let generator = Generator::new(Arc::new(renderer), converter, &config.scratch_dir);

    let payload = load_json(&paths.input).await?;
    let personal_info = load_json(&paths.info).await?;
    info!("Loaded {} and {}", paths.input.display(), paths.info.display());

    let html = generator.render_html(kind, payload, personal_info, date)?;
    save_html(&html, &paths.out_html).await?;
    println!("{} HTML saved to {}", kind.label(), paths.out_html.display());

    if let Some(parent) = paths.out_pdf.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    generator
        .converter()
        .convert(&paths.out_html, &paths.out_pdf)
        .await
        .with_context(|| format!("{} PDF generation failed", kind.label()))?;
    println!("{} PDF saved to {}", kind.label(), paths.out_pdf.display());

    Ok(())
}
