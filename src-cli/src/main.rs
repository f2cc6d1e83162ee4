//! Handscript - handwritten exam pages from plain text
//!
//! Command-line entry point: plans pages, renders them, and extracts styles
//! from handwriting samples.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use layout_engine::DiagramKind;
use std::path::PathBuf;
use style_model::PaperType;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "handscript")]
#[command(version)]
#[command(about = "Render text as handwritten exam pages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split an answer into pages and print the plan as JSON
    Plan {
        /// Answer text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Subject shown in the page header
        #[arg(short, long, default_value = "General")]
        subject: String,

        /// Attach a diagram of this kind to the first page
        #[arg(short, long)]
        diagram: Option<DiagramKind>,

        /// Engine settings file
        #[arg(long, value_name = "FILE", env = "HANDSCRIPT_SETTINGS")]
        settings: Option<PathBuf>,
    },

    /// Render every page of an answer
    Render {
        /// Answer text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory for page-N.png and page-N.json
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,

        /// Subject shown in the page header
        #[arg(short, long, default_value = "General")]
        subject: String,

        /// Attach a diagram of this kind to the first page
        #[arg(short, long)]
        diagram: Option<DiagramKind>,

        /// Handwriting style or style profile JSON
        #[arg(long, value_name = "FILE")]
        style: Option<PathBuf>,

        /// Engine settings file
        #[arg(long, value_name = "FILE", env = "HANDSCRIPT_SETTINGS")]
        settings: Option<PathBuf>,

        /// Font file to write with (defaults to the closest installed hand)
        #[arg(long, value_name = "FILE")]
        font: Option<PathBuf>,

        /// Paper surface
        #[arg(long, value_enum, default_value = "ruled")]
        paper: Paper,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Estimate a handwriting style from a sample image
    ExtractStyle {
        /// Sample image (PNG, JPEG or GIF)
        #[arg(value_name = "IMAGE")]
        input: PathBuf,

        /// Profile name (defaults to the file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Also save the profile into this style directory
        #[arg(long, value_name = "DIR")]
        save: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Paper {
    Plain,
    Ruled,
    Grid,
    Vintage,
}

impl From<Paper> for PaperType {
    fn from(paper: Paper) -> Self {
        match paper {
            Paper::Plain => PaperType::Plain,
            Paper::Ruled => PaperType::Ruled,
            Paper::Grid => PaperType::Grid,
            Paper::Vintage => PaperType::Vintage,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan {
            input,
            subject,
            diagram,
            settings,
        } => commands::cmd_plan(&input, &subject, diagram, settings.as_deref()),
        Commands::Render {
            input,
            out,
            subject,
            diagram,
            style,
            settings,
            font,
            paper,
            seed,
        } => {
            let options = commands::RenderOptions {
                subject,
                diagram,
                style: style.as_deref(),
                settings: settings.as_deref(),
                font: font.as_deref(),
                paper: paper.into(),
                seed,
            };
            commands::cmd_render(&input, &out, &options).await
        }
        Commands::ExtractStyle { input, name, save } => {
            commands::cmd_extract_style(&input, name.as_deref(), save.as_deref())
        }
    };

    if let Err(e) = result {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
