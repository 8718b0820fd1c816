use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use screenshot_annotator::rendering::html::render_html;
use screenshot_annotator::rendering::layout::Size;
use screenshot_annotator::rendering::Composition;
use screenshot_annotator::{resolve, AnnotationDocument, Annotator, Viewport};

#[derive(Parser)]
#[command(
    name = "screenshot-annotator",
    version,
    about = "Lay out callout labels on a product screenshot"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the scale factor for a content height and viewport height
    Scale {
        #[arg(long)]
        natural_height: f64,
        #[arg(long)]
        viewport_height: f64,
    },
    /// Print the composition (or a pixel-resolved display list) as JSON
    Layout {
        #[command(flatten)]
        input: Input,
        /// Resolve the display list against an image of this width
        #[arg(long, requires = "image_height")]
        image_width: Option<f64>,
        #[arg(long, requires = "image_width")]
        image_height: Option<f64>,
    },
    /// Print the composition as an HTML fragment
    Html {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(Args)]
struct Input {
    /// Annotation document (image, labels, layout constants)
    document: PathBuf,
    #[arg(long, default_value_t = 720)]
    viewport_height: u32,
    /// Measured unscaled height of the annotated block
    #[arg(long)]
    natural_height: Option<f64>,
    /// Fail on the first invalid label instead of skipping it
    #[arg(long)]
    strict: bool,
}

impl Input {
    fn compose(&self) -> Result<Composition> {
        let json = std::fs::read_to_string(&self.document)
            .with_context(|| format!("Failed to read {}", self.document.display()))?;
        let doc = AnnotationDocument::from_json(&json)
            .with_context(|| format!("Invalid annotation document {}", self.document.display()))?;
        let viewport = Viewport {
            height: self.viewport_height,
            ..Default::default()
        };
        let annotator = Annotator::from_document(doc, viewport)?;
        if let Some(h) = self.natural_height {
            annotator.resolver().observe_content_height(h);
        }
        let composition = if self.strict {
            annotator.compose_strict()?
        } else {
            annotator.compose()
        };
        info!(
            "Composed {} labels at scale {} (fingerprint {})",
            composition.labels.len(),
            composition.scale,
            composition.fingerprint()
        );
        Ok(composition)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Scale {
            natural_height,
            viewport_height,
        } => {
            println!("{}", resolve(natural_height, viewport_height));
        }
        Command::Layout {
            input,
            image_width,
            image_height,
        } => {
            let composition = input.compose()?;
            let json = match image_width.zip(image_height) {
                Some((width, height)) => {
                    let image = Size { width, height };
                    let resolved: Vec<_> =
                        composition.display_list().iter().map(|c| c.resolve(image)).collect();
                    serde_json::to_string_pretty(&resolved)?
                }
                None => serde_json::to_string_pretty(&composition)?,
            };
            println!("{}", json);
        }
        Command::Html { input } => {
            print!("{}", render_html(&input.compose()?)?);
        }
    }
    Ok(())
}
