//! Screenshot Annotator
//!
//! A layout engine for marketing pages that annotate a product screenshot
//! with callout labels. Each label points at a spot on the image through a
//! right-angled leader line, and the whole composition is shrunk to fit the
//! viewport height while label text keeps a constant apparent size.
//!
//! # Features
//!
//! - **Scale Resolver**: fits the image block into 80% of the viewport height
//!   and re-resolves whenever the content or the viewport changes
//! - **Geometry Engine**: pure, table-driven leader line and text placement
//! - **Renderers**: a flat display list, pixel-resolved geometry and an HTML
//!   fragment with one addressable element per label
//!
//! # Example
//!
//! ```
//! use screenshot_annotator::{Annotator, ImageSource, LayoutConfig, Viewport};
//! use screenshot_annotator::label::{Direction, Label, Point};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let labels = vec![
//!     Label::new("filters", "Advanced Filters", Point::new(25.0, 15.0)?, Direction::Top)
//!         .bend(Direction::Left),
//! ];
//! let annotator = Annotator::new(
//!     ImageSource::new("/demo.png"),
//!     labels,
//!     LayoutConfig::default(),
//!     Viewport { width: 1280, height: 1000 },
//! )?;
//! annotator.resolver().observe_content_height(1000.0);
//!
//! let composition = annotator.compose();
//! assert_eq!(composition.scale, 0.8);
//! assert_eq!(composition.labels[0].geometry.text.counter_scale, 1.25);
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod label;
use label::Label;

pub mod geometry;

pub mod scale;
pub use scale::{resolve, ScaleResolver, ScaleState};

// Resize notifications and their subscriptions
pub mod observe;

// Display lists and HTML output
pub mod rendering;
use rendering::{AnnotatedLabel, Composition};

// Page composition collaborators: feature table and fragment navigation
pub mod fragment;
pub mod page;

/// Pixel constants shared by every label of one rendering
///
/// Defaults are the ones used on the product page: leader lines extend 20px
/// past the image edge, are 1.5px thick and bend into a 30px second segment.
///
/// # Examples
///
/// ```
/// let cfg = screenshot_annotator::LayoutConfig::default();
/// assert_eq!(cfg.padding, 20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Distance past the image edge where the first segment ends
    pub padding: f64,
    /// Thickness of leader lines
    pub line_width: f64,
    /// Length of the second segment of a bent line
    pub line_length: f64,
    /// Outer spacing around the whole composition
    pub margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 20.0,
            line_width: 1.5,
            line_length: 30.0,
            margin: 24.0,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("padding", self.padding),
            ("lineWidth", self.line_width),
            ("lineLength", self.line_length),
            ("margin", self.margin),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.line_width > self.line_length {
            return Err(Error::Config(format!(
                "lineWidth ({}) must not exceed lineLength ({})",
                self.line_width, self.line_length
            )));
        }
        Ok(())
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

fn default_alt() -> String {
    "Screenshot".to_string()
}

/// The annotated image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    /// URL or handle of the image
    pub src: String,
    #[serde(default = "default_alt")]
    pub alt: String,
}

impl ImageSource {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into(), alt: default_alt() }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = alt.into();
        self
    }
}

/// Everything needed to annotate one screenshot, as stored in page content.
///
/// ```
/// let doc = screenshot_annotator::AnnotationDocument::from_json(r#"{
///     "image": { "src": "/demo.png" },
///     "labels": [],
///     "layout": { "padding": 25 }
/// }"#).unwrap();
/// assert_eq!(doc.layout.padding, 25.0);
/// assert_eq!(doc.layout.line_length, 30.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    pub image: ImageSource,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub layout: LayoutConfig,
}

impl AnnotationDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One screenshot with its labels, bound to a single scale resolver.
///
/// Labels and layout constants are owned by the annotator once constructed;
/// the scale is driven from the outside through [`Annotator::resolver`].
pub struct Annotator {
    image: ImageSource,
    labels: Vec<Label>,
    config: LayoutConfig,
    resolver: Arc<ScaleResolver>,
}

impl Annotator {
    /// Create an annotator, rejecting invalid layout constants and duplicate
    /// label identifiers. Individual labels are checked at composition time.
    pub fn new(
        image: ImageSource,
        labels: Vec<Label>,
        config: LayoutConfig,
        viewport: Viewport,
    ) -> Result<Self> {
        config.validate()?;
        let mut seen = HashSet::new();
        for label in &labels {
            if !seen.insert(label.id.as_str()) {
                return Err(Error::DuplicateId(label.id.clone()));
            }
        }
        Ok(Self {
            image,
            labels,
            config,
            resolver: Arc::new(ScaleResolver::new(f64::from(viewport.height))),
        })
    }

    pub fn from_document(doc: AnnotationDocument, viewport: Viewport) -> Result<Self> {
        Self::new(doc.image, doc.labels, doc.layout, viewport)
    }

    pub fn image(&self) -> &ImageSource {
        &self.image
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn resolver(&self) -> &Arc<ScaleResolver> {
        &self.resolver
    }

    /// Lay out every label at the current scale.
    ///
    /// Labels that break the routing contract are left out and logged.
    pub fn compose(&self) -> Composition {
        let state = self.resolver.state();
        let mut labels = Vec::with_capacity(self.labels.len());
        for label in &self.labels {
            match geometry::layout(label, &self.config, state.scale) {
                Ok(geometry) => labels.push(AnnotatedLabel::new(label, geometry)),
                Err(e) => warn!("Skipping label: {}", e),
            }
        }
        debug!(
            "Composed {} of {} labels at scale {}",
            labels.len(),
            self.labels.len(),
            state.scale
        );
        Composition::new(self.image.clone(), state, self.config.margin, labels)
    }

    /// Like [`Annotator::compose`], but fails on the first invalid label.
    pub fn compose_strict(&self) -> Result<Composition> {
        let state = self.resolver.state();
        let labels = self
            .labels
            .iter()
            .map(|label| {
                let geometry = geometry::layout(label, &self.config, state.scale)?;
                Ok(AnnotatedLabel::new(label, geometry))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Composition::new(self.image.clone(), state, self.config.margin, labels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use label::{Direction, Point};

    fn label(id: &str, d1: Direction, d2: Option<Direction>) -> Label {
        let mut l = Label::new(id, id, Point::new(50.0, 50.0).unwrap(), d1);
        l.direction2 = d2;
        l
    }

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.line_width, 1.5);
        assert_eq!(config.line_length, 30.0);
        assert_eq!(config.margin, 24.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_viewport() {
        let viewport = Viewport::default();
        assert_eq!(viewport.width, 1280);
        assert_eq!(viewport.height, 720);
    }

    #[test]
    fn config_rejects_negative_and_inverted_lengths() {
        let negative = LayoutConfig { padding: -1.0, ..Default::default() };
        assert!(matches!(negative.validate(), Err(Error::Config(_))));
        let inverted = LayoutConfig { line_width: 40.0, ..Default::default() };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn duplicate_label_ids_are_rejected() {
        let labels = vec![label("a", Direction::Top, None), label("a", Direction::Left, None)];
        let res = Annotator::new(
            ImageSource::new("x.png"),
            labels,
            LayoutConfig::default(),
            Viewport::default(),
        );
        assert!(matches!(res, Err(Error::DuplicateId(id)) if id == "a"));
    }

    #[test]
    fn compose_skips_invalid_labels_but_strict_fails() {
        let labels = vec![
            label("ok", Direction::Top, Some(Direction::Left)),
            label("bad", Direction::Left, Some(Direction::Right)),
        ];
        let annotator = Annotator::new(
            ImageSource::new("x.png"),
            labels,
            LayoutConfig::default(),
            Viewport::default(),
        )
        .unwrap();
        let composition = annotator.compose();
        assert_eq!(composition.labels.len(), 1);
        assert_eq!(composition.labels[0].id, "ok");
        assert!(matches!(
            annotator.compose_strict(),
            Err(Error::InvalidLabel { id, .. }) if id == "bad"
        ));
    }

    #[test]
    fn unmeasured_composition_is_unscaled() {
        let annotator = Annotator::new(
            ImageSource::new("x.png").with_alt("demo"),
            vec![label("a", Direction::Bottom, None)],
            LayoutConfig::default(),
            Viewport { width: 800, height: 400 },
        )
        .unwrap();
        let composition = annotator.compose();
        assert_eq!(composition.scale, 1.0);
        assert_eq!(composition.reserved_height, None);
        assert_eq!(composition.image.alt, "demo");
    }
}
