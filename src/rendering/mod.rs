//! Rendering: turn laid-out labels into something a renderer can draw.

pub mod html;
pub mod layout;
pub mod paint;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::geometry::{Anchor, LabelGeometry};
use crate::label::Label;
use crate::{ImageSource, ScaleState};
use paint::PaintCommand;

/// A label together with its computed geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedLabel {
    /// Identifier of the rendered element, used as a fragment target
    pub id: String,
    pub title: String,
    pub subtext: String,
    pub geometry: LabelGeometry,
}

impl AnnotatedLabel {
    pub fn new(label: &Label, geometry: LabelGeometry) -> Self {
        Self {
            id: label.id.clone(),
            title: label.title.clone(),
            subtext: label.subtext.clone(),
            geometry,
        }
    }
}

/// A fully laid-out screenshot at one scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub image: ImageSource,
    pub scale: f64,
    pub natural_height: Option<f64>,
    /// Height the outer container reserves, `None` until measured
    pub reserved_height: Option<f64>,
    pub margin: f64,
    /// Origin of the container scale transform
    pub container_origin: Anchor,
    pub labels: Vec<AnnotatedLabel>,
}

impl Composition {
    pub fn new(
        image: ImageSource,
        state: ScaleState,
        margin: f64,
        labels: Vec<AnnotatedLabel>,
    ) -> Self {
        Self {
            image,
            scale: state.scale,
            natural_height: state.natural_height,
            reserved_height: state.reserved_height(),
            margin,
            container_origin: Anchor::TOP_CENTER,
            labels,
        }
    }

    /// Identifiers of every addressable label element, in rendering order.
    pub fn anchor_ids(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|l| l.id.as_str())
    }

    /// Flat display list: each label's segments followed by its text block.
    pub fn display_list(&self) -> Vec<PaintCommand> {
        self.labels.iter().flat_map(paint::label_commands).collect()
    }

    /// Content hash of the display list, stable across runs.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for cmd in self.display_list() {
            // serializing plain data into a String cannot fail
            let line = serde_json::to_string(&cmd).unwrap_or_default();
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        hasher.update(self.scale.to_le_bytes());
        hex::encode(hasher.finalize())
    }
}
