/// Paint commands for annotated screenshots.
///
/// Commands are positioned relative to the unscaled image box. A renderer
/// draws them inside a container scaled by the composition scale; text blocks
/// additionally carry their own counter-scale about their anchor corner.

use serde::Serialize;

use super::layout::{Position, PxRect, Rect, Size};
use super::AnnotatedLabel;
use crate::geometry::{Anchor, TextAlign};

/// Leader lines are drawn in solid black
pub const LINE_COLOR: (u8, u8, u8, u8) = (0, 0, 0, 255);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PaintCommand {
    SolidRect {
        /// Label the rectangle belongs to
        id: String,
        rect: Rect,
        rgba: (u8, u8, u8, u8),
    },
    #[serde(rename_all = "camelCase")]
    Text {
        id: String,
        position: Position,
        anchor: Anchor,
        counter_scale: f64,
        align: TextAlign,
        max_width: f64,
        title_gap: bool,
        title: String,
        subtext: String,
    },
}

/// Pixel-resolved form of a [`PaintCommand`] for one concrete image size.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ResolvedCommand {
    SolidRect {
        id: String,
        rect: PxRect,
        rgba: (u8, u8, u8, u8),
    },
    #[serde(rename_all = "camelCase")]
    Text {
        id: String,
        /// Anchor point in image pixels
        x: f64,
        y: f64,
        anchor: Anchor,
        counter_scale: f64,
        align: TextAlign,
        title: String,
        subtext: String,
    },
}

impl PaintCommand {
    pub fn id(&self) -> &str {
        match self {
            PaintCommand::SolidRect { id, .. } | PaintCommand::Text { id, .. } => id,
        }
    }

    pub fn resolve(&self, image: Size) -> ResolvedCommand {
        match self {
            PaintCommand::SolidRect { id, rect, rgba } => ResolvedCommand::SolidRect {
                id: id.clone(),
                rect: rect.resolve(image),
                rgba: *rgba,
            },
            PaintCommand::Text {
                id,
                position,
                anchor,
                counter_scale,
                align,
                title,
                subtext,
                ..
            } => {
                let (x, y) = position.resolve(image);
                ResolvedCommand::Text {
                    id: id.clone(),
                    x,
                    y,
                    anchor: *anchor,
                    counter_scale: *counter_scale,
                    align: *align,
                    title: title.clone(),
                    subtext: subtext.clone(),
                }
            }
        }
    }
}

/// Segments first, then the text block, so text paints above the lines.
pub fn label_commands(label: &AnnotatedLabel) -> Vec<PaintCommand> {
    let g = &label.geometry;
    let mut cmds: Vec<PaintCommand> = g
        .segments()
        .map(|s| PaintCommand::SolidRect {
            id: label.id.clone(),
            rect: s.rect,
            rgba: LINE_COLOR,
        })
        .collect();
    cmds.push(PaintCommand::Text {
        id: label.id.clone(),
        position: g.text.position,
        anchor: g.text.anchor,
        counter_scale: g.text.counter_scale,
        align: g.text.align,
        max_width: g.text.max_width,
        title_gap: g.text.title_gap,
        title: label.title.clone(),
        subtext: label.subtext.clone(),
    });
    cmds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::layout;
    use crate::label::{Direction, Label, Point};
    use crate::LayoutConfig;

    #[test]
    fn bent_label_paints_two_rects_then_text() {
        let point = Point::new(85.0, 75.0).unwrap();
        let label = Label::new("debug", "Powerful Debug Tool", point, Direction::Bottom)
            .bend(Direction::Right);
        let geometry = layout(&label, &LayoutConfig::default(), 1.0).unwrap();
        let cmds = label_commands(&AnnotatedLabel::new(&label, geometry));
        assert_eq!(cmds.len(), 3);
        assert!(matches!(cmds[0], PaintCommand::SolidRect { rgba: LINE_COLOR, .. }));
        assert!(matches!(cmds[2], PaintCommand::Text { .. }));
        assert!(cmds.iter().all(|c| c.id() == "debug"));
    }

    #[test]
    fn resolved_segment_leaves_the_image_box() {
        let point = Point::new(15.0, 60.0).unwrap();
        let label = Label::new("session", "Working Session", point, Direction::Left);
        let geometry = layout(&label, &LayoutConfig::default(), 1.0).unwrap();
        let image = Size { width: 1000.0, height: 500.0 };
        match label_commands(&AnnotatedLabel::new(&label, geometry))[0].resolve(image) {
            ResolvedCommand::SolidRect { rect, .. } => {
                assert_eq!(rect.x, -20.0);
                assert_eq!(rect.right(), 150.0);
                assert_eq!(rect.y, 299.25);
                assert!(rect.extends_outside(image));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
