//! Annotation geometry engine.
//!
//! Turns one [`Label`] into the rectangles of its leader line and the
//! placement of its text box. The computation is pure: the same label, config
//! and scale always produce the same geometry, and labels never influence
//! each other.
//!
//! All routing decisions come from a single table keyed by
//! `(direction1, direction2)`, see [`Route`].

use serde::Serialize;

use crate::label::{Direction, Label, Orientation, Point};
use crate::rendering::layout::{Length, Position, Rect};
use crate::{Error, LayoutConfig, Result};

/// Extra reach of the first segment when the line bends, so the corner of the
/// "L" sits clear of the image edge.
pub const TWO_SEGMENT_CLEARANCE: f64 = 20.0;
/// Gap between a straight horizontal line and its text box.
pub const TEXT_CLEARANCE_HORIZONTAL: f64 = 8.0;
/// Gap between a straight vertical line and its text box.
pub const TEXT_CLEARANCE_VERTICAL: f64 = 10.0;
/// Gap between the end of a bent line and its text box.
pub const BEND_TEXT_CLEARANCE: f64 = 10.0;
/// Text boxes wrap beyond this width.
pub const TEXT_MAX_WIDTH: f64 = 260.0;

/// Which vertical edge of the text box sits on the anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalEdge {
    Left,
    Center,
    Right,
}

/// Which horizontal edge of the text box sits on the anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalEdge {
    Top,
    Center,
    Bottom,
}

/// The edge or corner of a text box that is placed on the anchor point.
///
/// The box extends away from that corner, and the same corner is used as the
/// transform origin so counter-scaling leaves the anchor where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Anchor {
    pub horizontal: HorizontalEdge,
    pub vertical: VerticalEdge,
}

impl Anchor {
    pub const TOP_LEFT: Anchor = Anchor::new(HorizontalEdge::Left, VerticalEdge::Top);
    pub const TOP_CENTER: Anchor = Anchor::new(HorizontalEdge::Center, VerticalEdge::Top);
    pub const TOP_RIGHT: Anchor = Anchor::new(HorizontalEdge::Right, VerticalEdge::Top);
    pub const CENTER_LEFT: Anchor = Anchor::new(HorizontalEdge::Left, VerticalEdge::Center);
    pub const CENTER_RIGHT: Anchor = Anchor::new(HorizontalEdge::Right, VerticalEdge::Center);
    pub const BOTTOM_LEFT: Anchor = Anchor::new(HorizontalEdge::Left, VerticalEdge::Bottom);
    pub const BOTTOM_CENTER: Anchor = Anchor::new(HorizontalEdge::Center, VerticalEdge::Bottom);
    pub const BOTTOM_RIGHT: Anchor = Anchor::new(HorizontalEdge::Right, VerticalEdge::Bottom);

    pub const fn new(horizontal: HorizontalEdge, vertical: VerticalEdge) -> Self {
        Self { horizontal, vertical }
    }

    /// Translation of the box, as percentages of its own size, that puts this
    /// corner on the positioned point.
    pub fn translate(&self) -> (f64, f64) {
        let x = match self.horizontal {
            HorizontalEdge::Left => 0.0,
            HorizontalEdge::Center => -50.0,
            HorizontalEdge::Right => -100.0,
        };
        let y = match self.vertical {
            VerticalEdge::Top => 0.0,
            VerticalEdge::Center => -50.0,
            VerticalEdge::Bottom => -100.0,
        };
        (x, y)
    }

    /// Fractions of the box size from its top-left corner to the anchor.
    pub fn fractions(&self) -> (f64, f64) {
        let (x, y) = self.translate();
        (-x / 100.0, -y / 100.0)
    }

    /// CSS `transform-origin` keywords, e.g. `bottom right` or `left center`.
    pub fn to_css(&self) -> String {
        let h = match self.horizontal {
            HorizontalEdge::Left => "left",
            HorizontalEdge::Center => "center",
            HorizontalEdge::Right => "right",
        };
        let v = match self.vertical {
            VerticalEdge::Top => "top",
            VerticalEdge::Center => "center",
            VerticalEdge::Bottom => "bottom",
        };
        match (self.horizontal, self.vertical) {
            (_, VerticalEdge::Center) => format!("{} center", h),
            _ => format!("{} {}", v, h),
        }
    }
}

/// Paragraph alignment inside a text box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// One row of the routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Route {
    pub direction1: Direction,
    pub direction2: Option<Direction>,
    pub segment1: Orientation,
    pub segment2: Option<Orientation>,
    pub anchor: Anchor,
    pub align: TextAlign,
}

const fn straight(
    direction1: Direction,
    segment1: Orientation,
    anchor: Anchor,
    align: TextAlign,
) -> Route {
    Route { direction1, direction2: None, segment1, segment2: None, anchor, align }
}

const fn bent(
    direction1: Direction,
    direction2: Direction,
    anchor: Anchor,
    align: TextAlign,
) -> Route {
    let (segment1, segment2) = match direction1 {
        Direction::Left | Direction::Right => (Orientation::Horizontal, Orientation::Vertical),
        Direction::Top | Direction::Bottom => (Orientation::Vertical, Orientation::Horizontal),
    };
    Route {
        direction1,
        direction2: Some(direction2),
        segment1,
        segment2: Some(segment2),
        anchor,
        align,
    }
}

use Direction::{Bottom, Left, Right, Top};

static ROUTES: [Route; 12] = [
    straight(Top, Orientation::Vertical, Anchor::BOTTOM_CENTER, TextAlign::Center),
    straight(Bottom, Orientation::Vertical, Anchor::TOP_CENTER, TextAlign::Center),
    straight(Left, Orientation::Horizontal, Anchor::CENTER_RIGHT, TextAlign::Right),
    straight(Right, Orientation::Horizontal, Anchor::CENTER_LEFT, TextAlign::Left),
    bent(Top, Left, Anchor::BOTTOM_RIGHT, TextAlign::Right),
    bent(Top, Right, Anchor::BOTTOM_LEFT, TextAlign::Left),
    bent(Bottom, Left, Anchor::TOP_RIGHT, TextAlign::Right),
    bent(Bottom, Right, Anchor::TOP_LEFT, TextAlign::Left),
    bent(Left, Top, Anchor::BOTTOM_RIGHT, TextAlign::Right),
    bent(Left, Bottom, Anchor::TOP_RIGHT, TextAlign::Right),
    bent(Right, Top, Anchor::BOTTOM_LEFT, TextAlign::Left),
    bent(Right, Bottom, Anchor::TOP_LEFT, TextAlign::Left),
];

impl Route {
    /// Every valid `(direction1, direction2)` combination.
    pub fn all() -> &'static [Route] {
        &ROUTES
    }

    /// Row for a direction pair; `None` for parallel or reversed bends.
    pub fn lookup(direction1: Direction, direction2: Option<Direction>) -> Option<&'static Route> {
        ROUTES
            .iter()
            .find(|r| r.direction1 == direction1 && r.direction2 == direction2)
    }
}

/// One straight piece of a leader line, drawn as a thin rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub direction: Direction,
    pub orientation: Orientation,
    pub rect: Rect,
}

impl Segment {
    /// Extent along the segment's own axis.
    pub fn length(&self) -> Length {
        match self.orientation {
            Orientation::Horizontal => self.rect.width,
            Orientation::Vertical => self.rect.height,
        }
    }
}

/// Where and how a label's text box is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPlacement {
    /// Point the anchor corner is placed on
    pub position: Position,
    pub anchor: Anchor,
    /// Always equal to `anchor`
    pub transform_origin: Anchor,
    /// `1 / scale`, undoing the container scale for the text
    pub counter_scale: f64,
    pub align: TextAlign,
    /// Whether the title is separated from the subtext by a gap
    pub title_gap: bool,
    pub max_width: f64,
}

/// Complete geometry of a single label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelGeometry {
    pub segment1: Segment,
    pub segment2: Option<Segment>,
    pub text: TextPlacement,
}

impl LabelGeometry {
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        std::iter::once(&self.segment1).chain(self.segment2.as_ref())
    }
}

/// Lay out one label for a composition rendered at `scale`.
///
/// Fails with [`Error::InvalidLabel`] when the label breaks the routing
/// contract; nothing is guessed for parallel or reversed bends.
pub fn layout(label: &Label, config: &LayoutConfig, scale: f64) -> Result<LabelGeometry> {
    label.validate()?;
    let route =
        Route::lookup(label.direction1, label.direction2).ok_or_else(|| Error::InvalidLabel {
            id: label.id.clone(),
            reason: "no route for direction pair".to_string(),
        })?;

    let reach = config.padding
        + if label.direction2.is_some() {
            TWO_SEGMENT_CLEARANCE
        } else {
            0.0
        };
    let p = label.position;

    let segment1 = first_segment(label.direction1, p, reach, config.line_width);
    let segment2 = label
        .direction2
        .map(|d2| second_segment(label.direction1, d2, p, reach, config));

    let counter_scale = if scale.is_finite() && scale > 0.0 { 1.0 / scale } else { 1.0 };

    let text = TextPlacement {
        position: text_position(label, config),
        anchor: route.anchor,
        transform_origin: route.anchor,
        counter_scale,
        align: route.align,
        title_gap: label.final_direction().orientation() == Orientation::Horizontal,
        max_width: TEXT_MAX_WIDTH,
    };

    Ok(LabelGeometry { segment1, segment2, text })
}

/// Coordinate `reach` pixels beyond the image edge `direction` points at.
fn beyond_edge(direction: Direction, reach: f64) -> Length {
    if direction.is_negative() {
        Length::px(-reach)
    } else {
        Length::calc(100.0, reach)
    }
}

fn first_segment(direction: Direction, p: Point, reach: f64, line_width: f64) -> Segment {
    let half = line_width / 2.0;
    let rect = match direction {
        Direction::Left => Rect {
            left: beyond_edge(direction, reach),
            top: Length::calc(p.y, -half),
            width: Length::calc(p.x, reach),
            height: Length::px(line_width),
        },
        Direction::Right => Rect {
            left: Length::percent(p.x),
            top: Length::calc(p.y, -half),
            width: Length::calc(100.0 - p.x, reach),
            height: Length::px(line_width),
        },
        Direction::Top => Rect {
            left: Length::calc(p.x, -half),
            top: beyond_edge(direction, reach),
            width: Length::px(line_width),
            height: Length::calc(p.y, reach),
        },
        Direction::Bottom => Rect {
            left: Length::calc(p.x, -half),
            top: Length::percent(p.y),
            width: Length::px(line_width),
            height: Length::calc(100.0 - p.y, reach),
        },
    };
    Segment { direction, orientation: direction.orientation(), rect }
}

fn second_segment(
    direction1: Direction,
    direction2: Direction,
    p: Point,
    reach: f64,
    config: &LayoutConfig,
) -> Segment {
    let bend = beyond_edge(direction1, reach);
    let lw = config.line_width;
    let len = config.line_length;
    let half = lw / 2.0;
    let rect = match direction2 {
        Direction::Left => Rect {
            left: Length::calc(p.x, -(len - half)),
            top: bend,
            width: Length::px(len),
            height: Length::px(lw),
        },
        Direction::Right => Rect {
            left: Length::calc(p.x, -half),
            top: bend,
            width: Length::px(len),
            height: Length::px(lw),
        },
        Direction::Top => Rect {
            left: bend,
            top: Length::calc(p.y, -(len - half)),
            width: Length::px(lw),
            height: Length::px(len),
        },
        Direction::Bottom => Rect {
            left: bend,
            top: Length::calc(p.y, -half),
            width: Length::px(lw),
            height: Length::px(len),
        },
    };
    Segment { direction: direction2, orientation: direction2.orientation(), rect }
}

fn text_position(label: &Label, config: &LayoutConfig) -> Position {
    let p = label.position;
    let d1 = label.direction1;
    match label.direction2 {
        None => match d1 {
            Direction::Left | Direction::Right => Position {
                left: beyond_edge(d1, config.padding + TEXT_CLEARANCE_HORIZONTAL),
                top: Length::percent(p.y),
            },
            Direction::Top | Direction::Bottom => Position {
                left: Length::percent(p.x),
                top: beyond_edge(d1, config.padding + TEXT_CLEARANCE_VERTICAL),
            },
        },
        Some(d2) => {
            let past_bend = config.line_length - config.line_width + BEND_TEXT_CLEARANCE;
            let signed = if d2.is_negative() { -past_bend } else { past_bend };
            let beside = beyond_edge(d1, config.padding);
            match d2.orientation() {
                Orientation::Horizontal => Position {
                    left: Length::calc(p.x, signed),
                    top: beside,
                },
                Orientation::Vertical => Position {
                    left: beside,
                    top: Length::calc(p.y, signed),
                },
            }
        }
    }
}
