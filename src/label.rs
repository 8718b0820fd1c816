//! Label data model: annotated points and the directions their leader lines take.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Cardinal exit direction of a leader line segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
}

/// Axis a segment runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::Top, Direction::Bottom, Direction::Left, Direction::Right];

    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Left | Direction::Right => Orientation::Horizontal,
            Direction::Top | Direction::Bottom => Orientation::Vertical,
        }
    }

    /// Whether moving in this direction decreases the coordinate (left/top).
    pub fn is_negative(self) -> bool {
        matches!(self, Direction::Left | Direction::Top)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Top => "top",
            Direction::Bottom => "bottom",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point of interest in percentage coordinates of the image box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Build a point, rejecting coordinates outside `[0, 100]`.
    pub fn new(x: f64, y: f64) -> Result<Self> {
        let p = Point { x, y };
        p.validate()?;
        Ok(p)
    }

    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f64| v.is_finite() && (0.0..=100.0).contains(&v);
        if in_range(self.x) && in_range(self.y) {
            Ok(())
        } else {
            Err(Error::InvalidPoint { x: self.x, y: self.y })
        }
    }
}

/// A callout attached to a point on the screenshot.
///
/// `direction1` is where the leader line leaves the point. `direction2`, when
/// set, bends the line into an "L" and must be perpendicular to `direction1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    /// Stable identifier; also the id of the rendered element
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtext: String,
    pub position: Point,
    pub direction1: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction2: Option<Direction>,
}

impl Label {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        position: Point,
        direction1: Direction,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtext: String::new(),
            position,
            direction1,
            direction2: None,
        }
    }

    pub fn with_subtext(mut self, subtext: impl Into<String>) -> Self {
        self.subtext = subtext.into();
        self
    }

    pub fn bend(mut self, direction2: Direction) -> Self {
        self.direction2 = Some(direction2);
        self
    }

    /// The direction the text box finally reads away from.
    pub fn final_direction(&self) -> Direction {
        self.direction2.unwrap_or(self.direction1)
    }

    /// Check the routing contract: non-empty id, point inside the image and
    /// perpendicular directions when the line bends.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidLabel {
                id: self.id.clone(),
                reason: "identifier must not be empty".to_string(),
            });
        }
        self.position.validate().map_err(|e| Error::InvalidLabel {
            id: self.id.clone(),
            reason: e.to_string(),
        })?;
        if let Some(d2) = self.direction2 {
            if d2.orientation() == self.direction1.orientation() {
                return Err(Error::InvalidLabel {
                    id: self.id.clone(),
                    reason: format!(
                        "direction2 '{}' must be perpendicular to direction1 '{}'",
                        d2, self.direction1
                    ),
                });
            }
        }
        Ok(())
    }
}
