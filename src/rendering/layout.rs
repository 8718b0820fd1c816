/// Geometry primitives shared by the layout engine and the renderers.
///
/// Positions inside the annotated image are expressed the way a browser would
/// express them: a percentage of the image box plus a pixel offset
/// (`calc(p% + npx)`). They only become absolute once resolved against a
/// concrete image size.

use serde::{Deserialize, Serialize};

/// A length made of a percentage of the containing image box plus pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Length {
    pub percent: f64,
    pub px: f64,
}

impl Length {
    pub const ZERO: Length = Length { percent: 0.0, px: 0.0 };

    pub fn px(px: f64) -> Self {
        Self { percent: 0.0, px }
    }

    pub fn percent(percent: f64) -> Self {
        Self { percent, px: 0.0 }
    }

    pub fn calc(percent: f64, px: f64) -> Self {
        Self { percent, px }
    }

    /// Absolute value in pixels for an image box extent along the same axis.
    pub fn resolve(&self, extent: f64) -> f64 {
        extent * self.percent / 100.0 + self.px
    }

    /// CSS rendition, using `calc()` only when both parts are present.
    pub fn to_css(&self) -> String {
        match (self.percent == 0.0, self.px == 0.0) {
            (true, true) => "0px".to_string(),
            (true, false) => format!("{}px", self.px),
            (false, true) => format!("{}%", self.percent),
            (false, false) if self.px < 0.0 => {
                format!("calc({}% - {}px)", self.percent, -self.px)
            }
            (false, false) => format!("calc({}% + {}px)", self.percent, self.px),
        }
    }
}

/// Intrinsic size of the rendered image box, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// A point positioned relative to the image box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub left: Length,
    pub top: Length,
}

impl Position {
    pub fn resolve(&self, image: Size) -> (f64, f64) {
        (self.left.resolve(image.width), self.top.resolve(image.height))
    }
}

/// An axis-aligned rectangle positioned relative to the image box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: Length,
    pub top: Length,
    pub width: Length,
    pub height: Length,
}

impl Rect {
    pub fn resolve(&self, image: Size) -> PxRect {
        PxRect {
            x: self.left.resolve(image.width),
            y: self.top.resolve(image.height),
            width: self.width.resolve(image.width),
            height: self.height.resolve(image.height),
        }
    }
}

/// A rectangle in absolute pixels, relative to the image's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PxRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PxRect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when the rectangle reaches outside of a `width x height` box.
    pub fn extends_outside(&self, image: Size) -> bool {
        self.x < 0.0 || self.y < 0.0 || self.right() > image.width || self.bottom() > image.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_resolves_percent_plus_pixels() {
        let l = Length::calc(50.0, -10.0);
        assert_eq!(l.resolve(200.0), 90.0);
        assert_eq!(Length::px(-45.0).resolve(1000.0), -45.0);
    }

    #[test]
    fn length_css_uses_calc_only_when_mixed() {
        assert_eq!(Length::ZERO.to_css(), "0px");
        assert_eq!(Length::px(1.5).to_css(), "1.5px");
        assert_eq!(Length::percent(72.0).to_css(), "72%");
        assert_eq!(Length::calc(100.0, 25.0).to_css(), "calc(100% + 25px)");
        assert_eq!(Length::calc(2.0, -0.75).to_css(), "calc(2% - 0.75px)");
    }

    #[test]
    fn rect_resolves_each_axis_against_its_extent() {
        let r = Rect {
            left: Length::percent(10.0),
            top: Length::percent(10.0),
            width: Length::px(5.0),
            height: Length::calc(50.0, 1.0),
        };
        let px = r.resolve(Size { width: 400.0, height: 200.0 });
        assert_eq!(px, PxRect { x: 40.0, y: 20.0, width: 5.0, height: 101.0 });
        assert!(!px.extends_outside(Size { width: 400.0, height: 200.0 }));
    }
}
