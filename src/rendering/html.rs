//! HTML rendition of a composition.
//!
//! The output is a self-contained fragment with inline styles: an outer block
//! reserving the scaled height, an inner block carrying the scale transform
//! and, on top of the image, one element per label whose `id` is the label
//! identifier so fragment links can target it.

use std::fmt::Write as _;

use super::layout::Rect;
use super::{AnnotatedLabel, Composition};
use crate::geometry::TextPlacement;
use crate::{Error, Result};

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn rect_style(rect: &Rect) -> String {
    format!(
        "left: {}; top: {}; width: {}; height: {};",
        rect.left.to_css(),
        rect.top.to_css(),
        rect.width.to_css(),
        rect.height.to_css()
    )
}

fn text_transform(text: &TextPlacement) -> String {
    let (tx, ty) = text.anchor.translate();
    format!("translate({}%, {}%) scale({})", tx, ty, text.counter_scale)
}

fn write_label(out: &mut String, label: &AnnotatedLabel) -> std::fmt::Result {
    let g = &label.geometry;
    writeln!(out, r#"      <div id="{}" class="annotation">"#, escape_html(&label.id))?;
    for segment in g.segments() {
        writeln!(
            out,
            r#"        <div class="leader leader-{}" style="position: absolute; {} background-color: #000;"></div>"#,
            segment.direction,
            rect_style(&segment.rect)
        )?;
    }
    let text = &g.text;
    writeln!(
        out,
        r#"        <div class="callout" style="position: absolute; left: {}; top: {}; transform: {}; transform-origin: {}; pointer-events: none;">"#,
        text.position.left.to_css(),
        text.position.top.to_css(),
        text_transform(text),
        text.transform_origin.to_css()
    )?;
    writeln!(
        out,
        r#"          <div class="callout-box" style="width: max-content; max-width: {}px; white-space: normal; text-align: {};">"#,
        text.max_width,
        text.align.as_str()
    )?;
    let title_class =
        if text.title_gap { "callout-title callout-title-gap" } else { "callout-title" };
    writeln!(
        out,
        r#"            <div class="{}">{}</div>"#,
        title_class,
        escape_html(&label.title)
    )?;
    writeln!(
        out,
        r#"            <div class="callout-subtext" style="white-space: pre-line;">{}</div>"#,
        escape_html(&label.subtext)
    )?;
    writeln!(out, "          </div>")?;
    writeln!(out, "        </div>")?;
    writeln!(out, "      </div>")
}

fn write_composition(out: &mut String, c: &Composition) -> std::fmt::Result {
    let height = match c.reserved_height {
        Some(h) => format!("{}px", h),
        None => "auto".to_string(),
    };
    writeln!(
        out,
        r#"<div class="screenshot-annotator" style="width: 100%; margin: {}px auto; height: {};">"#,
        c.margin, height
    )?;
    writeln!(
        out,
        r#"  <div style="transform: scale({}); transform-origin: {};">"#,
        c.scale,
        c.container_origin.to_css()
    )?;
    writeln!(out, r#"    <div style="position: relative; overflow: visible;">"#)?;
    writeln!(
        out,
        r#"      <img src="{}" alt="{}" style="display: block; width: 100%; height: auto;">"#,
        escape_html(&c.image.src),
        escape_html(&c.image.alt)
    )?;
    for label in &c.labels {
        write_label(out, label)?;
    }
    writeln!(out, "    </div>")?;
    writeln!(out, "  </div>")?;
    writeln!(out, "</div>")
}

/// Render a composition as an HTML fragment.
pub fn render_html(composition: &Composition) -> Result<String> {
    let mut out = String::new();
    write_composition(&mut out, composition)
        .map_err(|e| Error::Render(format!("HTML output failed: {}", e)))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{Direction, Label, Point};
    use crate::{Annotator, ImageSource, LayoutConfig, Viewport};

    fn point(x: f64, y: f64) -> Point {
        Point::new(x, y).unwrap()
    }

    fn annotator() -> Annotator {
        let labels = vec![
            Label::new("filters", "Filters & <Search>", point(25.0, 15.0), Direction::Top)
                .bend(Direction::Left)
                .with_subtext("Line one\nLine two"),
            Label::new("session", "Working Session", point(15.0, 60.0), Direction::Left),
        ];
        Annotator::new(
            ImageSource::new("/demo.png"),
            labels,
            LayoutConfig::default(),
            Viewport { width: 1280, height: 1000 },
        )
        .unwrap()
    }

    #[test]
    fn escape_html_handles_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn unmeasured_composition_uses_auto_height() {
        let html = render_html(&annotator().compose()).unwrap();
        assert!(html.contains("height: auto;"));
        assert!(html.contains("transform: scale(1);"));
        assert!(html.contains("Filters &amp; &lt;Search&gt;"));
    }

    #[test]
    fn scaled_composition_counter_scales_text() {
        let a = annotator();
        a.resolver().observe_content_height(2000.0);
        let html = render_html(&a.compose()).unwrap();
        assert!(html.contains("height: 800px;"));
        assert!(html.contains("transform: scale(0.4); transform-origin: top center;"));
        for callout in [
            "translate(-100%, -100%) scale(2.5); transform-origin: bottom right;",
            "translate(-100%, -50%) scale(2.5); transform-origin: right center;",
        ] {
            assert!(html.contains(callout), "missing {callout}");
        }
        assert!(html.contains("top: -40px;"));
        assert!(html.contains(r#"<div id="session" class="annotation">"#));
    }
}
