//! SVG line drawings of generated pieces, at 1 unit = 1 mm.

use std::fmt::Write;

use nalgebra::{Point2, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::shape::GeneratedPattern;

/// Layout and stroke settings for [`render_svg`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SvgStyle {
    /// Drawing units per millimeter. Default: 1.0.
    pub scale: f64,
    /// Space left, right and above the piece; the title sits in the top
    /// margin. Default: 20.
    pub margin: f64,
    /// Space below the piece for the dimension line. Default: 40.
    pub footer: f64,
    /// Cut line stroke width. Default: 0.5.
    pub cut_stroke: f64,
    /// Stitch, grain and notch stroke width. Default: 0.3.
    pub detail_stroke: f64,
    /// Label font size. Default: 10.
    pub label_size: f64,
    /// Title font size. Default: 14.
    pub title_size: f64,
    /// Length of notch ticks and grain arrow heads. Default: 5.
    pub mark_length: f64,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            scale: 1.0,
            margin: 20.0,
            footer: 40.0,
            cut_stroke: 0.5,
            detail_stroke: 0.3,
            label_size: 10.0,
            title_size: 14.0,
            mark_length: 5.0,
        }
    }
}

impl SvgStyle {
    /// Sets the scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the margin.
    #[must_use]
    pub const fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }
}

/// Canvas size and the pattern-to-drawing mapping (Y flipped).
struct Canvas {
    width: f64,
    height: f64,
    scale: f64,
    margin: f64,
    footer: f64,
}

impl Canvas {
    fn new(pattern: &GeneratedPattern, style: &SvgStyle) -> Self {
        Self {
            width: pattern.width.mul_add(style.scale, 2.0 * style.margin),
            height: pattern.height.mul_add(style.scale, style.margin + style.footer),
            scale: style.scale,
            margin: style.margin,
            footer: style.footer,
        }
    }

    fn map(&self, p: &Point2<f64>) -> (f64, f64) {
        (
            p.x.mul_add(self.scale, self.margin),
            p.y.mul_add(-self.scale, self.height - self.footer),
        )
    }
}

fn points_attr(canvas: &Canvas, points: &[Point2<f64>], close: bool) -> String {
    let mut attr = String::new();
    let closing = if close { points.first() } else { None };
    for p in points.iter().chain(closing) {
        let (x, y) = canvas.map(p);
        if !attr.is_empty() {
            attr.push(' ');
        }
        let _ = write!(attr, "{x:.2},{y:.2}");
    }
    attr
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Draw one piece: title, cut line, dashed stitch line, grain arrow,
/// notches, labels and a `W mm × H mm` dimension line.
///
/// The canvas is the piece's bounding box plus margins; pattern Y points up,
/// drawing Y points down.
///
/// # Example
///
/// ```
/// use fit_analysis::BodyZone;
/// use pattern_gen::{render_svg, GeneratedPattern, SvgStyle};
///
/// let gusset = GeneratedPattern::diamond_gusset(BodyZone::Knees, 64.0, 40.0, 12.0).with_name("Knee Gusset");
/// let svg = render_svg(&gusset, &SvgStyle::default());
/// assert!(svg.contains(r#"viewBox="0 0 104.00 100.00""#));
/// assert!(svg.contains("64mm × 40mm"));
/// ```
#[must_use]
pub fn render_svg(pattern: &GeneratedPattern, style: &SvgStyle) -> String {
    let canvas = Canvas::new(pattern, style);
    let (w, h) = (canvas.width, canvas.height);

    let mut svg = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w:.2}mm" height="{h:.2}mm" viewBox="0 0 {w:.2} {h:.2}">
  <style>
    .cut-line {{ stroke: black; stroke-width: {cut}; fill: none; }}
    .stitch-line {{ stroke: gray; stroke-width: {detail}; fill: none; stroke-dasharray: 3,2; }}
    .grain-line {{ stroke: black; stroke-width: {detail}; fill: none; }}
    .notch {{ stroke: black; stroke-width: {detail}; fill: black; }}
    .label {{ font-family: Arial, sans-serif; font-size: {label}px; fill: black; }}
    .title {{ font-family: Arial, sans-serif; font-size: {title}px; font-weight: bold; fill: black; }}
  </style>
"#,
        cut = style.cut_stroke,
        detail = style.detail_stroke,
        label = style.label_size,
        title = style.title_size,
    );

    let _ = writeln!(
        svg,
        r#"  <text x="{:.2}" y="15" class="title" text-anchor="middle">{}</text>"#,
        w / 2.0,
        escape(&pattern.name)
    );

    let _ = writeln!(
        svg,
        r#"  <polyline points="{}" class="cut-line"/>"#,
        points_attr(&canvas, &pattern.cut_line, true)
    );
    if !pattern.stitch_line.is_empty() && pattern.seam_allowance > 0.0 {
        let _ = writeln!(
            svg,
            r#"  <polyline points="{}" class="stitch-line"/>"#,
            points_attr(&canvas, &pattern.stitch_line, true)
        );
    }

    if let Some(grain) = &pattern.grain_line {
        let (x1, y1) = canvas.map(&grain.start);
        let (x2, y2) = canvas.map(&grain.end);
        let _ = writeln!(
            svg,
            r#"  <line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" class="grain-line"/>"#
        );
        let dir = Vector2::new(x2 - x1, y2 - y1)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(|| Vector2::new(0.0, -1.0));
        let perp = Vector2::new(-dir.y, dir.x);
        let size = style.mark_length;
        let back = Vector2::new(x2, y2) - dir * size;
        let a = back + perp * (size / 2.0);
        let b = back - perp * (size / 2.0);
        let _ = writeln!(
            svg,
            r#"  <polyline points="{:.2},{:.2} {x2:.2},{y2:.2} {:.2},{:.2}" class="grain-line"/>"#,
            a.x, a.y, b.x, b.y
        );
    }

    for notch in &pattern.notches {
        let (x, y) = canvas.map(&notch.position);
        let tip_x = notch.direction.x.mul_add(style.mark_length, x);
        let tip_y = notch.direction.y.mul_add(-style.mark_length, y);
        let _ = writeln!(
            svg,
            r#"  <line x1="{x:.2}" y1="{y:.2}" x2="{tip_x:.2}" y2="{tip_y:.2}" class="notch"/>"#
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{:.2}" y="{:.2}" class="label">{}</text>"#,
            x + 3.0,
            y + 3.0,
            escape(&notch.label)
        );
    }

    for label in &pattern.labels {
        let (x, y) = canvas.map(&label.position);
        for (i, line) in label.text.lines().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let dy = 12.0 * i as f64;
            let _ = writeln!(
                svg,
                r#"  <text x="{x:.2}" y="{:.2}" class="label" text-anchor="middle">{}</text>"#,
                y + dy,
                escape(line)
            );
        }
    }

    let _ = writeln!(
        svg,
        r#"  <text x="{:.2}" y="{:.2}" class="label" text-anchor="middle">{}</text>"#,
        w / 2.0,
        h - 10.0,
        pattern.dimension_text()
    );

    svg.push_str("</svg>\n");
    svg
}
