//! Generated pattern pieces and the shapes they are built from.
//!
//! Coordinates are millimeters in the pattern plane, Y up, with the piece's
//! bounding box starting at the origin.

use fit_analysis::BodyZone;
use nalgebra::{Point2, Vector2};
use scan_section::polygon_area;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::offset::inset_polygon;

/// Points sampled along each arc of a football gusset.
pub const FOOTBALL_SAMPLES: usize = 20;

/// What a generated piece is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PieceKind {
    /// Adds length.
    Extension,
    /// Adds room at a stress point.
    Gusset,
    /// Marking template for a dart; traced, not cut.
    Dart,
    /// Widening panel set into a seam.
    InsertPanel,
}

impl PieceKind {
    /// Snake-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Extension => "extension",
            Self::Gusset => "gusset",
            Self::Dart => "dart",
            Self::InsertPanel => "insert_panel",
        }
    }
}

/// Alignment mark on a piece edge.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Notch {
    /// Position on the cut line.
    pub position: Point2<f64>,
    /// Unit direction into the piece.
    pub direction: Vector2<f64>,
    /// Mark text, e.g. `TOP` or `1`.
    pub label: String,
}

impl Notch {
    fn new(x: f64, y: f64, dx: f64, dy: f64, label: &str) -> Self {
        Self {
            position: Point2::new(x, y),
            direction: Vector2::new(dx, dy),
            label: label.to_string(),
        }
    }
}

/// Direction the fabric's warp should run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GrainLine {
    /// Tail.
    pub start: Point2<f64>,
    /// Arrow head.
    pub end: Point2<f64>,
}

/// Multi-line text placed on the piece.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Label {
    /// Anchor (center of the first line).
    pub position: Point2<f64>,
    /// Text; `\n` separates lines.
    pub text: String,
}

/// A new piece to cut (or trace) for one alteration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeneratedPattern {
    /// Display name, unique within a [`PatternSet`](crate::PatternSet).
    pub name: String,
    /// What the piece is for.
    pub kind: PieceKind,
    /// Body zone of the issue it fixes.
    pub zone: BodyZone,
    /// Outer outline, seam allowance included. Implicitly closed.
    pub cut_line: Vec<Point2<f64>>,
    /// Sewing line, `seam_allowance` inside the cut line.
    pub stitch_line: Vec<Point2<f64>>,
    /// Seam allowance (mm). Zero for dart templates.
    pub seam_allowance: f64,
    /// Alignment marks.
    pub notches: Vec<Notch>,
    /// Grain direction, if the piece must be cut on grain.
    pub grain_line: Option<GrainLine>,
    /// Cutting labels.
    pub labels: Vec<Label>,
    /// Sewing instructions.
    pub instructions: String,
    /// Area (mm²).
    pub area: f64,
    /// Bounding width (mm).
    pub width: f64,
    /// Bounding height (mm).
    pub height: f64,
}

impl GeneratedPattern {
    /// Trapezoid with a `top_width` edge at `y = height` and a
    /// `bottom_width` edge at `y = 0`, both centered on the wider one.
    ///
    /// # Example
    ///
    /// ```
    /// use fit_analysis::BodyZone;
    /// use pattern_gen::{GeneratedPattern, PieceKind};
    ///
    /// let panel = GeneratedPattern::tapered_panel(PieceKind::Extension, BodyZone::Ankles, 99.0, 124.0, 119.0, 12.0);
    /// assert!((panel.width_at(99.0) - 124.0).abs() < 1e-9);
    /// assert!((panel.width_at(0.0) - 119.0).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn tapered_panel(
        kind: PieceKind,
        zone: BodyZone,
        height: f64,
        top_width: f64,
        bottom_width: f64,
        seam_allowance: f64,
    ) -> Self {
        // Both edges centered on the wider one, so min x is 0 either way.
        let width = top_width.max(bottom_width);
        let center = width / 2.0;
        let top_x = center - top_width / 2.0;
        let bottom_x = center - bottom_width / 2.0;
        let cut_line = vec![
            Point2::new(top_x, height),
            Point2::new(top_x + top_width, height),
            Point2::new(bottom_x + bottom_width, 0.0),
            Point2::new(bottom_x, 0.0),
        ];
        Self {
            name: String::new(),
            kind,
            zone,
            stitch_line: inset_polygon(&cut_line, seam_allowance),
            area: polygon_area(&cut_line),
            cut_line,
            seam_allowance,
            notches: vec![
                Notch::new(center, height, 0.0, -1.0, "TOP"),
                Notch::new(center, 0.0, 0.0, 1.0, "BOTTOM"),
            ],
            grain_line: Some(GrainLine {
                start: Point2::new(center, height * 0.2),
                end: Point2::new(center, height * 0.8),
            }),
            labels: vec![Label {
                position: Point2::new(center, height / 2.0),
                text: format!("Cut 2\nSA: {seam_allowance:.0}mm"),
            }],
            instructions: String::new(),
            width,
            height,
        }
    }

    /// Rhombus with tips at the edge midpoints of a `width` × `height` box.
    /// Cut on the bias, so no grain line.
    #[must_use]
    pub fn diamond_gusset(zone: BodyZone, width: f64, height: f64, seam_allowance: f64) -> Self {
        let (cx, cy) = (width / 2.0, height / 2.0);
        let cut_line = vec![
            Point2::new(cx, height),
            Point2::new(width, cy),
            Point2::new(cx, 0.0),
            Point2::new(0.0, cy),
        ];
        Self {
            name: String::new(),
            kind: PieceKind::Gusset,
            zone,
            stitch_line: inset_polygon(&cut_line, seam_allowance),
            cut_line,
            seam_allowance,
            notches: vec![
                Notch::new(cx, height, 0.0, -1.0, "1"),
                Notch::new(width, cy, -1.0, 0.0, "2"),
                Notch::new(cx, 0.0, 0.0, 1.0, "3"),
                Notch::new(0.0, cy, 1.0, 0.0, "4"),
            ],
            grain_line: None,
            labels: vec![Label {
                position: Point2::new(cx, cy),
                text: format!("Cut 1\n(or 2 for pair)\nSA: {seam_allowance:.0}mm"),
            }],
            instructions: String::new(),
            area: width * height / 2.0,
            width,
            height,
        }
    }

    /// Eye shape bounded by two parabolic arcs meeting at `(0, width / 2)`
    /// and `(length, width / 2)`, with a horizontal grain line.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn football_gusset(zone: BodyZone, length: f64, width: f64, seam_allowance: f64) -> Self {
        let half = width / 2.0;
        let last = (FOOTBALL_SAMPLES - 1) as f64;
        let bulge = |i: usize| {
            let t = i as f64 / last;
            let s = 2.0f64.mul_add(t, -1.0);
            (t * length, half * s.mul_add(-s, 1.0))
        };
        // Upper arc left to right, then the lower arc back without repeating
        // the shared tips.
        let upper = (0..FOOTBALL_SAMPLES).map(|i| {
            let (x, dy) = bulge(i);
            Point2::new(x, half + dy)
        });
        let lower = (1..FOOTBALL_SAMPLES - 1).rev().map(|i| {
            let (x, dy) = bulge(i);
            Point2::new(x, half - dy)
        });
        let cut_line: Vec<_> = upper.chain(lower).collect();

        Self {
            name: String::new(),
            kind: PieceKind::Gusset,
            zone,
            stitch_line: inset_polygon(&cut_line, seam_allowance),
            cut_line,
            seam_allowance,
            notches: vec![
                Notch::new(0.0, half, 1.0, 0.0, "FRONT"),
                Notch::new(length, half, -1.0, 0.0, "BACK"),
            ],
            grain_line: Some(GrainLine {
                start: Point2::new(length * 0.3, half),
                end: Point2::new(length * 0.7, half),
            }),
            labels: vec![Label {
                position: Point2::new(length / 2.0, half),
                text: format!("Cut 1\nStretch fabric recommended\nSA: {seam_allowance:.0}mm"),
            }],
            instructions: String::new(),
            area: std::f64::consts::PI * (length / 2.0) * half * 0.8,
            width: length,
            height: width,
        }
    }

    /// Triangle to trace onto the garment: base `width` at `y = 0`, apex at
    /// `y = length`. No seam allowance; the stitch line is the outline.
    #[must_use]
    pub fn dart_template(zone: BodyZone, width: f64, length: f64) -> Self {
        let cut_line = vec![
            Point2::new(width / 2.0, length),
            Point2::new(width, 0.0),
            Point2::new(0.0, 0.0),
        ];
        Self {
            name: String::new(),
            kind: PieceKind::Dart,
            zone,
            stitch_line: cut_line.clone(),
            cut_line,
            seam_allowance: 0.0,
            notches: vec![
                Notch::new(width / 2.0, length, 0.0, -1.0, "APEX"),
                Notch::new(0.0, 0.0, 1.0, 0.0, "FOLD"),
                Notch::new(width, 0.0, -1.0, 0.0, "FOLD"),
            ],
            grain_line: None,
            labels: vec![Label {
                position: Point2::new(width / 2.0, length / 3.0),
                text: "DART TEMPLATE\nTrace onto garment".to_string(),
            }],
            instructions: String::new(),
            area: width * length / 2.0,
            width,
            height: length,
        }
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the instructions.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Horizontal extent of the cut line at height `y`; zero outside the
    /// piece.
    #[must_use]
    pub fn width_at(&self, y: f64) -> f64 {
        let n = self.cut_line.len();
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for i in 0..n {
            let (a, b) = (self.cut_line[i], self.cut_line[(i + 1) % n]);
            let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
            if y < y0 || y > y1 {
                continue;
            }
            if (b.y - a.y).abs() < f64::EPSILON {
                lo = lo.min(a.x.min(b.x));
                hi = hi.max(a.x.max(b.x));
            } else {
                let x = (y - a.y) / (b.y - a.y) * (b.x - a.x) + a.x;
                lo = lo.min(x);
                hi = hi.max(x);
            }
        }
        if hi >= lo {
            hi - lo
        } else {
            0.0
        }
    }

    /// Text for the dimension line, e.g. `120mm × 85mm`.
    #[must_use]
    pub fn dimension_text(&self) -> String {
        format!("{:.0}mm × {:.0}mm", self.width, self.height)
    }
}
