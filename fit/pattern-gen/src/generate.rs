//! From recommendations to pattern pieces.

use std::collections::{BTreeMap, HashMap};

use fit_analysis::{BodyZone, ModificationKind, Recommendation};
use garment_model::GarmentMeasurements;
use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PatternError, PatternResult};
use crate::fabric::FabricType;
use crate::shape::{GeneratedPattern, PieceKind};
use crate::svg::{render_svg, SvgStyle};

/// Circumferences assumed when the garment scan did not yield one (mm).
const DEFAULT_ANKLE: f64 = 200.0;
const DEFAULT_WAIST: f64 = 800.0;
const DEFAULT_HIP: f64 = 1000.0;
const DEFAULT_OUTSEAM: f64 = 800.0;

/// Hem and rise extensions narrow by this factor across their height.
const TAPER: f64 = 0.95;

/// Pieces for a set of recommendations plus their drawings.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PatternSet {
    /// Pieces in recommendation order.
    pub patterns: Vec<GeneratedPattern>,
    /// SVG drawing per piece name.
    pub drawings: BTreeMap<String, String>,
    /// Instructions of recommendations that need no new piece.
    pub instructions_only: Vec<String>,
}

impl PatternSet {
    /// Piece by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&GeneratedPattern> {
        self.patterns.iter().find(|p| p.name == name)
    }

    /// Number of pieces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True if no piece was generated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Sizes new pieces from one garment in one fabric.
#[derive(Debug, Clone, Copy)]
pub struct PatternGenerator<'a> {
    measurements: &'a GarmentMeasurements,
    seam_allowance: f64,
}

impl<'a> PatternGenerator<'a> {
    /// Generator for pieces cut from `fabric` to fit a garment with these
    /// measurements.
    #[must_use]
    pub const fn new(measurements: &'a GarmentMeasurements, fabric: FabricType) -> Self {
        Self {
            measurements,
            seam_allowance: fabric.seam_allowance(),
        }
    }

    /// Seam allowance used for cut pieces.
    #[must_use]
    pub const fn seam_allowance(&self) -> f64 {
        self.seam_allowance
    }

    /// Piece for one recommendation, or `None` if the alteration needs no
    /// new fabric (take-in) or has no known shape.
    #[must_use]
    pub fn pattern_for(&self, rec: &Recommendation) -> Option<GeneratedPattern> {
        let pattern = match rec.kind {
            ModificationKind::Extension => self.extension(rec.zone, rec.amount),
            ModificationKind::Gusset => Some(self.gusset(rec.zone, rec.amount)),
            ModificationKind::Dart => Some(Self::dart(rec.zone, rec.amount)),
            ModificationKind::LetOut => Some(self.insert_panel(rec.zone, rec.amount)),
            ModificationKind::TakeIn => None,
        }?;
        Some(pattern.with_instructions(rec.instructions.clone()))
    }

    fn extension(&self, zone: BodyZone, amount: f64) -> Option<GeneratedPattern> {
        let sa2 = 2.0 * self.seam_allowance;
        let height = amount + sa2;
        let m = self.measurements;
        let (name, top, bottom) = match zone {
            BodyZone::Ankles => {
                let ankle = m.ankle_circumference.unwrap_or(DEFAULT_ANKLE);
                (
                    format!("Leg Extension - {zone}"),
                    ankle / 2.0 + sa2,
                    TAPER * ankle / 2.0 + sa2,
                )
            }
            BodyZone::Crotch => {
                let waist = m.waist_circumference.unwrap_or(DEFAULT_WAIST);
                (
                    "Rise Extension".to_string(),
                    TAPER * waist / 4.0 + sa2,
                    waist / 4.0 + sa2,
                )
            }
            BodyZone::Waist => {
                let waist = m.waist_circumference.unwrap_or(DEFAULT_WAIST);
                let lower = m
                    .hip_circumference
                    .or(m.chest_circumference)
                    .unwrap_or(DEFAULT_HIP);
                (
                    "Torso Extension Band".to_string(),
                    waist / 2.0 + sa2,
                    lower / 2.0 + sa2,
                )
            }
            _ => return None,
        };
        Some(
            GeneratedPattern::tapered_panel(
                PieceKind::Extension,
                zone,
                height,
                top,
                bottom,
                self.seam_allowance,
            )
            .with_name(name),
        )
    }

    fn gusset(&self, zone: BodyZone, amount: f64) -> GeneratedPattern {
        let sa = self.seam_allowance;
        match zone {
            BodyZone::Shoulders => {
                GeneratedPattern::diamond_gusset(zone, 2.0f64.mul_add(sa, amount), 1.5 * amount, sa)
                    .with_name("Shoulder Gusset")
            }
            BodyZone::Crotch => GeneratedPattern::football_gusset(zone, 2.0 * amount, amount, sa)
                .with_name("Crotch Gusset"),
            _ => GeneratedPattern::diamond_gusset(zone, 2.0f64.mul_add(sa, amount), amount, sa)
                .with_name(format!("{} Ease Gusset", title_case(zone.name()))),
        }
    }

    fn dart(zone: BodyZone, amount: f64) -> GeneratedPattern {
        GeneratedPattern::dart_template(zone, amount / 2.0, (amount * 4.0).min(150.0))
            .with_name(format!("{} Dart Guide", title_case(zone.name())))
    }

    fn insert_panel(&self, zone: BodyZone, amount: f64) -> GeneratedPattern {
        let sa2 = 2.0 * self.seam_allowance;
        let height = match zone {
            BodyZone::Hips | BodyZone::Thighs => {
                self.measurements.outseam.unwrap_or(DEFAULT_OUTSEAM) / 2.0
            }
            _ => 200.0,
        };
        GeneratedPattern::tapered_panel(
            PieceKind::InsertPanel,
            zone,
            height + sa2,
            amount + sa2,
            0.8f64.mul_add(amount, sa2),
            self.seam_allowance,
        )
        .with_name(format!("Side Panel Insert - {zone}"))
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Generate pieces for `recommendations` and draw each one.
///
/// Take-in recommendations produce no piece; their instructions are kept
/// in [`PatternSet::instructions_only`]. A name that repeats gets a
/// ` (2)`, ` (3)`, ... suffix.
///
/// # Errors
///
/// [`PatternError::InvalidAmount`] if a recommendation's amount is not a
/// positive finite number.
///
/// # Example
///
/// ```
/// use fit_analysis::{recommend, BodyZone, FitIssue, IssueKind, Severity};
/// use garment_model::GarmentMeasurements;
/// use nalgebra::Point3;
/// use pattern_gen::{generate_patterns, FabricType};
///
/// let issue = FitIssue {
///     kind: IssueKind::TooShort,
///     severity: Severity::Moderate,
///     zone: BodyZone::Ankles,
///     location: Point3::origin(),
///     amount: 50.0,
///     affected_vertices: vec![],
///     description: "Inseam 50mm too short for body".into(),
/// };
/// let recs = recommend(&[issue]);
/// let set = generate_patterns(&recs, &GarmentMeasurements::default(), FabricType::Default).unwrap();
/// let hem = set.get("Leg Extension - ankles").unwrap();
/// assert!((hem.height - (75.0 + 24.0)).abs() < 1e-9);
/// assert!(set.drawings["Leg Extension - ankles"].starts_with("<?xml"));
/// ```
pub fn generate_patterns(
    recommendations: &[Recommendation],
    measurements: &GarmentMeasurements,
    fabric: FabricType,
) -> PatternResult<PatternSet> {
    generate_patterns_with(recommendations, measurements, fabric, &SvgStyle::default())
}

/// [`generate_patterns`] with a custom drawing style.
///
/// # Errors
///
/// See [`generate_patterns`].
pub fn generate_patterns_with(
    recommendations: &[Recommendation],
    measurements: &GarmentMeasurements,
    fabric: FabricType,
    style: &SvgStyle,
) -> PatternResult<PatternSet> {
    let generator = PatternGenerator::new(measurements, fabric);
    let mut set = PatternSet::default();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for rec in recommendations {
        if !(rec.amount.is_finite() && rec.amount > 0.0) {
            return Err(PatternError::InvalidAmount {
                location: rec.location.clone(),
                amount: rec.amount,
            });
        }
        let Some(mut pattern) = generator.pattern_for(rec) else {
            debug!(kind = %rec.kind, zone = %rec.zone, "No pattern piece for recommendation");
            if rec.kind == ModificationKind::TakeIn {
                set.instructions_only.push(rec.instructions.clone());
            }
            continue;
        };

        let count = seen.entry(pattern.name.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            pattern.name = format!("{} ({count})", pattern.name);
        }

        set.drawings
            .insert(pattern.name.clone(), render_svg(&pattern, style));
        set.patterns.push(pattern);
    }

    info!(
        fabric = %fabric,
        patterns = set.patterns.len(),
        instructions_only = set.instructions_only.len(),
        "Generated pattern pieces"
    );
    Ok(set)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fit_analysis::{IssueKind, Severity};

    fn rec(kind: ModificationKind, zone: BodyZone, amount: f64) -> Recommendation {
        Recommendation {
            issue_kind: IssueKind::Compression,
            zone,
            severity: Severity::Moderate,
            kind,
            amount,
            location: "somewhere".into(),
            priority: 1,
            instructions: format!("{kind} at {zone}"),
        }
    }

    fn generate(recs: &[Recommendation]) -> PatternSet {
        generate_patterns(recs, &GarmentMeasurements::default(), FabricType::Default).unwrap()
    }

    #[test]
    fn hem_extension_tapers_from_ankle() {
        let m = GarmentMeasurements {
            ankle_circumference: Some(300.0),
            ..GarmentMeasurements::default()
        };
        let set = generate_patterns(
            &[rec(ModificationKind::Extension, BodyZone::Ankles, 75.0)],
            &m,
            FabricType::Woven,
        )
        .unwrap();
        let hem = &set.patterns[0];
        assert_eq!(hem.name, "Leg Extension - ankles");
        assert_eq!(hem.kind, PieceKind::Extension);
        assert_relative_eq!(hem.height, 105.0);
        assert_relative_eq!(hem.width_at(hem.height), 180.0);
        assert_relative_eq!(hem.width_at(0.0), 0.95 * 150.0 + 30.0, epsilon = 1e-9);
        assert_eq!(hem.seam_allowance, 15.0);
        assert_eq!(hem.instructions, "extension at ankles");
    }

    #[test]
    fn rise_and_torso_use_defaults() {
        let set = generate(&[
            rec(ModificationKind::Extension, BodyZone::Crotch, 30.0),
            rec(ModificationKind::Extension, BodyZone::Waist, 40.0),
            rec(ModificationKind::Extension, BodyZone::Knees, 40.0),
        ]);
        assert_eq!(set.len(), 2);
        let rise = set.get("Rise Extension").unwrap();
        assert_relative_eq!(rise.width_at(0.0), 224.0);
        assert_relative_eq!(rise.width_at(rise.height), 0.95 * 200.0 + 24.0, epsilon = 1e-9);
        let band = set.get("Torso Extension Band").unwrap();
        assert_relative_eq!(band.width_at(band.height), 424.0);
        assert_relative_eq!(band.width_at(0.0), 524.0);
        assert_relative_eq!(band.height, 64.0);
        for piece in [rise, band] {
            assert!(piece
                .cut_line
                .iter()
                .all(|p| p.x >= 0.0 && p.x <= piece.width && p.y >= 0.0 && p.y <= piece.height));
        }
    }

    #[test]
    fn gusset_shapes_by_zone() {
        let set = generate(&[
            rec(ModificationKind::Gusset, BodyZone::Shoulders, 30.0),
            rec(ModificationKind::Gusset, BodyZone::Crotch, 42.0),
            rec(ModificationKind::Gusset, BodyZone::Thighs, 32.0),
            rec(ModificationKind::Gusset, BodyZone::Bust, 35.0),
        ]);
        let shoulder = set.get("Shoulder Gusset").unwrap();
        assert_eq!((shoulder.width, shoulder.height), (54.0, 45.0));
        let crotch = set.get("Crotch Gusset").unwrap();
        assert_eq!((crotch.width, crotch.height), (84.0, 42.0));
        assert_eq!(crotch.notches[0].label, "FRONT");
        let thigh = set.get("Thighs Ease Gusset").unwrap();
        assert_eq!((thigh.width, thigh.height), (56.0, 32.0));
        assert!(set.get("Bust Ease Gusset").is_some());
    }

    #[test]
    fn dart_length_is_capped() {
        let set = generate(&[
            rec(ModificationKind::Dart, BodyZone::Bust, 24.0),
            rec(ModificationKind::Dart, BodyZone::Bust, 60.0),
        ]);
        assert_eq!(set.patterns[0].name, "Bust Dart Guide");
        assert_eq!((set.patterns[0].width, set.patterns[0].height), (12.0, 96.0));
        assert_eq!(set.patterns[1].name, "Bust Dart Guide (2)");
        assert_eq!(set.patterns[1].height, 150.0);
        assert!(set.patterns.iter().all(|p| p.seam_allowance == 0.0));
        assert_eq!(set.drawings.len(), 2);
    }

    #[test]
    fn let_out_panel_height_by_zone() {
        let m = GarmentMeasurements {
            outseam: Some(1000.0),
            ..GarmentMeasurements::default()
        };
        let set = generate_patterns(
            &[
                rec(ModificationKind::LetOut, BodyZone::Hips, 25.0),
                rec(ModificationKind::LetOut, BodyZone::Waist, 25.0),
            ],
            &m,
            FabricType::Knit,
        )
        .unwrap();
        let hips = set.get("Side Panel Insert - hips").unwrap();
        assert_eq!(hips.kind, PieceKind::InsertPanel);
        assert_relative_eq!(hips.height, 520.0);
        assert_relative_eq!(hips.width_at(hips.height), 45.0);
        assert_relative_eq!(hips.width_at(0.0), 40.0);
        let waist = set.get("Side Panel Insert - waist").unwrap();
        assert_relative_eq!(waist.height, 220.0);

        let fallback = generate(&[rec(ModificationKind::LetOut, BodyZone::Thighs, 25.0)]);
        assert_relative_eq!(fallback.patterns[0].height, 424.0);
    }

    #[test]
    fn take_in_is_instructions_only() {
        let set = generate(&[rec(ModificationKind::TakeIn, BodyZone::Waist, 30.0)]);
        assert!(set.is_empty());
        assert!(set.drawings.is_empty());
        assert_eq!(set.instructions_only, vec!["take_in at waist".to_string()]);
    }

    #[test]
    fn only_darts_skip_seam_allowance() {
        let set = generate(&[
            rec(ModificationKind::Extension, BodyZone::Ankles, 60.0),
            rec(ModificationKind::Gusset, BodyZone::Knees, 40.0),
            rec(ModificationKind::Dart, BodyZone::Bust, 20.0),
            rec(ModificationKind::LetOut, BodyZone::Hips, 20.0),
        ]);
        for p in &set.patterns {
            if p.kind == PieceKind::Dart {
                assert_eq!(p.seam_allowance, 0.0);
            } else {
                assert!(p.seam_allowance > 0.0, "{}", p.name);
            }
        }
    }

    #[test]
    fn bad_amount_is_rejected() {
        let err = generate_patterns(
            &[rec(ModificationKind::Gusset, BodyZone::Knees, f64::NAN)],
            &GarmentMeasurements::default(),
            FabricType::Default,
        )
        .unwrap_err();
        assert!(matches!(err, PatternError::InvalidAmount { .. }));
    }
}
