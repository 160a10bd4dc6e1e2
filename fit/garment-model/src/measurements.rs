//! Garment measurements from horizontal sections.

use nalgebra::Point3;
use scan_section::{argmax_in, argmin_in, cross_sections, search_sorted, CrossSection};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::kind::GarmentType;
use crate::params::GarmentParams;

/// Garment measurements in millimeters. Which fields are filled depends on
/// the garment type.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GarmentMeasurements {
    /// Lowest to highest vertex.
    pub total_height: f64,
    /// Waist opening.
    pub waist_circumference: Option<f64>,
    /// Seat or hip.
    pub hip_circumference: Option<f64>,
    /// Single leg, just below the crotch.
    pub thigh_circumference: Option<f64>,
    /// Single leg, halfway down.
    pub knee_circumference: Option<f64>,
    /// Single leg, near the hem.
    pub ankle_circumference: Option<f64>,
    /// Widest section of a top.
    pub chest_circumference: Option<f64>,
    /// Height of the leg split above the hem line.
    pub crotch_height: Option<f64>,
    /// Crotch to hem.
    pub inseam: Option<f64>,
    /// Waist to hem.
    pub outseam: Option<f64>,
    /// Waist to crotch, front.
    pub front_rise: Option<f64>,
    /// Waist to crotch, back.
    pub back_rise: Option<f64>,
    /// Top to bottom of a top, dress or skirt.
    pub body_length: Option<f64>,
}

impl GarmentMeasurements {
    /// Present measurements as `(name, value)` pairs, for reports.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        let fields = [
            ("waist_circumference", self.waist_circumference),
            ("hip_circumference", self.hip_circumference),
            ("thigh_circumference", self.thigh_circumference),
            ("knee_circumference", self.knee_circumference),
            ("ankle_circumference", self.ankle_circumference),
            ("chest_circumference", self.chest_circumference),
            ("crotch_height", self.crotch_height),
            ("inseam", self.inseam),
            ("outseam", self.outseam),
            ("front_rise", self.front_rise),
            ("back_rise", self.back_rise),
            ("body_length", self.body_length),
        ];
        std::iter::once(("total_height", Some(self.total_height)))
            .chain(fields)
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect()
    }
}

/// Measure an oriented garment of a known type.
///
/// Pants: the waist is the third section from the top, the hip the
/// largest section in the upper half, and the leg split the steepest
/// circumference drop below the hip. Leg circumferences are halved since
/// a section spans both legs.
#[must_use]
pub fn extract_garment_measurements(
    positions: &[Point3<f64>],
    garment_type: GarmentType,
    params: &GarmentParams,
) -> GarmentMeasurements {
    let (min_z, max_z) = positions
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.z), hi.max(p.z))
        });
    let height = if positions.is_empty() { 0.0 } else { max_z - min_z };
    let mut measurements = GarmentMeasurements {
        total_height: height,
        ..GarmentMeasurements::default()
    };

    let sections = cross_sections(positions, &params.measurement);
    if sections.is_empty() {
        debug!("No dense garment sections, only height measured");
        return measurements;
    }

    match garment_type {
        GarmentType::Pants => measure_pants(&sections, min_z, params, &mut measurements),
        GarmentType::Shirt | GarmentType::Dress | GarmentType::Jacket => {
            measure_top(&sections, &mut measurements);
        }
        GarmentType::Skirt => {
            let circs = circumferences(&sections);
            measurements.waist_circumference = third_from_top(&circs);
            measurements.hip_circumference = argmax_in(&circs, 0..circs.len()).map(|i| circs[i]);
            measurements.body_length = Some(height);
        }
        GarmentType::Unknown => {}
    }
    measurements
}

fn circumferences(sections: &[CrossSection]) -> Vec<f64> {
    sections.iter().map(|s| s.circumference).collect()
}

fn third_from_top(values: &[f64]) -> Option<f64> {
    values.len().checked_sub(3).map(|i| values[i])
}

fn measure_top(sections: &[CrossSection], m: &mut GarmentMeasurements) {
    let circs = circumferences(sections);
    let n = circs.len();
    m.chest_circumference = argmax_in(&circs, 0..n).map(|i| circs[i]);
    m.waist_circumference = argmin_in(&circs, n / 3..2 * n / 3).map(|i| circs[i]);
    m.body_length = Some(m.total_height);
}

fn measure_pants(
    sections: &[CrossSection],
    min_z: f64,
    params: &GarmentParams,
    m: &mut GarmentMeasurements,
) {
    let circs = circumferences(sections);
    let heights: Vec<f64> = sections.iter().map(|s| s.height).collect();
    let n = circs.len();

    m.waist_circumference = third_from_top(&circs);
    let hip = argmax_in(&circs, n / 2..n);
    m.hip_circumference = hip.map(|i| circs[i]);
    m.ankle_circumference = circs.get(3).map(|c| c / 2.0);

    let Some(crotch) = hip.and_then(|hip| leg_split(&circs, hip)).map(|i| heights[i]) else {
        debug!("No leg split found below the hip");
        return;
    };
    m.crotch_height = Some(crotch - min_z);

    let waist = third_from_top(&heights);
    let hem = heights.get(2).copied();
    m.front_rise = waist.map(|w| w - crotch);
    m.back_rise = m.front_rise;
    m.inseam = hem.map(|h| crotch - h);
    m.outseam = waist.zip(hem).map(|(w, h)| w - h);

    let single_leg = |h: f64| {
        let i = search_sorted(&heights, h);
        (i > 0 && i < n).then(|| circs[i] / 2.0)
    };
    m.thigh_circumference = single_leg(crotch - params.thigh_drop);
    m.knee_circumference = single_leg(min_z + 0.5 * (crotch - min_z));
}

/// Index of the section just above the steepest downward drop below
/// `hip`, scanning from the hip toward the hem. `None` if circumference
/// never falls going down.
fn leg_split(circs: &[f64], hip: usize) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for i in (0..hip.min(circs.len().saturating_sub(1))).rev() {
        let drop = circs[i + 1] - circs[i];
        if drop > 0.0 && best.map_or(true, |(_, d)| drop > d) {
            best = Some((i + 1, drop));
        }
    }
    best.map(|(i, _)| i)
}
