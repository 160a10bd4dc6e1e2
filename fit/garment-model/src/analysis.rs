//! One-call garment analysis.

use std::collections::BTreeMap;
use std::fmt;

use scan_types::ScanMesh;
use tracing::{info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::classify::classify_garment;
use crate::error::{GarmentError, GarmentResult};
use crate::kind::{GarmentType, SeamKind};
use crate::measurements::{extract_garment_measurements, GarmentMeasurements};
use crate::params::GarmentParams;
use crate::pieces::{segment_pieces, PatternPiece};
use crate::seams::{detect_seams, Seam};

/// Everything the fit stage needs to know about a garment.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GarmentAnalysis {
    /// The oriented garment scan.
    pub mesh: ScanMesh,
    /// Supplied or detected type.
    pub garment_type: GarmentType,
    /// True if the type came from shape classification.
    pub type_detected: bool,
    /// Traced seams.
    pub seams: Vec<Seam>,
    /// Measurements for the type.
    pub measurements: GarmentMeasurements,
    /// Flattened pieces.
    pub pieces: Vec<PatternPiece>,
}

/// Counts for a compact report line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GarmentSummary {
    /// Garment type.
    pub garment_type: GarmentType,
    /// Garment vertex count.
    pub vertex_count: usize,
    /// Seams by kind.
    pub seams: BTreeMap<SeamKind, usize>,
    /// Pattern pieces.
    pub piece_count: usize,
    /// Measurements available.
    pub measurement_count: usize,
    /// Lowest to highest vertex.
    pub height: f64,
}

impl GarmentSummary {
    /// Total seams.
    #[must_use]
    pub fn seam_count(&self) -> usize {
        self.seams.values().sum()
    }
}

impl fmt::Display for GarmentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Garment: {}, {:.0} mm tall, {} seams, {} pattern pieces, {} measurements",
            self.garment_type,
            self.height,
            self.seam_count(),
            self.piece_count,
            self.measurement_count
        )
    }
}

impl GarmentAnalysis {
    /// Summary counts.
    #[must_use]
    pub fn summary(&self) -> GarmentSummary {
        let mut seams = BTreeMap::new();
        for seam in &self.seams {
            *seams.entry(seam.kind).or_insert(0) += 1;
        }
        GarmentSummary {
            garment_type: self.garment_type,
            vertex_count: self.mesh.vertices.len(),
            seams,
            piece_count: self.pieces.len(),
            measurement_count: self.measurements.entries().len(),
            height: self.measurements.total_height,
        }
    }
}

/// Resolve a caller's type hint. Unrecognized names and `unknown` fall
/// back to detection; the former with a warning.
fn resolve_hint(hint: Option<&str>) -> Option<GarmentType> {
    match hint.map(str::parse::<GarmentType>) {
        Some(Ok(GarmentType::Unknown)) | None => None,
        Some(Ok(garment_type)) => Some(garment_type),
        Some(Err(err)) => {
            warn!(%err, "Ignoring garment type hint, detecting from shape");
            None
        }
    }
}

/// Classify (unless `hint` names a type), trace seams, measure and
/// segment an oriented, millimeter-scale garment scan.
///
/// # Errors
///
/// [`GarmentError::EmptyMesh`] if the scan has no vertices.
///
/// # Example
///
/// ```
/// use garment_model::{analyze_garment, tube, GarmentParams, GarmentType};
///
/// let analysis = analyze_garment(tube(600.0, 150.0), Some("jacket"), &GarmentParams::default()).unwrap();
/// assert_eq!(analysis.garment_type, GarmentType::Jacket);
/// assert!(!analysis.type_detected);
/// assert_eq!(analysis.pieces.len(), 2);
/// ```
pub fn analyze_garment(
    mesh: ScanMesh,
    hint: Option<&str>,
    params: &GarmentParams,
) -> GarmentResult<GarmentAnalysis> {
    if mesh.vertices.is_empty() {
        return Err(GarmentError::EmptyMesh);
    }

    let positions = mesh.positions();
    let (garment_type, type_detected) = match resolve_hint(hint) {
        Some(garment_type) => (garment_type, false),
        None => (classify_garment(&positions, params), true),
    };

    let seams = detect_seams(&mesh, garment_type, params);
    let measurements = extract_garment_measurements(&positions, garment_type, params);
    let pieces = segment_pieces(&mesh, garment_type, params);

    let analysis = GarmentAnalysis {
        mesh,
        garment_type,
        type_detected,
        seams,
        measurements,
        pieces,
    };
    info!("{}", analysis.summary());
    Ok(analysis)
}
