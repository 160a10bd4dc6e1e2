//! The scan-to-pattern pipeline.

use body_model::{analyze_body, BodyAnalysis};
use fit_analysis::{analyze_fit, FitAnalysisResult, Recommendation};
use garment_model::{analyze_garment, GarmentAnalysis, GarmentMeasurements};
use pattern_gen::{generate_patterns_with, PatternSet};
use scan_orient::MeshStats;
use scan_types::ScanMesh;
use tracing::{info, warn};

use crate::backend::{MeshBackend, NativeBackend};
use crate::capability::{Capabilities, Feature};
use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::report::Workflow;
use crate::session::{BodyScan, GarmentScan, PreparedScan, ScanReport, ScanRole, Session};

/// Runs the stages with one configuration and one backend.
///
/// The enabled features are those of the backend, narrowed by
/// [`with_capabilities`](Self::with_capabilities). Mesh processing and
/// pattern generation are skipped (and recorded) when off; the analysis
/// stages are required by the operations that use them.
///
/// # Example
///
/// ```
/// use fit_pipeline::{FitPipeline, PipelineConfig};
///
/// let pipeline = FitPipeline::new(PipelineConfig::default());
/// let obj = b"v 0 0 0\nv 10 0 0\nv 0 10 0\nf 1 2 3\n";
/// let mesh = pipeline.ingest(obj, "scan.obj").unwrap();
/// assert_eq!(mesh.faces.len(), 1);
/// assert!(pipeline.ingest(obj, "scan.fbx").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct FitPipeline<B = NativeBackend> {
    backend: B,
    config: PipelineConfig,
    capabilities: Capabilities,
}

impl FitPipeline<NativeBackend> {
    /// Pipeline with the native backend.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_backend(NativeBackend, config)
    }
}

impl<B: MeshBackend> FitPipeline<B> {
    /// Pipeline with a custom backend.
    #[must_use]
    pub fn with_backend(backend: B, config: PipelineConfig) -> Self {
        let capabilities = backend.capabilities();
        Self {
            backend,
            config,
            capabilities,
        }
    }

    /// Restricts the enabled features; features the backend lacks stay
    /// off.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: &Capabilities) -> Self {
        self.capabilities = self.backend.capabilities().intersect(capabilities);
        self
    }

    /// Enabled features.
    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Parse scan bytes. No processing.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Io`](crate::PipelineError::Io) for an unsupported
    /// hint or unparseable bytes.
    pub fn ingest(&self, bytes: &[u8], hint: &str) -> PipelineResult<ScanMesh> {
        Ok(self.backend.load(bytes, hint)?)
    }

    /// Load, clean and orient one scan.
    ///
    /// Bodies get the up/down check, garments only centering and axis
    /// alignment. Without mesh processing the scan is used as loaded.
    ///
    /// # Errors
    ///
    /// As [`ingest`](Self::ingest).
    pub fn prepare_scan(
        &self,
        bytes: &[u8],
        hint: &str,
        role: ScanRole,
    ) -> PipelineResult<PreparedScan> {
        let mut mesh = self.ingest(bytes, hint)?;
        let mut report = ScanReport::new(role, hint, &mesh);

        if self.capabilities.has(Feature::MeshProcessing) {
            match self.backend.clean(&mut mesh, &self.config.clean) {
                Some(cleaning) => {
                    report.log.extend(cleaning.log.iter().cloned());
                    report.cleaning = Some(cleaning);
                }
                None => report.skip(Feature::MeshProcessing, "cleanup"),
            }
            let orientation = match role {
                ScanRole::Body => self.backend.orient_body(&mut mesh, &self.config.orient),
                ScanRole::Garment => self
                    .backend
                    .orient_garment(&mut mesh, self.config.garment_type.as_deref()),
            };
            match orientation {
                Some(orientation) => {
                    if let Some(reason) = orientation.fallback {
                        warn!(%role, %reason, "Orientation fell back to identity");
                    }
                    report.log.extend(orientation.log.iter().cloned());
                    report.orientation = Some(orientation);
                }
                None => report.skip(Feature::MeshProcessing, "orientation"),
            }
        } else {
            report.skip(Feature::MeshProcessing, "cleanup and orientation");
        }

        report.stats = MeshStats::compute(&mesh);
        info!(%role, backend = self.backend.name(), "Prepared scan: {}", report.stats);
        Ok(PreparedScan { mesh, report })
    }

    /// Landmarks, measurements and movement envelope for a prepared body.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Unavailable`](crate::PipelineError::Unavailable)
    /// without the body model, or the body analysis error.
    pub fn analyze_body(&self, prepared: PreparedScan) -> PipelineResult<BodyScan> {
        self.capabilities.require(&[Feature::BodyModel])?;
        let analysis = analyze_body(prepared.mesh, self.config.profile, &self.config.landmarks)?;
        Ok(BodyScan {
            analysis,
            report: prepared.report,
        })
    }

    /// Type, seams, measurements and pieces for a prepared garment.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Unavailable`](crate::PipelineError::Unavailable)
    /// without the garment model, or the garment analysis error.
    pub fn analyze_garment(&self, prepared: PreparedScan) -> PipelineResult<GarmentScan> {
        self.capabilities.require(&[Feature::GarmentModel])?;
        let analysis = analyze_garment(
            prepared.mesh,
            self.config.garment_type.as_deref(),
            &self.config.garment,
        )?;
        Ok(GarmentScan {
            analysis,
            report: prepared.report,
        })
    }

    /// Prepare and analyze a body scan and store it in `session`.
    ///
    /// # Errors
    ///
    /// As [`prepare_scan`](Self::prepare_scan) and
    /// [`analyze_body`](Self::analyze_body). The session is unchanged on
    /// error.
    pub fn upload_body<'s>(
        &self,
        session: &'s mut Session,
        bytes: &[u8],
        hint: &str,
    ) -> PipelineResult<&'s BodyScan> {
        let prepared = self.prepare_scan(bytes, hint, ScanRole::Body)?;
        let scan = self.analyze_body(prepared)?;
        Ok(session.set_body(scan))
    }

    /// Prepare and analyze a garment scan and store it in `session`.
    ///
    /// # Errors
    ///
    /// As [`prepare_scan`](Self::prepare_scan) and
    /// [`analyze_garment`](Self::analyze_garment). The session is unchanged
    /// on error.
    pub fn upload_garment<'s>(
        &self,
        session: &'s mut Session,
        bytes: &[u8],
        hint: &str,
    ) -> PipelineResult<&'s GarmentScan> {
        let prepared = self.prepare_scan(bytes, hint, ScanRole::Garment)?;
        let scan = self.analyze_garment(prepared)?;
        Ok(session.set_garment(scan))
    }

    /// Compare a body with a garment in the same frame.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Unavailable`](crate::PipelineError::Unavailable)
    /// without fit analysis, or the fit analysis error.
    pub fn analyze_fit(
        &self,
        body: &BodyAnalysis,
        garment: &GarmentAnalysis,
    ) -> PipelineResult<FitAnalysisResult> {
        self.capabilities.require(&[Feature::FitAnalysis])?;
        Ok(analyze_fit(body, garment, &self.config.fit)?)
    }

    /// Fit analysis of the scans stored in `session`.
    ///
    /// The stored scans are compared as they are; each was centered when
    /// it was oriented.
    ///
    /// # Errors
    ///
    /// [`PipelineError::MissingScan`](crate::PipelineError::MissingScan) if
    /// a slot is empty, otherwise as [`analyze_fit`](Self::analyze_fit).
    pub fn session_fit(&self, session: &Session) -> PipelineResult<FitAnalysisResult> {
        let (body, garment) = session.pair()?;
        self.analyze_fit(&body.analysis, &garment.analysis)
    }

    /// Pieces and drawings for `recommendations`, with the configured
    /// fabric and drawing style.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Unavailable`](crate::PipelineError::Unavailable)
    /// without pattern generation, or the pattern error.
    pub fn generate_patterns(
        &self,
        recommendations: &[Recommendation],
        measurements: &GarmentMeasurements,
    ) -> PipelineResult<PatternSet> {
        self.capabilities.require(&[Feature::PatternGeneration])?;
        Ok(generate_patterns_with(
            recommendations,
            measurements,
            self.config.fabric,
            &self.config.svg,
        )?)
    }

    /// Load, clean, orient and align both scans, analyze them, compare
    /// them and generate pieces for the recommendations.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Unavailable`](crate::PipelineError::Unavailable)
    /// naming every missing analysis stage before any work is done;
    /// otherwise the first stage error.
    pub fn run_workflow(
        &self,
        body: (&[u8], &str),
        garment: (&[u8], &str),
    ) -> PipelineResult<Workflow> {
        self.capabilities.require(&[
            Feature::BodyModel,
            Feature::GarmentModel,
            Feature::FitAnalysis,
        ])?;

        let mut body_scan = self.prepare_scan(body.0, body.1, ScanRole::Body)?;
        let mut garment_scan = self.prepare_scan(garment.0, garment.1, ScanRole::Garment)?;
        let mut skipped = Vec::new();

        let alignment = if self.capabilities.has(Feature::MeshProcessing) {
            self.backend.align(&mut body_scan.mesh, &mut garment_scan.mesh)
        } else {
            None
        };
        match &alignment {
            Some(report) => {
                garment_scan.report.log.push(report.to_string());
                body_scan.report.stats = MeshStats::compute(&body_scan.mesh);
                garment_scan.report.stats = MeshStats::compute(&garment_scan.mesh);
            }
            None => garment_scan.report.skip(Feature::MeshProcessing, "alignment"),
        }

        let body = self.analyze_body(body_scan)?;
        let garment = self.analyze_garment(garment_scan)?;
        let fit = self.analyze_fit(&body.analysis, &garment.analysis)?;

        let patterns = if fit.recommendations.is_empty() {
            PatternSet::default()
        } else if self.capabilities.has(Feature::PatternGeneration) {
            self.generate_patterns(&fit.recommendations, &garment.analysis.measurements)?
        } else {
            warn!("Pattern generation is off; returning recommendations only");
            skipped.push(Feature::PatternGeneration);
            PatternSet::default()
        };

        for feature in body.report.skipped.iter().chain(&garment.report.skipped) {
            if !skipped.contains(feature) {
                skipped.push(*feature);
            }
        }
        skipped.sort_unstable();

        info!(
            score = fit.score,
            issues = fit.issues.len(),
            patterns = patterns.len(),
            "Workflow complete"
        );
        Ok(Workflow {
            body,
            garment,
            alignment,
            fit,
            patterns,
            skipped,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::PassthroughBackend;
    use crate::error::PipelineError;
    use body_model::mannequin;
    use scan_io::{encode, MeshFormat};

    fn ply(mesh: &ScanMesh) -> Vec<u8> {
        encode(mesh, MeshFormat::Ply).unwrap()
    }

    #[test]
    fn prepare_body_centers_and_logs() {
        let pipeline = FitPipeline::new(PipelineConfig::default());
        let prepared = pipeline
            .prepare_scan(&ply(&mannequin()), "body.ply", ScanRole::Body)
            .unwrap();
        assert!(prepared.mesh.centroid().coords.norm() < 1e-6);
        assert!(prepared.report.cleaning.is_some());
        assert!(prepared.report.orientation.is_some());
        assert!(prepared.report.skipped.is_empty());
        assert_eq!(prepared.report.log[0], "Loaded body scan from body.ply");
    }

    #[test]
    fn passthrough_records_skipped_processing() {
        let pipeline = FitPipeline::with_backend(PassthroughBackend, PipelineConfig::default());
        let mesh = mannequin();
        let prepared = pipeline
            .prepare_scan(&ply(&mesh), "body.ply", ScanRole::Body)
            .unwrap();
        assert_eq!(prepared.mesh.vertices.len(), mesh.vertices.len());
        assert_eq!(prepared.report.skipped, vec![Feature::MeshProcessing]);
        assert!(prepared.report.cleaning.is_none());
    }

    #[test]
    fn disabled_stage_is_unavailable() {
        let pipeline = FitPipeline::new(PipelineConfig::default())
            .with_capabilities(&Capabilities::full().without(Feature::BodyModel));
        let prepared = pipeline
            .prepare_scan(&ply(&mannequin()), "body.ply", ScanRole::Body)
            .unwrap();
        let err = pipeline.analyze_body(prepared).unwrap_err();
        assert!(matches!(err, PipelineError::Unavailable { ref features } if features == &[Feature::BodyModel]));
    }

    #[test]
    fn capabilities_cannot_exceed_backend() {
        let pipeline = FitPipeline::with_backend(PassthroughBackend, PipelineConfig::default())
            .with_capabilities(&Capabilities::full());
        assert!(!pipeline.capabilities().has(Feature::MeshProcessing));
    }

    #[test]
    fn session_fit_needs_both_scans() {
        let pipeline = FitPipeline::new(PipelineConfig::default());
        let mut session = Session::new();
        pipeline
            .upload_body(&mut session, &ply(&mannequin()), "body.ply")
            .unwrap();
        let err = pipeline.session_fit(&session).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingScan {
                role: ScanRole::Garment
            }
        ));
    }

    #[test]
    fn bad_upload_leaves_session_unchanged() {
        let pipeline = FitPipeline::new(PipelineConfig::default());
        let mut session = Session::new();
        assert!(pipeline
            .upload_garment(&mut session, b"not a mesh", "garment.stl")
            .is_err());
        assert!(!session.status().garment_loaded);
    }

    #[test]
    fn pattern_generation_can_be_off() {
        let pipeline = FitPipeline::new(PipelineConfig::default())
            .with_capabilities(&Capabilities::full().without(Feature::PatternGeneration));
        let err = pipeline
            .generate_patterns(&[], &GarmentMeasurements::default())
            .unwrap_err();
        assert!(matches!(err, PipelineError::Unavailable { .. }));
    }
}
