//! End-to-end runs on the synthetic mannequin.

#![allow(clippy::unwrap_used)]

use body_model::{mannequin, mannequin_rings};
use fit_analysis::{BodyZone, FitParams, IssueKind, ModificationKind};
use fit_pipeline::{
    Capabilities, Feature, FitPipeline, PassthroughBackend, PipelineConfig, PipelineError,
    Session,
};
use scan_io::{encode, MeshFormat};
use scan_repair::CleanOptions;
use scan_types::revolve;

fn body_ply() -> Vec<u8> {
    encode(&mannequin(), MeshFormat::Ply).unwrap()
}

fn tight_obj() -> Vec<u8> {
    encode(&revolve(&mannequin_rings(-15.0), 48, true), MeshFormat::Obj).unwrap()
}

fn config() -> PipelineConfig {
    let mut config = PipelineConfig::default().with_fit(FitParams::static_fit());
    config.clean = CleanOptions::none();
    config
}

#[test]
fn tight_garment_gets_a_hip_panel() {
    let pipeline = FitPipeline::new(config());
    let body = body_ply();
    let garment = tight_obj();
    let workflow = pipeline
        .run_workflow((body.as_slice(), "body.ply"), (garment.as_slice(), "garment.obj"))
        .unwrap();

    assert!(workflow.skipped.is_empty());
    let alignment = workflow.alignment.as_ref().unwrap();
    assert!(alignment.garment_translation.norm() < 5.0);

    assert!(workflow
        .fit
        .issues
        .iter()
        .any(|i| i.kind == IssueKind::Compression && i.zone == BodyZone::Hips));
    let hips = workflow
        .fit
        .recommendations
        .iter()
        .find(|r| r.zone == BodyZone::Hips)
        .unwrap();
    assert_eq!(hips.kind, ModificationKind::LetOut);
    assert!(workflow.fit.score < 100.0);

    let panel = workflow.patterns.get("Side Panel Insert - hips").unwrap();
    assert!(panel.seam_allowance > 0.0);
    let drawing = &workflow.patterns.drawings["Side Panel Insert - hips"];
    assert!(drawing.starts_with("<?xml"));
    assert!(drawing.contains("Side Panel Insert - hips"));
}

#[test]
fn report_serializes_without_meshes_or_drawings() {
    let pipeline = FitPipeline::new(config());
    let body = body_ply();
    let garment = tight_obj();
    let workflow = pipeline
        .run_workflow((body.as_slice(), "body.ply"), (garment.as_slice(), "garment.obj"))
        .unwrap();

    let report = workflow.report();
    assert_eq!(report.patterns.len(), workflow.patterns.len());
    assert!(report
        .patterns
        .iter()
        .any(|name| name == "Side Panel Insert - hips"));
    assert_eq!(report.body.scan.source, "body.ply");
    assert!(report.body.scan.orientation.is_some());

    let json = serde_json::to_string(&report).unwrap();
    assert!(!json.contains("<svg"));
    assert!(!json.contains("\"distances\""));
    assert!(json.contains("\"counts_by_zone\""));
}

#[test]
fn passthrough_without_patterns_still_analyzes() {
    let caps = Capabilities::full().without(Feature::PatternGeneration);
    let pipeline =
        FitPipeline::with_backend(PassthroughBackend, config()).with_capabilities(&caps);
    let body = body_ply();
    let garment = tight_obj();
    let workflow = pipeline
        .run_workflow((body.as_slice(), "body.ply"), (garment.as_slice(), "garment.obj"))
        .unwrap();

    assert!(workflow.alignment.is_none());
    assert!(workflow.patterns.is_empty());
    assert!(!workflow.fit.recommendations.is_empty());
    assert_eq!(
        workflow.skipped,
        vec![Feature::MeshProcessing, Feature::PatternGeneration]
    );
    assert!(workflow
        .garment
        .report
        .log
        .iter()
        .any(|line| line.starts_with("Skipped alignment")));
}

#[test]
fn missing_analysis_stages_fail_before_loading() {
    let caps = Capabilities::full()
        .without(Feature::FitAnalysis)
        .without(Feature::GarmentModel);
    let pipeline = FitPipeline::new(config()).with_capabilities(&caps);
    let err = pipeline
        .run_workflow((b"garbage".as_slice(), "body.ply"), (b"garbage".as_slice(), "garment.obj"))
        .unwrap_err();
    match err {
        PipelineError::Unavailable { features } => {
            assert_eq!(features, vec![Feature::GarmentModel, Feature::FitAnalysis]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn session_uploads_then_fits() {
    let pipeline = FitPipeline::new(config());
    let mut session = Session::new();
    pipeline
        .upload_body(&mut session, &body_ply(), "body.ply")
        .unwrap();
    let garment = pipeline
        .upload_garment(&mut session, &tight_obj(), "garment.obj")
        .unwrap();
    assert!(garment.report.orientation.is_some());

    let status = session.status();
    assert!(status.body_loaded && status.garment_loaded);

    let fit = pipeline.session_fit(&session).unwrap();
    assert!(fit
        .recommendations
        .iter()
        .any(|r| r.zone == BodyZone::Hips && r.kind == ModificationKind::LetOut));
}

#[test]
fn unsupported_format_is_an_input_error() {
    let pipeline = FitPipeline::new(config());
    let err = pipeline
        .run_workflow((body_ply().as_slice(), "body.fbx"), (tight_obj().as_slice(), "garment.obj"))
        .unwrap_err();
    assert!(matches!(err, PipelineError::Io(_)));
    assert!(err.is_input_error());
}
