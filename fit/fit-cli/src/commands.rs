//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fit_pipeline::{FitPipeline, FitReport, MeshBackend, ScanRole, Session, WorkflowReport};
use scan_orient::MeshStats;
use serde::Serialize;
use tracing::info;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{text}");
    Ok(())
}

/// Scan bytes plus the file name used as format hint.
fn read_scan(path: &Path) -> Result<(Vec<u8>, String)> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let hint = path
        .file_name()
        .map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy())
        .into_owned();
    Ok((bytes, hint))
}

fn print_entries(entries: &[(&str, f64)]) {
    for (name, value) in entries {
        println!("  {name:<22} {value:>8.1} mm");
    }
}

/// File name for a piece drawing: lowercase, runs of other characters
/// collapsed to `_`.
pub fn drawing_file_name(piece: &str) -> String {
    let mut name = String::with_capacity(piece.len() + 4);
    for c in piece.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_lowercase());
        } else if !name.is_empty() && !name.ends_with('_') {
            name.push('_');
        }
    }
    while name.ends_with('_') {
        name.pop();
    }
    if name.is_empty() {
        name.push_str("piece");
    }
    name.push_str(".svg");
    name
}

pub fn inspect(path: &Path, json: bool) -> Result<()> {
    let mesh =
        scan_io::load_mesh(path).with_context(|| format!("failed to load {}", path.display()))?;
    let stats = MeshStats::compute(&mesh);
    if json {
        print_json(&stats)
    } else {
        println!("{}", path.display());
        println!("{stats}");
        Ok(())
    }
}

pub fn body<B: MeshBackend>(pipeline: &FitPipeline<B>, path: &Path, json: bool) -> Result<()> {
    let (bytes, hint) = read_scan(path)?;
    let prepared = pipeline
        .prepare_scan(&bytes, &hint, ScanRole::Body)
        .with_context(|| format!("failed to prepare body scan {}", path.display()))?;
    let scan = pipeline.analyze_body(prepared).context("body analysis failed")?;
    let report = scan.report();
    if json {
        return print_json(&report);
    }

    println!("{}", report.summary);
    for line in &report.scan.log {
        println!("  {line}");
    }
    println!("Landmarks:");
    for (landmark, point) in report.landmarks.iter() {
        println!("  {:<22} z = {:>8.1}", landmark.to_string(), point.z);
    }
    println!("Measurements:");
    print_entries(&report.measurements.entries());
    Ok(())
}

pub fn garment<B: MeshBackend>(pipeline: &FitPipeline<B>, path: &Path, json: bool) -> Result<()> {
    let (bytes, hint) = read_scan(path)?;
    let prepared = pipeline
        .prepare_scan(&bytes, &hint, ScanRole::Garment)
        .with_context(|| format!("failed to prepare garment scan {}", path.display()))?;
    let scan = pipeline
        .analyze_garment(prepared)
        .context("garment analysis failed")?;
    let report = scan.report();
    if json {
        return print_json(&report);
    }

    println!("{}", report.summary);
    for line in &report.scan.log {
        println!("  {line}");
    }
    let source = if report.type_detected { "detected" } else { "given" };
    println!("Type: {} ({source})", report.garment_type);
    println!("Measurements:");
    print_entries(&report.measurements.entries());
    Ok(())
}

/// Uploads both scans into a session, then compares them.
pub fn fit<B: MeshBackend>(
    pipeline: &FitPipeline<B>,
    body: &Path,
    garment: &Path,
    json: bool,
) -> Result<()> {
    let mut session = Session::new();
    let (bytes, hint) = read_scan(body)?;
    pipeline
        .upload_body(&mut session, &bytes, &hint)
        .with_context(|| format!("failed to analyze body scan {}", body.display()))?;
    let (bytes, hint) = read_scan(garment)?;
    pipeline
        .upload_garment(&mut session, &bytes, &hint)
        .with_context(|| format!("failed to analyze garment scan {}", garment.display()))?;

    let result = pipeline.session_fit(&session).context("fit analysis failed")?;
    if json {
        print_json(&FitReport::from(&result))
    } else {
        print!("{result}");
        Ok(())
    }
}

/// Runs the full workflow and writes `report.json` plus one SVG per piece
/// into `output`. Returns the written paths.
pub fn write_workflow<B: MeshBackend>(
    pipeline: &FitPipeline<B>,
    body: &Path,
    garment: &Path,
    output: &Path,
) -> Result<(WorkflowReport, Vec<PathBuf>)> {
    let (body_bytes, body_hint) = read_scan(body)?;
    let (garment_bytes, garment_hint) = read_scan(garment)?;
    let workflow = pipeline
        .run_workflow(
            (body_bytes.as_slice(), body_hint.as_str()),
            (garment_bytes.as_slice(), garment_hint.as_str()),
        )
        .context("workflow failed")?;

    std::fs::create_dir_all(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let mut written = Vec::new();
    for (piece, svg) in &workflow.patterns.drawings {
        let path = output.join(drawing_file_name(piece));
        std::fs::write(&path, svg).with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }

    let report = workflow.report();
    let path = output.join("report.json");
    let text = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    std::fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
    written.push(path);

    info!(files = written.len(), output = %output.display(), "Wrote workflow results");
    Ok((report, written))
}

pub fn workflow<B: MeshBackend>(
    pipeline: &FitPipeline<B>,
    body: &Path,
    garment: &Path,
    output: &Path,
    json: bool,
) -> Result<()> {
    let (report, written) = write_workflow(pipeline, body, garment, output)?;
    if json {
        return print_json(&report);
    }

    println!(
        "Fit score: {:.0}/100 ({} issues, {} recommendations)",
        report.fit.score,
        report.fit.issues.len(),
        report.fit.recommendations.len()
    );
    for rec in &report.fit.recommendations {
        println!("  {rec}");
    }
    for line in &report.instructions_only {
        println!("  No piece needed: {line}");
    }
    if !report.skipped.is_empty() {
        let names: Vec<_> = report.skipped.iter().map(|f| f.name()).collect();
        println!("Skipped: {}", names.join(", "));
    }
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

pub fn health<B: MeshBackend>(pipeline: &FitPipeline<B>, json: bool) -> Result<()> {
    let report = pipeline.capabilities().health();
    if json {
        print_json(&report)
    } else {
        println!("Backend: {}", pipeline.backend().name());
        print!("{report}");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use body_model::{mannequin, mannequin_rings};
    use fit_pipeline::PipelineConfig;
    use scan_types::revolve;

    #[test]
    fn drawing_names_are_file_safe() {
        assert_eq!(
            drawing_file_name("Side Panel Insert - hips"),
            "side_panel_insert_hips.svg"
        );
        assert_eq!(drawing_file_name("Knee Ease Gusset (2)"), "knee_ease_gusset_2.svg");
        assert_eq!(drawing_file_name("--"), "piece.svg");
    }

    #[test]
    fn read_scan_uses_the_file_name_as_hint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Body.PLY");
        std::fs::write(&path, b"ply").unwrap();
        let (bytes, hint) = read_scan(&path).unwrap();
        assert_eq!(bytes, b"ply");
        assert_eq!(hint, "Body.PLY");
        assert!(read_scan(&dir.path().join("missing.stl")).is_err());
    }

    #[test]
    fn workflow_writes_report_and_drawings() {
        let dir = tempfile::tempdir().unwrap();
        let body = dir.path().join("body.ply");
        let garment = dir.path().join("garment.obj");
        scan_io::save_mesh(&mannequin(), &body).unwrap();
        scan_io::save_mesh(&revolve(&mannequin_rings(-15.0), 48, true), &garment).unwrap();

        let config = PipelineConfig::from_json(
            r#"{"clean": {"smooth": false}, "fit": {"check_movement": false}}"#,
        )
        .unwrap();
        let pipeline = FitPipeline::new(config);
        let output = dir.path().join("out");
        let (report, written) = write_workflow(&pipeline, &body, &garment, &output).unwrap();

        assert!(output.join("report.json").exists());
        assert!(output.join("side_panel_insert_hips.svg").exists());
        assert_eq!(written.len(), report.patterns.len() + 1);

        let text = std::fs::read_to_string(output.join("report.json")).unwrap();
        let back: WorkflowReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back.patterns, report.patterns);
    }
}
