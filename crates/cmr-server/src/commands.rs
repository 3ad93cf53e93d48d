use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use cmr_artifacts::manifest::MANIFEST_FILE;
use cmr_artifacts::paths::artifacts_root;
use cmr_artifacts::{ArtifactManifest, ArtifactReport, LoadSummary, ModelRegistry};
use cmr_core::make_predictions;
use cmr_model::{FeatureRecord, PredictionResult};
use cmr_server::logging::redact_value;
use cmr_server::{AppState, router};

use crate::cli::{ArtifactsArg, PredictArgs, ServeArgs, VerifyArgs};
use crate::summary::{print_predictions, print_verify_summary};

pub fn run_serve(args: &ServeArgs) -> Result<()> {
    let (registry, _) = load_registry(&args.artifacts)?;
    let app = router(AppState::new(registry));
    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(args.bind)
            .await
            .with_context(|| format!("bind {}", args.bind))?;
        info!(address = %args.bind, "listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("serve HTTP")
    })?;
    info!("server stopped");
    Ok(())
}

pub fn run_verify(args: &VerifyArgs) -> Result<()> {
    let (_, summary) = load_registry(&args.artifacts)?;
    let report = ArtifactReport::from_summary(&summary);
    if args.json {
        let json = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{json}");
    } else {
        print_verify_summary(&summary, &report);
    }
    Ok(())
}

pub fn run_predict(args: &PredictArgs) -> Result<()> {
    let predictions = predict_measurements(args)?;
    if args.json {
        let json = serde_json::to_string_pretty(&predictions).context("serialize predictions")?;
        println!("{json}");
    } else {
        print_predictions(&predictions);
    }
    Ok(())
}

fn predict_measurements(args: &PredictArgs) -> Result<PredictionResult> {
    let features = FeatureRecord::from_form_fields(
        Some(args.insulin.as_str()),
        Some(args.glucose.as_str()),
        Some(args.blood_pressure.as_str()),
    )?;
    let (registry, _) = load_registry(&args.artifacts)?;
    let _span = info_span!(
        "predict",
        glucose = %redact_value(&args.glucose),
        insulin = %redact_value(&args.insulin),
        blood_pressure = %redact_value(&args.blood_pressure)
    )
    .entered();
    Ok(make_predictions(&registry, &features)?)
}

pub fn run_write_manifest(args: &ArtifactsArg) -> Result<()> {
    let dir = artifacts_root(args.artifacts.clone());
    let manifest = ArtifactManifest::generate(&dir)
        .with_context(|| format!("hash artifacts in {}", dir.display()))?;
    manifest.write(&dir)?;
    info!(
        files = manifest.files.len(),
        dir = %dir.display(),
        "manifest written"
    );
    load_from(&dir)?;
    println!("Wrote {}", dir.join(MANIFEST_FILE).display());
    Ok(())
}

fn load_registry(args: &ArtifactsArg) -> Result<(ModelRegistry, LoadSummary)> {
    load_from(&artifacts_root(args.artifacts.clone()))
}

fn load_from(dir: &Path) -> Result<(ModelRegistry, LoadSummary)> {
    ModelRegistry::load(dir).with_context(|| format!("load model artifacts from {}", dir.display()))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
