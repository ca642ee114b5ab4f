//! cardiorisk: heart-disease risk estimation
//!
//! Reads one JSON patient record, assesses it with the configured strategy,
//! and prints a JSON report to stdout.
//!
//! Usage:
//!   cardiorisk [--record <path>|-]
//!
//! The record is read from stdin when no path (or `-`) is given.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cardiorisk::adapters::sanitize::SanitizingMakeWriter;
use cardiorisk::application::{build_risk_model, AssessmentService, MetricsSnapshot};
use cardiorisk::config::EstimatorConfig;
use cardiorisk::domain::{recommendation, top_features};
use cardiorisk::{PatientRecord, RiskAssessment};

const TOP_FEATURES: usize = 5;

#[derive(Serialize)]
struct FeatureWeight {
    key: &'static str,
    feature: &'static str,
    weight: f64,
}

#[derive(Serialize)]
struct Report<'a> {
    assessment: &'a RiskAssessment,
    level_description: &'static str,
    recommendations: &'static [&'static str],
    top_features: Vec<FeatureWeight>,
    metrics: MetricsSnapshot,
}

fn usage() -> ! {
    eprintln!("Usage: cardiorisk [--record <path>|-]");
    std::process::exit(2);
}

fn parse_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    let mut record = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--record" => match args.next() {
                Some(p) if p == "-" => record = None,
                Some(p) => record = Some(PathBuf::from(p)),
                None => usage(),
            },
            _ => usage(),
        }
    }
    record
}

fn read_record(path: Option<&PathBuf>) -> Result<PatientRecord> {
    let raw = match path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read patient record {}", p.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read patient record from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("Patient record is not valid JSON")
}

fn main() -> Result<()> {
    let record_path = parse_args();

    // Initialize logging. stdout carries the report, so logs go to stderr
    // unless a file is requested.
    let log_mode = std::env::var("CARDIORISK_LOG_MODE").unwrap_or_else(|_| "stderr".to_string());

    let (writer, _guard) = if log_mode == "file" {
        let log_file = std::env::var("CARDIORISK_LOG_FILE")
            .unwrap_or_else(|_| "cardiorisk.log".to_string());

        if let Some(parent) = std::path::Path::new(&log_file).parent() {
            // Best-effort: the open below reports the real failure.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .with_context(|| format!("Failed to open log file {log_file}"))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stderr())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting cardiorisk...");

    let config = EstimatorConfig::from_env()?;
    let model = build_risk_model(&config)?;
    let service = AssessmentService::new(model);

    let record = read_record(record_path.as_ref())?;
    let assessment = service.assess(&record)?;

    let report = Report {
        assessment: &assessment,
        level_description: assessment.level().description(),
        recommendations: recommendation(assessment.level()),
        top_features: top_features(TOP_FEATURES)
            .into_iter()
            .map(|(feature, weight)| FeatureWeight {
                key: feature.key(),
                feature: feature.display_name(),
                weight,
            })
            .collect(),
        metrics: service.metrics().snapshot(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    tracing::info!("cardiorisk finished.");
    Ok(())
}
