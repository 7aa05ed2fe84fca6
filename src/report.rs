//! Output of sweep results: a CSV file with one row per curve point, and a plain-text summary
//! table comparing error and attack side by side. The degree distributions of the studied
//! networks can be written as CSV as well.

use std::ffi::OsStr;
use std::fmt::Write as _;
use std::fs::{create_dir_all, File};
use std::io;
use std::path::Path;

use csv::Writer;
use serde::Serialize;

use crate::error::NetSirError;
use crate::generators::LabeledNetwork;
use crate::removal::RemovalPolicy;
use crate::structure::degree_distribution;
use crate::sweep::Curve;

/// One row of the CSV report.
#[derive(Debug, Serialize)]
struct CurveRecord<'a> {
    network: &'a str,
    policy: &'static str,
    metric: &'static str,
    fraction: f64,
    removed: usize,
    mean: f64,
    std: f64,
}

/// One row of the degree distribution report.
#[derive(Debug, Serialize)]
struct DegreeRecord<'a> {
    network: &'a str,
    degree: usize,
    probability: f64,
}

/// Writes every point of every curve as CSV, header included.
///
/// # Errors
/// Returns [`NetSirError::CSVError`] if a row cannot be written.
pub fn write_curves<W: io::Write>(writer: W, curves: &[Curve]) -> Result<(), NetSirError> {
    let mut writer = Writer::from_writer(writer);
    for curve in curves {
        for point in &curve.points {
            writer.serialize(CurveRecord {
                network: &curve.network,
                policy: curve.policy.as_str(),
                metric: curve.metric.as_str(),
                fraction: point.fraction,
                removed: point.removed,
                mean: point.value.mean,
                std: point.value.std,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

// Checks that the path names a CSV file, and creates its parent directories if they do not exist.
fn create_report_file(path: &Path) -> Result<File, NetSirError> {
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => {
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            Ok(File::create(path)?)
        }
        _ => Err(NetSirError::ReportError(format!(
            "report output files must be CSVs, got {}",
            path.display()
        ))),
    }
}

/// Writes the CSV report to `path`.
///
/// # Errors
/// Returns [`NetSirError::ReportError`] if `path` does not end in `.csv`, and
/// [`NetSirError::IoError`] or [`NetSirError::CSVError`] if writing fails.
pub fn write_curves_to_path(path: &Path, curves: &[Curve]) -> Result<(), NetSirError> {
    let file = create_report_file(path)?;
    write_curves(file, curves)
}

/// Writes the degree distribution of each network as CSV, one row per degree that occurs.
///
/// # Errors
/// Returns [`NetSirError::CSVError`] if a row cannot be written.
pub fn write_degree_distributions<W: io::Write>(
    writer: W,
    networks: &[LabeledNetwork],
) -> Result<(), NetSirError> {
    let mut writer = Writer::from_writer(writer);
    for network in networks {
        let distribution = degree_distribution(&network.graph);
        for (degree, probability) in distribution.into_iter().enumerate() {
            if probability > 0.0 {
                writer.serialize(DegreeRecord {
                    network: network.label,
                    degree,
                    probability,
                })?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// Writes the degree distribution report to `path`.
///
/// # Errors
/// Same as [`write_curves_to_path`].
pub fn write_degree_distributions_to_path(
    path: &Path,
    networks: &[LabeledNetwork],
) -> Result<(), NetSirError> {
    let file = create_report_file(path)?;
    write_degree_distributions(file, networks)
}

/// Renders a table per network and metric, with the error and attack curves as columns.
#[must_use]
pub fn format_summary(curves: &[Curve]) -> String {
    let mut out = String::new();
    let errors = curves.iter().filter(|c| c.policy == RemovalPolicy::Error);
    for error in errors {
        let attack = curves.iter().find(|c| {
            c.policy == RemovalPolicy::Attack
                && c.network == error.network
                && c.metric == error.metric
        });

        let _ = writeln!(out, "{} network: {}", error.network, error.metric.label());
        let _ = writeln!(
            out,
            "{:>8} {:>8} {:>22} {:>22}",
            "fraction", "removed", "error", "attack"
        );
        for (k, point) in error.points.iter().enumerate() {
            let attack_cell = attack
                .and_then(|curve| curve.points.get(k))
                .map_or_else(String::new, |p| {
                    format!("{:.4} ± {:.4}", p.value.mean, p.value.std)
                });
            let _ = writeln!(
                out,
                "{:>8.3} {:>8} {:>22} {:>22}",
                point.fraction,
                point.removed,
                format!("{:.4} ± {:.4}", point.value.mean, point.value.std),
                attack_cell
            );
        }
        out.push('\n');
    }
    out
}
