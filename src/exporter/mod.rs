// Exporter module: writes the run's CSV, JSON and PDF artifacts.

pub mod csv_export;
pub mod json_export;
pub mod pdf_report;

use crate::model::{ExportError, MarketRecord, Report, SummaryStats};
use crate::utils::file_stamp;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
    pub pdf: PathBuf,
}

pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// File names for a run, stamped with the summary's generation time.
    pub fn paths_for(&self, stats: &SummaryStats) -> ExportPaths {
        let stamp = file_stamp(&stats.generated_at);
        ExportPaths {
            csv: self.output_dir.join(format!("crypto_data_{}.csv", stamp)),
            json: self.output_dir.join(format!("crypto_summary_{}.json", stamp)),
            pdf: self.output_dir.join(format!("crypto_summary_{}.pdf", stamp)),
        }
    }

    /// Writes all three artifacts or none of them. Existing files are never replaced.
    pub fn export(
        &self,
        records: &[MarketRecord],
        stats: &SummaryStats,
    ) -> Result<ExportPaths, ExportError> {
        fs::create_dir_all(&self.output_dir)?;
        let paths = self.paths_for(stats);
        if let Some(taken) = paths.all().into_iter().find(|p| p.exists()) {
            return Err(ExportError::Collision(taken.clone()));
        }

        let staged = ExportPaths {
            csv: staging_path(&paths.csv),
            json: staging_path(&paths.json),
            pdf: staging_path(&paths.pdf),
        };
        if let Err(e) = write_all(&staged, records, stats) {
            for tmp in staged.all() {
                let _ = fs::remove_file(tmp);
            }
            return Err(e);
        }

        for (tmp, target) in staged.all().into_iter().zip(paths.all()) {
            fs::rename(tmp, target)?;
        }
        info!("Raw data saved to {}", paths.csv.display());
        info!("Summary saved to {}", paths.json.display());
        info!("Styled PDF report saved to {}", paths.pdf.display());

        Ok(paths)
    }
}

impl ExportPaths {
    fn all(&self) -> [&PathBuf; 3] {
        [&self.csv, &self.json, &self.pdf]
    }
}

/// `report.csv` -> `report.csv.tmp`
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_all(
    staged: &ExportPaths,
    records: &[MarketRecord],
    stats: &SummaryStats,
) -> Result<(), ExportError> {
    csv_export::write_csv(&staged.csv, records)?;
    let report = Report {
        summary: stats.clone(),
        records: records.to_vec(),
    };
    json_export::write_json(&staged.json, &report)?;
    pdf_report::write_pdf(&staged.pdf, records, stats)
}
