use crate::dataset::TradeDataset;
use crate::error::{ComexError, Result};
use crate::types::{RawRow, TradeRecord};
use crate::util::{parse_fob_value, parse_i32_safe, parse_month_safe};
use csv::ReaderBuilder;
use once_cell::sync::OnceCell;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped_rows: usize,
    pub coerced_values: usize,
}

impl LoadReport {
    fn merge(&self, other: &LoadReport) -> LoadReport {
        LoadReport {
            total_rows: self.total_rows + other.total_rows,
            loaded_rows: self.loaded_rows + other.loaded_rows,
            skipped_rows: self.skipped_rows + other.skipped_rows,
            coerced_values: self.coerced_values + other.coerced_values,
        }
    }
}

/// Read one flow from any CSV source.
///
/// Rows without a municipality, year or valid month can never be selected and
/// are skipped. A bad FOB value only zeroes that value; the row is kept.
pub fn load_flow_from_reader<R: Read>(reader: R) -> Result<(Vec<TradeRecord>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => { report.skipped_rows += 1; continue; }
        };

        let region = row.region.as_deref().map(str::trim).unwrap_or_default();
        if region.is_empty() {
            report.skipped_rows += 1;
            continue;
        }
        let (Some(year), Some(month)) = (
            parse_i32_safe(row.year.as_deref()),
            parse_month_safe(row.month.as_deref()),
        ) else {
            report.skipped_rows += 1;
            continue;
        };

        let fob_value = parse_fob_value(row.fob_value.as_deref());
        let raw_fob = row.fob_value.as_deref().map(str::trim).unwrap_or_default();
        if fob_value.is_zero() && raw_fob.parse::<f64>().map_or(true, |v| v != 0.0) {
            report.coerced_values += 1;
        }

        records.push(TradeRecord {
            region: region.to_string(),
            year,
            month,
            product_code: row.product_code.unwrap_or_default().trim().to_string(),
            product_name: row.product_name.unwrap_or_else(|| "Unspecified".to_string()).trim().to_string(),
            fob_value,
        });
    }

    report.loaded_rows = records.len();
    Ok((records, report))
}

pub fn load_flow(path: &Path) -> Result<(Vec<TradeRecord>, LoadReport)> {
    let file = std::fs::File::open(path)
        .map_err(|e| ComexError::DatasetUnavailable(format!("{}: {}", path.display(), e)))?;
    let (records, report) = load_flow_from_reader(file)?;
    if report.skipped_rows > 0 {
        warn!(file = %path.display(), skipped = report.skipped_rows, "rows skipped while loading");
    }
    Ok((records, report))
}

/// Load both flows. Either file missing is fatal.
pub fn load_dataset(export_path: &Path, import_path: &Path) -> Result<(TradeDataset, LoadReport)> {
    let (exports, exp_report) = load_flow(export_path)?;
    let (imports, imp_report) = load_flow(import_path)?;
    let report = exp_report.merge(&imp_report);
    info!(
        exports = exports.len(),
        imports = imports.len(),
        skipped = report.skipped_rows,
        coerced = report.coerced_values,
        "trade data loaded"
    );
    Ok((TradeDataset::new(exports, imports), report))
}

type Loader = Box<dyn Fn() -> Result<(TradeDataset, LoadReport)> + Send + Sync>;

/// Lazily loaded, process-lifetime dataset.
///
/// The loader runs at most once successfully: concurrent first callers block
/// on the same initialisation and all observe the same dataset. A failed load
/// is returned to the caller and is not cached.
pub struct DatasetService {
    loader: Loader,
    cell: OnceCell<(TradeDataset, LoadReport)>,
}

impl DatasetService {
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<(TradeDataset, LoadReport)> + Send + Sync + 'static,
    {
        Self { loader: Box::new(loader), cell: OnceCell::new() }
    }

    pub fn from_files(export_path: PathBuf, import_path: PathBuf) -> Self {
        Self::new(move || load_dataset(&export_path, &import_path))
    }

    pub fn get(&self) -> Result<&TradeDataset> {
        self.get_with_report().map(|(dataset, _)| dataset)
    }

    pub fn get_with_report(&self) -> Result<(&TradeDataset, &LoadReport)> {
        let (dataset, report) = self.cell.get_or_try_init(|| (self.loader)())?;
        Ok((dataset, report))
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}
