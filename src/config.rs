use crate::types::{MonthFilter, YearFilter};
use clap::Parser;
use std::path::PathBuf;

/// Foreign trade report for Paraná municipalities.
#[derive(Parser, Debug, Clone)]
#[command(name = "comex_report")]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Consolidated exports CSV
    #[arg(long, env = "COMEX_EXPORT_FILE", default_value = "EXPORTACOES_CONSOLIDADAS_PR.csv")]
    pub export_file: PathBuf,

    /// Consolidated imports CSV
    #[arg(long, env = "COMEX_IMPORT_FILE", default_value = "IMPORTACOES_CONSOLIDADAS_PR.csv")]
    pub import_file: PathBuf,

    /// Directory the xlsx report is written to
    #[arg(short, long, env = "COMEX_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Municipality to analyze; runs once without the interactive menu
    #[arg(short, long)]
    pub region: Option<String>,

    /// Year to analyze ("all" or e.g. 2022)
    #[arg(short, long, default_value = "all")]
    pub year: YearFilter,

    /// Month to analyze ("all" or 1-12); ignored when year is "all"
    #[arg(short, long, default_value = "all")]
    pub month: MonthFilter,

    /// Also write the balance view as JSON to this path
    #[arg(long)]
    pub json: Option<String>,
}
