//! Foreign trade analysis for municipalities: cascading filters, trade
//! balance at three granularities, top-10 product rankings and a two-sheet
//! xlsx report.

pub mod balance;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod ranking;
pub mod report;
pub mod types;
pub mod util;

pub use balance::BalanceCalculator;
pub use dataset::TradeDataset;
pub use error::{ComexError, Result};
pub use filter::FilterCascade;
pub use loader::{DatasetService, LoadReport};
pub use ranking::RankingAggregator;
pub use report::{ReportExporter, ReportInput};
pub use types::{BalanceReport, FilterSelection, MonthFilter, RankingTable, YearFilter};

/// All derived views for one selection.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub selection: FilterSelection,
    pub balance: BalanceReport,
    pub exports: RankingTable,
    pub imports: RankingTable,
}

impl Analysis {
    pub fn report_input(&self) -> ReportInput<'_> {
        ReportInput::new(&self.selection, &self.exports, &self.imports)
    }
}

/// Filter once, then derive the balance and both rankings from the subsets.
pub fn analyze(dataset: &TradeDataset, selection: FilterSelection) -> Result<Analysis> {
    let flows = FilterCascade::apply(dataset, &selection)?;
    let balance = BalanceCalculator::compute(&flows, &selection);
    let exports = RankingAggregator::rank(&flows.exports);
    let imports = RankingAggregator::rank(&flows.imports);
    Ok(Analysis { selection, balance, exports, imports })
}
