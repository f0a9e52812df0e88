use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

/// One row of the consolidated Comex Stat CSV as it comes off disk.
///
/// Every field is optional text so that a malformed cell never aborts the
/// whole file; coercion happens in the loader.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "NOME_MUN")]
    pub region: Option<String>,
    #[serde(rename = "CO_ANO")]
    pub year: Option<String>,
    #[serde(rename = "CO_MES")]
    pub month: Option<String>,
    #[serde(rename = "CO_SH4")]
    pub product_code: Option<String>,
    #[serde(rename = "NO_SH4_POR")]
    pub product_name: Option<String>,
    #[serde(rename = "VL_FOB")]
    pub fob_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub region: String,
    pub year: i32,
    pub month: u32,
    pub product_code: String,
    pub product_name: String,
    pub fob_value: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Flow {
    Export,
    Import,
}

impl Flow {
    pub fn label(self) -> &'static str {
        match self {
            Flow::Export => "Exports",
            Flow::Import => "Imports",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum YearFilter {
    All,
    Year(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MonthFilter {
    All,
    Month(u32),
}

impl FromStr for YearFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(YearFilter::All);
        }
        s.parse::<i32>()
            .map(YearFilter::Year)
            .map_err(|_| format!("expected 'all' or a year, got '{}'", s))
    }
}

impl FromStr for MonthFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(MonthFilter::All);
        }
        s.parse::<u32>()
            .map(MonthFilter::Month)
            .map_err(|_| format!("expected 'all' or a month number, got '{}'", s))
    }
}

/// The municipality/year/month choice driving every derived view.
///
/// A month is only meaningful inside a single year, so constructing a
/// selection with `YearFilter::All` always resets the month to `All`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub region: String,
    pub year: YearFilter,
    pub month: MonthFilter,
}

impl FilterSelection {
    pub fn new(region: impl Into<String>, year: YearFilter, month: MonthFilter) -> Self {
        let month = match year {
            YearFilter::All => MonthFilter::All,
            YearFilter::Year(_) => month,
        };
        Self { region: region.into(), year, month }
    }

    pub fn all_years(region: impl Into<String>) -> Self {
        Self::new(region, YearFilter::All, MonthFilter::All)
    }

    /// Human readable period, e.g. `All years`, `2022` or `2022 - March`.
    pub fn period_description(&self) -> String {
        match (self.year, self.month) {
            (YearFilter::All, _) => "All years".to_string(),
            (YearFilter::Year(y), MonthFilter::All) => y.to_string(),
            (YearFilter::Year(y), MonthFilter::Month(m)) => {
                format!("{} - {}", y, crate::util::month_name(m))
            }
        }
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.region, self.period_description())
    }
}

/// Result of the filter cascade: one subset per flow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredFlows {
    pub exports: Vec<TradeRecord>,
    pub imports: Vec<TradeRecord>,
}

impl FilteredFlows {
    pub fn is_empty(&self) -> bool {
        self.exports.is_empty() && self.imports.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingRow {
    pub rank: String,
    pub label: String,
    pub value: Decimal,
    pub percent: Decimal,
}

/// Top products plus the `Others` residual and the `Total` row.
///
/// Either empty (no input records) or ranked rows followed by exactly one
/// `Others` row and one `Total` row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankingTable {
    pub rows: Vec<RankingRow>,
}

impl RankingTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows carrying a numeric rank, i.e. everything but `Others` and `Total`.
    pub fn ranked(&self) -> &[RankingRow] {
        let n = self.rows.len().saturating_sub(2);
        &self.rows[..n]
    }

    pub fn others(&self) -> Option<&RankingRow> {
        self.rows.len().checked_sub(2).and_then(|i| self.rows.get(i))
    }

    pub fn total(&self) -> Option<&RankingRow> {
        self.rows.last()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BalanceTotals {
    pub export_total: Decimal,
    pub import_total: Decimal,
    pub net: Decimal,
}

impl BalanceTotals {
    pub fn new(export_total: Decimal, import_total: Decimal) -> Self {
        Self { export_total, import_total, net: export_total - import_total }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearBalance {
    pub year: i32,
    pub totals: BalanceTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBalance {
    pub month: u32,
    pub totals: BalanceTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BalanceView {
    MultiYear(Vec<YearBalance>),
    SingleYear {
        year: i32,
        totals: BalanceTotals,
        months: Vec<MonthBalance>,
    },
    SingleMonth {
        year: i32,
        month: u32,
        totals: BalanceTotals,
    },
}

/// Balance view plus an explicit flag telling "zero because nothing
/// matched" apart from genuine zero trade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceReport {
    pub is_empty: bool,
    pub view: BalanceView,
}

#[derive(Debug, Clone, Tabled)]
pub struct RankingDisplayRow {
    #[tabled(rename = "#")]
    pub rank: String,
    #[tabled(rename = "Product")]
    pub product: String,
    #[tabled(rename = "Value (US$)")]
    pub value: String,
    #[tabled(rename = "Percent (%)")]
    pub percent: String,
}

#[derive(Debug, Clone, Tabled)]
pub struct BalanceDisplayRow {
    #[tabled(rename = "Period")]
    pub period: String,
    #[tabled(rename = "Exported (US$)")]
    pub exported: String,
    #[tabled(rename = "Imported (US$)")]
    pub imported: String,
    #[tabled(rename = "Balance (US$)")]
    pub balance: String,
}
