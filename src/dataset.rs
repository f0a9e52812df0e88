use crate::error::{ComexError, Result};
use crate::types::{FilterSelection, Flow, MonthFilter, TradeRecord};
use std::collections::BTreeSet;

/// Immutable export/import record pair.
///
/// Built once, then only read. Every filter and aggregation derives new
/// values from it instead of mutating it.
#[derive(Debug, Clone, Default)]
pub struct TradeDataset {
    exports: Vec<TradeRecord>,
    imports: Vec<TradeRecord>,
}

impl TradeDataset {
    pub fn new(exports: Vec<TradeRecord>, imports: Vec<TradeRecord>) -> Self {
        Self { exports, imports }
    }

    pub fn records(&self, flow: Flow) -> &[TradeRecord] {
        match flow {
            Flow::Export => &self.exports,
            Flow::Import => &self.imports,
        }
    }

    pub fn exports(&self) -> &[TradeRecord] {
        &self.exports
    }

    pub fn imports(&self) -> &[TradeRecord] {
        &self.imports
    }

    fn all_records(&self) -> impl Iterator<Item = &TradeRecord> {
        self.exports.iter().chain(self.imports.iter())
    }

    /// Sorted distinct municipalities across both flows.
    pub fn regions(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .all_records()
            .map(|r| r.region.as_str())
            .filter(|r| !r.is_empty())
            .collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Sorted distinct years across both flows.
    pub fn years(&self) -> Vec<i32> {
        let set: BTreeSet<i32> = self.all_records().map(|r| r.year).collect();
        set.into_iter().collect()
    }

    pub fn has_region(&self, region: &str) -> bool {
        self.all_records().any(|r| r.region == region)
    }

    /// Reject selections the cascade must never silently widen.
    pub fn validate(&self, selection: &FilterSelection) -> Result<()> {
        if !self.has_region(&selection.region) {
            return Err(ComexError::UnknownRegion(selection.region.clone()));
        }
        if let MonthFilter::Month(m) = selection.month {
            if !(1..=12).contains(&m) {
                return Err(ComexError::InvalidMonth(m));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::types::TradeRecord;
    use rust_decimal::Decimal;

    pub fn record(region: &str, year: i32, month: u32, product: &str, value: Decimal) -> TradeRecord {
        TradeRecord {
            region: region.to_string(),
            year,
            month,
            product_code: format!("SH-{}", product),
            product_name: product.to_string(),
            fob_value: value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::record;
    use super::*;
    use crate::types::YearFilter;
    use rust_decimal_macros::dec;

    fn dataset() -> TradeDataset {
        TradeDataset::new(
            vec![
                record("Londrina", 2021, 1, "Soja", dec!(10)),
                record("Curitiba", 2022, 5, "Carne", dec!(20)),
            ],
            vec![record("Maringá", 2020, 2, "Adubo", dec!(5))],
        )
    }

    #[test]
    fn regions_and_years_are_sorted_unions() {
        let ds = dataset();
        assert_eq!(ds.regions(), vec!["Curitiba", "Londrina", "Maringá"]);
        assert_eq!(ds.years(), vec![2020, 2021, 2022]);
    }

    #[test]
    fn import_only_region_is_selectable() {
        let ds = dataset();
        assert!(ds.validate(&FilterSelection::all_years("Maringá")).is_ok());
    }

    #[test]
    fn unknown_region_is_rejected() {
        let ds = dataset();
        let err = ds.validate(&FilterSelection::all_years("Cascavel")).unwrap_err();
        assert!(matches!(err, ComexError::UnknownRegion(r) if r == "Cascavel"));
    }

    #[test]
    fn out_of_range_month_is_rejected() {
        let ds = dataset();
        let sel = FilterSelection::new("Curitiba", YearFilter::Year(2022), MonthFilter::Month(13));
        assert!(matches!(ds.validate(&sel), Err(ComexError::InvalidMonth(13))));
    }
}
