use crate::dataset::TradeDataset;
use crate::error::Result;
use crate::types::{FilterSelection, FilteredFlows, MonthFilter, TradeRecord, YearFilter};
use tracing::debug;

/// Cumulative municipality -> year -> month filtering over both flows.
pub struct FilterCascade;

impl FilterCascade {
    /// Validate `selection` against `dataset` and return the matching subset
    /// of each flow. No match is an empty result, not an error.
    pub fn apply(dataset: &TradeDataset, selection: &FilterSelection) -> Result<FilteredFlows> {
        dataset.validate(selection)?;
        let flows = FilteredFlows {
            exports: filter_records(dataset.exports(), selection),
            imports: filter_records(dataset.imports(), selection),
        };
        debug!(
            selection = %selection,
            exports = flows.exports.len(),
            imports = flows.imports.len(),
            "filter cascade applied"
        );
        Ok(flows)
    }
}

fn filter_records(records: &[TradeRecord], selection: &FilterSelection) -> Vec<TradeRecord> {
    records
        .iter()
        .filter(|r| matches(r, selection))
        .cloned()
        .collect()
}

fn matches(r: &TradeRecord, selection: &FilterSelection) -> bool {
    if r.region != selection.region {
        return false;
    }
    let YearFilter::Year(year) = selection.year else {
        // Month only narrows within a chosen year.
        return true;
    };
    if r.year != year {
        return false;
    }
    match selection.month {
        MonthFilter::All => true,
        MonthFilter::Month(m) => r.month == m,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::record;
    use crate::error::ComexError;
    use rust_decimal_macros::dec;

    fn dataset() -> TradeDataset {
        TradeDataset::new(
            vec![
                record("Curitiba", 2021, 1, "A", dec!(1)),
                record("Curitiba", 2022, 1, "A", dec!(2)),
                record("Curitiba", 2022, 2, "B", dec!(3)),
                record("Londrina", 2022, 1, "A", dec!(4)),
            ],
            vec![
                record("Curitiba", 2022, 2, "C", dec!(5)),
                record("Londrina", 2021, 3, "C", dec!(6)),
            ],
        )
    }

    #[test]
    fn region_only() {
        let flows = FilterCascade::apply(&dataset(), &FilterSelection::all_years("Curitiba")).unwrap();
        assert_eq!(flows.exports.len(), 3);
        assert_eq!(flows.imports.len(), 1);
    }

    #[test]
    fn region_and_year() {
        let sel = FilterSelection::new("Curitiba", YearFilter::Year(2022), MonthFilter::All);
        let flows = FilterCascade::apply(&dataset(), &sel).unwrap();
        assert_eq!(flows.exports.len(), 2);
        assert!(flows.exports.iter().all(|r| r.year == 2022));
    }

    #[test]
    fn region_year_and_month() {
        let sel = FilterSelection::new("Curitiba", YearFilter::Year(2022), MonthFilter::Month(2));
        let flows = FilterCascade::apply(&dataset(), &sel).unwrap();
        assert_eq!(flows.exports.len(), 1);
        assert_eq!(flows.exports[0].product_name, "B");
        assert_eq!(flows.imports.len(), 1);
    }

    #[test]
    fn month_without_year_is_ignored() {
        // Bypass the constructor to build an inconsistent selection.
        let sel = FilterSelection {
            region: "Curitiba".to_string(),
            year: YearFilter::All,
            month: MonthFilter::Month(2),
        };
        let flows = FilterCascade::apply(&dataset(), &sel).unwrap();
        assert_eq!(flows.exports.len(), 3);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let sel = FilterSelection::new("Curitiba", YearFilter::Year(1999), MonthFilter::All);
        let flows = FilterCascade::apply(&dataset(), &sel).unwrap();
        assert!(flows.is_empty());
    }

    #[test]
    fn unknown_region_does_not_fall_back() {
        let err = FilterCascade::apply(&dataset(), &FilterSelection::all_years("Cascavel")).unwrap_err();
        assert!(matches!(err, ComexError::UnknownRegion(_)));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let ds = dataset();
        let sel = FilterSelection::new("Curitiba", YearFilter::Year(2022), MonthFilter::All);
        let a = FilterCascade::apply(&ds, &sel).unwrap();
        let b = FilterCascade::apply(&ds, &sel).unwrap();
        assert_eq!(a, b);
    }
}
