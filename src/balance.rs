use crate::types::{
    BalanceReport, BalanceTotals, BalanceView, FilterSelection, FilteredFlows, MonthBalance,
    MonthFilter, TradeRecord, YearBalance, YearFilter,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Export/import/net totals at the granularity implied by the selection.
pub struct BalanceCalculator;

impl BalanceCalculator {
    pub fn compute(flows: &FilteredFlows, selection: &FilterSelection) -> BalanceReport {
        let view = match (selection.year, selection.month) {
            (YearFilter::All, _) => BalanceView::MultiYear(yearly(flows)),
            (YearFilter::Year(year), MonthFilter::All) => BalanceView::SingleYear {
                year,
                totals: totals(flows),
                months: monthly(flows),
            },
            (YearFilter::Year(year), MonthFilter::Month(month)) => BalanceView::SingleMonth {
                year,
                month,
                totals: totals(flows),
            },
        };
        BalanceReport { is_empty: flows.is_empty(), view }
    }
}

fn sum(records: &[TradeRecord]) -> Decimal {
    records.iter().map(|r| r.fob_value).sum()
}

fn totals(flows: &FilteredFlows) -> BalanceTotals {
    BalanceTotals::new(sum(&flows.exports), sum(&flows.imports))
}

/// Outer union over the years of both flows, missing side filled with zero.
fn yearly(flows: &FilteredFlows) -> Vec<YearBalance> {
    let mut by_year: BTreeMap<i32, (Decimal, Decimal)> = BTreeMap::new();
    for r in &flows.exports {
        by_year.entry(r.year).or_default().0 += r.fob_value;
    }
    for r in &flows.imports {
        by_year.entry(r.year).or_default().1 += r.fob_value;
    }
    by_year
        .into_iter()
        .map(|(year, (exp, imp))| YearBalance { year, totals: BalanceTotals::new(exp, imp) })
        .collect()
}

/// Always twelve entries, January first.
fn monthly(flows: &FilteredFlows) -> Vec<MonthBalance> {
    let mut by_month = [(Decimal::ZERO, Decimal::ZERO); 12];
    for r in &flows.exports {
        if let Some(slot) = month_slot(&mut by_month, r.month) {
            slot.0 += r.fob_value;
        }
    }
    for r in &flows.imports {
        if let Some(slot) = month_slot(&mut by_month, r.month) {
            slot.1 += r.fob_value;
        }
    }
    (1u32..)
        .zip(by_month)
        .map(|(month, (exp, imp))| MonthBalance { month, totals: BalanceTotals::new(exp, imp) })
        .collect()
}

fn month_slot(
    by_month: &mut [(Decimal, Decimal); 12],
    month: u32,
) -> Option<&mut (Decimal, Decimal)> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    by_month.get_mut(idx)
}
