use crate::error::Result;
use crate::types::{
    BalanceDisplayRow, BalanceReport, BalanceTotals, BalanceView, RankingDisplayRow, RankingTable,
};
use crate::util::{format_brl, format_percent, month_name};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn render_table<T>(rows: &[T]) -> String
where
    T: Tabled + Clone,
{
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(rows.to_vec()).with(Style::markdown()).to_string()
}

pub fn ranking_rows(table: &RankingTable) -> Vec<RankingDisplayRow> {
    table
        .rows
        .iter()
        .map(|r| RankingDisplayRow {
            rank: r.rank.clone(),
            product: r.label.clone(),
            value: format_brl(Some(r.value)),
            percent: format_percent(r.percent),
        })
        .collect()
}

fn balance_row(period: String, totals: &BalanceTotals) -> BalanceDisplayRow {
    BalanceDisplayRow {
        period,
        exported: format_brl(Some(totals.export_total)),
        imported: format_brl(Some(totals.import_total)),
        balance: format_brl(Some(totals.net)),
    }
}

/// One display row per year, per month, or a single row, depending on the view.
pub fn balance_rows(report: &BalanceReport) -> Vec<BalanceDisplayRow> {
    match &report.view {
        BalanceView::MultiYear(years) => years
            .iter()
            .map(|y| balance_row(y.year.to_string(), &y.totals))
            .collect(),
        BalanceView::SingleYear { year, totals, months } => months
            .iter()
            .map(|m| balance_row(month_name(m.month).to_string(), &m.totals))
            .chain(std::iter::once(balance_row(format!("Total {}", year), totals)))
            .collect(),
        BalanceView::SingleMonth { year, month, totals } => {
            vec![balance_row(format!("{} {}", month_name(*month), year), totals)]
        }
    }
}

pub fn print_balance(report: &BalanceReport) {
    println!("Trade Balance (US$)\n");
    if report.is_empty {
        println!("(no trade records for this selection)\n");
        return;
    }
    println!("{}\n", render_table(&balance_rows(report)));
}

pub fn print_ranking(title: &str, table: &RankingTable) {
    println!("{}\n", title);
    if table.is_empty() {
        println!("(no data for the current selection)\n");
        return;
    }
    println!("{}\n", render_table(&ranking_rows(table)));
}
