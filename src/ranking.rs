use crate::types::{RankingRow, RankingTable, TradeRecord};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Number of products listed individually before the residual row.
pub const TOP_N: usize = 10;
pub const OTHERS_LABEL: &str = "Others";
pub const TOTAL_LABEL: &str = "Total";

/// Top products by FOB value for a single flow.
pub struct RankingAggregator;

impl RankingAggregator {
    pub fn rank(records: &[TradeRecord]) -> RankingTable {
        if records.is_empty() {
            return RankingTable::default();
        }

        // Group by product name, remembering first-seen order for ties.
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(&str, Decimal)> = Vec::new();
        for r in records {
            let slot = *index.entry(r.product_name.as_str()).or_insert_with(|| {
                groups.push((r.product_name.as_str(), Decimal::ZERO));
                groups.len() - 1
            });
            groups[slot].1 += r.fob_value;
        }

        // `sort_by` is stable, so equal values keep first-seen order.
        groups.sort_by(|a, b| b.1.cmp(&a.1));

        let total: Decimal = groups.iter().map(|(_, v)| *v).sum();
        let others: Decimal = groups.iter().skip(TOP_N).map(|(_, v)| *v).sum();

        let mut rows: Vec<RankingRow> = groups
            .iter()
            .take(TOP_N)
            .enumerate()
            .map(|(idx, (label, value))| RankingRow {
                rank: (idx + 1).to_string(),
                label: label.to_string(),
                value: *value,
                percent: percent_of(*value, total),
            })
            .collect();
        rows.push(RankingRow {
            rank: String::new(),
            label: OTHERS_LABEL.to_string(),
            value: others,
            percent: percent_of(others, total),
        });
        rows.push(RankingRow {
            rank: String::new(),
            label: TOTAL_LABEL.to_string(),
            value: total,
            percent: percent_of(total, total),
        });
        RankingTable { rows }
    }
}

/// Share of `total` in percent; zero when `total` is zero.
fn percent_of(value: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    value
        .checked_div(total)
        .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::record;
    use rust_decimal_macros::dec;

    fn products(n: usize) -> Vec<TradeRecord> {
        (0..n)
            .map(|i| record("Curitiba", 2022, 1, &format!("P{:02}", i), Decimal::from(100 - i as i64)))
            .collect()
    }

    #[test]
    fn empty_input_gives_empty_table() {
        assert!(RankingAggregator::rank(&[]).is_empty());
    }

    #[test]
    fn few_products_still_emit_zero_others() {
        let table = RankingAggregator::rank(&[
            record("Curitiba", 2022, 1, "A", dec!(100)),
            record("Curitiba", 2022, 2, "B", dec!(50)),
        ]);
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.ranked().len(), 2);
        let others = table.others().unwrap();
        assert_eq!(others.label, OTHERS_LABEL);
        assert_eq!(others.value, Decimal::ZERO);
        assert_eq!(others.percent, Decimal::ZERO);
        let total = table.total().unwrap();
        assert_eq!(total.value, dec!(150));
        assert_eq!(total.percent, dec!(100));
        assert_eq!(table.rows[0].percent.round_dp(2), dec!(66.67));
        assert_eq!(table.rows[1].percent.round_dp(2), dec!(33.33));
    }

    #[test]
    fn duplicates_are_summed() {
        let table = RankingAggregator::rank(&[
            record("Curitiba", 2022, 1, "A", dec!(10)),
            record("Curitiba", 2022, 1, "B", dec!(15)),
            record("Curitiba", 2022, 2, "A", dec!(10)),
        ]);
        assert_eq!(table.rows[0].label, "A");
        assert_eq!(table.rows[0].value, dec!(20));
    }

    #[test]
    fn residual_reconstructs_total_beyond_top_ten() {
        let records = products(25);
        let table = RankingAggregator::rank(&records);
        assert_eq!(table.rows.len(), TOP_N + 2);
        let ranks: Vec<&str> = table.ranked().iter().map(|r| r.rank.as_str()).collect();
        assert_eq!(ranks, vec!["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]);

        let ranked_sum: Decimal = table.ranked().iter().map(|r| r.value).sum();
        let others = table.others().unwrap().value;
        let total = table.total().unwrap().value;
        let input_sum: Decimal = records.iter().map(|r| r.fob_value).sum();
        assert_eq!(ranked_sum + others, total);
        assert_eq!(total, input_sum);

        let pct: Decimal = table.ranked().iter().map(|r| r.percent).sum::<Decimal>()
            + table.others().unwrap().percent;
        assert!((pct - dec!(100)).abs() < dec!(0.0001));
    }

    #[test]
    fn sorted_descending_with_stable_ties() {
        let table = RankingAggregator::rank(&[
            record("Curitiba", 2022, 1, "Low", dec!(1)),
            record("Curitiba", 2022, 1, "TieFirst", dec!(5)),
            record("Curitiba", 2022, 1, "High", dec!(9)),
            record("Curitiba", 2022, 1, "TieSecond", dec!(5)),
        ]);
        let labels: Vec<&str> = table.ranked().iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["High", "TieFirst", "TieSecond", "Low"]);
        assert_eq!(RankingAggregator::rank(&[
            record("Curitiba", 2022, 1, "Low", dec!(1)),
            record("Curitiba", 2022, 1, "TieFirst", dec!(5)),
            record("Curitiba", 2022, 1, "High", dec!(9)),
            record("Curitiba", 2022, 1, "TieSecond", dec!(5)),
        ]), table);
    }

    #[test]
    fn all_zero_values_keep_shape_with_zero_percent() {
        let table = RankingAggregator::rank(&[
            record("Curitiba", 2022, 1, "A", Decimal::ZERO),
            record("Curitiba", 2022, 1, "B", Decimal::ZERO),
        ]);
        assert_eq!(table.rows.len(), 4);
        assert!(table.rows.iter().all(|r| r.value.is_zero() && r.percent.is_zero()));
    }
}
