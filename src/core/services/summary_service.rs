use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::time::Clock;
use crate::domain::{MonthKey, Transaction, TransactionKind};

/// Scalar totals over a ledger snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_worth: f64,
    pub monthly_income: f64,
    pub monthly_expense: f64,
    pub monthly_net: f64,
    pub count: usize,
}

/// Income/expense sums for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBucket {
    #[serde(rename = "monthKey")]
    pub month: MonthKey,
    pub income: f64,
    pub expense: f64,
    pub net: f64,
}

/// Totals across the buckets of a (possibly truncated) series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub income: f64,
    pub expense: f64,
    pub net: f64,
}

#[derive(Default)]
struct Sums {
    income: f64,
    expense: f64,
}

impl Sums {
    fn record(&mut self, txn: &Transaction) {
        match txn.kind {
            TransactionKind::Income => self.income += txn.amount,
            TransactionKind::Expense => self.expense += txn.amount,
        }
    }

    fn net(&self) -> f64 {
        self.income - self.expense
    }
}

pub struct SummaryService;

impl SummaryService {
    /// All-time totals plus the figures for the calendar month containing `as_of`.
    pub fn totals(records: &[Transaction], as_of: NaiveDate) -> Totals {
        let current = MonthKey::of(as_of);
        let mut all_time = Sums::default();
        let mut month = Sums::default();
        for txn in records {
            all_time.record(txn);
            if current.contains(txn.date) {
                month.record(txn);
            }
        }
        Totals {
            total_income: all_time.income,
            total_expense: all_time.expense,
            net_worth: all_time.net(),
            monthly_income: month.income,
            monthly_expense: month.expense,
            monthly_net: month.net(),
            count: records.len(),
        }
    }

    pub fn totals_today(records: &[Transaction], clock: &dyn Clock) -> Totals {
        Self::totals(records, clock.today())
    }

    /// Chronologically ascending monthly buckets; `limit` keeps only the latest `k`.
    pub fn monthly_series(records: &[Transaction], limit: Option<usize>) -> Vec<MonthlyBucket> {
        let mut buckets: BTreeMap<MonthKey, Sums> = BTreeMap::new();
        for txn in records {
            buckets.entry(MonthKey::of(txn.date)).or_default().record(txn);
        }
        let skip = limit.map_or(0, |k| buckets.len().saturating_sub(k));
        buckets
            .into_iter()
            .skip(skip)
            .map(|(month, sums)| MonthlyBucket {
                month,
                income: sums.income,
                expense: sums.expense,
                net: sums.net(),
            })
            .collect()
    }

    pub fn series_summary(series: &[MonthlyBucket]) -> SeriesSummary {
        let income: f64 = series.iter().map(|bucket| bucket.income).sum();
        let expense: f64 = series.iter().map(|bucket| bucket.expense).sum();
        SeriesSummary {
            income,
            expense,
            net: income - expense,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionDraft;
    use chrono::Utc;
    use uuid::Uuid;

    fn txn(amount: f64, kind: TransactionKind, y: i32, m: u32, d: u32) -> Transaction {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        Transaction::from_draft(
            Uuid::new_v4(),
            TransactionDraft::new(amount, date, "entry", kind),
            Utc::now(),
        )
    }

    #[test]
    fn limit_keeps_latest_months_across_year_boundary() {
        let records = vec![
            txn(10.0, TransactionKind::Expense, 2024, 1, 3),
            txn(20.0, TransactionKind::Expense, 2023, 11, 3),
            txn(30.0, TransactionKind::Income, 2023, 12, 3),
        ];
        let series = SummaryService::monthly_series(&records, Some(2));
        let keys: Vec<String> = series.iter().map(|b| b.month.to_string()).collect();
        assert_eq!(keys, vec!["2023-12", "2024-01"]);
        assert!(SummaryService::monthly_series(&records, Some(0)).is_empty());
        assert_eq!(SummaryService::monthly_series(&records, Some(10)).len(), 3);
    }

    #[test]
    fn current_month_requires_same_year() {
        let records = vec![
            txn(50.0, TransactionKind::Income, 2023, 6, 1),
            txn(70.0, TransactionKind::Income, 2024, 6, 1),
        ];
        let totals =
            SummaryService::totals(&records, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert_eq!(totals.monthly_income, 70.0);
        assert_eq!(totals.total_income, 120.0);
        assert_eq!(totals.count, 2);
    }

    #[test]
    fn series_summary_sums_displayed_window() {
        let records = vec![
            txn(100.0, TransactionKind::Income, 2024, 1, 5),
            txn(40.0, TransactionKind::Expense, 2024, 1, 10),
            txn(25.0, TransactionKind::Expense, 2024, 2, 1),
        ];
        let series = SummaryService::monthly_series(&records, Some(1));
        let summary = SummaryService::series_summary(&series);
        assert_eq!(
            summary,
            SeriesSummary {
                income: 0.0,
                expense: 25.0,
                net: -25.0
            }
        );
    }

    #[test]
    fn bucket_serializes_sortable_key() {
        let records = vec![txn(5.0, TransactionKind::Income, 2024, 9, 1)];
        let series = SummaryService::monthly_series(&records, None);
        let json = serde_json::to_value(&series[0]).unwrap();
        assert_eq!(json["monthKey"], serde_json::json!("2024-09"));
        assert_eq!(json["net"], serde_json::json!(5.0));
    }
}
