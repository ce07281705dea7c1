//! Leaderboard and activity aggregation.
//!
//! Both views are derived from paid transactions only and recomputed on
//! every read, so there is no cached state to keep consistent with the
//! ledger. Because terminal transitions are applied exactly once, a
//! supporter's total reflects each warp exactly once no matter how many
//! times reconciliation was observed.

use std::collections::HashMap;

use crate::models::{ActivityEntry, LeaderboardEntry, PaidWarp};

/// Computes ranked supporter totals from paid warps.
///
/// Ordering: total amount descending; ties broken by the earliest paid
/// timestamp (the longer-standing supporter ranks first), then by name
/// for full determinism.
pub fn top_supporters(paid: &[PaidWarp]) -> Vec<LeaderboardEntry> {
    let mut by_customer: HashMap<&str, LeaderboardEntry> = HashMap::new();

    for warp in paid {
        by_customer
            .entry(warp.customer_name.as_str())
            .and_modify(|entry| {
                entry.total_amount += warp.amount;
                entry.warp_count += 1;
                if warp.paid_at < entry.first_paid_at {
                    entry.first_paid_at = warp.paid_at;
                }
            })
            .or_insert_with(|| LeaderboardEntry {
                customer_name: warp.customer_name.clone(),
                total_amount: warp.amount,
                warp_count: 1,
                first_paid_at: warp.paid_at,
            });
    }

    let mut entries: Vec<LeaderboardEntry> = by_customer.into_values().collect();
    entries.sort_by(|a, b| {
        b.total_amount
            .cmp(&a.total_amount)
            .then(a.first_paid_at.cmp(&b.first_paid_at))
            .then(a.customer_name.cmp(&b.customer_name))
    });
    entries
}

/// Produces the chronological activity feed, oldest first.
pub fn activity_log(paid: &[PaidWarp]) -> Vec<ActivityEntry> {
    let mut entries: Vec<ActivityEntry> = paid
        .iter()
        .map(|warp| ActivityEntry {
            customer_name: warp.customer_name.clone(),
            code: warp.code.clone(),
            amount: warp.amount,
            paid_at: warp.paid_at,
        })
        .collect();
    entries.sort_by(|a, b| a.paid_at.cmp(&b.paid_at));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 20, 0, 0).unwrap()
    }

    fn warp(customer: &str, amount: i64, minutes_after: i64) -> PaidWarp {
        PaidWarp {
            customer_name: customer.to_string(),
            code: "DJ001".to_string(),
            amount,
            paid_at: base_time() + Duration::minutes(minutes_after),
        }
    }

    #[test]
    fn test_empty_input_yields_empty_board() {
        assert!(top_supporters(&[]).is_empty());
        assert!(activity_log(&[]).is_empty());
    }

    #[test]
    fn test_single_paid_warp_total() {
        let board = top_supporters(&[warp("Alice", 1200, 0)]);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].customer_name, "Alice");
        assert_eq!(board[0].total_amount, 1200);
        assert_eq!(board[0].warp_count, 1);
    }

    #[test]
    fn test_totals_grouped_per_customer() {
        let board = top_supporters(&[
            warp("Alice", 1200, 0),
            warp("Bob", 500, 1),
            warp("Alice", 300, 2),
        ]);
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].customer_name, "Alice");
        assert_eq!(board[0].total_amount, 1500);
        assert_eq!(board[0].warp_count, 2);
        assert_eq!(board[1].customer_name, "Bob");
        assert_eq!(board[1].total_amount, 500);
    }

    #[test]
    fn test_sorted_descending_by_total() {
        let board = top_supporters(&[
            warp("Small", 100, 0),
            warp("Large", 9000, 1),
            warp("Medium", 4500, 2),
        ]);
        let names: Vec<&str> = board.iter().map(|e| e.customer_name.as_str()).collect();
        assert_eq!(names, ["Large", "Medium", "Small"]);
    }

    #[test]
    fn test_ties_broken_by_earliest_paid_timestamp() {
        let board = top_supporters(&[
            warp("Later", 1000, 30),
            warp("Earlier", 1000, 5),
        ]);
        assert_eq!(board[0].customer_name, "Earlier");
        assert_eq!(board[1].customer_name, "Later");
    }

    #[test]
    fn test_tie_uses_earliest_warp_of_each_supporter() {
        // Earliest paid_at counts even when a later warp completes the tie
        let board = top_supporters(&[
            warp("Split", 400, 0),
            warp("Whole", 1000, 10),
            warp("Split", 600, 50),
        ]);
        assert_eq!(board[0].customer_name, "Split");
        assert_eq!(board[0].first_paid_at, base_time());
    }

    #[test]
    fn test_reaggregation_is_stable() {
        // Recomputing over the same paid set never changes totals
        let paid = vec![warp("Alice", 1200, 0)];
        let first = top_supporters(&paid);
        let second = top_supporters(&paid);
        assert_eq!(first, second);
        assert_eq!(second[0].total_amount, 1200);
    }

    #[test]
    fn test_activity_log_chronological() {
        let log = activity_log(&[
            warp("Bob", 500, 20),
            warp("Alice", 1200, 0),
            warp("Cara", 800, 10),
        ]);
        let names: Vec<&str> = log.iter().map(|e| e.customer_name.as_str()).collect();
        assert_eq!(names, ["Alice", "Cara", "Bob"]);
        assert!(log.windows(2).all(|w| w[0].paid_at <= w[1].paid_at));
    }

    #[test]
    fn test_activity_log_preserves_amounts_and_codes() {
        let log = activity_log(&[warp("Alice", 1200, 0)]);
        assert_eq!(log[0].amount, 1200);
        assert_eq!(log[0].code, "DJ001");
    }
}
