//! Bilateral debt netting over the full transaction log.
//!
//! Balances are recomputed from scratch on every query; there is no cached
//! or incremental state to drift out of sync with the log. Netting is
//! strictly pairwise: mutual flows between two members cancel, but cycles
//! across three or more members are left alone so every reported debt
//! corresponds to obligations those two people actually incurred.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use sqlx::mysql::MySqlPool;

use crate::db;
use crate::models::{NetDebt, Transaction, UserSummary};
use crate::utils::money::format_minor;
use crate::utils::retry::{with_retries, RETRY_ATTEMPTS};
use crate::utils::LedgerError;

/// Residual at or below one minor unit counts as settled.
pub const NET_TOLERANCE_MINOR: i64 = 1;

/// Reduce a transaction log into net pairwise debts.
///
/// Every (debtor, creditor) flow is summed, then each unordered member pair
/// is netted exactly once. Output order is deterministic (ascending by the
/// normalized pair key) and every amount is strictly positive; a pair never
/// appears in both directions.
pub fn net_balances(transactions: &[Transaction]) -> Vec<NetDebt> {
    let mut pair_totals: BTreeMap<(i64, i64), i64> = BTreeMap::new();
    for tx in transactions {
        *pair_totals
            .entry((tx.debtor_id, tx.creditor_id))
            .or_insert(0) += tx.amount;
    }

    let mut debts = Vec::new();
    let mut visited: BTreeSet<(i64, i64)> = BTreeSet::new();

    for &(debtor, creditor) in pair_totals.keys() {
        let key = if debtor < creditor {
            (debtor, creditor)
        } else {
            (creditor, debtor)
        };
        if !visited.insert(key) {
            continue;
        }

        let (a, b) = key;
        let a_owes_b = pair_totals.get(&(a, b)).copied().unwrap_or(0);
        let b_owes_a = pair_totals.get(&(b, a)).copied().unwrap_or(0);
        let net = a_owes_b - b_owes_a;

        if net > NET_TOLERANCE_MINOR {
            debts.push(NetDebt {
                debtor_id: a,
                creditor_id: b,
                amount: net,
            });
        } else if net < -NET_TOLERANCE_MINOR {
            debts.push(NetDebt {
                debtor_id: b,
                creditor_id: a,
                amount: -net,
            });
        }
    }

    debts
}

/// Partition net debts into what `user_id` owes and what is owed to them.
pub fn summarize_user(debts: &[NetDebt], user_id: i64) -> UserSummary {
    let mut summary = UserSummary::default();
    for debt in debts {
        if debt.debtor_id == user_id {
            summary.owed_by_user.push(*debt);
        }
        if debt.creditor_id == user_id {
            summary.owed_to_user.push(*debt);
        }
    }
    summary
}

/// Current net debts for a group, straight from the stored log.
pub async fn get_group_balances(
    pool: &MySqlPool,
    group_id: i64,
) -> Result<Vec<NetDebt>, LedgerError> {
    let transactions = with_retries("list_transactions", RETRY_ATTEMPTS, || {
        db::transaction::list_transactions(pool, group_id)
    })
    .await?;

    Ok(net_balances(&transactions))
}

/// Personal "I owe / owed to me" view for one group member.
pub async fn get_user_summary(
    pool: &MySqlPool,
    group_id: i64,
    user_id: i64,
) -> Result<UserSummary, LedgerError> {
    let debts = get_group_balances(pool, group_id).await?;
    Ok(summarize_user(&debts, user_id))
}

fn name_of(names: &HashMap<i64, String>, user_id: i64) -> &str {
    names.get(&user_id).map(String::as_str).unwrap_or("???")
}

/// Human-readable group balance report, one "X owes Y" line per net debt.
pub fn format_group_report(debts: &[NetDebt], names: &HashMap<i64, String>) -> String {
    if debts.is_empty() {
        return "Everyone is settled up!".to_string();
    }

    let mut report = String::new();
    for debt in debts {
        report.push_str(&format!(
            "{} owes {} {}\n",
            name_of(names, debt.debtor_id),
            name_of(names, debt.creditor_id),
            format_minor(debt.amount),
        ));
    }
    report
}

/// Personal summary text. Empty partitions get an explicit marker instead
/// of being dropped.
pub fn format_user_summary(summary: &UserSummary, names: &HashMap<i64, String>) -> String {
    let mut text = String::from("I owe:\n");
    if summary.owed_by_user.is_empty() {
        text.push_str("  no one\n");
    } else {
        for debt in &summary.owed_by_user {
            text.push_str(&format!(
                "  {}: {}\n",
                name_of(names, debt.creditor_id),
                format_minor(debt.amount),
            ));
        }
    }

    text.push_str("Owed to me:\n");
    if summary.owed_to_user.is_empty() {
        text.push_str("  no one\n");
    } else {
        for debt in &summary.owed_to_user {
            text.push_str(&format!(
                "  {}: {}\n",
                name_of(names, debt.debtor_id),
                format_minor(debt.amount),
            ));
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::REPAYMENT_COMMENT;
    use chrono::{TimeZone, Utc};

    const GROUP: i64 = 10;

    fn tx(id: i64, creditor_id: i64, debtor_id: i64, amount: i64, comment: &str) -> Transaction {
        Transaction {
            id,
            group_id: GROUP,
            creditor_id,
            debtor_id,
            amount,
            comment: comment.to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_log_yields_no_debts() {
        assert!(net_balances(&[]).is_empty());
    }

    #[test]
    fn chain_debts_do_not_cross_cancel() {
        // 2 borrowed 100.00 from 1, 3 borrowed 40.00 from 2. 1 and 3 never
        // transacted, so no obligation appears between them.
        let log = vec![tx(1, 1, 2, 10_000, ""), tx(2, 2, 3, 4_000, "")];
        let debts = net_balances(&log);
        assert_eq!(
            debts,
            vec![
                NetDebt { debtor_id: 2, creditor_id: 1, amount: 10_000 },
                NetDebt { debtor_id: 3, creditor_id: 2, amount: 4_000 },
            ]
        );
    }

    #[test]
    fn mutual_flows_net_to_a_single_direction() {
        let log = vec![
            tx(1, 1, 2, 10_000, ""),
            tx(2, 2, 1, 3_000, ""),
            tx(3, 1, 2, 500, ""),
        ];
        let debts = net_balances(&log);
        assert_eq!(
            debts,
            vec![NetDebt { debtor_id: 2, creditor_id: 1, amount: 7_500 }]
        );
    }

    #[test]
    fn full_repayment_settles_the_pair() {
        // 2 borrowed 100.00 from 1, then handed 100.00 back. The repayment
        // is recorded with the payer as creditor, which nets to zero.
        let log = vec![
            tx(1, 1, 2, 10_000, ""),
            tx(2, 2, 1, 10_000, REPAYMENT_COMMENT),
        ];
        assert!(net_balances(&log).is_empty());
    }

    #[test]
    fn residual_within_tolerance_is_settled() {
        let one_cent_off = vec![tx(1, 1, 2, 10_000, ""), tx(2, 2, 1, 9_999, "")];
        assert!(net_balances(&one_cent_off).is_empty());

        let two_cents_off = vec![tx(1, 1, 2, 10_000, ""), tx(2, 2, 1, 9_998, "")];
        assert_eq!(
            net_balances(&two_cents_off),
            vec![NetDebt { debtor_id: 2, creditor_id: 1, amount: 2 }]
        );
    }

    #[test]
    fn reported_debts_are_positive_and_one_directional() {
        let log = vec![
            tx(1, 1, 2, 12_345, ""),
            tx(2, 2, 1, 6_789, ""),
            tx(3, 3, 1, 4_000, ""),
            tx(4, 1, 3, 9_000, ""),
            tx(5, 2, 3, 1_500, ""),
            tx(6, 3, 2, 1_500, ""),
        ];
        let debts = net_balances(&log);

        let mut seen_pairs = BTreeSet::new();
        for debt in &debts {
            assert!(debt.amount > 0);
            let a = debt.debtor_id.min(debt.creditor_id);
            let b = debt.debtor_id.max(debt.creditor_id);
            assert!(seen_pairs.insert((a, b)), "pair reported twice: {:?}", debt);
        }

        // Signed net per pair must match what the engine reports.
        assert_eq!(
            debts,
            vec![
                NetDebt { debtor_id: 2, creditor_id: 1, amount: 5_556 },
                NetDebt { debtor_id: 3, creditor_id: 1, amount: 5_000 },
            ]
        );
    }

    #[test]
    fn netting_is_idempotent() {
        let log = vec![
            tx(1, 1, 2, 10_000, ""),
            tx(2, 2, 3, 4_000, ""),
            tx(3, 3, 1, 2_500, ""),
        ];
        assert_eq!(net_balances(&log), net_balances(&log));
    }

    #[test]
    fn summary_partitions_by_role() {
        let log = vec![
            tx(1, 1, 2, 10_000, ""),
            tx(2, 2, 3, 4_000, ""),
        ];
        let debts = net_balances(&log);

        let summary = summarize_user(&debts, 2);
        assert_eq!(
            summary.owed_by_user,
            vec![NetDebt { debtor_id: 2, creditor_id: 1, amount: 10_000 }]
        );
        assert_eq!(
            summary.owed_to_user,
            vec![NetDebt { debtor_id: 3, creditor_id: 2, amount: 4_000 }]
        );

        let uninvolved = summarize_user(&debts, 99);
        assert!(uninvolved.owed_by_user.is_empty());
        assert!(uninvolved.owed_to_user.is_empty());
    }

    fn names() -> HashMap<i64, String> {
        HashMap::from([
            (1, "Alice".to_string()),
            (2, "Bob".to_string()),
            (3, "Carol".to_string()),
        ])
    }

    #[test]
    fn group_report_lists_each_debt() {
        let debts = vec![
            NetDebt { debtor_id: 2, creditor_id: 1, amount: 10_000 },
            NetDebt { debtor_id: 3, creditor_id: 2, amount: 4_000 },
        ];
        let report = format_group_report(&debts, &names());
        assert!(report.contains("Bob owes Alice 100.00"));
        assert!(report.contains("Carol owes Bob 40.00"));

        assert_eq!(format_group_report(&[], &names()), "Everyone is settled up!");
    }

    #[test]
    fn user_summary_marks_empty_partitions() {
        let debts = vec![NetDebt { debtor_id: 2, creditor_id: 1, amount: 2_550 }];

        let bob = format_user_summary(&summarize_user(&debts, 2), &names());
        assert!(bob.contains("I owe:\n  Alice: 25.50"));
        assert!(bob.contains("Owed to me:\n  no one"));

        let alice = format_user_summary(&summarize_user(&debts, 1), &names());
        assert!(alice.contains("I owe:\n  no one"));
        assert!(alice.contains("Owed to me:\n  Bob: 25.50"));
    }
}
