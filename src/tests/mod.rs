mod group_tests;
mod split_tests;

use crate::core::constants::EPSILON;
use crate::core::models::{
    expense::Expense,
    group::Group,
    member::Member,
    payment::Payment,
    split::{ShareEntry, SplitPolicy},
};
use crate::core::services::SplitEaseService;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use chrono::{TimeZone, Utc};

pub const TEST_SECRET: &str = "test-secret";

pub fn create_test_service() -> SplitEaseService<InMemoryLogging, InMemoryStorage> {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    SplitEaseService::new(storage, logging, TEST_SECRET.to_string())
}

pub fn group_with(policy: SplitPolicy) -> Group {
    Group {
        id: "g1".to_string(),
        name: "Trip".to_string(),
        currency: "EUR".to_string(),
        default_split_policy: policy,
        created_by: "a".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    }
}

/// Members named after their ids, upper-cased.
pub fn members(ids: &[&str]) -> Vec<Member> {
    ids.iter().map(|id| Member::new(*id, id.to_uppercase())).collect()
}

pub fn expense(id: &str, amount: f64, paid_by: &str, split_config: Option<SplitPolicy>) -> Expense {
    Expense {
        id: id.to_string(),
        group_id: "g1".to_string(),
        description: format!("expense {}", id),
        amount,
        paid_by: paid_by.to_string(),
        date: Utc.with_ymd_and_hms(2024, 6, 2, 12, 0, 0).unwrap(),
        split_config,
    }
}

pub fn payment(id: &str, payer: &str, payee: &str, amount: f64) -> Payment {
    Payment {
        id: id.to_string(),
        group_id: "g1".to_string(),
        payer: payer.to_string(),
        payee: payee.to_string(),
        amount,
        date: Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap(),
        notes: None,
    }
}

pub fn shares(pairs: &[(&str, f64)]) -> Vec<ShareEntry> {
    pairs
        .iter()
        .map(|(user_id, value)| ShareEntry {
            user_id: user_id.to_string(),
            value: *value,
        })
        .collect()
}

pub fn percentages(pairs: &[(&str, f64)]) -> SplitPolicy {
    SplitPolicy::Percentages { shares: shares(pairs) }
}

pub fn fixed_amounts(pairs: &[(&str, f64)]) -> SplitPolicy {
    SplitPolicy::FixedAmounts { shares: shares(pairs) }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {} to be within tolerance of {}",
        actual,
        expected
    );
}
