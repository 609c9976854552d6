use super::*;
use crate::core::split::{MalformedSplit, allocate, compute_shares, validate_policy};

#[test]
fn test_equal_split_covers_every_member() {
    let group = group_with(SplitPolicy::Equal);
    let members = members(&["a", "b", "c"]);
    let shares = compute_shares(&expense("e1", 90.0, "a", None), &members, &group);

    assert_eq!(shares.len(), 3);
    for id in ["a", "b", "c"] {
        assert_close(shares[id], 30.0);
    }
}

#[test]
fn test_equal_split_sums_to_amount_for_uneven_division() {
    let group = group_with(SplitPolicy::Equal);
    let members = members(&["a", "b", "c"]);
    let shares = compute_shares(&expense("e1", 100.0, "a", None), &members, &group);

    assert_close(shares.values().sum(), 100.0);
}

#[test]
fn test_percentage_override() {
    let group = group_with(SplitPolicy::Equal);
    let members = members(&["a", "b", "c"]);
    let config = percentages(&[("a", 0.5), ("b", 0.3), ("c", 0.2)]);
    let allocation = allocate(&expense("e1", 100.0, "b", Some(config)), &members, &group);

    assert!(allocation.fallback.is_none());
    assert_close(allocation.shares["a"], 50.0);
    assert_close(allocation.shares["b"], 30.0);
    assert_close(allocation.shares["c"], 20.0);
    assert_close(allocation.shares.values().sum(), 100.0);
}

#[test]
fn test_group_default_percentages_apply_without_override() {
    let group = group_with(percentages(&[("a", 0.25), ("b", 0.75)]));
    let members = members(&["a", "b"]);
    let shares = compute_shares(&expense("e1", 40.0, "a", None), &members, &group);

    assert_close(shares["a"], 10.0);
    assert_close(shares["b"], 30.0);
}

#[test]
fn test_member_without_percentage_gets_zero() {
    // "c" joined after the percentages were fixed
    let group = group_with(percentages(&[("a", 0.5), ("b", 0.5)]));
    let members = members(&["a", "b", "c"]);
    let shares = compute_shares(&expense("e1", 60.0, "a", None), &members, &group);

    assert_eq!(shares.len(), 3);
    assert_close(shares["c"], 0.0);
    assert_close(shares["a"], 30.0);
}

#[test]
fn test_percentages_for_non_members_are_dropped() {
    let group = group_with(SplitPolicy::Equal);
    let members = members(&["a", "b"]);
    let config = percentages(&[("a", 0.5), ("b", 0.3), ("gone", 0.2)]);
    let shares = compute_shares(&expense("e1", 100.0, "a", Some(config)), &members, &group);

    assert_eq!(shares.len(), 2);
    assert!(!shares.contains_key("gone"));
    assert_close(shares["a"], 50.0);
    assert_close(shares["b"], 30.0);
}

#[test]
fn test_fixed_amounts_are_exact() {
    let group = group_with(SplitPolicy::Equal);
    let members = members(&["a", "b", "c"]);
    let config = fixed_amounts(&[("a", 12.5), ("c", 37.5)]);
    let shares = compute_shares(&expense("e1", 50.0, "b", Some(config)), &members, &group);

    assert_eq!(shares["a"], 12.5);
    assert_eq!(shares["b"], 0.0);
    assert_eq!(shares["c"], 37.5);
    assert_eq!(shares.values().sum::<f64>(), 50.0);
}

#[test]
fn test_percentages_not_summing_to_one_fall_back_to_equal() {
    let group = group_with(SplitPolicy::Equal);
    let members = members(&["a", "b", "c"]);
    let config = percentages(&[("a", 0.5), ("b", 0.3)]);
    let allocation = allocate(&expense("e1", 90.0, "a", Some(config)), &members, &group);

    assert!(matches!(allocation.fallback, Some(MalformedSplit::PercentagesTotal(_))));
    for id in ["a", "b", "c"] {
        assert_close(allocation.shares[id], 30.0);
    }
}

#[test]
fn test_percentages_without_shares_fall_back_to_equal() {
    let group = group_with(SplitPolicy::Equal);
    let members = members(&["a", "b"]);
    let allocation = allocate(
        &expense("e1", 10.0, "a", Some(SplitPolicy::Percentages { shares: vec![] })),
        &members,
        &group,
    );

    assert_eq!(allocation.fallback, Some(MalformedSplit::EmptyShares("PERCENTAGES")));
    assert_close(allocation.shares["a"], 5.0);
    assert_close(allocation.shares["b"], 5.0);
}

#[test]
fn test_fixed_amounts_with_wrong_total_fall_back_to_equal() {
    let group = group_with(SplitPolicy::Equal);
    let members = members(&["a", "b"]);
    let config = fixed_amounts(&[("a", 10.0), ("b", 5.0)]);
    let allocation = allocate(&expense("e1", 20.0, "a", Some(config)), &members, &group);

    assert!(matches!(
        allocation.fallback,
        Some(MalformedSplit::FixedAmountsTotal { .. })
    ));
    assert_close(allocation.shares["a"], 10.0);
    assert_close(allocation.shares["b"], 10.0);
}

#[test]
fn test_fixed_amounts_as_group_default_fall_back_to_equal() {
    let group = group_with(fixed_amounts(&[("a", 10.0)]));
    let members = members(&["a", "b"]);
    let allocation = allocate(&expense("e1", 10.0, "a", None), &members, &group);

    assert_eq!(allocation.fallback, Some(MalformedSplit::FixedAmountsAsDefault));
    assert_close(allocation.shares["b"], 5.0);
}

#[test]
fn test_unknown_policy_tag_splits_equally() {
    let policy: SplitPolicy = serde_json::from_str(r#"{"type":"BY_WEIGHT","weights":[1,2]}"#).unwrap();
    assert_eq!(policy, SplitPolicy::Unknown);

    let group = group_with(SplitPolicy::Equal);
    let members = members(&["a", "b"]);
    let allocation = allocate(&expense("e1", 8.0, "a", Some(policy)), &members, &group);

    assert_eq!(allocation.fallback, Some(MalformedSplit::UnknownPolicy));
    assert_close(allocation.shares["a"], 4.0);
}

#[test]
fn test_percentages_missing_share_list_deserializes_as_empty() {
    let policy: SplitPolicy = serde_json::from_str(r#"{"type":"PERCENTAGES"}"#).unwrap();
    assert_eq!(policy, SplitPolicy::Percentages { shares: vec![] });
}

#[test]
fn test_negative_share_is_rejected() {
    let result = validate_policy(&percentages(&[("a", 1.5), ("b", -0.5)]), 1.0, true);
    assert_eq!(result, Err(MalformedSplit::InvalidValue("b".to_string())));
}

#[test]
fn test_percentages_within_tolerance_are_accepted() {
    let policy = percentages(&[("a", 0.3333), ("b", 0.3333), ("c", 0.3334)]);
    assert!(validate_policy(&policy, 1.0, false).is_ok());
    assert!(validate_policy(&percentages(&[("a", 0.5), ("b", 0.498)]), 1.0, false).is_err());
}

#[test]
fn test_no_members_yields_no_shares() {
    let group = group_with(SplitPolicy::Equal);
    let shares = compute_shares(&expense("e1", 10.0, "a", None), &[], &group);
    assert!(shares.is_empty());
}

#[test]
fn test_compute_shares_is_deterministic() {
    let group = group_with(percentages(&[("a", 0.2), ("b", 0.8)]));
    let members = members(&["a", "b", "c"]);
    let e = expense("e1", 33.0, "c", None);

    assert_eq!(compute_shares(&e, &members, &group), compute_shares(&e, &members, &group));
}
