use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One (member, value) pair of a split policy. `value` is a fraction in
/// `[0, 1]` for percentages and a currency amount for fixed amounts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ShareEntry {
    pub user_id: String,
    pub value: f64,
}

/// How an expense amount divides across group members.
///
/// Attached to a group as its default, or to an expense as an override.
/// `FIXED_AMOUNTS` only makes sense on an expense. Tags that are not
/// recognised deserialize into [`SplitPolicy::Unknown`] and are split equally.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitPolicy {
    #[default]
    Equal,
    Percentages {
        #[serde(default)]
        shares: Vec<ShareEntry>,
    },
    FixedAmounts {
        #[serde(default)]
        shares: Vec<ShareEntry>,
    },
    #[serde(other)]
    Unknown,
}

impl SplitPolicy {
    pub fn kind(&self) -> &'static str {
        match self {
            SplitPolicy::Equal => "EQUAL",
            SplitPolicy::Percentages { .. } => "PERCENTAGES",
            SplitPolicy::FixedAmounts { .. } => "FIXED_AMOUNTS",
            SplitPolicy::Unknown => "UNKNOWN",
        }
    }

    pub fn shares(&self) -> &[ShareEntry] {
        match self {
            SplitPolicy::Percentages { shares } | SplitPolicy::FixedAmounts { shares } => shares,
            SplitPolicy::Equal | SplitPolicy::Unknown => &[],
        }
    }
}
