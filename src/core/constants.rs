/// Tolerance for every "is settled", "sums to total" and "sums to 1.0" check.
pub const EPSILON: f64 = 0.001;

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 200;
pub const MAX_NOTES_LENGTH: usize = 500;
pub const MAX_AMOUNT: f64 = 1_000_000.0;

pub const UNKNOWN_USER_NAME: &str = "Unknown User";

// Action names written to the application log
pub const USER_UPSERTED: &str = "USER_UPSERTED";
pub const GROUP_CREATED: &str = "GROUP_CREATED";
pub const MEMBER_INVITED: &str = "MEMBER_INVITED";
pub const GROUP_SETTINGS_UPDATED: &str = "GROUP_SETTINGS_UPDATED";
pub const EXPENSE_ADDED: &str = "EXPENSE_ADDED";
pub const PAYMENT_RECORDED: &str = "PAYMENT_RECORDED";
pub const BALANCES_QUERIED: &str = "BALANCES_QUERIED";
