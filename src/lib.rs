pub mod api;
pub mod auth;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use crate::core::balance::compute_group_balances;
pub use crate::core::errors::SplitEaseError;
pub use crate::core::services::SplitEaseService;
pub use crate::core::split::compute_shares;
pub use infrastructure::logging::in_memory::InMemoryLogging;
pub use infrastructure::storage::in_memory::InMemoryStorage;

#[cfg(test)]
mod tests;
