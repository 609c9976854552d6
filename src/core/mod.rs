pub mod balance;
pub mod constants;
pub mod errors;
pub mod models;
pub mod services;
pub mod settlement;
pub mod split;
