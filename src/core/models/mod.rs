pub mod audit;
pub mod balance;
pub mod expense;
pub mod group;
pub mod member;
pub mod payment;
pub mod split;
pub mod user;
