pub mod auth;
pub mod chat;
pub mod ledger;
pub mod query;
pub mod session;
pub mod user;
