pub mod ledger;
pub mod notification;
pub mod schedule;
pub mod session;
pub mod user;
