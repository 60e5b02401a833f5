pub mod funds_request;
pub mod payout_request;
