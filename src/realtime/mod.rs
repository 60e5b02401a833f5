pub mod hub;
pub mod ws_session;

pub use hub::{RealtimeEvent, RealtimeHub};
