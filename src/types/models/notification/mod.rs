pub mod notification_kind;
pub mod reference_type;

pub use notification_kind::NotificationKind;
pub use reference_type::ReferenceType;
