pub mod app_error;
pub mod store_error;

pub use app_error::AppError;
pub use store_error::StoreError;
