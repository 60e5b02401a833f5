pub mod filters;
pub mod pagination;
