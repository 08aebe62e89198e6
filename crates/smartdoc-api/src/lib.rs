pub mod client;
pub mod error;
pub mod operations;
pub mod types;

pub use client::{ApiClient, try_v1_then_legacy};
pub use error::{ApiError, ApiResult};
