mod client;
mod error;
mod types;

pub use client::{DEFAULT_API_BASE, HnClient};
pub use error::ApiError;
pub use types::{Comment, Story};
