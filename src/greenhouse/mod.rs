pub mod client;
pub mod models;
pub mod slug;

pub use client::{FetchError, GreenhouseClient};
pub use models::{JobPreview, JobRecord, SOURCE};
pub use slug::{resolve, InvalidSlugError};
