pub mod dto;
pub mod filters;
pub mod handlers;
pub mod models;
pub mod service;

pub use service::{JobService, ServiceError};
