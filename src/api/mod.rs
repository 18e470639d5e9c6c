pub mod health;
pub mod home;
pub mod job;
pub mod validation;
