//! Core business logic for hosteldesk.

pub mod invalidation;
pub mod services;

pub use invalidation::ReadModel;
pub use services::*;
