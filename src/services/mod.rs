pub mod user_service;

pub use user_service::{ServiceError, ServiceResult, UserService};
