pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;
pub use error::AppError;
pub use services::{AuthService, ClockEngine, LeaveReconciler};
