pub mod api;
pub mod auth;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::ReceiptError;
pub use crate::core::services::{ReceiptService, ServiceSettings};

#[cfg(test)]
mod tests;
