//! HTTP request handlers for API endpoints.

pub mod data_access;
pub mod health;
pub mod register;
