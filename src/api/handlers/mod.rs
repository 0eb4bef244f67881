//! HTTP request handlers for API endpoints.
//!
//! This module contains all request handlers organized by resource type.

pub mod auth;
pub mod departments;
pub mod employees;
pub mod health;
pub mod roles;
