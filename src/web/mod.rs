//! Web API module for filedrop.
//!
//! This module provides the HTTP surface: the upload, listing and download
//! API, the static pages, and a health check.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
