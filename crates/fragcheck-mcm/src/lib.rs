//! Client for the McM request-tracking service.
//!
//! Implements [`fragcheck_core::ports::McmClientPort`] over the public REST API.
//! Access is anonymous; no SSO cookie is used.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// McmClient<B> is meant to be used through the McmClientPort trait
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultMcmClient;

// Errors
pub use error::{McmError, McmResult};

// Configuration
pub use config::{DEV_BASE_URL, McmClientConfig, PROD_BASE_URL};
