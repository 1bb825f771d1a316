//! Infrastructure adapters. Implement outbound ports.
//!
//! HTTP server, desktop, filesystem, terminal. Map errors to DomainError.

pub mod desktop;
pub mod http;
pub mod memory;
pub mod persistence;
pub mod ui;
