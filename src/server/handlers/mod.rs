//! HTTP handlers for the server.

pub mod cell;
pub mod config;
pub mod worksheet;
