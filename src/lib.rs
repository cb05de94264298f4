//! vhttpd - static file server with virtual hosts
//!
//! Core library for the HTTP engine, configuration and listener.

pub mod config;
pub mod http;
pub mod server;
