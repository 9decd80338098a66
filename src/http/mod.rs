//! HTTP API for the recommendation service

pub mod handler;
pub mod server;

pub use server::{router, HttpServer, ServerConfig};
