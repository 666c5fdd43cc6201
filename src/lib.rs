//! Route guide - a location-based feature service.
//!
//! Demonstrates the four RPC interaction shapes over a small in-memory
//! dataset:
//! - `GetFeature`: single request, single response
//! - `ListFeatures`: single request, streamed response
//! - `RecordRoute`: streamed request, single response
//! - `RouteChat`: streamed request and response

pub mod client;
pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod server;
pub mod service;
pub mod store;
pub mod wire;

pub use error::RpcError;
pub use service::RouteGuideService;
