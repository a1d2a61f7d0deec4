//! Normalized CI build feed.
//!
//! Raw ingestion records from the builds API are turned into provider-neutral
//! [`builds::Build`] values and accumulated page by page by
//! [`builds::BuildFetchOrchestrator`].

pub mod api;
pub mod auth;
pub mod builds;
pub mod config;
pub mod error;
pub mod http;
pub mod output;
pub mod providers;

pub use error::{BuildLensError, Result};
