//! Canonical build model and the pipeline that produces it.

pub mod builder;
pub mod duration;
pub mod identity;
pub mod orchestrator;
pub mod status;
pub mod types;

pub use builder::BuildAggregateBuilder;
pub use orchestrator::{BuildFetchOrchestrator, BuildSource, FeedSnapshot, FetchOutcome, PageRequest};
pub use types::{Build, BuildFilter, BuildStatus};
