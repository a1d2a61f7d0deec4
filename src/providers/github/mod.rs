mod client;
mod normalizer;
mod types;


pub use client::GitHubClient;
pub use normalizer::GitHubNormalizer;
