use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::builds::{Build, FeedSnapshot};
use crate::error::BuildLensError;

/// Machine-readable view of the fetched feed.
#[derive(Debug, Serialize)]
pub struct FeedReport<'a> {
    pub builds: &'a [Build],
    /// Records omitted from the feed, one message per record
    pub failures: Vec<String>,
    pub has_more: bool,
    pub offset: usize,
}

impl<'a> FeedReport<'a> {
    pub fn new(snapshot: &'a FeedSnapshot, failures: &[BuildLensError]) -> Self {
        Self {
            builds: &snapshot.items,
            failures: failures.iter().map(ToString::to_string).collect(),
            has_more: snapshot.has_more,
            offset: snapshot.offset,
        }
    }
}

/// Writes the feed as JSON followed by a newline.
pub fn export_json(report: &FeedReport<'_>, pretty: bool, output: &mut dyn Write) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    writeln!(output, "{}", json)?;
    Ok(())
}
