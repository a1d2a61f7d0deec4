mod exports;
mod progress;
mod styling;
mod summary;
mod tables;

pub use exports::{export_json, FeedReport};
pub use progress::PageProgress;
use styling::{paint, Tone};
pub use summary::print_summary;

/// Prints the `BuildLens` banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        paint(Tone::Brand, "🔍 BuildLens"),
        paint(Tone::Muted, env!("CARGO_PKG_VERSION")),
        paint(Tone::Muted, "CI Build Feed")
    );
}
