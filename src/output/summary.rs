use std::fmt::Write;

use comfy_table::{Cell, Color as TableColor};

use crate::builds::{Build, FeedSnapshot};
use crate::error::BuildLensError;

use super::styling::{paint, Tone};
use super::tables::{create_table, format_duration, status_cell};

const SHORT_SHA_LEN: usize = 7;
const MESSAGE_WIDTH: usize = 60;

/// Prints the build feed to stdout.
///
/// Shows one row per build in feed order, then lists records that were
/// omitted because they could not be normalized.
pub fn print_summary(snapshot: &FeedSnapshot, failures: &[BuildLensError]) {
    println!("{}", render_summary(snapshot, failures));
}

fn create_cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

fn short_sha(build: &Build) -> String {
    build
        .commit_sha
        .as_deref()
        .map(|sha| sha.chars().take(SHORT_SHA_LEN).collect())
        .unwrap_or_else(|| "-".to_string())
}

/// Branch, tag or pull request, whichever identifies the build best.
fn reference(build: &Build) -> String {
    match (&build.tag, build.pr, &build.branch) {
        (Some(tag), _, _) => format!("tag {tag}"),
        (None, Some(pr), _) => format!("PR #{pr}"),
        (None, None, Some(branch)) => branch.clone(),
        (None, None, None) => "-".to_string(),
    }
}

fn first_line(message: Option<&str>) -> String {
    let line = message.and_then(|m| m.lines().next()).unwrap_or("-");
    if line.chars().count() > MESSAGE_WIDTH {
        let truncated: String = line.chars().take(MESSAGE_WIDTH - 1).collect();
        format!("{truncated}…")
    } else {
        line.to_string()
    }
}

fn render_summary(snapshot: &FeedSnapshot, failures: &[BuildLensError]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "📦 {}", paint(Tone::Heading, "Builds"));

    if snapshot.items.is_empty() {
        let _ = writeln!(output, "  {}", paint(Tone::Muted, "No builds found"));
    } else {
        let mut table = create_table();
        table.set_header(create_cyan_header(&[
            "ID", "Status", "Repository", "Ref", "Commit", "Duration", "Message", "Author",
        ]));

        for build in &snapshot.items {
            table.add_row(vec![
                Cell::new(build.id),
                status_cell(build.status),
                Cell::new(&build.repository_name),
                Cell::new(reference(build)),
                Cell::new(short_sha(build)),
                Cell::new(format_duration(build.build_duration_seconds)),
                Cell::new(first_line(build.commit_message.as_deref())),
                Cell::new(build.display_name.as_deref().unwrap_or("-")),
            ]);
        }

        let _ = writeln!(output, "{table}");
    }

    if !failures.is_empty() {
        let _ = writeln!(
            output,
            "\n{} {}",
            paint(Tone::Alert, "⚠"),
            paint(Tone::Alert, format!("{} records omitted", failures.len()))
        );
        for failure in failures {
            let _ = writeln!(output, "  {} {failure}", paint(Tone::Muted, "•"));
        }
    }

    let footer = if snapshot.has_more {
        format!("More builds available from offset {}", snapshot.offset)
    } else {
        "End of feed".to_string()
    };
    let _ = writeln!(output, "\n{}", paint(Tone::Muted, footer));

    output
}
