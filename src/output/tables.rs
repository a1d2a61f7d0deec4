use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::builds::BuildStatus;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn status_cell(status: BuildStatus) -> Cell {
    let cell = Cell::new(status.to_string());
    match status {
        BuildStatus::Passed => cell.fg(TableColor::Green),
        BuildStatus::Failed => cell.fg(TableColor::Red),
        BuildStatus::Running => cell.fg(TableColor::Yellow),
        BuildStatus::Queued => cell.fg(TableColor::DarkGrey),
    }
}

pub fn format_duration(seconds: Option<i64>) -> String {
    match seconds {
        Some(total) if total >= 3600 => {
            format!("{}h {:02}m {:02}s", total / 3600, (total % 3600) / 60, total % 60)
        }
        Some(total) if total >= 60 => format!("{}m {:02}s", total / 60, total % 60),
        Some(total) => format!("{total}s"),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(None), "-");
        assert_eq!(format_duration(Some(42)), "42s");
        assert_eq!(format_duration(Some(125)), "2m 05s");
        assert_eq!(format_duration(Some(3_725)), "1h 02m 05s");
    }
}
