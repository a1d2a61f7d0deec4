use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{paint, Tone};

/// Spinner shown on stderr while a page is being fetched and normalized
pub struct PageProgress {
    pb: ProgressBar,
    page: usize,
}

impl PageProgress {
    pub fn start(page: usize, offset: usize) -> Self {
        let pb = create_spinner(
            paint(Tone::Pending, format!("Page {page}: fetching builds from offset {offset}")).to_string(),
        );
        Self { pb, page }
    }

    pub fn finish(self, appended: usize, omitted: usize) {
        let message = if omitted == 0 {
            format!("Page {}: {appended} builds ✓", self.page)
        } else {
            format!("Page {}: {appended} builds, {omitted} omitted ✓", self.page)
        };
        self.pb.finish_with_message(paint(Tone::Done, message).to_string());
    }

    pub fn fail(self) {
        self.pb
            .finish_with_message(paint(Tone::Alert, format!("Page {}: fetch failed ✗", self.page)).to_string());
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::default_spinner().template("  {msg} {spinner}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
