use std::fmt::Display;

use console::{style, StyledObject};

/// Terminal tones used across the feed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Banner title
    Brand,
    /// Section headings
    Heading,
    /// Work in progress
    Pending,
    /// Completed work
    Done,
    /// Failures and omitted records
    Alert,
    /// Secondary details
    Muted,
}

pub fn paint(tone: Tone, text: impl Display) -> StyledObject<String> {
    let styled = style(text.to_string());
    match tone {
        Tone::Brand => styled.magenta().bold(),
        Tone::Heading => styled.bright().underlined(),
        Tone::Pending => styled.bright().yellow(),
        Tone::Done => styled.bright().green(),
        Tone::Alert => styled.bright().red(),
        Tone::Muted => styled.dim(),
    }
}
