use console::style;

/// Styling helpers for terminal output
pub fn bright_red(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().red()
}

pub fn bright_yellow(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

pub fn bold(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bold()
}
