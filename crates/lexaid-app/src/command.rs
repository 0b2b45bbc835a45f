//! Interpretation of one line of REPL input.

/// What a line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free text to submit as a question (possibly blank).
    Ask(String),
    /// Pick a suggested question by 0-based index.
    Suggestion(usize),
    Health,
    Documents,
    Dismiss,
    Help,
    Quit,
    Unknown(String),
}

/// Parse a line. Anything not starting with `/` is a question.
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(name) = trimmed.strip_prefix('/') else {
        return Command::Ask(line.to_string());
    };

    match name {
        "quit" | "exit" => Command::Quit,
        "health" => Command::Health,
        "documents" | "docs" => Command::Documents,
        "dismiss" => Command::Dismiss,
        "help" | "?" => Command::Help,
        other => match other.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Suggestion(n - 1),
            _ => Command::Unknown(trimmed.to_string()),
        },
    }
}
