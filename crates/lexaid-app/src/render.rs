//! Plain-text rendering of session state for the terminal.

use lexaid_chat::{DocumentList, HealthResponse, Message, Role};

pub const DISCLAIMER: &str = "\
Important legal disclaimer: this tool provides general legal information for
educational purposes only. It is NOT a substitute for professional legal
advice. Laws change frequently and the information may be incomplete, out of
date, or not applicable to your situation. For specific legal matters always
consult a qualified legal professional or official authority.
(Type /dismiss to hide this notice.)";

pub const HELP: &str = "\
Type a question and press Enter.
  /N          ask suggested question N (only before the first question)
  /health     show service status
  /documents  list documents the service has loaded
  /dismiss    hide the disclaimer
  /help       show this help
  /quit       leave";

pub const PENDING_INDICATOR: &str = "Analyzing legal documents...";

/// Render one transcript entry with its citations.
pub fn format_message(msg: &Message) -> String {
    let speaker = match msg.role {
        Role::User => "You",
        Role::Assistant => "Legal Assistant",
    };
    let mut out = format!("{}:\n{}", speaker, msg.content);

    if !msg.sources.is_empty() {
        out.push_str("\n\nSources:");
        for (i, source) in msg.sources.iter().enumerate() {
            out.push_str(&format!(
                "\n  [{}] {} (Page {})\n      \"{}\"",
                i + 1,
                source.source,
                source.page,
                source.snippet
            ));
        }
    }
    out
}

/// Render the welcome prompt with numbered suggestions.
pub fn format_suggestions(questions: &[&str]) -> String {
    let mut out = String::from("Ask me anything about your legal rights in India.");
    if !questions.is_empty() {
        out.push_str("\nTry asking:");
        for (i, q) in questions.iter().enumerate() {
            out.push_str(&format!("\n  /{}  {}", i + 1, q));
        }
    }
    out
}

pub fn format_health(health: &HealthResponse) -> String {
    format!(
        "Service {}: {} ({} documents loaded, model {})",
        health.status,
        health.message,
        health.documents_loaded,
        if health.model_ready { "ready" } else { "not ready" }
    )
}

pub fn format_documents(list: &DocumentList) -> String {
    if list.documents.is_empty() {
        return "No documents loaded.".to_string();
    }
    let mut out = format!("{} document(s):", list.documents.len());
    for doc in &list.documents {
        out.push_str(&format!(
            "\n  {}  ({} KB, modified {})",
            doc.name,
            doc.size.div_ceil(1024),
            doc.modified
        ));
    }
    out
}
