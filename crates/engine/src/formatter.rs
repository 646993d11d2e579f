//! Message formatter — renders a batch of new victims as one Telegram
//! Markdown message.

use serde_json::Value;

use leakwatch_common::types::VictimRecord;

use crate::recency::timestamp_prefix;

/// Messages longer than this are truncated (Telegram caps at ~4096).
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Characters kept when a message is truncated.
pub const TRUNCATED_LEN: usize = 3990;

/// Appended after a truncated message.
pub const TRUNCATION_MARKER: &str = "\n…(truncated)";

/// Longest description rendered per victim.
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// Rendered for fields the feed left empty.
const PLACEHOLDER: &str = "—";

/// Characters that open an entity in Telegram's legacy Markdown.
const MARKDOWN_METACHARS: [char; 4] = ['_', '*', '`', '['];

/// Build the notification for `records` discovered in `region_name`.
pub fn build_message(region_name: &str, records: &[VictimRecord]) -> String {
    let mut msg = format!(
        "\u{1F4E2} {}\n*Total:* {}\n\n",
        bold(&format!("New Ransomware Victims in {region_name}")),
        records.len()
    );

    for record in records {
        push_record(&mut msg, record);
    }

    truncate_message(msg)
}

fn push_record(msg: &mut String, record: &VictimRecord) {
    let company = record.post_title.as_deref().unwrap_or("Unknown");
    let activity = record.activity.as_deref().unwrap_or(PLACEHOLDER);
    let group = record.group_name.as_deref().unwrap_or(PLACEHOLDER);
    let discovered = record.discovered.as_deref().map(timestamp_prefix).unwrap_or("");
    let published = record.published.as_deref().map(timestamp_prefix).unwrap_or("");
    let post_url = record.post_url.as_deref().map(str::trim).unwrap_or("");
    let description = record
        .description
        .as_deref()
        .map(|d| take_chars(d, DESCRIPTION_MAX_CHARS))
        .unwrap_or("No description");

    msg.push_str(&format!("\u{1F538} {} ({})\n", bold(company), escape_markdown(activity)));
    msg.push_str(&format!("• Ransom Group: {}\n", code(group)));
    msg.push_str(&format!("• Discovered: {}\n", code(discovered)));
    if !published.is_empty() {
        msg.push_str(&format!("• Published: {}\n", code(published)));
    }
    if !post_url.is_empty() {
        msg.push_str(&format!("• DataLeakSite URL: [Click Here]({})\n", post_url));
    }
    if let Some(website) = record.website.as_deref()
        && !website.is_empty()
        && website != PLACEHOLDER
    {
        msg.push_str(&format!("• Website: {}\n", escape_markdown(website)));
    }
    if !record.duplicates.is_empty() {
        msg.push_str(&format!("• {} duplicate(s)\n", record.duplicates.len()));
    }
    msg.push_str(&format!(
        "• Leak Size: {}\n",
        escape_markdown(&leak_size(record.extrainfos.as_ref()))
    ));
    msg.push_str(&format!("• Description: {}...\n\n", escape_markdown(description)));
}

/// Backslash-escape entity delimiters in text outside any entity.
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if MARKDOWN_METACHARS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Render `text` in bold.
///
/// Escapes are not allowed inside an entity, so the bold run is closed
/// before each delimiter and reopened after it.
fn bold(text: &str) -> String {
    fn flush(out: &mut String, run: &mut String) {
        if !run.is_empty() {
            out.push('*');
            out.push_str(run);
            out.push('*');
            run.clear();
        }
    }

    let mut out = String::with_capacity(text.len() + 2);
    let mut run = String::new();
    for ch in text.chars() {
        if MARKDOWN_METACHARS.contains(&ch) {
            flush(&mut out, &mut run);
            out.push('\\');
            out.push(ch);
        } else {
            run.push(ch);
        }
    }
    flush(&mut out, &mut run);
    out
}

/// Render `text` as inline code; a backtick would end the entity early.
fn code(text: &str) -> String {
    format!("`{}`", text.replace('`', "'"))
}

/// Extract the leak size from the `extrainfos` block.
///
/// Object form reads its `size` key; list form uses the first object element
/// that has one.
pub fn leak_size(extrainfos: Option<&Value>) -> String {
    let size = match extrainfos {
        Some(Value::Object(map)) => map.get("size"),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .find_map(|item| item.get("size")),
        _ => None,
    };

    match size {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => PLACEHOLDER.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Cut `msg` to `TRUNCATED_LEN` characters plus the marker when it exceeds
/// `MAX_MESSAGE_CHARS`. Record blocks may be cut mid-line.
pub fn truncate_message(msg: String) -> String {
    if msg.chars().count() <= MAX_MESSAGE_CHARS {
        return msg;
    }

    let mut truncated = take_chars(&msg, TRUNCATED_LEN).to_string();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
