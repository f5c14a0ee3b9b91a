//! Server-rendered HTML pages

use std::fmt::Write;

use axum::http::StatusCode;

use crate::dedupe::{LibraryReport, LibrarySection, RankedGroup, ScoredMedia};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 72rem; color: #1f2933; }
a { color: #5b21b6; }
table { border-collapse: collapse; width: 100%; margin-bottom: 1.5rem; }
th, td { text-align: left; padding: 0.35rem 0.6rem; border-bottom: 1px solid #e4e7eb; }
td.score { font-variant-numeric: tabular-nums; }
tr.keep { background: #ecfdf5; }
.file { font-family: ui-monospace, monospace; font-size: 0.85rem; word-break: break-all; }
.muted { color: #7b8794; font-size: 0.85rem; }
button { background: #b91c1c; color: white; border: 0; padding: 0.3rem 0.7rem; border-radius: 4px; cursor: pointer; }
"#;

/// Escape text for HTML element content and quoted attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Human readable byte count
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.2} {}", UNITS[unit])
    }
}

fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.2}")
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        title = escape(title),
    )
}

pub fn index_page(sections: &[LibrarySection]) -> String {
    let mut body = String::from("<h1>Libraries</h1>\n");
    if sections.is_empty() {
        body.push_str("<p class=\"muted\">The server has no library sections.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for section in sections {
            let _ = writeln!(
                body,
                "<li><a href=\"/library/{}\">{}</a> <span class=\"muted\">{}</span></li>",
                section.index,
                escape(&section.title),
                escape(&section.kind),
            );
        }
        body.push_str("</ul>\n");
    }
    layout("Libraries", &body)
}

pub fn library_page(report: &LibraryReport) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<p><a href=\"/\">&larr; Libraries</a></p>\n<h1>{}</h1>",
        escape(&report.section.title)
    );
    let _ = writeln!(
        body,
        "<p class=\"muted\">{} items, {} duplicate groups, {} removable versions ({})</p>",
        report.item_count,
        report.groups.len(),
        report.removable_count(),
        format_size(report.reclaimable_bytes()),
    );

    if report.groups.is_empty() {
        body.push_str("<p>No duplicates found.</p>\n");
    }
    for group in &report.groups {
        render_group(&mut body, group, report.section.index);
    }

    layout(&report.section.title, &body)
}

fn render_group(body: &mut String, group: &RankedGroup, library: usize) {
    let _ = writeln!(body, "<h2>{}</h2>", escape(&group.label));
    body.push_str(
        "<table>\n<tr><th>File</th><th>Audio</th><th>Video</th><th>Resolution</th>\
         <th>Size</th><th>Score</th><th></th></tr>\n",
    );
    if let Some(best) = group.keep() {
        render_entry(body, best, true, library);
    }
    for entry in group.removable() {
        render_entry(body, entry, false, library);
    }
    body.push_str("</table>\n");
}

fn render_entry(body: &mut String, entry: &ScoredMedia, keep: bool, library: usize) {
    let media = &entry.media;
    let matched = if entry.breakdown.matched_patterns.is_empty() {
        String::new()
    } else {
        format!(
            "<br><span class=\"muted\">matched: {}</span>",
            escape(&entry.breakdown.matched_patterns.join(", "))
        )
    };
    let action = if keep {
        "<strong>keep</strong>".to_string()
    } else {
        format!(
            "<form method=\"post\" action=\"/delete\">\
             <input type=\"hidden\" name=\"item_id\" value=\"{}\">\
             <input type=\"hidden\" name=\"media_id\" value=\"{}\">\
             <input type=\"hidden\" name=\"library\" value=\"{}\">\
             <button type=\"submit\">Delete</button></form>",
            escape(&media.item_key),
            escape(&media.id),
            library,
        )
    };

    let _ = writeln!(
        body,
        "<tr{}><td class=\"file\">{}{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
         <td class=\"score\">{}</td><td>{}</td></tr>",
        if keep { " class=\"keep\"" } else { "" },
        escape(media.file.as_deref().unwrap_or("")),
        matched,
        escape(&media.audio_codec),
        escape(&media.video_codec),
        escape(&media.video_resolution),
        format_size(media.size),
        format_score(entry.score),
        action,
    );
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to libraries</a></p>\n",
        escape(title),
        escape(message),
    );
    layout(title, &body)
}
