//! Text clean-up applied before line scanning.

use regex::Regex;

use super::rules::patterns::{PAGE_FOOTER, TABLE_HEADER};

/// Move page footers and the fused table header onto their own lines.
///
/// The text extractor glues the footer of one page and the column header of
/// the next onto the neighbouring product rows, which would otherwise hide
/// those rows from the classifier. Text that is already on its own line is
/// left untouched, so line numbers of clean input do not move.
pub fn split_fused_lines(text: &str) -> String {
    let text = isolate(text, &PAGE_FOOTER);
    isolate(&text, &TABLE_HEADER)
}

fn isolate(text: &str, pattern: &Regex) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = 0;

    for m in pattern.find_iter(text) {
        out.push_str(text[rest..m.start()].trim_end_matches(' '));
        if !current_line(&out).trim().is_empty() {
            out.push('\n');
        }
        out.push_str(m.as_str());

        rest = m.end();
        let tail = &text[rest..];
        let tail_line = tail.split('\n').next().unwrap_or("");
        if !tail_line.trim().is_empty() {
            out.push('\n');
            rest += tail.len() - tail.trim_start_matches(' ').len();
        }
    }

    out.push_str(&text[rest..]);
    out
}

fn current_line(text: &str) -> &str {
    text.rsplit('\n').next().unwrap_or("")
}

/// Join per-page text with `=== PAGE n ===` markers (1-based).
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut out = String::new();
    for (index, page) in pages.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(&format!("=== PAGE {} ===\n", index + 1));
        out.push_str(page.as_ref().trim_end());
    }
    out
}
