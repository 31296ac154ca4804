use std::fmt::Write;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub color: String,
    pub label: String,
}

impl LegendEntry {
    pub fn new(color: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            label: label.into(),
        }
    }
}

pub const LEGEND_CLASS: &str = "hydromap-legend";

/// Static legend markup: one swatch row per entry.
pub fn legend_markup(entries: &[LegendEntry]) -> String {
    let mut out = String::with_capacity(64 + entries.len() * 96);
    let _ = write!(out, "<div class=\"{LEGEND_CLASS}\">");
    for entry in entries {
        let _ = write!(
            out,
            "<div class=\"{LEGEND_CLASS}-row\"><i style=\"background:{};display:inline-block;width:14px;height:14px;margin-right:6px;vertical-align:middle;\"></i><span>{}</span></div>",
            escape_html(&sanitize_color(&entry.color)),
            escape_html(&entry.label),
        );
    }
    out.push_str("</div>");
    out
}

/// Keep only characters that can appear in a CSS color value so a caller
/// cannot break out of the style attribute.
fn sanitize_color(color: &str) -> String {
    color
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' '))
        .collect()
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_row_per_entry() {
        let html = legend_markup(&[
            LegendEntry::new("#1f77b4", "Stream"),
            LegendEntry::new("rgb(255, 0, 0)", "Outlet"),
        ]);
        assert_eq!(html.matches("hydromap-legend-row").count(), 2);
        assert!(html.contains("background:#1f77b4;"));
        assert!(html.contains("background:rgb(255, 0, 0);"));
        assert!(html.contains("<span>Outlet</span>"));
    }

    #[test]
    fn empty_legend_is_just_the_frame() {
        assert_eq!(
            legend_markup(&[]),
            "<div class=\"hydromap-legend\"></div>"
        );
    }

    #[test]
    fn escapes_labels_and_colors() {
        let html = legend_markup(&[LegendEntry::new(
            "red;\"><script>",
            "<b>Basin & \"Sub\"</b>",
        )]);
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;Basin &amp; &quot;Sub&quot;&lt;/b&gt;"));
        assert!(html.contains("background:redscript;"));
    }
}
