//! Line-oriented building blocks rendered inside the dashboard panels.

pub mod distribution;
pub mod heatmap;
pub mod sidebar;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Fit `text` into `width` terminal columns, ending with `…` when cut, and
/// pad the result with spaces to exactly `width` columns.
pub fn fit_width(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    if text.width() <= width {
        out.push_str(text);
    } else {
        let mut used = 0;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w > width - 1 {
                break;
            }
            out.push(ch);
            used += w;
        }
        out.push('…');
    }
    let pad = width.saturating_sub(out.width());
    out.push_str(&" ".repeat(pad));
    out
}
