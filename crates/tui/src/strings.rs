// Centralized UI strings and labels. ASCII-friendly by default.

use unicode_width::UnicodeWidthStr;

// UI block titles (keep surrounding spaces for visual padding)
pub const TITLE_CONSOLE: &str = " Console ";
pub const TITLE_INPUT: &str = " Input ";
pub const TITLE_INPUT_DISABLED: &str = " Input (disabled) ";
pub const TITLE_HELP: &str = " Help / Keys ";

pub const INPUT_HINT: &str = "Type a line, Enter to submit; Up/Down for history";
pub const HIDDEN_NOTICE: &str = "Console hidden - component stopped. Press F2 to start.";

// Error lines carry this prefix end to end; the UI only styles it.
pub const ERROR_PREFIX: &str = "ERROR: ";

pub fn follow_label(behind: usize) -> String {
    if behind == 0 {
        "Follow".to_string()
    } else {
        format!("+{behind} lines")
    }
}

pub fn watch_label(watch: Option<u16>) -> String {
    match watch {
        Some(id) => id.to_string(),
        None => "all".to_string(),
    }
}

// Build the status bar line with width-aware compaction: segments are
// appended until the width budget runs out.
pub fn build_status_line(
    follow: &str,
    running: bool,
    history_len: usize,
    observers: usize,
    queue_depth: Option<usize>,
    watch: &str,
    max_width: u16,
) -> String {
    let mut segments: Vec<String> = Vec::new();
    segments.push(format!(
        "[{}][{}]",
        if running { "running" } else { "stopped" },
        follow
    ));
    segments.push(format!("Hist:{history_len}"));
    segments.push(format!("Obs:{observers}"));
    if let Some(depth) = queue_depth {
        segments.push(format!("Queue:{depth}"));
    }
    segments.push(format!("Watch:{watch}"));

    // Hints ordered by importance; appended if space allows.
    let hints: [&str; 5] = [
        "Enter: submit; Up/Down: history",
        "PgUp/PgDn: scroll",
        "Ctrl+L: clear",
        "F2: start/stop",
        "F1: help",
    ];
    for h in hints {
        segments.push(h.to_string());
    }

    let sep = "  |  ";
    let mut out = String::new();
    let mut used = 0usize;
    for (i, seg) in segments.iter().enumerate() {
        let segw = UnicodeWidthStr::width(seg.as_str());
        let addw = segw
            + if i == 0 {
                0
            } else {
                UnicodeWidthStr::width(sep)
            };
        if used + addw > max_width as usize {
            break;
        }
        if i > 0 {
            out.push_str(sep);
            used += UnicodeWidthStr::width(sep);
        }
        out.push_str(seg);
        used += segw;
    }
    out
}

pub fn help_lines() -> &'static [&'static str] {
    &[
        "Input",
        "  Enter: submit    Up/Down: history    Esc/Ctrl-C: quit",
        "  Left/Right: move    Ctrl+Left/Right: word    Home/End or Ctrl+A/E: line ends",
        "  Backspace/Delete: delete    Ctrl+W: delete word    Ctrl+U/K: kill to start/end",
        "Output",
        "  PgUp/PgDn: page    Ctrl+Up/Down: line    Ctrl+Home/End: top/bottom",
        "  Mouse wheel: scroll    Ctrl+L or /clear: clear    Follows new lines at the bottom",
        "Component",
        "  F2 or /start, /stop: lifecycle    /emit <id> <text>: inject an inbound event",
        "Help",
        "  F1 or /help: open    Esc: close",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_respects_the_width_budget() {
        let full = build_status_line("Follow", true, 3, 2, Some(1), "all", 200);
        assert!(full.starts_with("[running][Follow]"));
        assert!(full.contains("Queue:1"));

        let narrow = build_status_line("Follow", true, 3, 2, Some(1), "all", 20);
        assert!(narrow.len() <= 20);
        assert!(narrow.starts_with("[running][Follow]"));
    }

    #[test]
    fn follow_label_reports_backlog_distance() {
        assert_eq!(follow_label(0), "Follow");
        assert_eq!(follow_label(12), "+12 lines");
    }
}
