/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

use crate::models::checkpoint::CheckpointKind;
use crate::models::duty_status::DutyStatus;

pub fn paint(color: &str, text: &str) -> String {
    format!("{color}{text}{RESET}")
}

pub fn color_for_status(status: DutyStatus) -> &'static str {
    match status {
        DutyStatus::OnDuty => GREEN,
        DutyStatus::OffDuty => GREY,
    }
}

pub fn color_for_kind(kind: CheckpointKind) -> &'static str {
    match kind {
        CheckpointKind::DutyStart => GREEN,
        CheckpointKind::DutyEnd => RED,
        CheckpointKind::ShopVisit => CYAN,
    }
}

/// Printable width of a string that may contain ANSI colour codes.
pub fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in s.chars() {
        match (in_escape, c) {
            (false, '\x1b') => in_escape = true,
            (true, 'm') | (true, 'K') => in_escape = false,
            (true, _) => {}
            (false, _) => width += 1,
        }
    }
    width
}
