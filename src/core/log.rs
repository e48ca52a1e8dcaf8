use crate::db::log::{LogEntry, load_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

/// Widest the `operation (target)` column may grow before truncation.
const OP_COL_MAX: usize = 40;

static ANSI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static ANSI pattern"));

fn strip_ansi(s: &str) -> String {
    ANSI_RE.replace_all(s, "").into_owned()
}

/// Colour per audited operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "duty_start" | "ping_resume" => Colour::Green,
        "duty_end" => Colour::Red,
        "shop_visit" => Colour::Cyan,
        "sweep" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        other if other.starts_with("agent_") => Colour::Blue,
        _ => Colour::White,
    }
}

/// `operation (target)`, truncated on visible width.
fn op_label(entry: &LogEntry) -> String {
    let plain = if entry.target.is_empty() {
        entry.operation.clone()
    } else {
        format!("{} ({})", entry.operation, entry.target)
    };

    if plain.chars().count() > OP_COL_MAX {
        let mut s: String = plain.chars().take(OP_COL_MAX - 3).collect();
        s.push_str("...");
        s
    } else {
        plain
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;
        if entries.is_empty() {
            info("Audit log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);
        let op_w = entries
            .iter()
            .map(|e| op_label(e).chars().count())
            .max()
            .unwrap_or(10);

        println!("📜 Audit log:\n");

        for entry in &entries {
            let label = op_label(entry);
            let colour = color_for_operation(&entry.operation);

            // Only the operation word is coloured; padding uses visible width.
            let coloured = match label.split_once(' ') {
                Some((op, rest)) => format!("{} {}", colour.paint(op), rest),
                None => colour.paint(label.as_str()).to_string(),
            };
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&coloured).chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                entry.id,
                entry.date,
                coloured,
                padding,
                entry.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_colour_codes() {
        let painted = Colour::Green.paint("duty_start").to_string();
        assert_eq!(strip_ansi(&painted), "duty_start");
    }

    #[test]
    fn long_labels_are_truncated() {
        let entry = LogEntry {
            id: 1,
            date: "2025-09-01".into(),
            operation: "migration_applied".into(),
            target: "20251020_0002_checkpoint_auto_closed".into(),
            message: String::new(),
        };
        let label = op_label(&entry);
        assert_eq!(label.chars().count(), OP_COL_MAX);
        assert!(label.ends_with("..."));
    }
}
