//! `kj queue` and `kj next`: read-only views.

use kj_core::KjConfig;
use kj_rotation::QueueView;
use kj_store::Entry;

use super::open_rotation;

pub fn queue(config: &KjConfig, format: &str) -> anyhow::Result<()> {
    let view = open_rotation(config)?.queue()?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        _ => {
            print!("{}", format_queue(&view));
        }
    }

    Ok(())
}

pub fn next(config: &KjConfig) -> anyhow::Result<()> {
    match open_rotation(config)?.peek_next()? {
        Some(entry) => println!("Next to call up: {}", entry_label(&entry)),
        None => println!("Nobody is waiting"),
    }
    Ok(())
}

pub fn entry_label(entry: &Entry) -> String {
    format!("{} (round {})", entry.name, entry.round)
}

/// Render the queue as a plain-text table.
pub fn format_queue(view: &QueueView) -> String {
    let mut out = String::new();

    let slot = |entry: &Option<Entry>| entry.as_ref().map(entry_label).unwrap_or_else(|| "—".to_string());
    out.push_str(&format!("Now singing: {}\n", slot(&view.now_singing)));
    out.push_str(&format!("Up next:     {}\n", slot(&view.up_next)));

    if view.waiting.is_empty() {
        out.push_str("\nNobody waiting.\n");
    } else {
        out.push_str(&format!("\nWaiting ({}):\n", view.waiting.len()));
        for (i, entry) in view.waiting.iter().enumerate() {
            out.push_str(&format!("  {:>2}. {}", i + 1, entry_label(entry)));
            if !entry.notes.is_empty() {
                out.push_str(&format!("  [{}]", entry.notes));
            }
            out.push('\n');
        }
    }

    out.push_str(&format!("\n{} of {} done\n", view.done, view.total));
    out
}
