//! `kj register|start|advance|skip`: operator actions.

use kj_core::KjConfig;
use kj_rotation::{Outcome, QueueView};
use tracing::info;

use super::open_rotation;
use super::queue::entry_label;

pub fn register(config: &KjConfig, name: &str) -> anyhow::Result<()> {
    info!("Registering {} for {}", name.trim(), config.show.name);
    let rotation = open_rotation(config)?;
    let entry = rotation.on_new_registration(name)?;
    println!("✓ Registered {} for round {}", entry.name, entry.round);
    Ok(())
}

pub fn start(config: &KjConfig, force: bool) -> anyhow::Result<()> {
    info!("Starting {} (force: {})", config.show.name, force);
    let rotation = open_rotation(config)?;
    let outcome = rotation.on_start_show(force)?;
    report(&outcome, &rotation.queue()?);
    Ok(())
}

pub fn advance(config: &KjConfig) -> anyhow::Result<()> {
    let rotation = open_rotation(config)?;
    let outcome = rotation.on_advance()?;
    report(&outcome, &rotation.queue()?);
    Ok(())
}

pub fn skip(config: &KjConfig) -> anyhow::Result<()> {
    let rotation = open_rotation(config)?;
    let outcome = rotation.on_skip()?;
    report(&outcome, &rotation.queue()?);
    Ok(())
}

fn report(outcome: &Outcome, view: &QueueView) {
    print!("{}", stage_summary(outcome, view));
}

/// Who is on stage and who is up next after an action.
fn stage_summary(outcome: &Outcome, view: &QueueView) -> String {
    let mut out = String::new();
    if let Some(notice) = outcome.notice {
        out.push_str(&format!("! {notice}\n"));
    }
    match &view.now_singing {
        Some(entry) => out.push_str(&format!("♪ Now singing: {}\n", entry_label(entry))),
        None => out.push_str("♪ Stage is empty\n"),
    }
    if let Some(entry) = &view.up_next {
        out.push_str(&format!("  Up next:     {}\n", entry_label(entry)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kj_rotation::Notice;
    use kj_store::{Entry, EntryId, EntryStatus};

    fn entry(id: u64, name: &str, round: u32, status: EntryStatus) -> Entry {
        Entry {
            id: EntryId(id),
            arrival_time: id * 1_000,
            name: name.to_string(),
            status,
            round,
            notes: String::new(),
        }
    }

    #[test]
    fn summary_shows_stage() {
        let view = QueueView::from_snapshot(&[
            entry(1, "alice", 1, EntryStatus::NowSinging),
            entry(2, "bob", 2, EntryStatus::UpNext),
        ]);
        let summary = stage_summary(&Outcome::default(), &view);
        assert!(summary.contains("Now singing: alice (round 1)"));
        assert!(summary.contains("Up next:     bob (round 2)"));
    }

    #[test]
    fn summary_reports_exhausted_queue() {
        let view = QueueView::from_snapshot(&[entry(1, "alice", 1, EntryStatus::Done)]);
        let outcome = Outcome {
            mutations: Vec::new(),
            notice: Some(Notice::QueueExhausted),
        };
        let summary = stage_summary(&outcome, &view);
        assert!(summary.starts_with("! end of the queue reached"));
        assert!(summary.contains("Stage is empty"));
    }

    #[test]
    fn register_then_start_through_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = KjConfig::default();
        config.store.data_dir = dir.path().to_path_buf();

        register(&config, "alice").unwrap();
        assert!(start(&config, false).is_err());
        register(&config, "bob").unwrap();
        start(&config, false).unwrap();
        advance(&config).unwrap();

        let view = open_rotation(&config).unwrap().queue().unwrap();
        assert_eq!(view.now_singing.map(|e| e.name), Some("bob".to_string()));
        assert_eq!(view.done, 1);
    }
}
