//! In-memory mood journal.
//!
//! Entries are appended in insertion order and never edited or removed.
//! Rendering reverses that order so the newest entry comes first. The store
//! lives as long as the process; nothing is persisted.

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::sync::Mutex;

/// Timestamp layout used in rendered entries.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The closed set of moods offered by the journal form.
///
/// The log itself stores whatever label it is given; this enum only backs
/// the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Happy,
    Calm,
    Neutral,
    Sad,
    Anxious,
    Angry,
}

impl MoodLabel {
    pub const ALL: [MoodLabel; 6] = [
        MoodLabel::Happy,
        MoodLabel::Calm,
        MoodLabel::Neutral,
        MoodLabel::Sad,
        MoodLabel::Anxious,
        MoodLabel::Angry,
    ];

    pub fn emoji(&self) -> &'static str {
        match self {
            MoodLabel::Happy => "😊",
            MoodLabel::Calm => "😌",
            MoodLabel::Neutral => "😐",
            MoodLabel::Sad => "😔",
            MoodLabel::Anxious => "😰",
            MoodLabel::Angry => "😡",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MoodLabel::Happy => "Happy",
            MoodLabel::Calm => "Calm",
            MoodLabel::Neutral => "Neutral",
            MoodLabel::Sad => "Sad",
            MoodLabel::Anxious => "Anxious",
            MoodLabel::Angry => "Angry",
        }
    }

    /// The label as shown in the form, e.g. `😰 Anxious`.
    pub fn display(&self) -> String {
        format!("{} {}", self.emoji(), self.name())
    }
}

impl std::str::FromStr for MoodLabel {
    type Err = String;

    /// Accepts the display form (`😊 Happy`) or the bare name, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        MoodLabel::ALL
            .into_iter()
            .find(|m| s == m.display() || s.eq_ignore_ascii_case(m.name()))
            .ok_or_else(|| format!("unknown mood: {s}"))
    }
}

/// One journal record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodEntry {
    pub timestamp: NaiveDateTime,
    pub mood: String,
    pub note: String,
}

impl MoodEntry {
    /// `**2024-05-01 09:30**: 😊 Happy - *good day*`
    pub fn display_line(&self) -> String {
        format!(
            "**{}**: {} - *{}*",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.mood,
            self.note
        )
    }
}

/// The rendered journal and its entry count, read under one lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodSnapshot {
    pub rendered: String,
    pub count: usize,
}

/// Append-only, process-lifetime mood store.
///
/// Append and render happen under one lock, so every caller sees a snapshot
/// that includes its own entry.
#[derive(Debug, Default)]
pub struct MoodLog {
    entries: Mutex<Vec<MoodEntry>>,
}

impl MoodLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mood at the current local time and return the rendered log.
    pub fn log(&self, mood: &str, note: &str) -> String {
        self.log_at(mood, note, Local::now().naive_local())
    }

    /// Record a mood at an explicit time and return the rendered log.
    pub fn log_at(&self, mood: &str, note: &str, at: NaiveDateTime) -> String {
        self.log_snapshot_at(mood, note, at).rendered
    }

    /// Record a mood and return the journal together with its new length.
    pub fn log_snapshot(&self, mood: &str, note: &str) -> MoodSnapshot {
        self.log_snapshot_at(mood, note, Local::now().naive_local())
    }

    pub fn log_snapshot_at(&self, mood: &str, note: &str, at: NaiveDateTime) -> MoodSnapshot {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(MoodEntry {
            timestamp: at,
            mood: mood.to_string(),
            note: note.to_string(),
        });
        tracing::debug!(count = entries.len(), "Mood entry appended");
        MoodSnapshot {
            rendered: render_entries(&entries),
            count: entries.len(),
        }
    }

    /// The current journal and entry count.
    pub fn snapshot(&self) -> MoodSnapshot {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        MoodSnapshot {
            rendered: render_entries(&entries),
            count: entries.len(),
        }
    }

    /// Newest-first rendering, entries separated by a blank line.
    /// Empty when nothing has been logged.
    pub fn render(&self) -> String {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        render_entries(&entries)
    }

    /// Snapshot of the entries in insertion order.
    pub fn entries(&self) -> Vec<MoodEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn render_entries(entries: &[MoodEntry]) -> String {
    entries
        .iter()
        .rev()
        .map(MoodEntry::display_line)
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(hour, minute, 59)
            .unwrap()
    }

    #[test]
    fn entry_line_format() {
        let log = MoodLog::new();
        let rendered = log.log_at("😊 Happy", "good day", at(9, 5));
        assert_eq!(rendered, "**2025-03-14 09:05**: 😊 Happy - *good day*");
    }

    #[test]
    fn renders_most_recent_first() {
        let log = MoodLog::new();
        log.log_at("E1", "first", at(8, 0));
        log.log_at("E2", "second", at(9, 0));
        let rendered = log.log_at("E3", "third", at(10, 0));

        let blocks: Vec<&str> = rendered.split("\n\n").collect();
        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].contains("E3"));
        assert!(blocks[1].contains("E2"));
        assert!(blocks[2].contains("E1"));

        // Store itself stays in insertion order
        let stored: Vec<String> = log.entries().into_iter().map(|e| e.mood).collect();
        assert_eq!(stored, vec!["E1", "E2", "E3"]);
    }

    #[test]
    fn happy_then_anxious_example() {
        let log = MoodLog::new();
        log.log_at("😊 Happy", "good day", at(18, 30));
        let rendered = log.log_at("😰 Anxious", "exam tomorrow", at(22, 15));

        assert_eq!(
            rendered,
            "**2025-03-14 22:15**: 😰 Anxious - *exam tomorrow*\n\n\
             **2025-03-14 18:30**: 😊 Happy - *good day*"
        );
    }

    #[test]
    fn never_drops_or_mutates_entries() {
        let log = MoodLog::new();
        log.log_at("😌 Calm", "walk", at(7, 0));
        let first = log.entries()[0].clone();

        for i in 0..9 {
            log.log_at("😐 Neutral", &format!("note {i}"), at(8, i));
        }

        assert_eq!(log.len(), 10);
        assert_eq!(log.entries()[0], first);
    }

    #[test]
    fn accepts_any_label_and_empty_note() {
        let log = MoodLog::new();
        let rendered = log.log_at("meh", "", at(12, 0));
        assert_eq!(rendered, "**2025-03-14 12:00**: meh - **");
    }

    #[test]
    fn empty_log_renders_empty() {
        let log = MoodLog::new();
        assert!(log.is_empty());
        assert_eq!(log.render(), "");
    }

    #[test]
    fn log_uses_current_time() {
        let log = MoodLog::new();
        let before = Local::now().naive_local();
        log.log("😊 Happy", "");
        let stamp = log.entries()[0].timestamp;
        assert!(stamp >= before - chrono::Duration::seconds(1));
    }

    #[test]
    fn concurrent_logging_keeps_every_entry() {
        let log = Arc::new(MoodLog::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let log = log.clone();
                std::thread::spawn(move || {
                    for j in 0..25 {
                        log.log("😐 Neutral", &format!("{i}-{j}"));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(log.len(), 200);
    }

    #[test]
    fn snapshot_count_matches_rendered_blocks() {
        let log = MoodLog::new();
        assert_eq!(
            log.snapshot(),
            MoodSnapshot {
                rendered: String::new(),
                count: 0
            }
        );

        log.log_snapshot_at("😊 Happy", "good day", at(8, 0));
        let snap = log.log_snapshot_at("😰 Anxious", "exam", at(9, 0));
        assert_eq!(snap.count, 2);
        assert_eq!(snap.rendered.split("\n\n").count(), 2);
        assert_eq!(log.snapshot(), snap);
    }

    #[test]
    fn concurrent_snapshots_are_consistent() {
        let log = Arc::new(MoodLog::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let log = log.clone();
                std::thread::spawn(move || {
                    (0..25)
                        .map(|j| log.log_snapshot(&format!("M{i}"), &format!("n{j}")))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            for snap in handle.join().unwrap() {
                assert_eq!(snap.rendered.split("\n\n").count(), snap.count);
            }
        }
        assert_eq!(log.len(), 200);
    }

    #[test]
    fn mood_label_parsing() {
        assert_eq!("😰 Anxious".parse::<MoodLabel>().unwrap(), MoodLabel::Anxious);
        assert_eq!("calm".parse::<MoodLabel>().unwrap(), MoodLabel::Calm);
        assert!("ecstatic".parse::<MoodLabel>().is_err());
        assert_eq!(MoodLabel::Sad.display(), "😔 Sad");
        assert_eq!(MoodLabel::ALL.len(), 6);
    }
}
