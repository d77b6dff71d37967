//! Time entries produced by the stopwatch, and an immutable log of them.
//!
//! [`TimeEntryLog`] never mutates in place: every update returns a new log,
//! leaving the previous snapshot intact for the caller.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A finalized record of tracked work. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntryRecord {
    id: Uuid,
    project: String,
    task: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    duration_secs: u64,
    notes: String,
    tags: BTreeSet<String>,
}

impl TimeEntryRecord {
    /// Build a record spanning `duration_secs` from `start`.
    ///
    /// Tags are trimmed, blanks dropped and duplicates collapsed.
    pub fn new<I, S>(
        project: impl Into<String>,
        task: impl Into<String>,
        start: DateTime<Utc>,
        duration_secs: u64,
        notes: impl Into<String>,
        tags: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let end = i64::try_from(duration_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|d| start.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            id: Uuid::new_v4(),
            project: project.into(),
            task: task.into(),
            start,
            end,
            duration_secs,
            notes: notes.into(),
            tags: normalize_tags(tags),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Calendar day (UTC) the entry started on.
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }
}

fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Date,
    Duration,
    Project,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Criteria for [`TimeEntryLog::filter`]. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    /// Case-insensitive substring of task, project or notes.
    pub search: Option<String>,
    pub project: Option<String>,
    /// Matches entries carrying any of these tags.
    pub tags: Vec<String>,
    /// Inclusive on both ends.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &TimeEntryRecord) -> bool {
        if let Some(query) = self.search.as_deref().filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            let hit = [entry.task(), entry.project(), entry.notes()]
                .iter()
                .any(|field| field.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }
        if let Some(project) = &self.project {
            if entry.project() != project {
                return false;
            }
        }
        if !self.tags.is_empty() && !self.tags.iter().any(|t| entry.tags().contains(t)) {
            return false;
        }
        if let Some((from, to)) = self.date_range {
            let date = entry.date();
            if date < from || date > to {
                return false;
            }
        }
        true
    }
}

/// Newest-first collection of committed entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntryLog {
    entries: Vec<TimeEntryRecord>,
}

impl TimeEntryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TimeEntryRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&TimeEntryRecord> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// New log with `entry` at the front.
    pub fn with_entry(&self, entry: TimeEntryRecord) -> Self {
        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        entries.push(entry);
        entries.extend(self.entries.iter().cloned());
        Self { entries }
    }

    /// New log without the entry `id`. Unknown ids yield an identical log.
    pub fn without(&self, id: Uuid) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|e| e.id() != id)
                .cloned()
                .collect(),
        }
    }

    /// New log without any of `ids`.
    pub fn without_all(&self, ids: &[Uuid]) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|e| !ids.contains(&e.id()))
                .cloned()
                .collect(),
        }
    }

    /// New log with the entry sharing `entry`'s id swapped for `entry`.
    pub fn with_replaced(&self, entry: TimeEntryRecord) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|e| {
                    if e.id() == entry.id() {
                        entry.clone()
                    } else {
                        e.clone()
                    }
                })
                .collect(),
        }
    }

    pub fn filter(&self, filter: &EntryFilter) -> Vec<&TimeEntryRecord> {
        self.entries.iter().filter(|e| filter.matches(e)).collect()
    }

    pub fn sorted(&self, key: SortKey, order: SortOrder) -> Vec<&TimeEntryRecord> {
        let mut out: Vec<&TimeEntryRecord> = self.entries.iter().collect();
        out.sort_by(|a, b| {
            let ord = match key {
                SortKey::Date => a.start().cmp(&b.start()),
                SortKey::Duration => a.duration_secs().cmp(&b.duration_secs()),
                SortKey::Project => a.project().cmp(b.project()),
            };
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        out
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.entries.iter().map(|e| e.duration_secs()).sum()
    }

    pub fn by_date(&self) -> BTreeMap<NaiveDate, Vec<&TimeEntryRecord>> {
        let mut groups: BTreeMap<NaiveDate, Vec<&TimeEntryRecord>> = BTreeMap::new();
        for entry in &self.entries {
            groups.entry(entry.date()).or_default().push(entry);
        }
        groups
    }

    /// Distinct project names, sorted.
    pub fn projects(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.entries.iter().map(|e| e.project()).collect();
        set.into_iter().collect()
    }

    /// Distinct tags across all entries, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .entries
            .iter()
            .flat_map(|e| e.tags().iter().map(String::as_str))
            .collect();
        set.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn sample() -> TimeEntryLog {
        TimeEntryLog::new()
            .with_entry(TimeEntryRecord::new(
                "Website Redesign",
                "Homepage wireframes",
                at(1, 9),
                2 * 3600,
                "Completed initial wireframes",
                ["design", "wireframes"],
            ))
            .with_entry(TimeEntryRecord::new(
                "Mobile App",
                "API integration",
                at(1, 13),
                3 * 3600,
                "Connected user authentication endpoints",
                ["api", "backend"],
            ))
            .with_entry(TimeEntryRecord::new(
                "Marketing Campaign",
                "Content creation",
                at(2, 10),
                3600 + 1800,
                "Drafted social media posts",
                ["content", "social"],
            ))
    }

    #[test]
    fn record_end_is_start_plus_duration() {
        let e = TimeEntryRecord::new("P", "T", at(1, 9), 125, "", Vec::<String>::new());
        assert_eq!(e.end() - e.start(), TimeDelta::seconds(125));
        assert_eq!(e.duration_secs(), 125);
    }

    #[test]
    fn oversized_duration_clamps_end() {
        let e = TimeEntryRecord::new("P", "T", at(1, 9), u64::MAX, "", Vec::<String>::new());
        assert_eq!(e.end(), DateTime::<Utc>::MAX_UTC);
        assert_eq!(e.duration_secs(), u64::MAX);

        let past_delta_range = i64::MAX as u64 / 1000 + 1;
        let e = TimeEntryRecord::new("P", "T", at(1, 9), past_delta_range, "", Vec::<String>::new());
        assert_eq!(e.end(), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn tags_are_a_set() {
        let e = TimeEntryRecord::new("P", "T", at(1, 9), 1, "", ["b", " a ", "b", "", "  "]);
        let tags: Vec<&str> = e.tags().iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["a", "b"]);
    }

    #[test]
    fn with_entry_leaves_previous_snapshot_untouched() {
        let before = sample();
        let added = TimeEntryRecord::new("X", "Y", at(3, 8), 60, "", ["z"]);
        let after = before.with_entry(added.clone());
        assert_eq!(before.len(), 3);
        assert_eq!(after.len(), 4);
        assert_eq!(after.entries()[0], added);
    }

    #[test]
    fn without_removes_only_matching_id() {
        let log = sample();
        let id = log.entries()[1].id();
        let trimmed = log.without(id);
        assert_eq!(trimmed.len(), 2);
        assert!(trimmed.get(id).is_none());
        assert_eq!(log.len(), 3);
        assert_eq!(log.without(Uuid::new_v4()), log);
    }

    #[test]
    fn without_all_removes_each_listed_id() {
        let log = sample();
        let ids: Vec<Uuid> = log.entries()[..2].iter().map(|e| e.id()).collect();
        let trimmed = log.without_all(&ids);
        assert_eq!(trimmed.len(), 1);
        assert_eq!(trimmed.entries()[0].project(), "Website Redesign");
    }

    #[test]
    fn with_replaced_swaps_in_place() {
        let log = sample();
        let previous = log.entries()[2].clone();
        let mut replacement = TimeEntryRecord::new(
            previous.project(),
            "Homepage wireframes v2",
            previous.start(),
            previous.duration_secs(),
            previous.notes(),
            previous.tags(),
        );
        replacement.id = previous.id();
        let updated = log.with_replaced(replacement);
        assert_eq!(updated.entries()[2].task(), "Homepage wireframes v2");
        assert_eq!(log.entries()[2].task(), "Homepage wireframes");
    }

    #[test]
    fn filter_by_search_is_case_insensitive_over_notes() {
        let log = sample();
        let f = EntryFilter {
            search: Some("SOCIAL".into()),
            ..EntryFilter::default()
        };
        let hits = log.filter(&f);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].project(), "Marketing Campaign");
    }

    #[test]
    fn filter_by_any_tag_and_date_range() {
        let log = sample();
        let f = EntryFilter {
            tags: vec!["api".into(), "design".into()],
            date_range: Some((at(1, 0).date_naive(), at(1, 0).date_naive())),
            ..EntryFilter::default()
        };
        assert_eq!(log.filter(&f).len(), 2);

        let f = EntryFilter {
            project: Some("Mobile App".into()),
            date_range: Some((at(2, 0).date_naive(), at(5, 0).date_naive())),
            ..EntryFilter::default()
        };
        assert!(log.filter(&f).is_empty());
    }

    #[test]
    fn sorted_by_duration_desc() {
        let log = sample();
        let durations: Vec<u64> = log
            .sorted(SortKey::Duration, SortOrder::Desc)
            .iter()
            .map(|e| e.duration_secs())
            .collect();
        assert_eq!(durations, vec![3 * 3600, 2 * 3600, 5400]);
    }

    #[test]
    fn sorted_by_date_asc_is_chronological() {
        let log = sample();
        let starts: Vec<DateTime<Utc>> = log
            .sorted(SortKey::Date, SortOrder::Asc)
            .iter()
            .map(|e| e.start())
            .collect();
        assert_eq!(starts, vec![at(1, 9), at(1, 13), at(2, 10)]);
    }

    #[test]
    fn aggregates() {
        let log = sample();
        assert_eq!(log.total_duration_secs(), 2 * 3600 + 3 * 3600 + 5400);
        let groups = log.by_date();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&at(1, 0).date_naive()].len(), 2);
        assert_eq!(
            log.projects(),
            vec!["Marketing Campaign", "Mobile App", "Website Redesign"]
        );
        assert_eq!(log.tags().len(), 6);
    }
}
