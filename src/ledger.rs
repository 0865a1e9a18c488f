use crate::domain::StudyMode;
use crate::persistence::{get_typed, set_typed, KeyValueStore, KEY_STUDY_DATA};
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Date key format used throughout the persisted documents
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a date the way the store keys it
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// date -> subject -> accumulated seconds
type DatedSubjects = BTreeMap<String, BTreeMap<String, u64>>;
/// date -> hour-of-day ("0".."23") -> accumulated seconds
type DatedHours = BTreeMap<String, BTreeMap<String, u64>>;

/// One user's dated accumulators, persisted verbatim under `studyData`.
/// The hourly map is mode-agnostic; both maps are stamped with the date and
/// hour current at each tick, so their per-day sums can disagree around
/// midnight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserLedger {
    #[serde(default)]
    pub normal: DatedSubjects,
    #[serde(default)]
    pub focus: DatedSubjects,
    #[serde(default)]
    pub hourly: DatedHours,
}

impl UserLedger {
    fn mode_map(&self, mode: StudyMode) -> &DatedSubjects {
        match mode {
            StudyMode::Normal => &self.normal,
            StudyMode::Focus => &self.focus,
        }
    }

    fn mode_map_mut(&mut self, mode: StudyMode) -> &mut DatedSubjects {
        match mode {
            StudyMode::Normal => &mut self.normal,
            StudyMode::Focus => &mut self.focus,
        }
    }

    fn mode_seconds(&self, mode: StudyMode, date: &str) -> u64 {
        self.mode_map(mode)
            .get(date)
            .map(|subjects| subjects.values().sum())
            .unwrap_or(0)
    }
}

/// The full `studyData` document: user id -> that user's ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyData(BTreeMap<String, UserLedger>);

/// Per-day time summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DaySummary {
    pub total_seconds: u64,
    pub focus_seconds: u64,
    pub normal_seconds: u64,
}

/// One slice of the per-subject distribution for a day
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectShare {
    pub subject: String,
    pub seconds: u64,
    /// Share of the day's total, in 0.0..=1.0
    pub fraction: f64,
}

/// Display unit for the hourly series, chosen from the day's peak value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayUnit {
    Seconds,
    Minutes,
    Hours,
}

impl DisplayUnit {
    /// Pick the unit for a day: <60s peak reads in seconds, <3600s in
    /// minutes, anything larger in hours. One unit for the whole series.
    pub fn for_peak(max_seconds: u64) -> Self {
        if max_seconds < 60 {
            Self::Seconds
        } else if max_seconds < 3600 {
            Self::Minutes
        } else {
            Self::Hours
        }
    }

    pub fn divisor(&self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3600.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Seconds => "sec",
            Self::Minutes => "min",
            Self::Hours => "hr",
        }
    }
}

/// The 24-bucket hourly series scaled to a single display unit
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries {
    pub unit: DisplayUnit,
    pub values: [f64; 24],
}

impl HourlySeries {
    pub fn from_seconds(seconds: &[u64; 24]) -> Self {
        let peak = seconds.iter().copied().max().unwrap_or(0);
        let unit = DisplayUnit::for_peak(peak);
        let divisor = unit.divisor();

        let mut values = [0.0; 24];
        for (value, secs) in values.iter_mut().zip(seconds.iter()) {
            *value = *secs as f64 / divisor;
        }

        Self { unit, values }
    }
}

/// The study ledger service: per-user dated accumulators over an injected
/// key-value store. Every recorded tick persists the full `studyData`
/// snapshot synchronously; reads are pure over the in-memory copy.
pub struct StudyLedger<S: KeyValueStore> {
    store: S,
    data: StudyData,
}

impl<S: KeyValueStore> StudyLedger<S> {
    /// Load the ledger from the store; an absent document starts empty
    pub fn load(store: S) -> Result<Self> {
        let data = get_typed(&store, KEY_STUDY_DATA)?.unwrap_or_default();
        Ok(Self { store, data })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn user(&self, user_id: &str) -> Option<&UserLedger> {
        self.data.0.get(user_id)
    }

    /// Credit `delta` seconds to `perModeDaily[mode][date][subject]` and to
    /// `hourlyDaily[date][hour]`, defaulting missing paths to zero, then
    /// write the whole document back. The user's ledger is created lazily
    /// on the first tick.
    pub fn record_tick(
        &mut self,
        user_id: &str,
        mode: StudyMode,
        subject: &str,
        date: NaiveDate,
        hour: u32,
        delta: u64,
    ) -> Result<()> {
        debug_assert!(hour < 24);
        let key = date_key(date);
        let user = self.data.0.entry(user_id.to_string()).or_default();

        *user
            .mode_map_mut(mode)
            .entry(key.clone())
            .or_default()
            .entry(subject.to_string())
            .or_insert(0) += delta;

        *user
            .hourly
            .entry(key)
            .or_default()
            .entry(hour.to_string())
            .or_insert(0) += delta;

        set_typed(&mut self.store, KEY_STUDY_DATA, &self.data)
    }

    /// Per-mode and total seconds for a day; all zero when nothing exists
    pub fn summarize(&self, user_id: &str, date: NaiveDate) -> DaySummary {
        let key = date_key(date);
        let Some(user) = self.user(user_id) else {
            return DaySummary::default();
        };

        let normal_seconds = user.mode_seconds(StudyMode::Normal, &key);
        let focus_seconds = user.mode_seconds(StudyMode::Focus, &key);

        DaySummary {
            total_seconds: normal_seconds + focus_seconds,
            focus_seconds,
            normal_seconds,
        }
    }

    /// Merged normal+focus seconds per subject with their share of the
    /// day's total, sorted by subject. Empty when the day has no data
    /// (the no-data signal; never divides by zero).
    pub fn subject_distribution(&self, user_id: &str, date: NaiveDate) -> Vec<SubjectShare> {
        let key = date_key(date);
        let Some(user) = self.user(user_id) else {
            return Vec::new();
        };

        let mut merged: BTreeMap<&str, u64> = BTreeMap::new();
        for mode in [StudyMode::Normal, StudyMode::Focus] {
            if let Some(subjects) = user.mode_map(mode).get(&key) {
                for (subject, seconds) in subjects {
                    *merged.entry(subject.as_str()).or_insert(0) += seconds;
                }
            }
        }

        let total: u64 = merged.values().sum();
        if total == 0 {
            return Vec::new();
        }

        merged
            .into_iter()
            .map(|(subject, seconds)| SubjectShare {
                subject: subject.to_string(),
                seconds,
                fraction: seconds as f64 / total as f64,
            })
            .collect()
    }

    /// Accumulated seconds per hour of day; missing hours read as zero
    pub fn hourly_distribution(&self, user_id: &str, date: NaiveDate) -> [u64; 24] {
        let mut buckets = [0u64; 24];
        let key = date_key(date);

        if let Some(hours) = self.user(user_id).and_then(|u| u.hourly.get(&key)) {
            for (hour, seconds) in hours {
                if let Ok(h) = hour.parse::<usize>() {
                    if h < 24 {
                        buckets[h] += seconds;
                    }
                }
            }
        }

        buckets
    }
}
