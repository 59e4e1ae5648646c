//! Core domain types for the BMI tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Records (one dated BMI measurement)
//! - Categories and computed readings
//! - The per-user store that is persisted as a whole

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp format used for `Record::date` (minute granularity)
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

// ============================================================================
// Records
// ============================================================================

/// One timestamped BMI measurement
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub date: String,
    pub bmi: f64,
}

impl Record {
    /// Create a record stamped with `at`
    pub fn new(at: NaiveDateTime, bmi: f64) -> Self {
        Self {
            date: at.format(DATE_FORMAT).to_string(),
            bmi,
        }
    }

    /// Parse the stored date back into a timestamp
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

// ============================================================================
// Classification
// ============================================================================

/// BMI category, bounded by 18.5 / 25 / 30 (upper bounds exclusive)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl Category {
    /// Classify a BMI value
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Category::Underweight
        } else if bmi < 25.0 {
            Category::Normal
        } else if bmi < 30.0 {
            Category::Overweight
        } else {
            Category::Obese
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Underweight => "Underweight",
            Category::Normal => "Normal",
            Category::Overweight => "Overweight",
            Category::Obese => "Obese",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a BMI calculation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BmiReading {
    /// Unrounded value, as persisted
    pub bmi: f64,
    pub category: Category,
}

impl BmiReading {
    /// BMI rounded to 2 decimal places for display
    pub fn rounded(&self) -> f64 {
        (self.bmi * 100.0).round() / 100.0
    }
}

impl fmt::Display for BmiReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} ({})", self.bmi, self.category)
    }
}

// ============================================================================
// User identity
// ============================================================================

/// How a calculation picks the user it is recorded under
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum UserSelector {
    /// Derive `user_{N}` where N is the current user count + 1
    #[default]
    Next,
    /// Record under a caller-supplied identifier
    Explicit(String),
}

// ============================================================================
// Store
// ============================================================================

/// All users' histories, in the order users first appeared
///
/// Serialized as a JSON object whose keys keep that order, so a loaded
/// store writes back the same document. A user id repeated in the file
/// keeps its first position and its last list of records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Store {
    users: IndexMap<String, Vec<Record>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Number of user identifiers in the store
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Total number of records across all users
    pub fn record_count(&self) -> usize {
        self.users.values().map(Vec::len).sum()
    }

    /// Iterate users and their histories in store order
    pub fn users(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.users
            .iter()
            .map(|(user, records)| (user.as_str(), records.as_slice()))
    }

    /// History for one user
    pub fn history(&self, user: &str) -> Option<&[Record]> {
        self.users.get(user).map(Vec::as_slice)
    }

    /// The identifier `UserSelector::Next` resolves to right now
    pub fn next_user_id(&self) -> String {
        format!("user_{}", self.users.len() + 1)
    }

    /// Append a record, creating the user if needed.
    ///
    /// Returns true when the user did not exist before.
    pub fn append(&mut self, user: &str, record: Record) -> bool {
        let created = !self.users.contains_key(user);
        self.users.entry(user.to_string()).or_default().push(record);
        created
    }

    /// Undo the most recent `append` for `user`
    pub(crate) fn undo_append(&mut self, user: &str, created_user: bool) {
        if created_user {
            self.users.shift_remove(user);
        } else if let Some(records) = self.users.get_mut(user) {
            records.pop();
        }
    }
}
