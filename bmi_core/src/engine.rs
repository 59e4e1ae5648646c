//! BMI engine: input validation, computation, classification and recording.
//!
//! The pure functions here have no side effects. `Tracker` is the context
//! object that owns the in-memory store and its backing file, and is the
//! only thing that appends records.

use crate::{BmiReading, Category, Error, Record, Result, Store, UserSelector};
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};

/// Parse a weight or height typed by the user
pub fn parse_measurement(name: &str, input: &str) -> Result<f64> {
    let trimmed = input.trim();
    let value: f64 = trimmed.parse().map_err(|_| {
        tracing::warn!("Rejected non-numeric {}: {:?}", name, input);
        Error::InvalidInput(format!("{} must be a number, got {:?}", name, trimmed))
    })?;

    if !value.is_finite() {
        tracing::warn!("Rejected non-finite {}: {:?}", name, input);
        return Err(Error::InvalidInput(format!(
            "{} must be a finite number, got {:?}",
            name, trimmed
        )));
    }

    Ok(value)
}

/// Check that weight (kg) and height (m) are usable
pub fn validate(weight: f64, height: f64) -> Result<()> {
    if !weight.is_finite() || !height.is_finite() {
        return Err(Error::InvalidInput("Values must be finite numbers".into()));
    }
    if weight <= 0.0 || height <= 0.0 {
        tracing::warn!(
            "Rejected non-positive input: weight={} height={}",
            weight,
            height
        );
        return Err(Error::InvalidInput("Values must be positive".into()));
    }
    Ok(())
}

/// weight / height²
pub fn compute_bmi(weight: f64, height: f64) -> f64 {
    weight / (height * height)
}

/// Classify a BMI value
pub fn classify(bmi: f64) -> Category {
    Category::from_bmi(bmi)
}

/// Validate, compute and classify without recording anything
pub fn calculate(weight: f64, height: f64) -> Result<BmiReading> {
    validate(weight, height)?;
    let bmi = compute_bmi(weight, height);
    // Extreme but valid inputs can overflow to inf or underflow to 0
    if !bmi.is_finite() || bmi <= 0.0 {
        tracing::warn!(
            "Rejected out-of-range result: weight={} height={} bmi={}",
            weight,
            height,
            bmi
        );
        return Err(Error::InvalidInput(format!(
            "weight {} and height {} do not give a usable BMI",
            weight, height
        )));
    }
    Ok(BmiReading {
        bmi,
        category: classify(bmi),
    })
}

/// The in-memory store bound to its history file
#[derive(Debug)]
pub struct Tracker {
    path: PathBuf,
    store: Store,
}

impl Tracker {
    /// Load the store behind `path` (empty if the file doesn't exist)
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let store = Store::load(&path)?;
        Ok(Self { path, store })
    }

    /// Wrap an already loaded store
    pub fn with_store(path: impl Into<PathBuf>, store: Store) -> Self {
        Self {
            path: path.into(),
            store,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Compute a reading without touching the store
    pub fn preview(&self, weight: f64, height: f64) -> Result<BmiReading> {
        calculate(weight, height)
    }

    /// Compute a reading, record it now and save the store
    pub fn calculate(
        &mut self,
        weight: f64,
        height: f64,
        user: &UserSelector,
    ) -> Result<BmiReading> {
        self.calculate_at(weight, height, user, Local::now().naive_local())
    }

    /// Compute a reading, record it with timestamp `now` and save the store
    ///
    /// Invalid input leaves the store and file untouched. If the save fails
    /// the record is taken back out, so the in-memory store matches what it
    /// was before the call.
    pub fn calculate_at(
        &mut self,
        weight: f64,
        height: f64,
        user: &UserSelector,
        now: NaiveDateTime,
    ) -> Result<BmiReading> {
        let reading = calculate(weight, height)?;
        let user_id = self.resolve_user(user)?;

        let record = Record::new(now, reading.bmi);
        tracing::debug!("Recording {:?} for {}", record, user_id);
        let created_user = self.store.append(&user_id, record);

        if let Err(e) = self.store.save(&self.path) {
            tracing::error!("Failed to save history to {:?}: {}", self.path, e);
            self.store.undo_append(&user_id, created_user);
            return Err(e);
        }

        tracing::info!(
            "Recorded BMI {:.2} ({}) for {}",
            reading.bmi,
            reading.category,
            user_id
        );
        Ok(reading)
    }

    /// The identifier a calculation with `user` would be recorded under
    pub fn resolve_user(&self, user: &UserSelector) -> Result<String> {
        match user {
            UserSelector::Next => Ok(self.store.next_user_id()),
            UserSelector::Explicit(id) => {
                let id = id.trim();
                if id.is_empty() {
                    return Err(Error::InvalidInput("user id must not be empty".into()));
                }
                Ok(id.to_string())
            }
        }
    }
}
