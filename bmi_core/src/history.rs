//! Read path for the history view.

use crate::{Category, Record, Store};

/// One line of the history table
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryRow<'a> {
    pub user: &'a str,
    pub date: &'a str,
    pub bmi: f64,
}

impl HistoryRow<'_> {
    pub fn category(&self) -> Category {
        Category::from_bmi(self.bmi)
    }
}

/// All records across all users, in store order
pub fn rows(store: &Store) -> Vec<HistoryRow<'_>> {
    store
        .users()
        .flat_map(|(user, records)| {
            records.iter().map(move |r| HistoryRow {
                user,
                date: &r.date,
                bmi: r.bmi,
            })
        })
        .collect()
}

/// Records for a single user (empty if the user is unknown)
///
/// The id is trimmed the same way it is when a record is stored.
pub fn rows_for<'a>(store: &'a Store, user: &str) -> Vec<HistoryRow<'a>> {
    let user = user.trim();
    rows(store).into_iter().filter(|row| row.user == user).collect()
}

/// Most recent record for a user
pub fn latest<'a>(store: &'a Store, user: &str) -> Option<&'a Record> {
    store.history(user.trim()).and_then(|records| records.last())
}
