//! BMI-over-time chart data and a plain-text renderer.
//!
//! Dates are treated as ordered labels, not a time scale: the x axis holds
//! every distinct date in the order it first appears across all users.

use crate::Store;
use std::fmt::Write;

const MARKERS: &[char] = &['*', 'o', '+', 'x', '#', '@', '%', '&'];
const GUTTER: usize = 8;

/// One user's BMI sequence
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub name: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Plot area size in characters
#[derive(Clone, Copy, Debug)]
pub struct ChartOptions {
    pub width: usize,
    pub height: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 60,
            height: 15,
        }
    }
}

impl From<&crate::config::ChartConfig> for ChartOptions {
    fn from(config: &crate::config::ChartConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
        }
    }
}

/// One series per user that has at least one record
pub fn series(store: &Store) -> Vec<Series> {
    store
        .users()
        .filter(|(_, records)| !records.is_empty())
        .map(|(user, records)| Series {
            name: user.to_string(),
            labels: records.iter().map(|r| r.date.clone()).collect(),
            values: records.iter().map(|r| r.bmi).collect(),
        })
        .collect()
}

/// The series for one user, if it has any records
///
/// The id is trimmed the same way it is when a record is stored.
pub fn series_for(store: &Store, user: &str) -> Option<Series> {
    let user = user.trim();
    series(store).into_iter().find(|s| s.name == user)
}

/// Distinct labels across all series, in first-seen order
fn x_labels(series: &[Series]) -> Vec<&str> {
    let mut labels: Vec<&str> = Vec::new();
    for s in series {
        for label in &s.labels {
            if !labels.contains(&label.as_str()) {
                labels.push(label.as_str());
            }
        }
    }
    labels
}

fn marker(index: usize) -> char {
    MARKERS[index % MARKERS.len()]
}

/// Render series as a text chart with a y axis, x axis labels and a legend
pub fn render(series: &[Series], options: ChartOptions) -> String {
    let width = options.width.max(10);
    let height = options.height.max(3);

    let values = series.iter().flat_map(|s| s.values.iter().copied());
    let (mut min, mut max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return "No history to chart\n".to_string();
    }
    if (max - min).abs() < f64::EPSILON {
        min -= 1.0;
        max += 1.0;
    }

    let labels = x_labels(series);
    let column = |label: &str| -> usize {
        let idx = labels.iter().position(|l| *l == label).unwrap_or(0);
        if labels.len() <= 1 {
            0
        } else {
            (idx * (width - 1) + (labels.len() - 1) / 2) / (labels.len() - 1)
        }
    };
    let row = |value: f64| -> usize {
        let scaled = (max - value) / (max - min) * (height - 1) as f64;
        (scaled.round() as usize).min(height - 1)
    };

    let mut grid = vec![vec![' '; width]; height];
    for (i, s) in series.iter().enumerate() {
        for (label, value) in s.labels.iter().zip(&s.values) {
            grid[row(*value)][column(label.as_str())] = marker(i);
        }
    }

    let mut out = String::new();
    for (r, cells) in grid.iter().enumerate() {
        let axis_value = if r == 0 {
            Some(max)
        } else if r == height - 1 {
            Some(min)
        } else if r == (height - 1) / 2 {
            Some((max + min) / 2.0)
        } else {
            None
        };
        let gutter = match axis_value {
            Some(v) => format!("{:>w$.1} |", v, w = GUTTER - 2),
            None => format!("{:>w$}|", "", w = GUTTER - 1),
        };
        let line: String = cells.iter().collect();
        let _ = writeln!(out, "{}{}", gutter, line.trim_end());
    }
    let _ = writeln!(out, "{:>w$}+{}", "", "-".repeat(width), w = GUTTER - 1);

    if let (Some(first), Some(last)) = (labels.first(), labels.last()) {
        if labels.len() == 1 {
            let _ = writeln!(out, "{:>w$}{}", "", first, w = GUTTER);
        } else {
            let pad = width.saturating_sub(first.len() + last.len());
            let _ = writeln!(out, "{:>w$}{}{}{}", "", first, " ".repeat(pad.max(1)), last, w = GUTTER);
        }
    }

    let legend: Vec<String> = series
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{} {}", marker(i), s.name))
        .collect();
    let _ = writeln!(out, "{:>w$}BMI by date: {}", "", legend.join("   "), w = GUTTER);

    out
}
