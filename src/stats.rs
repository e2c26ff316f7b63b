//! Aggregations over a loaded [`Dataset`].
//!
//! Each function is pure and only reads the dataset, so they can run in
//! any order.

use std::collections::{HashMap, HashSet};

use crate::dataset::Dataset;

/// Number of rows in the most-valuable report
pub const TOP_COUNTIES_LIMIT: usize = 10;

/// Summed TIV growth for one county
#[derive(Debug, Clone, PartialEq)]
pub struct CountyDelta {
    pub county: String,
    pub delta: f64,
}

/// Number of distinct county names (exact, case-sensitive)
pub fn county_count(dataset: &Dataset) -> usize {
    dataset
        .iter()
        .map(|r| r.county.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Sum of all 2012 insured values, added in input order.
///
/// Plain `f64` addition without compensation, so the last digits can differ
/// from a Kahan-summed total over the same rows. Starts from `+0.0`; an
/// empty dataset totals `0.0`, never `-0.0`.
pub fn total_tiv_2012(dataset: &Dataset) -> f64 {
    dataset.iter().fold(0.0, |acc, r| acc + r.tiv_2012)
}

/// Counties ranked by summed `tiv_2012 - tiv_2011`, largest first.
///
/// Groups keep the order in which their county first appeared and the sort
/// is stable, so equal deltas stay in first-encounter order.
pub fn top_valuable_counties(dataset: &Dataset, limit: usize) -> Vec<CountyDelta> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<CountyDelta> = Vec::new();

    for record in dataset {
        let slot = *slots.entry(record.county.as_str()).or_insert_with(|| {
            groups.push(CountyDelta {
                county: record.county.clone(),
                delta: 0.0,
            });
            groups.len() - 1
        });
        groups[slot].delta += record.delta();
    }

    groups.sort_by(|a, b| b.delta.total_cmp(&a.delta));
    groups.truncate(limit);
    groups
}
