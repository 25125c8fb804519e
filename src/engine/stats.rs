// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Running statistics and their immutable snapshots.
//!
//! Measures are accumulated in fixed point (millionths) so that the fold is
//! exactly commutative and associative: any arrival order, and any split of
//! the input across workers, yields a bit-identical snapshot. Accumulators
//! are `i128` and saturate, so no measure can make the fold panic or wrap.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::traits::Aggregatable;

const FIXED_SCALE: f64 = 1_000_000.0;

fn to_fixed(value: f64) -> i128 {
    (value * FIXED_SCALE).round() as i128
}

fn from_fixed(value: i128) -> f64 {
    value as f64 / FIXED_SCALE
}

#[derive(Debug, Default, Clone)]
struct CategoryTotals {
    sum: i128,
    count: u64,
    secondary: Vec<i64>,
}

#[derive(Debug, Default, Clone)]
struct SubcategoryTotals {
    sum: i128,
    count: u64,
}

/// Mutable aggregate for one run. Mutated only through [`AggregateState::merge`].
#[derive(Debug, Clone)]
pub struct AggregateState {
    bucket_width: u32,
    total_sum: i128,
    total_count: u64,
    by_category: HashMap<String, CategoryTotals>,
    by_subcategory: HashMap<String, SubcategoryTotals>,
    distribution: HashMap<i64, u64>,
}

impl AggregateState {
    /// `bucket_width` of zero is treated as one.
    pub fn new(bucket_width: u32) -> Self {
        Self {
            bucket_width: bucket_width.max(1),
            total_sum: 0,
            total_count: 0,
            by_category: HashMap::new(),
            by_subcategory: HashMap::new(),
            distribution: HashMap::new(),
        }
    }

    /// Lower bound of the bucket containing `measure`, clamped to the `i64`
    /// range.
    pub fn bucket_lower(&self, measure: f64) -> i64 {
        let width = f64::from(self.bucket_width);
        ((measure / width).floor() as i64).saturating_mul(i64::from(self.bucket_width))
    }

    /// Fold one entity. All of its updates are applied before returning, and
    /// the caller holds exclusive access, so no reader observes half of them.
    pub fn merge<E: Aggregatable + ?Sized>(&mut self, entity: &E) {
        let measure = to_fixed(entity.primary_measure());

        self.total_sum = self.total_sum.saturating_add(measure);
        self.total_count += 1;

        let category = self
            .by_category
            .entry(entity.category().to_string())
            .or_default();
        category.sum = category.sum.saturating_add(measure);
        category.count += 1;
        if let Some(secondary) = entity.secondary_measure() {
            category.secondary.push(secondary);
        }

        if let Some(subcategory) = entity.subcategory() {
            let totals = self.by_subcategory.entry(subcategory.to_string()).or_default();
            totals.sum = totals.sum.saturating_add(measure);
            totals.count += 1;
        }

        let lower = self.bucket_lower(entity.bucket_measure());
        *self.distribution.entry(lower).or_insert(0) += 1;
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Freeze the current state into a canonical, order-independent snapshot.
    pub fn snapshot(&self) -> StatsSnapshot {
        let by_category = self
            .by_category
            .iter()
            .map(|(name, totals)| {
                let mut secondary = totals.secondary.clone();
                secondary.sort_unstable();
                let average_secondary = if secondary.is_empty() {
                    None
                } else {
                    let total: i128 = secondary.iter().map(|&v| i128::from(v)).sum();
                    Some(total as f64 / secondary.len() as f64)
                };
                (
                    name.clone(),
                    CategorySnapshot {
                        sum: from_fixed(totals.sum),
                        count: totals.count,
                        secondary,
                        average_secondary,
                    },
                )
            })
            .collect();

        let by_subcategory = self
            .by_subcategory
            .iter()
            .map(|(name, totals)| {
                (
                    name.clone(),
                    SubcategorySnapshot {
                        sum: from_fixed(totals.sum),
                        count: totals.count,
                    },
                )
            })
            .collect();

        let width = i64::from(self.bucket_width);
        let mut distribution: Vec<BucketSnapshot> = self
            .distribution
            .iter()
            .map(|(&lower, &count)| {
                let upper = lower.saturating_add(width);
                BucketSnapshot {
                    label: format!("{}-{}", lower, upper),
                    lower,
                    upper,
                    count,
                }
            })
            .collect();
        distribution.sort_by_key(|bucket| bucket.lower);

        StatsSnapshot {
            total_sum: from_fixed(self.total_sum),
            total_count: self.total_count,
            bucket_width: self.bucket_width,
            by_category,
            by_subcategory,
            distribution,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySnapshot {
    pub sum: f64,
    pub count: u64,
    /// Sorted ascending
    pub secondary: Vec<i64>,
    pub average_secondary: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategorySnapshot {
    pub sum: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketSnapshot {
    pub label: String,
    pub lower: i64,
    pub upper: i64,
    pub count: u64,
}

/// Immutable copy of an [`AggregateState`] at one point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub total_sum: f64,
    pub total_count: u64,
    pub bucket_width: u32,
    pub by_category: BTreeMap<String, CategorySnapshot>,
    pub by_subcategory: BTreeMap<String, SubcategorySnapshot>,
    /// Ordered by lower bound
    pub distribution: Vec<BucketSnapshot>,
}

impl StatsSnapshot {
    pub fn sum(&self, category: &str) -> Option<f64> {
        self.by_category.get(category).map(|c| c.sum)
    }

    pub fn count(&self, category: &str) -> u64 {
        self.by_category.get(category).map_or(0, |c| c.count)
    }

    pub fn bucket(&self, label: &str) -> u64 {
        self.distribution
            .iter()
            .find(|b| b.label == label)
            .map_or(0, |b| b.count)
    }
}
