#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Grouping and rollup engine over normalized incidents.
//!
//! Every dashboard chart follows the same shape: filter the incidents, group
//! them by one to three keys, reduce each group, then sort or gap-fill the
//! result for layout. This crate provides the grouping and reduction half:
//!
//! - [`rollup::Rollup`], an insertion-ordered key to value map,
//! - [`rollup::rollup`], [`rollup::rollup2`] and [`rollup::rollup3`] for
//!   typed key closures,
//! - [`dimension::rollup_by`] for runtime-selected [`dimension::Dimension`]s,
//! - the sealed [`reduce::Reduce`] reducers.
//!
//! Filtering is always done by the caller before grouping.

pub mod dimension;
pub mod reduce;
pub mod rollup;

pub use dimension::{Dimension, GroupKey, Grouping, KeyValue, rollup_by};
pub use reduce::{
    Count, CountMode, Flag, FlagTally, Mean, Measure, Rate, Reduce, Tally, UniqueCount,
};
pub use rollup::{Rollup, domain_of, group_by, rollup, rollup2, rollup3};

/// Hours of the day, `0..=23`.
#[must_use]
pub fn hours() -> Vec<u32> {
    (0..24).collect()
}

/// Zero-based months of the year, `0..=11`.
#[must_use]
pub fn months() -> Vec<u32> {
    (0..12).collect()
}
