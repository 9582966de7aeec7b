//! Distribution report for text/categorical columns.

use crate::error::Result;
use crate::types::{
    CategoricalAnalysis, CategoricalDescription, CategoricalProfile, ValueCount, ValueProportion,
};
use crate::utils::{text_column_names, text_values};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info};

/// Profiles the value distribution of every text/categorical column.
pub struct CategoricalProfiler;

impl CategoricalProfiler {
    /// Unique counts, normalized value counts and a describe block per text column.
    ///
    /// With no text columns this logs the fact and returns
    /// [`CategoricalAnalysis::NoCategoricalColumns`] without doing anything else.
    pub fn profile(df: &DataFrame) -> Result<CategoricalAnalysis> {
        let names = text_column_names(df);
        if names.is_empty() {
            info!("No categorical columns");
            return Ok(CategoricalAnalysis::NoCategoricalColumns);
        }

        let mut profiles = Vec::with_capacity(names.len());
        for name in names {
            let series = df.column(&name)?.as_materialized_series();
            profiles.push(Self::profile_column(series)?);
        }

        Ok(CategoricalAnalysis::Profiled(profiles))
    }

    fn profile_column(series: &Series) -> Result<CategoricalProfile> {
        let counts = value_counts(series)?;
        let non_null: usize = counts.iter().map(|vc| vc.count).sum();
        let has_null = series.null_count() > 0;

        let proportions = counts
            .iter()
            .map(|vc| ValueProportion {
                value: vc.value.clone(),
                proportion: vc.count as f64 / non_null as f64,
            })
            .collect();

        let description = CategoricalDescription {
            count: non_null,
            unique: counts.len(),
            top: counts.first().map(|vc| vc.value.clone()),
            freq: counts.first().map(|vc| vc.count).unwrap_or(0),
        };

        let unique_count = counts.len() + usize::from(has_null);
        debug!(
            "Column {} has {} unique values",
            series.name().to_uppercase(),
            unique_count
        );

        Ok(CategoricalProfile {
            column: series.name().to_string(),
            unique_count,
            proportions,
            description,
        })
    }
}

/// Occurrences of each non-null value, most frequent first.
///
/// Ties are ordered by value so the output is deterministic.
pub fn value_counts(series: &Series) -> Result<Vec<ValueCount>> {
    let mut tally: HashMap<String, usize> = HashMap::new();
    for value in text_values(series)?.into_iter().flatten() {
        *tally.entry(value).or_insert(0) += 1;
    }

    let mut counts: Vec<ValueCount> = tally
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

    Ok(counts)
}
