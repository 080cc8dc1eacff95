use crate::domain::calendar::{DateFeature, Season};
use anyhow::{bail, ensure};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureColumn {
    Year,
    Month,
    Day,
    DayOfYear,
    WeekOfYear,
    /// One-hot indicator for a single season category.
    Season(Season),
}

impl FeatureColumn {
    pub fn parse(name: &str) -> anyhow::Result<Self> {
        let column = match name {
            "year" => FeatureColumn::Year,
            "month" => FeatureColumn::Month,
            "day" => FeatureColumn::Day,
            "dayofyear" => FeatureColumn::DayOfYear,
            "weekofyear" => FeatureColumn::WeekOfYear,
            other => match other
                .strip_prefix("season_")
                .and_then(Season::from_model_name)
            {
                Some(season) => FeatureColumn::Season(season),
                None => bail!("unknown feature column: {other}"),
            },
        };
        Ok(column)
    }

    pub fn value(self, f: &DateFeature) -> f64 {
        match self {
            FeatureColumn::Year => f64::from(f.year),
            FeatureColumn::Month => f64::from(f.month),
            FeatureColumn::Day => f64::from(f.day),
            FeatureColumn::DayOfYear => f64::from(f.day_of_year),
            FeatureColumn::WeekOfYear => f64::from(f.iso_week),
            FeatureColumn::Season(s) => {
                if f.season == s {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Column order the classifier expects its input vector in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureLayout {
    columns: Vec<FeatureColumn>,
}

impl FeatureLayout {
    pub fn from_names(names: &[String]) -> anyhow::Result<Self> {
        ensure!(!names.is_empty(), "feature_names must be non-empty");

        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let column = FeatureColumn::parse(name.trim())?;
            ensure!(seen.insert(column), "duplicate feature column: {name}");
            columns.push(column);
        }
        Ok(Self { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn encode(&self, features: &DateFeature) -> Vec<f64> {
        self.columns.iter().map(|c| c.value(features)).collect()
    }
}
