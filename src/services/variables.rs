//! Typed column selectors.
//!
//! Every selectable column maps to an explicit extraction function instead of
//! being looked up by name at use sites.

use crate::services::features::FeatureRow;
use crate::services::resampler::{Bucket, TimeScale};

/// Where a statistics variable is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableSource {
    /// Raw minute feature rows
    Rows,
    /// Resampled buckets at the given scale
    Buckets(TimeScale),
}

/// Variables offered by the descriptive statistics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    Open,
    High,
    Low,
    Close,
    Volume,
    Volatility,
    RollingVol,
    ReturnDailyPct,
    ReturnWeeklyPct,
    ReturnMonthlyPct,
}

impl Variable {
    pub const ALL: [Variable; 10] = [
        Variable::Open,
        Variable::High,
        Variable::Low,
        Variable::Close,
        Variable::Volume,
        Variable::Volatility,
        Variable::RollingVol,
        Variable::ReturnDailyPct,
        Variable::ReturnWeeklyPct,
        Variable::ReturnMonthlyPct,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variable::Open => "open",
            Variable::High => "high",
            Variable::Low => "low",
            Variable::Close => "close",
            Variable::Volume => "volume",
            Variable::Volatility => "volatility",
            Variable::RollingVol => "rolling_vol",
            Variable::ReturnDailyPct => "return_daily_pct",
            Variable::ReturnWeeklyPct => "return_weekly_pct",
            Variable::ReturnMonthlyPct => "return_monthly_pct",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase();
        if normalized == "rollingvol" {
            return Some(Variable::RollingVol);
        }
        Variable::ALL
            .into_iter()
            .find(|v| v.as_str() == normalized)
    }

    pub fn source(&self) -> VariableSource {
        match self {
            Variable::ReturnDailyPct => VariableSource::Buckets(TimeScale::Day),
            Variable::ReturnWeeklyPct => VariableSource::Buckets(TimeScale::Week),
            Variable::ReturnMonthlyPct => VariableSource::Buckets(TimeScale::Month),
            _ => VariableSource::Rows,
        }
    }

    /// Value of this variable on a minute row. Bucket-only variables yield `None`.
    pub fn row_value(&self, row: &FeatureRow) -> Option<f64> {
        match self {
            Variable::Open => Some(row.open),
            Variable::High => Some(row.high),
            Variable::Low => Some(row.low),
            Variable::Close => Some(row.close),
            Variable::Volume => Some(row.volume),
            Variable::Volatility => Some(row.range),
            Variable::RollingVol => row.rolling_volatility,
            Variable::ReturnDailyPct | Variable::ReturnWeeklyPct | Variable::ReturnMonthlyPct => {
                None
            }
        }
    }

    /// Value of this variable on a bucket; returns are in percent.
    pub fn bucket_value(&self, bucket: &Bucket) -> Option<f64> {
        match self {
            Variable::ReturnDailyPct | Variable::ReturnWeeklyPct | Variable::ReturnMonthlyPct => {
                bucket.ret.map(|r| r * 100.0)
            }
            _ => None,
        }
    }

    /// Heavy-tailed columns get their top percentile trimmed before plotting.
    pub fn is_heavy_tailed(&self) -> bool {
        matches!(
            self,
            Variable::Volume | Variable::Volatility | Variable::RollingVol
        )
    }

    pub fn is_volume_like(&self) -> bool {
        matches!(self, Variable::Volume)
    }

    pub fn is_return(&self) -> bool {
        matches!(self.source(), VariableSource::Buckets(_))
    }
}

/// Bucket columns offered by the series, relation and distribution views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketField {
    Close,
    Volume,
    VolumeUsd,
    Return,
    Volatility,
    Drawdown,
}

impl BucketField {
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketField::Close => "close",
            BucketField::Volume => "volume",
            BucketField::VolumeUsd => "volume_usd",
            BucketField::Return => "return",
            BucketField::Volatility => "volatility",
            BucketField::Drawdown => "drawdown",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "close" => Some(BucketField::Close),
            "volume" => Some(BucketField::Volume),
            "volume_usd" => Some(BucketField::VolumeUsd),
            "return" => Some(BucketField::Return),
            "volatility" => Some(BucketField::Volatility),
            "drawdown" => Some(BucketField::Drawdown),
            _ => None,
        }
    }

    /// Return is expressed in percent; the first bucket has none.
    pub fn value(&self, bucket: &Bucket) -> Option<f64> {
        match self {
            BucketField::Close => Some(bucket.close),
            BucketField::Volume => Some(bucket.volume),
            BucketField::VolumeUsd => Some(bucket.volume_quote),
            BucketField::Return => bucket.ret.map(|r| r * 100.0),
            BucketField::Volatility => Some(bucket.range),
            BucketField::Drawdown => Some(bucket.drawdown_pct),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_round_trip_names() {
        for variable in Variable::ALL {
            assert_eq!(Variable::from_str(variable.as_str()), Some(variable));
        }
        assert_eq!(Variable::from_str("Return_daily_pct"), Some(Variable::ReturnDailyPct));
        assert_eq!(Variable::from_str("RollingVol"), Some(Variable::RollingVol));
        assert_eq!(Variable::from_str("price"), None);
    }

    #[test]
    fn test_variable_sources() {
        assert_eq!(Variable::Close.source(), VariableSource::Rows);
        assert_eq!(
            Variable::ReturnWeeklyPct.source(),
            VariableSource::Buckets(TimeScale::Week)
        );
        assert!(Variable::ReturnMonthlyPct.is_return());
        assert!(!Variable::Volume.is_return());
    }

    #[test]
    fn test_heavy_tailed_columns() {
        assert!(Variable::Volume.is_heavy_tailed());
        assert!(Variable::RollingVol.is_heavy_tailed());
        assert!(!Variable::Close.is_heavy_tailed());
        assert!(Variable::Volume.is_volume_like());
        assert!(!Variable::Volatility.is_volume_like());
    }

    #[test]
    fn test_bucket_field_names() {
        for field in ["close", "volume", "volume_usd", "return", "volatility", "drawdown"] {
            assert_eq!(BucketField::from_str(field).unwrap().as_str(), field);
        }
        assert_eq!(BucketField::from_str("peak"), None);
    }
}
