// Post-filter for matched rows. All criteria are AND-ed; an empty filter keeps everything.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::models::MatchedRecord;
use crate::utils::standardize_key;

/// Column addressed by a substring criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterColumn {
    OrderId,
    Product,
    Vessel,
}

impl FilterColumn {
    fn value<'a>(&self, record: &'a MatchedRecord) -> &'a str {
        match self {
            Self::OrderId => &record.order_id,
            Self::Product => &record.product,
            Self::Vessel => &record.vessel_name,
        }
    }
}

/// Filter over reconciled rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilter {
    /// Case-insensitive substrings, stored lower-cased
    contains: Vec<(FilterColumn, String)>,
    /// Allowed carriers, upper-cased
    carriers: Option<HashSet<String>>,
    /// Allowed vessels, upper-cased
    vessels: Option<HashSet<String>>,
    /// Inclusive bounds on the forecast's UTC date
    forecast_from: Option<NaiveDate>,
    forecast_to: Option<NaiveDate>,
}

impl MatchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `column` to contain `needle` (case-insensitive); blank needles are ignored
    #[must_use]
    pub fn contains(mut self, column: FilterColumn, needle: &str) -> Self {
        let needle = needle.trim();
        if !needle.is_empty() {
            self.contains.push((column, needle.to_lowercase()));
        }
        self
    }

    /// Restrict to the given carriers; rows without a carrier are excluded
    #[must_use]
    pub fn carriers<I, S>(mut self, carriers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.carriers = Some(carriers.into_iter().map(|c| standardize_key(c.as_ref())).collect());
        self
    }

    /// Restrict to the given vessels
    #[must_use]
    pub fn vessels<I, S>(mut self, vessels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.vessels = Some(vessels.into_iter().map(|v| standardize_key(v.as_ref())).collect());
        self
    }

    /// Restrict to forecasts dated within `from..=to`; rows without a forecast are excluded
    #[must_use]
    pub fn forecast_between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.forecast_from = from;
        self.forecast_to = to;
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, record: &MatchedRecord) -> bool {
        let text_ok = self.contains.iter().all(|(column, needle)| {
            column.value(record).to_lowercase().contains(needle.as_str())
        });
        if !text_ok {
            return false;
        }

        if let Some(carriers) = &self.carriers {
            let carrier = record.carrier_name.as_deref().map(standardize_key);
            if !carrier.is_some_and(|c| carriers.contains(&c)) {
                return false;
            }
        }

        if let Some(vessels) = &self.vessels {
            if !vessels.contains(&standardize_key(&record.vessel_name)) {
                return false;
            }
        }

        if self.forecast_from.is_some() || self.forecast_to.is_some() {
            let Some(date) = record.arrival_forecast.map(|f| f.date_naive()) else {
                return false;
            };
            if self.forecast_from.is_some_and(|from| date < from) {
                return false;
            }
            if self.forecast_to.is_some_and(|to| date > to) {
                return false;
            }
        }

        true
    }
}
