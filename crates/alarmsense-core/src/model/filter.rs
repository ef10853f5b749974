// ── Search filter and validation ──

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Query parameters for a root-cause search.
///
/// Identifiers are empty when nothing has been chosen yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmFilter {
    pub site_id: String,
    pub turbine_id: String,
    pub start_date_time: Option<DateTime<Utc>>,
    pub end_date_time: Option<DateTime<Utc>>,
}

impl AlarmFilter {
    /// Check required fields and date ordering.
    ///
    /// Every missing field is flagged `Required`. When both dates are set
    /// and the end precedes the start, only `endDateTime` is flagged.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.site_id.trim().is_empty() {
            errors.insert(FilterField::SiteId, FieldError::Required);
        }
        if self.turbine_id.trim().is_empty() {
            errors.insert(FilterField::TurbineId, FieldError::Required);
        }
        match (self.start_date_time, self.end_date_time) {
            (None, None) => {
                errors.insert(FilterField::StartDateTime, FieldError::Required);
                errors.insert(FilterField::EndDateTime, FieldError::Required);
            }
            (None, Some(_)) => errors.insert(FilterField::StartDateTime, FieldError::Required),
            (Some(_), None) => errors.insert(FilterField::EndDateTime, FieldError::Required),
            (Some(start), Some(end)) if end < start => {
                errors.insert(FilterField::EndDateTime, FieldError::InvalidRange);
            }
            (Some(_), Some(_)) => {}
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A field of [`AlarmFilter`], named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
pub enum FilterField {
    #[strum(to_string = "siteId")]
    SiteId,
    #[strum(to_string = "turbineId")]
    TurbineId,
    #[strum(to_string = "startDateTime")]
    StartDateTime,
    #[strum(to_string = "endDateTime")]
    EndDateTime,
}

impl FilterField {
    /// Form label.
    pub fn label(self) -> &'static str {
        match self {
            Self::SiteId => "Site",
            Self::TurbineId => "Turbine",
            Self::StartDateTime => "Start",
            Self::EndDateTime => "End",
        }
    }
}

/// Why a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FieldError {
    #[strum(to_string = "Required")]
    Required,
    #[strum(to_string = "Invalid range")]
    InvalidRange,
}

/// Field-scoped validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FilterField, FieldError>);

impl FieldErrors {
    pub fn insert(&mut self, field: FilterField, error: FieldError) {
        self.0.insert(field, error);
    }

    pub fn remove(&mut self, field: FilterField) -> Option<FieldError> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: FilterField) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    pub fn contains(&self, field: FilterField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterField, FieldError)> + '_ {
        self.0.iter().map(|(f, e)| (*f, *e))
    }

    /// Flagged fields in declaration order.
    pub fn fields(&self) -> Vec<FilterField> {
        self.0.keys().copied().collect()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(field, err)| format!("{field}: {err}")).collect();
        f.write_str(&parts.join(", "))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    fn complete() -> AlarmFilter {
        AlarmFilter {
            site_id: "S1".into(),
            turbine_id: "T1-1".into(),
            start_date_time: Some(ts(1, 8)),
            end_date_time: Some(ts(2, 8)),
        }
    }

    /// Clear one field by name.
    fn without(field: FilterField) -> AlarmFilter {
        let mut f = complete();
        match field {
            FilterField::SiteId => f.site_id.clear(),
            FilterField::TurbineId => f.turbine_id.clear(),
            FilterField::StartDateTime => f.start_date_time = None,
            FilterField::EndDateTime => f.end_date_time = None,
        }
        f
    }

    #[test]
    fn complete_filter_is_valid() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn equal_dates_are_valid() {
        let mut f = complete();
        f.end_date_time = f.start_date_time;
        assert!(f.validate().is_ok());
    }

    #[test]
    fn each_missing_field_is_flagged_alone() {
        for field in FilterField::iter() {
            let errors = without(field).validate().unwrap_err();
            assert_eq!(errors.fields(), vec![field], "missing {field}");
            assert_eq!(errors.get(field), Some(FieldError::Required));
        }
    }

    #[test]
    fn empty_filter_flags_every_field() {
        let errors = AlarmFilter::default().validate().unwrap_err();
        assert_eq!(errors.fields(), FilterField::iter().collect::<Vec<_>>());
    }

    #[test]
    fn whitespace_ids_count_as_missing() {
        let mut f = complete();
        f.site_id = "   ".into();
        let errors = f.validate().unwrap_err();
        assert_eq!(errors.fields(), vec![FilterField::SiteId]);
    }

    #[test]
    fn inverted_range_flags_end_only() {
        let mut f = complete();
        f.start_date_time = Some(ts(3, 8));
        let errors = f.validate().unwrap_err();
        assert_eq!(errors.fields(), vec![FilterField::EndDateTime]);
        assert_eq!(
            errors.get(FilterField::EndDateTime),
            Some(FieldError::InvalidRange)
        );
    }

    #[test]
    fn display_lists_fields() {
        let errors = AlarmFilter::default().validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "siteId: Required, turbineId: Required, startDateTime: Required, endDateTime: Required"
        );
    }
}
