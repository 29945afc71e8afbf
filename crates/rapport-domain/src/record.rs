//! Record module - one person's structured profile as extracted from text

use crate::Gender;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One person's structured profile
///
/// Produced by schema validation of the text service's output. The three
/// required fields are always present; optional fields are `None` when the
/// source text did not mention them. A record that has passed validation
/// is moved, not mutated, on its way to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// Full name as written in the source text
    pub name: String,

    /// Gender
    pub gender: Gender,

    /// Birth date (estimated by the extractor when only an age is given)
    pub birth_date: NaiveDate,

    /// Employer
    pub company: Option<String>,

    /// Job title
    pub title: Option<String>,

    /// Phone number, kept verbatim
    pub phone: Option<String>,

    /// WeChat handle, opaque
    pub wechat: Option<String>,
}

impl ExtractedRecord {
    /// Create a record with only the required fields set
    pub fn new(name: impl Into<String>, gender: Gender, birth_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            gender,
            birth_date,
            company: None,
            title: None,
            phone: None,
            wechat: None,
        }
    }

    /// Set the company
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the phone number
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set the WeChat handle
    pub fn with_wechat(mut self, wechat: impl Into<String>) -> Self {
        self.wechat = Some(wechat.into());
        self
    }

    /// Age in whole years on the given date
    ///
    /// Returns `None` if `on` is before the birth date.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use rapport_domain::{ExtractedRecord, Gender};
    ///
    /// let born = NaiveDate::from_ymd_opt(1995, 6, 15).unwrap();
    /// let record = ExtractedRecord::new("Li Lei", Gender::Male, born);
    ///
    /// let today = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
    /// assert_eq!(record.age_on(today), Some(29));
    /// ```
    pub fn age_on(&self, on: NaiveDate) -> Option<u32> {
        on.years_since(self.birth_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_record_has_no_optional_fields() {
        let record = ExtractedRecord::new("张三", Gender::Male, date(1995, 1, 1));
        assert_eq!(record.name, "张三");
        assert!(record.company.is_none());
        assert!(record.title.is_none());
        assert!(record.phone.is_none());
        assert!(record.wechat.is_none());
    }

    #[test]
    fn test_builder_sets_optional_fields() {
        let record = ExtractedRecord::new("Alice", Gender::Female, date(1990, 3, 2))
            .with_company("Acme")
            .with_title("Engineer")
            .with_phone("13900000000")
            .with_wechat("alice_wx");

        assert_eq!(record.company.as_deref(), Some("Acme"));
        assert_eq!(record.title.as_deref(), Some("Engineer"));
        assert_eq!(record.phone.as_deref(), Some("13900000000"));
        assert_eq!(record.wechat.as_deref(), Some("alice_wx"));
    }

    #[test]
    fn test_age_on() {
        let record = ExtractedRecord::new("Bob", Gender::Male, date(1994, 10, 19));
        assert_eq!(record.age_on(date(2024, 10, 18)), Some(29));
        assert_eq!(record.age_on(date(2024, 10, 19)), Some(30));
        assert_eq!(record.age_on(date(1990, 1, 1)), None);
    }

    #[test]
    fn test_serializes_absent_fields_as_null() {
        let record = ExtractedRecord::new("Bob", Gender::Male, date(1994, 10, 19));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["gender"], "male");
        assert_eq!(json["birth_date"], "1994-10-19");
        assert!(json["company"].is_null());
    }
}
