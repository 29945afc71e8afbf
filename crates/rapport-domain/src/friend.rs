//! Friend rows - the storage-layer shape of a record

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column names of the `friends` table, in insert order
pub const FRIEND_COLUMNS: [&str; 7] = [
    "name",
    "gender",
    "birth_date",
    "company",
    "title",
    "phone",
    "wechat",
];

/// A row ready to be written to the `friends` table
///
/// `None` in an optional column is written as SQL `NULL`. An empty string
/// is a value and is written as such.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRow {
    /// Full name
    pub name: String,

    /// Gender token ("male" / "female")
    pub gender: String,

    /// Birth date
    pub birth_date: NaiveDate,

    /// Employer, or NULL
    pub company: Option<String>,

    /// Job title, or NULL
    pub title: Option<String>,

    /// Phone number, or NULL
    pub phone: Option<String>,

    /// WeChat handle, or NULL
    pub wechat: Option<String>,
}

impl FriendRow {
    /// Age in whole years on `on`, or `None` if born after it
    pub fn age_on(&self, on: NaiveDate) -> Option<u32> {
        on.years_since(self.birth_date)
    }
}

/// A row read back from the `friends` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFriend {
    /// Identifier assigned by the store
    pub id: i64,

    /// Column values
    #[serde(flatten)]
    pub row: FriendRow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_friend_serializes_flat() {
        let friend = StoredFriend {
            id: 7,
            row: FriendRow {
                name: "张三".to_string(),
                gender: "male".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1996, 1, 1).unwrap(),
                company: None,
                title: None,
                phone: Some(String::new()),
                wechat: None,
            },
        };

        let json = serde_json::to_value(&friend).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "张三");
        assert_eq!(json["birth_date"], "1996-01-01");
        assert!(json["company"].is_null());
        assert_eq!(json["phone"], "");
    }

    #[test]
    fn test_age_on() {
        let row = FriendRow {
            name: "A".to_string(),
            gender: "female".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 12).unwrap(),
            company: None,
            title: None,
            phone: None,
            wechat: None,
        };
        assert_eq!(row.age_on(NaiveDate::from_ymd_opt(2026, 5, 11).unwrap()), Some(35));
        assert_eq!(row.age_on(NaiveDate::from_ymd_opt(2026, 5, 12).unwrap()), Some(36));
        assert_eq!(row.age_on(NaiveDate::from_ymd_opt(1980, 1, 1).unwrap()), None);
    }
}
