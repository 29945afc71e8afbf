//! Gender module - the two values the extraction contract may produce

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gender of an extracted person
///
/// The `friends` table stores this as free text, but the extraction
/// contract only ever yields one of these two tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// "male"
    Male,

    /// "female"
    Female,
}

impl Gender {
    /// All accepted values, in the order they are advertised to the service
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Get the gender token as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Parse a gender token
    ///
    /// Only the exact lowercase tokens are accepted; anything else is
    /// outside the schema.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::parse(s).ok_or_else(|| format!("Invalid gender: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_as_str() {
        assert_eq!(Gender::Male.as_str(), "male");
        assert_eq!(Gender::Female.as_str(), "female");
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::parse("male"), Some(Gender::Male));
        assert_eq!(Gender::parse("female"), Some(Gender::Female));
        assert_eq!(Gender::parse("Male"), None);
        assert_eq!(Gender::parse("unknown"), None);
        assert_eq!(Gender::parse(""), None);
    }

    #[test]
    fn test_gender_round_trip() {
        for gender in Gender::ALL {
            assert_eq!(Gender::parse(gender.as_str()), Some(gender));
        }
    }

    #[test]
    fn test_gender_from_str() {
        assert_eq!("female".parse::<Gender>(), Ok(Gender::Female));
        assert!("FEMALE".parse::<Gender>().is_err());
    }
}
