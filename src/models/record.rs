//! Record types
//!
//! Bowel-movement log entries as stored by the backend, and the request
//! body used to create a new one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bristol stool scale code (1 = hard lumps, 7 = liquid)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StoolType(u8);

impl StoolType {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;

    /// Create a stool type, rejecting codes outside 1-7
    pub fn new(code: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&code).then_some(Self(code))
    }

    pub fn code(self) -> u8 {
        self.0
    }

    /// All seven Bristol types in order
    pub fn all() -> impl Iterator<Item = StoolType> {
        (Self::MIN..=Self::MAX).map(StoolType)
    }

    /// Short description of the consistency
    pub fn description(self) -> &'static str {
        match self.0 {
            1 => "Hard lumps",
            2 => "Lumpy sausage",
            3 => "Cracked sausage",
            4 => "Smooth sausage",
            5 => "Soft blobs",
            6 => "Mushy",
            _ => "Liquid",
        }
    }

    /// Clinical reading of the type
    pub fn status(self) -> &'static str {
        match self.0 {
            1 => "Constipation",
            2 => "Mild constipation",
            3 => "Normal",
            4 => "Ideal",
            5 => "Lacking fiber",
            6 => "Mild diarrhea",
            _ => "Diarrhea",
        }
    }
}

impl Default for StoolType {
    fn default() -> Self {
        Self(4)
    }
}

impl TryFrom<u8> for StoolType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::new(code).ok_or_else(|| format!("stool type must be 1-7, got {}", code))
    }
}

impl From<StoolType> for u8 {
    fn from(value: StoolType) -> Self {
        value.0
    }
}

impl fmt::Display for StoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Smell intensity (1 = none, 5 = severe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SmellLevel(u8);

impl SmellLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&level).then_some(Self(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "None",
            2 => "Mild",
            3 => "Moderate",
            4 => "Strong",
            _ => "Severe",
        }
    }
}

impl Default for SmellLevel {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<u8> for SmellLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level).ok_or_else(|| format!("smell level must be 1-5, got {}", level))
    }
}

impl From<SmellLevel> for u8 {
    fn from(value: SmellLevel) -> Self {
        value.0
    }
}

/// Declares a wire-token enum with its label table and string parsing.
macro_rules! token_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $token:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Token sent to and received from the backend
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }

            /// Human readable label
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_lowercase().replace('-', "_");
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == normalized)
                    .ok_or_else(|| {
                        let valid: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        format!("Unknown {}: {}. Use: {}", $kind, s, valid.join(", "))
                    })
            }
        }
    };
}

token_enum! {
    /// Stool color
    Color, "color" {
        Brown => "brown", "Brown";
        DarkBrown => "dark_brown", "Dark brown";
        LightBrown => "light_brown", "Light brown";
        Green => "green", "Green";
        Yellow => "yellow", "Yellow";
        Black => "black", "Black";
        Red => "red", "Red";
    }
}

token_enum! {
    /// How the movement felt
    Feeling, "feeling" {
        Smooth => "smooth", "Smooth";
        Difficult => "difficult", "Difficult";
        Painful => "painful", "Painful";
        Urgent => "urgent", "Urgent";
        Incomplete => "incomplete", "Incomplete";
    }
}

token_enum! {
    /// Accompanying symptom tag
    Symptom, "symptom" {
        AbdominalPain => "abdominal_pain", "Abdominal pain";
        Bloating => "bloating", "Bloating";
        Nausea => "nausea", "Nausea";
        BloodyStool => "bloody_stool", "Blood in stool";
        Mucus => "mucus", "Mucus";
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::Brown
    }
}

impl Default for Feeling {
    fn default() -> Self {
        Feeling::Smooth
    }
}

/// A stored record as returned by `GET /records`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub record_id: String,
    #[serde(default)]
    pub lid: Option<String>,
    pub record_date: String,
    #[serde(default)]
    pub record_time: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub stool_type: Option<u8>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub smell_level: Option<u8>,
    #[serde(default)]
    pub feeling: Option<String>,
    /// Comma-joined symptom tags
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_no_bowel: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Record {
    /// Split the stored symptom string into tags
    pub fn symptom_list(&self) -> Vec<&str> {
        self.symptoms
            .as_deref()
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_no_bowel(&self) -> bool {
        self.is_no_bowel.unwrap_or(false)
    }
}

/// Request body for `POST /records`
///
/// Zero durations, empty symptom sets and blank notes are left out of the
/// serialized body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRecord {
    pub record_date: String,
    pub record_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    pub stool_type: StoolType,
    pub color: Color,
    pub smell_level: SmellLevel,
    pub feeling: Feeling,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub symptoms: Vec<Symptom>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Response payload of `POST /records`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedRecord {
    pub record_id: String,
    #[serde(default)]
    pub lid: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Filters and paging for `GET /records`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: u32,
    pub limit: u32,
}

impl Default for RecordQuery {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            page: 1,
            limit: 20,
        }
    }
}

impl RecordQuery {
    /// Query string pairs in the order the backend documents them
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = self.start_date {
            pairs.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

/// One page of records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}
