//! Regulatory loan classification.
//!
//! Five debt groups of increasing severity. `ALL_CLASSES` is the one ordering
//! table every calculation indexes against, so breakdown rows and migration
//! axes always come out Class1 → Class5.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::KriError;

/// Debt classification group, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum LoanClass {
    /// Standard
    Class1,
    /// Special mention (watch list)
    Class2,
    /// Substandard
    Class3,
    /// Doubtful
    Class4,
    /// Loss
    Class5,
}

/// Every class in severity order.
pub const ALL_CLASSES: [LoanClass; 5] = [
    LoanClass::Class1,
    LoanClass::Class2,
    LoanClass::Class3,
    LoanClass::Class4,
    LoanClass::Class5,
];

/// Prefixes accepted in front of the group number when parsing labels.
const LABEL_PREFIXES: [&str; 4] = ["class", "group", "nhóm", "nhom"];

impl LoanClass {
    /// 1 for Class1 through 5 for Class5.
    pub const fn severity(self) -> u8 {
        match self {
            LoanClass::Class1 => 1,
            LoanClass::Class2 => 2,
            LoanClass::Class3 => 3,
            LoanClass::Class4 => 4,
            LoanClass::Class5 => 5,
        }
    }

    /// Position in `ALL_CLASSES`.
    pub const fn index(self) -> usize {
        self.severity() as usize - 1
    }

    pub const fn from_severity(severity: u8) -> Option<Self> {
        match severity {
            1 => Some(LoanClass::Class1),
            2 => Some(LoanClass::Class2),
            3 => Some(LoanClass::Class3),
            4 => Some(LoanClass::Class4),
            5 => Some(LoanClass::Class5),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            LoanClass::Class1 => "Class1",
            LoanClass::Class2 => "Class2",
            LoanClass::Class3 => "Class3",
            LoanClass::Class4 => "Class4",
            LoanClass::Class5 => "Class5",
        }
    }

    /// Doubtful and loss classes count as non-performing on their own.
    pub const fn is_npl(self) -> bool {
        matches!(self, LoanClass::Class4 | LoanClass::Class5)
    }

    /// Special mention loans sit on the watch list whatever their DPD.
    pub const fn is_watch_list(self) -> bool {
        matches!(self, LoanClass::Class2)
    }
}

impl fmt::Display for LoanClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LoanClass {
    type Err = KriError;

    /// Accepts `Class3`, `3`, `Group 3`, and source-system labels such as
    /// `Nhóm 3 - Dưới tiêu chuẩn` (anything after the group number and a
    /// ` - ` separator is treated as a description).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let mut rest = lowered.as_str();
        for prefix in LABEL_PREFIXES {
            if let Some(stripped) = rest.strip_prefix(prefix) {
                rest = stripped.trim_start();
                break;
            }
        }
        let (number, description) = match rest.split_once('-') {
            Some((n, d)) => (n.trim(), Some(d)),
            None => (rest.trim(), None),
        };
        let parsed = match number.parse::<u8>() {
            Ok(n) if description.map_or(true, |d| !d.trim().is_empty()) => {
                LoanClass::from_severity(n)
            }
            _ => None,
        };
        parsed.ok_or_else(|| {
            KriError::invalid(
                "loan_classification",
                format!("'{s}' is not a recognised classification (expected Class1..Class5)"),
            )
        })
    }
}

impl TryFrom<String> for LoanClass {
    type Error = KriError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
