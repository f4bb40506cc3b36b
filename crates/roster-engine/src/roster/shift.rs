use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of duty codes a roster cell can hold.
///
/// Deserialization goes through [`FromStr`], so JSON accepts the same aliases
/// as the staff import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ShiftCode {
    #[serde(rename = "day")]
    Day,
    #[serde(rename = "evening")]
    Evening,
    #[serde(rename = "night")]
    Night,
    #[serde(rename = "off")]
    Off,
    #[serde(rename = "FF")]
    Ff,
    #[serde(rename = "DL")]
    Dl,
}

/// Broad family a code belongs to, used by transition and fatigue metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftClass {
    Day,
    Evening,
    Night,
    Flex,
    Rest,
}

impl ShiftCode {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Day,
            Self::Evening,
            Self::Night,
            Self::Off,
            Self::Ff,
            Self::Dl,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Evening => "evening",
            Self::Night => "night",
            Self::Off => "off",
            Self::Ff => "FF",
            Self::Dl => "DL",
        }
    }

    pub const fn class(self) -> ShiftClass {
        match self {
            Self::Day | Self::Dl => ShiftClass::Day,
            Self::Evening => ShiftClass::Evening,
            Self::Night => ShiftClass::Night,
            Self::Ff => ShiftClass::Flex,
            Self::Off => ShiftClass::Rest,
        }
    }

    pub const fn is_off(self) -> bool {
        matches!(self, Self::Off)
    }

    pub const fn is_worked(self) -> bool {
        !self.is_off()
    }

    /// Contracted hours credited for one occurrence of the code.
    pub const fn standard_hours(self) -> u32 {
        match self {
            Self::Off => 0,
            Self::Dl => 12,
            Self::Day | Self::Evening | Self::Night | Self::Ff => 8,
        }
    }
}

impl fmt::Display for ShiftCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown shift code '{0}'")]
pub struct UnknownShiftCode(pub String);

impl FromStr for ShiftCode {
    type Err = UnknownShiftCode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "day" | "d" => Ok(Self::Day),
            "evening" | "e" => Ok(Self::Evening),
            "night" | "n" => Ok(Self::Night),
            "off" | "o" => Ok(Self::Off),
            "ff" => Ok(Self::Ff),
            "dl" => Ok(Self::Dl),
            _ => Err(UnknownShiftCode(raw.trim().to_string())),
        }
    }
}

impl TryFrom<String> for ShiftCode {
    type Error = UnknownShiftCode;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

/// Shift family a package contract commits a staff member to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageType {
    Day,
    Evening,
    Night,
}

impl PackageType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }

    /// Whether a code counts toward this package's monthly minimum.
    pub const fn covers(self, code: ShiftCode) -> bool {
        matches!(
            (self, code),
            (Self::Day, ShiftCode::Day)
                | (Self::Day, ShiftCode::Dl)
                | (Self::Evening, ShiftCode::Evening)
                | (Self::Night, ShiftCode::Night)
        )
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown package type '{0}'")]
pub struct UnknownPackageType(pub String);

impl FromStr for PackageType {
    type Err = UnknownPackageType;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "day" | "d" => Ok(Self::Day),
            "evening" | "e" => Ok(Self::Evening),
            "night" | "n" => Ok(Self::Night),
            _ => Err(UnknownPackageType(raw.trim().to_string())),
        }
    }
}
