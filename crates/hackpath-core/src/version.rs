//! Console firmware versions.
//!
//! A firmware identity is written either in long form, as shown in the
//! console's System Settings (`11.3.0-36U`), or in short form (`11.3.0`).
//! The long form also carries the browser build number and the region
//! letter.
//!
//! Comparisons used for path resolution only look at `major.minor.patch`,
//! and equality ignores the patch component unless the caller opts in.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest firmware for which a procedure is currently known.
pub const LATEST_HACKABLE: FirmwareVersion = FirmwareVersion::new(11, 4, 0);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version: {0}")]
    InvalidVersionFormat(String),

    #[error("Unknown console model: {0}")]
    UnknownModel(String),
}

/// Console region, encoded as the trailing letter of the long form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConsoleRegion {
    Usa,
    Eur,
    Jpn,
    Kor,
    Chn,
    Twn,
    /// Unspecified or unrecognised.
    #[default]
    Other,
}

impl ConsoleRegion {
    /// Map a firmware region letter. Unknown letters become `Other`.
    pub fn from_letter(letter: char) -> Self {
        match letter.to_ascii_uppercase() {
            'U' => ConsoleRegion::Usa,
            'E' => ConsoleRegion::Eur,
            'J' => ConsoleRegion::Jpn,
            'K' => ConsoleRegion::Kor,
            'C' => ConsoleRegion::Chn,
            'T' => ConsoleRegion::Twn,
            _ => ConsoleRegion::Other,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            ConsoleRegion::Usa => 'U',
            ConsoleRegion::Eur => 'E',
            ConsoleRegion::Jpn => 'J',
            ConsoleRegion::Kor => 'K',
            ConsoleRegion::Chn => 'C',
            ConsoleRegion::Twn => 'T',
            ConsoleRegion::Other => 'X',
        }
    }
}

impl fmt::Display for ConsoleRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleRegion::Usa => write!(f, "USA"),
            ConsoleRegion::Eur => write!(f, "EUR"),
            ConsoleRegion::Jpn => write!(f, "JPN"),
            ConsoleRegion::Kor => write!(f, "KOR"),
            ConsoleRegion::Chn => write!(f, "CHN"),
            ConsoleRegion::Twn => write!(f, "TWN"),
            ConsoleRegion::Other => write!(f, "Other"),
        }
    }
}

/// Hardware line. Each generation has its own range table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceGeneration {
    /// Original 3DS / 3DS XL / 2DS.
    Legacy,
    /// New 3DS / New 3DS XL / New 2DS XL.
    Revised,
}

impl fmt::Display for DeviceGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceGeneration::Legacy => write!(f, "Old 3DS"),
            DeviceGeneration::Revised => write!(f, "New 3DS"),
        }
    }
}

/// Console model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleModel {
    /// Generic Old 3DS, used when the exact model is unknown.
    #[default]
    O3ds,
    O3dsXl,
    O2ds,
    N3ds,
    N3dsXl,
    N2dsXl,
}

impl ConsoleModel {
    pub fn generation(&self) -> DeviceGeneration {
        if self.is_new() {
            DeviceGeneration::Revised
        } else {
            DeviceGeneration::Legacy
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(
            self,
            ConsoleModel::N3ds | ConsoleModel::N3dsXl | ConsoleModel::N2dsXl
        )
    }

    /// Short model-type string, as accepted by [`FromStr`].
    pub fn model_type(&self) -> &'static str {
        match self {
            ConsoleModel::O3ds => "o3ds",
            ConsoleModel::O3dsXl => "o3dsxl",
            ConsoleModel::O2ds => "o2ds",
            ConsoleModel::N3ds => "n3ds",
            ConsoleModel::N3dsXl => "n3dsxl",
            ConsoleModel::N2dsXl => "n2dsxl",
        }
    }
}

impl FromStr for ConsoleModel {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "o3ds" | "old3ds" | "3ds" => Ok(ConsoleModel::O3ds),
            "o3dsxl" | "old3dsxl" | "3dsxl" => Ok(ConsoleModel::O3dsXl),
            "o2ds" | "2ds" => Ok(ConsoleModel::O2ds),
            "n3ds" | "new3ds" => Ok(ConsoleModel::N3ds),
            "n3dsxl" | "new3dsxl" => Ok(ConsoleModel::N3dsXl),
            "n2dsxl" | "new2dsxl" => Ok(ConsoleModel::N2dsXl),
            _ => Err(VersionError::UnknownModel(s.to_string())),
        }
    }
}

impl fmt::Display for ConsoleModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleModel::O3ds => write!(f, "Old 3DS"),
            ConsoleModel::O3dsXl => write!(f, "Old 3DS XL"),
            ConsoleModel::O2ds => write!(f, "2DS"),
            ConsoleModel::N3ds => write!(f, "New 3DS"),
            ConsoleModel::N3dsXl => write!(f, "New 3DS XL"),
            ConsoleModel::N2dsXl => write!(f, "New 2DS XL"),
        }
    }
}

/// A console system firmware identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FirmwareVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    /// Browser build number, 0 when unknown.
    pub browser: u32,
    pub region: ConsoleRegion,
    pub model: ConsoleModel,
}

impl FirmwareVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            browser: 0,
            region: ConsoleRegion::Other,
            model: ConsoleModel::O3ds,
        }
    }

    /// Parse the long form first, then the short form.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        parse_long(text)
            .or_else(|| parse_short(text))
            .ok_or_else(|| VersionError::InvalidVersionFormat(text.to_string()))
    }

    pub fn with_browser(mut self, browser: u32) -> Self {
        self.browser = browser;
        self
    }

    pub fn with_region(mut self, region: ConsoleRegion) -> Self {
        self.region = region;
        self
    }

    pub fn with_model(mut self, model: ConsoleModel) -> Self {
        self.model = model;
        self
    }

    pub fn generation(&self) -> DeviceGeneration {
        self.model.generation()
    }

    /// Strict ordering over `(major, minor, patch)`.
    pub fn system_cmp(&self, other: &FirmwareVersion) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }

    pub fn lt(&self, other: &FirmwareVersion) -> bool {
        if self.major != other.major {
            return self.major < other.major;
        }
        if self.minor != other.minor {
            return self.minor < other.minor;
        }
        self.patch < other.patch
    }

    pub fn gt(&self, other: &FirmwareVersion) -> bool {
        other.lt(self)
    }

    /// Equality on `major.minor`, and on `patch` only when `consider_patch` is set.
    pub fn system_version_eq(&self, other: &FirmwareVersion, consider_patch: bool) -> bool {
        self.major == other.major
            && self.minor == other.minor
            && (!consider_patch || self.patch == other.patch)
    }

    pub fn lte(&self, other: &FirmwareVersion, consider_patch: bool) -> bool {
        self.lt(other) || self.system_version_eq(other, consider_patch)
    }

    pub fn gte(&self, other: &FirmwareVersion, consider_patch: bool) -> bool {
        self.gt(other) || self.system_version_eq(other, consider_patch)
    }

    /// Whether any procedure is known for this firmware.
    pub fn is_hackable(&self) -> bool {
        self.lte(&LATEST_HACKABLE, false)
    }

    pub fn to_short_form(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }

    pub fn to_long_form(&self) -> String {
        format!(
            "{}.{}.{}-{}{}",
            self.major,
            self.minor,
            self.patch,
            self.browser,
            self.region.letter()
        )
    }
}

impl Default for FirmwareVersion {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

impl FromStr for FirmwareVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.to_long_form(), self.model)
    }
}

fn parse_number(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// `MAJOR.MINOR.PATCH`
fn parse_short(text: &str) -> Option<FirmwareVersion> {
    let mut parts = text.split('.');
    let major = parse_number(parts.next()?)?;
    let minor = parse_number(parts.next()?)?;
    let patch = parse_number(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some(FirmwareVersion::new(major, minor, patch))
}

/// `MAJOR.MINOR.PATCH-BROWSERletter`
fn parse_long(text: &str) -> Option<FirmwareVersion> {
    let (system, suffix) = text.split_once('-')?;
    let mut version = parse_short(system)?;

    let letter = suffix.chars().last()?;
    if !letter.is_ascii_alphabetic() {
        return None;
    }
    let browser = parse_number(&suffix[..suffix.len() - 1])?;

    version.browser = browser;
    version.region = ConsoleRegion::from_letter(letter);
    Some(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> FirmwareVersion {
        FirmwareVersion::parse(s).unwrap()
    }

    #[test]
    fn test_parse_long_form() {
        let fw = v("11.3.0-36U");
        assert_eq!((fw.major, fw.minor, fw.patch), (11, 3, 0));
        assert_eq!(fw.browser, 36);
        assert_eq!(fw.region, ConsoleRegion::Usa);
        assert_eq!(fw.model, ConsoleModel::O3ds);
    }

    #[test]
    fn test_parse_short_form() {
        let fw = v("9.5.0");
        assert_eq!((fw.major, fw.minor, fw.patch), (9, 5, 0));
        assert_eq!(fw.browser, 0);
        assert_eq!(fw.region, ConsoleRegion::Other);
    }

    #[test]
    fn test_parse_lowercase_region() {
        assert_eq!(v("9.0.0-20k").region, ConsoleRegion::Kor);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in [
            "", "11", "11.3", "11.3.0.1", "11.3.0-", "11.3.0-36", "11.3.0-U", "11.3.0-36UU",
            "a.b.c", "+1.0.0", "11.3.0-+36U", " 11.3.0", "11.3.0-36 U",
        ] {
            assert!(
                matches!(
                    FirmwareVersion::parse(bad),
                    Err(VersionError::InvalidVersionFormat(_))
                ),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_forms() {
        let fw = v("11.3.0-36E");
        assert_eq!(fw.to_short_form(), "11.3.0");
        assert_eq!(fw.to_long_form(), "11.3.0-36E");
        assert_eq!(format!("{}", fw), "11.3.0-36E (Old 3DS)");
    }

    #[test]
    fn test_ordering_ignores_patch_for_equality() {
        let a = FirmwareVersion::new(9, 0, 0);
        let b = FirmwareVersion::new(9, 0, 3);
        assert!(a.lt(&b));
        assert!(a.system_version_eq(&b, false));
        assert!(!a.system_version_eq(&b, true));
        assert!(b.lte(&a, false));
        assert!(!b.lte(&a, true));
        assert!(a.gte(&b, false));
        assert!(!a.gte(&b, true));
    }

    #[test]
    fn test_lt_short_circuits() {
        assert!(v("9.9.9").lt(&v("10.0.0")));
        assert!(v("10.0.9").lt(&v("10.1.0")));
        assert!(!v("10.1.0").lt(&v("10.0.9")));
        assert!(v("10.1.0").gt(&v("10.0.9")));
    }

    #[test]
    fn test_is_hackable() {
        assert!(v("11.4.0").is_hackable());
        assert!(v("1.0.0").is_hackable());
        assert!(!v("11.5.0").is_hackable());
        assert!(!v("12.0.0").is_hackable());
    }

    #[test]
    fn test_model_parsing() {
        assert_eq!("N3DS XL".parse::<ConsoleModel>(), Ok(ConsoleModel::N3dsXl));
        assert_eq!("new-2ds-xl".parse::<ConsoleModel>(), Ok(ConsoleModel::N2dsXl));
        assert_eq!("o2ds".parse::<ConsoleModel>(), Ok(ConsoleModel::O2ds));
        assert!("switch".parse::<ConsoleModel>().is_err());
        assert_eq!(ConsoleModel::N2dsXl.generation(), DeviceGeneration::Revised);
        assert_eq!(ConsoleModel::O3dsXl.generation(), DeviceGeneration::Legacy);
    }
}
