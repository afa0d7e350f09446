//! Firmware range tables.
//!
//! One table per device generation. Each entry maps an inclusive firmware
//! range to the branch of the procedure that applies to it. Entries are
//! ascending and never overlap; lookups return the first match.

use std::fmt;

use crate::version::{DeviceGeneration, FirmwareVersion};

/// Inclusive firmware range. Bounds are compared ignoring `patch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    pub from: FirmwareVersion,
    pub to: FirmwareVersion,
}

impl VersionRange {
    pub const fn new(from: FirmwareVersion, to: FirmwareVersion) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, version: &FirmwareVersion) -> bool {
        version.gte(&self.from, false) && version.lte(&self.to, false)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.from.to_short_form(), self.to.to_short_form())
    }
}

/// Procedure branch selected by a range entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    /// Nothing works on these firmwares.
    NoOption,
    /// 2xrsa, browser required.
    TwoXrsa,
    /// Browser exploit, or MSET when the browser is unusable.
    BrowserOrMset,
    /// Browser exploit only.
    BrowserOnly,
    /// Soundhax into the Homebrew Launcher.
    Soundhax,
    /// DSiWare system transfer.
    DsiWare,
    /// NTR + Cubic Ninja, Japanese consoles only.
    CubicNinja,
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::NoOption => write!(f, "No option"),
            Branch::TwoXrsa => write!(f, "2xrsa"),
            Branch::BrowserOrMset => write!(f, "Browser / MSET"),
            Branch::BrowserOnly => write!(f, "Browser"),
            Branch::Soundhax => write!(f, "Soundhax"),
            Branch::DsiWare => write!(f, "DSiWare"),
            Branch::CubicNinja => write!(f, "NTR + Cubic Ninja"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeEntry {
    pub range: VersionRange,
    pub branch: Branch,
}

const fn entry(from: (u32, u32, u32), to: (u32, u32, u32), branch: Branch) -> RangeEntry {
    RangeEntry {
        range: VersionRange::new(
            FirmwareVersion::new(from.0, from.1, from.2),
            FirmwareVersion::new(to.0, to.1, to.2),
        ),
        branch,
    }
}

/// Old 3DS / 3DS XL / 2DS.
pub const LEGACY_RANGES: &[RangeEntry] = &[
    entry((1, 0, 0), (1, 1, 0), Branch::NoOption),
    entry((2, 1, 0), (2, 1, 0), Branch::TwoXrsa),
    entry((2, 2, 0), (3, 1, 0), Branch::NoOption),
    entry((4, 0, 0), (4, 5, 0), Branch::BrowserOrMset),
    entry((5, 0, 0), (5, 1, 0), Branch::BrowserOnly),
    entry((6, 0, 0), (6, 3, 0), Branch::BrowserOrMset),
    entry((7, 0, 0), (8, 1, 0), Branch::BrowserOnly),
    entry((9, 0, 0), (11, 3, 0), Branch::Soundhax),
    entry((11, 4, 0), (11, 4, 0), Branch::DsiWare),
];

/// New 3DS / New 3DS XL / New 2DS XL.
pub const REVISED_RANGES: &[RangeEntry] = &[
    entry((8, 1, 0), (8, 1, 0), Branch::CubicNinja),
    entry((9, 0, 0), (11, 3, 0), Branch::Soundhax),
    entry((11, 4, 0), (11, 4, 0), Branch::DsiWare),
];

pub fn table_for(generation: DeviceGeneration) -> &'static [RangeEntry] {
    match generation {
        DeviceGeneration::Legacy => LEGACY_RANGES,
        DeviceGeneration::Revised => REVISED_RANGES,
    }
}

/// First entry of the version's generation table containing it.
pub fn lookup(version: &FirmwareVersion) -> Option<&'static RangeEntry> {
    table_for(version.generation())
        .iter()
        .find(|e| e.range.contains(version))
}

/// Format a table as markdown.
pub fn to_markdown(generation: DeviceGeneration) -> String {
    let mut out = String::new();
    out.push_str(&format!("### {}\n\n", generation));
    out.push_str("| # | From | To | Branch |\n");
    out.push_str("|---|------|----|--------|\n");
    for (i, e) in table_for(generation).iter().enumerate() {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            i,
            e.range.from.to_short_form(),
            e.range.to.to_short_form(),
            e.branch
        ));
    }
    out
}
