//! Path resolution: firmware identity to ordered step list.

use tracing::{debug, warn};

use crate::ranges::{self, Branch};
use crate::step::HackingStep;
use crate::version::{ConsoleRegion, DeviceGeneration, FirmwareVersion};

/// Browser builds above this are always usable.
const BROWSER_ALWAYS_USABLE: u32 = 25;

/// Outcome of resolving a firmware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The firmware falls in a known range. The list may be empty when
    /// the branch has no procedure yet.
    Resolved(Vec<HackingStep>),
    /// The firmware falls in no range of its generation's table.
    Unresolved,
}

impl Resolution {
    pub fn steps(&self) -> Option<&[HackingStep]> {
        match self {
            Resolution::Resolved(steps) => Some(steps),
            Resolution::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

/// Whether the system browser can deliver an exploit.
///
/// Updating the game cartridge's media past 9.9.0 blocks the browser
/// exploits for builds at or below 25.
pub fn is_browser_usable(fw: &FirmwareVersion, media_updated: bool) -> bool {
    if fw.browser > BROWSER_ALWAYS_USABLE {
        return true;
    }
    fw.browser > 0 && (!media_updated || fw.lt(&FirmwareVersion::new(9, 9, 0)))
}

/// Resolve the ordered steps for `fw`.
pub fn resolve(fw: &FirmwareVersion, media_updated: bool) -> Resolution {
    let Some(entry) = ranges::lookup(fw) else {
        warn!(firmware = %fw, "Firmware outside every known range");
        return Resolution::Unresolved;
    };

    debug!(firmware = %fw, range = %entry.range, branch = %entry.branch, "Matched range");

    let steps = match fw.generation() {
        DeviceGeneration::Legacy => legacy_steps(entry.branch, fw, media_updated),
        DeviceGeneration::Revised => revised_steps(entry.branch, fw),
    };
    Resolution::Resolved(steps)
}

fn soundhax_chain() -> Vec<HackingStep> {
    vec![
        HackingStep::HomebrewSoundhax,
        HackingStep::Boot9strapHomebrew,
        HackingStep::Boot9strapFinalSetup,
    ]
}

fn legacy_steps(branch: Branch, fw: &FirmwareVersion, media_updated: bool) -> Vec<HackingStep> {
    let browser = is_browser_usable(fw, media_updated);
    match branch {
        Branch::NoOption => vec![HackingStep::NoOption],
        Branch::TwoXrsa if browser => vec![HackingStep::Boot9strap2xrsa],
        Branch::TwoXrsa => vec![HackingStep::NoOption],
        Branch::BrowserOrMset if browser => vec![
            HackingStep::Boot9strapBrowser,
            HackingStep::Boot9strapFinalSetup,
        ],
        Branch::BrowserOrMset => vec![
            HackingStep::Boot9strapMset,
            HackingStep::Boot9strapFinalSetup,
        ],
        Branch::BrowserOnly if browser => vec![
            HackingStep::Boot9strapBrowser,
            HackingStep::Boot9strapFinalSetup,
        ],
        Branch::BrowserOnly => vec![HackingStep::NoOption],
        Branch::Soundhax => {
            // Soundhax only works on Korean consoles from 9.6.0 onwards.
            if fw.region == ConsoleRegion::Kor && fw.lt(&FirmwareVersion::new(9, 6, 0)) {
                vec![HackingStep::RequiresUpdate]
            } else {
                soundhax_chain()
            }
        }
        // TODO: DSiWare system transfer route for 11.4.0.
        Branch::DsiWare => Vec::new(),
        Branch::CubicNinja => {
            warn!(branch = %branch, "Branch not present in the Old 3DS table");
            Vec::new()
        }
    }
}

fn revised_steps(branch: Branch, fw: &FirmwareVersion) -> Vec<HackingStep> {
    match branch {
        Branch::CubicNinja => {
            if fw.region == ConsoleRegion::Jpn {
                debug!("NTR + Cubic Ninja is not offered, an update is required");
            }
            vec![HackingStep::RequiresUpdate]
        }
        Branch::Soundhax => soundhax_chain(),
        _ => vec![HackingStep::RequiresUpdate],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::HackingStep::*;
    use crate::version::ConsoleModel;

    fn fw(s: &str) -> FirmwareVersion {
        FirmwareVersion::parse(s).unwrap()
    }

    fn steps(version: FirmwareVersion, media_updated: bool) -> Vec<HackingStep> {
        match resolve(&version, media_updated) {
            Resolution::Resolved(steps) => steps,
            Resolution::Unresolved => panic!("{} unresolved", version),
        }
    }

    #[test]
    fn test_browser_predicate() {
        assert!(is_browser_usable(&fw("10.0.0-26U"), true));
        assert!(is_browser_usable(&fw("10.0.0-5U"), false));
        assert!(!is_browser_usable(&fw("10.0.0-5U"), true));
        assert!(is_browser_usable(&fw("9.8.0-5U"), true));
        assert!(!is_browser_usable(&fw("9.9.0-25U"), true));
        assert!(!is_browser_usable(&fw("4.0.0-0U"), false));
        assert!(!is_browser_usable(&fw("4.0.0"), false));
    }

    #[test]
    fn test_no_option_ranges() {
        for media in [false, true] {
            assert_eq!(steps(fw("1.0.0"), media), vec![NoOption]);
            assert_eq!(steps(fw("1.1.0-30U"), media), vec![NoOption]);
            assert_eq!(steps(fw("3.0.0-30U"), media), vec![NoOption]);
        }
    }

    #[test]
    fn test_two_xrsa() {
        assert_eq!(steps(fw("2.1.0-4U"), false), vec![Boot9strap2xrsa]);
        assert_eq!(steps(fw("2.1.0"), false), vec![NoOption]);
    }

    #[test]
    fn test_browser_or_mset() {
        assert_eq!(
            steps(fw("6.0.0-26E"), false),
            vec![Boot9strapBrowser, Boot9strapFinalSetup]
        );
        assert_eq!(
            steps(fw("6.0.0-11E"), false),
            vec![Boot9strapBrowser, Boot9strapFinalSetup]
        );
        // Below 9.9.0 an updated cartridge does not block the browser.
        assert_eq!(
            steps(fw("4.2.0-11E"), true),
            vec![Boot9strapBrowser, Boot9strapFinalSetup]
        );
        assert_eq!(
            steps(fw("6.3.0"), false),
            vec![Boot9strapMset, Boot9strapFinalSetup]
        );
    }

    #[test]
    fn test_browser_only() {
        assert_eq!(
            steps(fw("7.1.0-16J"), false),
            vec![Boot9strapBrowser, Boot9strapFinalSetup]
        );
        assert_eq!(steps(fw("5.0.0"), false), vec![NoOption]);
        assert_eq!(steps(fw("8.1.0"), true), vec![NoOption]);
    }

    #[test]
    fn test_soundhax_legacy() {
        assert_eq!(
            steps(fw("9.0.0-20U"), false),
            vec![HomebrewSoundhax, Boot9strapHomebrew, Boot9strapFinalSetup]
        );
        assert_eq!(
            steps(fw("11.3.0-36E"), true),
            vec![HomebrewSoundhax, Boot9strapHomebrew, Boot9strapFinalSetup]
        );
    }

    #[test]
    fn test_soundhax_korean_gate() {
        assert_eq!(steps(fw("9.0.0-20K"), false), vec![RequiresUpdate]);
        assert_eq!(steps(fw("9.5.0-22K"), true), vec![RequiresUpdate]);
        assert_eq!(
            steps(fw("9.6.0-24K"), false),
            vec![HomebrewSoundhax, Boot9strapHomebrew, Boot9strapFinalSetup]
        );
    }

    #[test]
    fn test_dsiware_deferred() {
        assert_eq!(resolve(&fw("11.4.0-37U"), false), Resolution::Resolved(vec![]));
    }

    #[test]
    fn test_unresolved_legacy() {
        assert_eq!(resolve(&fw("2.0.0"), false), Resolution::Unresolved);
        assert_eq!(resolve(&fw("11.5.0-38U"), false), Resolution::Unresolved);
    }

    #[test]
    fn test_revised() {
        let n3ds = |s: &str| fw(s).with_model(ConsoleModel::N3ds);
        assert_eq!(
            steps(n3ds("9.0.0-20K"), false),
            vec![HomebrewSoundhax, Boot9strapHomebrew, Boot9strapFinalSetup]
        );
        assert_eq!(steps(n3ds("8.1.0-18J"), false), vec![RequiresUpdate]);
        assert_eq!(steps(n3ds("8.1.0-18U"), false), vec![RequiresUpdate]);
        assert_eq!(steps(n3ds("11.4.0-37U"), false), vec![RequiresUpdate]);
        assert_eq!(resolve(&n3ds("8.0.0"), false), Resolution::Unresolved);
        assert_eq!(resolve(&n3ds("12.0.0"), false), Resolution::Unresolved);
    }
}
