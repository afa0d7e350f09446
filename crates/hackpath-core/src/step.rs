//! Procedure steps.

use std::fmt;

/// One user-facing action of a hacking path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HackingStep {
    /// No method exists for this firmware.
    NoOption,
    /// A system update is required before any method applies.
    RequiresUpdate,
    /// Install boot9strap directly through the 2xrsa browser exploit.
    Boot9strap2xrsa,
    /// Install boot9strap through a browser exploit.
    Boot9strapBrowser,
    /// Install boot9strap through the System Settings exploit.
    Boot9strapMset,
    /// Launch the Homebrew Launcher through Soundhax.
    HomebrewSoundhax,
    /// Install boot9strap from the Homebrew Launcher.
    Boot9strapHomebrew,
    /// Final setup after boot9strap is installed.
    Boot9strapFinalSetup,
}

impl fmt::Display for HackingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HackingStep::NoOption => write!(f, "No option available"),
            HackingStep::RequiresUpdate => write!(f, "Requires a system update"),
            HackingStep::Boot9strap2xrsa => write!(f, "Install boot9strap (2xrsa)"),
            HackingStep::Boot9strapBrowser => write!(f, "Install boot9strap (Browser)"),
            HackingStep::Boot9strapMset => write!(f, "Install boot9strap (MSET)"),
            HackingStep::HomebrewSoundhax => write!(f, "Homebrew Launcher (Soundhax)"),
            HackingStep::Boot9strapHomebrew => write!(f, "Install boot9strap (Homebrew Launcher)"),
            HackingStep::Boot9strapFinalSetup => write!(f, "Finalizing setup"),
        }
    }
}
