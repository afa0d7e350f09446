//! Step process abstraction.
//!
//! A process is the concrete work behind a step: fetching files,
//! copying them to the SD card, guiding the user. The core only needs to
//! know which resources a process requires, so that is all these traits
//! expose.

use std::path::Path;

use crate::resource::HackingResource;
use crate::step::HackingStep;

/// The work behind a single step.
pub trait HackingProcess: Send + Sync {
    /// The step this process implements.
    fn step(&self) -> HackingStep;

    /// Resources to download before running, `None` when the step has
    /// no download component.
    fn required_resources(&self) -> Option<Vec<HackingResource>>;
}

/// Step to process lookup.
///
/// This trait enables:
/// - A declarative catalog built from the URL table
/// - Mock registries for unit testing
/// - Front ends with their own process implementations
pub trait ProcessRegistry: Send + Sync {
    /// Bind a process for `step` to the working and SD card directories.
    fn lookup(
        &self,
        step: HackingStep,
        hacking_dir: &Path,
        sd_card_dir: &Path,
    ) -> Option<Box<dyn HackingProcess>>;
}
