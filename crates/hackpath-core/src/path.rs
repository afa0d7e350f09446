//! Resolved hacking path and its step cursor.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::process::{HackingProcess, ProcessRegistry};
use crate::resolver::{self, Resolution};
use crate::resource::{HackingResource, aggregate_resources};
use crate::step::HackingStep;
use crate::version::FirmwareVersion;

/// Ordered steps for one firmware, with a cursor on the current step.
///
/// The step list never changes after resolution. The cursor only moves
/// forward, from 0 up to `len()`, where the path is exhausted.
pub struct HackingPath {
    steps: Vec<HackingStep>,
    index: usize,
    firmware: FirmwareVersion,
    media_updated: bool,
    hacking_dir: PathBuf,
    sd_card_dir: PathBuf,
    /// Process for the current step. Outer `None` means not looked up yet.
    process: Option<Option<Box<dyn HackingProcess>>>,
}

impl HackingPath {
    /// Resolve `firmware`. Returns `None` when it falls in no known range.
    pub fn resolve(firmware: FirmwareVersion, media_updated: bool) -> Option<Self> {
        match resolver::resolve(&firmware, media_updated) {
            Resolution::Resolved(steps) => Some(Self::from_steps(firmware, media_updated, steps)),
            Resolution::Unresolved => None,
        }
    }

    pub fn from_steps(
        firmware: FirmwareVersion,
        media_updated: bool,
        steps: Vec<HackingStep>,
    ) -> Self {
        Self {
            steps,
            index: 0,
            firmware,
            media_updated,
            hacking_dir: PathBuf::new(),
            sd_card_dir: PathBuf::new(),
            process: None,
        }
    }

    /// Set the working and SD card directories processes are bound to.
    pub fn with_dirs(
        mut self,
        hacking_dir: impl Into<PathBuf>,
        sd_card_dir: impl Into<PathBuf>,
    ) -> Self {
        self.hacking_dir = hacking_dir.into();
        self.sd_card_dir = sd_card_dir.into();
        self.process = None;
        self
    }

    pub fn steps(&self) -> &[HackingStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn firmware(&self) -> &FirmwareVersion {
        &self.firmware
    }

    pub fn media_updated(&self) -> bool {
        self.media_updated
    }

    pub fn hacking_dir(&self) -> &Path {
        &self.hacking_dir
    }

    pub fn sd_card_dir(&self) -> &Path {
        &self.sd_card_dir
    }

    /// Current step, `None` once the path is exhausted.
    pub fn current(&self) -> Option<HackingStep> {
        self.steps.get(self.index).copied()
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.steps.len()
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.steps.len()
    }

    /// Move to the next step. Drops the cached process.
    pub fn advance(&mut self) -> Option<HackingStep> {
        let from = self.current();
        if self.index < self.steps.len() {
            self.index += 1;
        }
        self.process = None;
        let to = self.current();
        debug!(
            from = %from.map(|s| s.to_string()).unwrap_or_default(),
            to = %to.map(|s| s.to_string()).unwrap_or_default(),
            index = self.index,
            "Advanced"
        );
        to
    }

    /// Process for the current step, looked up on first access.
    pub fn process(&mut self, registry: &dyn ProcessRegistry) -> Option<&dyn HackingProcess> {
        if self.process.is_none() {
            let looked_up = self
                .current()
                .and_then(|step| registry.lookup(step, &self.hacking_dir, &self.sd_card_dir));
            self.process = Some(looked_up);
        }
        self.process.as_ref().and_then(|p| p.as_deref())
    }

    /// Whether the only way forward is a system update.
    pub fn requires_update(&self) -> bool {
        self.steps == [HackingStep::RequiresUpdate]
    }

    pub fn is_hackable(&self) -> bool {
        self.firmware.is_hackable()
    }

    pub fn is_browser_usable(&self) -> bool {
        resolver::is_browser_usable(&self.firmware, self.media_updated)
    }

    /// Unique resources for the whole path, sorted.
    pub fn resolve_resources(&self, registry: &dyn ProcessRegistry) -> Vec<HackingResource> {
        let mut resources: Vec<_> =
            aggregate_resources(&self.steps, registry, &self.hacking_dir, &self.sd_card_dir)
                .into_iter()
                .collect();
        resources.sort();
        resources
    }
}

impl fmt::Debug for HackingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HackingPath")
            .field("steps", &self.steps)
            .field("index", &self.index)
            .field("firmware", &self.firmware)
            .field("media_updated", &self.media_updated)
            .field("hacking_dir", &self.hacking_dir)
            .field("sd_card_dir", &self.sd_card_dir)
            .field("process_cached", &self.process.is_some())
            .finish()
    }
}
