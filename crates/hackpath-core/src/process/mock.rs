//! Mock process registry for testing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::traits::{HackingProcess, ProcessRegistry};
use crate::resource::HackingResource;
use crate::step::HackingStep;

/// Process returning a fixed resource list.
#[derive(Debug, Clone)]
pub struct MockProcess {
    step: HackingStep,
    resources: Option<Vec<HackingResource>>,
    /// Directories the process was bound to.
    pub hacking_dir: PathBuf,
    pub sd_card_dir: PathBuf,
}

impl HackingProcess for MockProcess {
    fn step(&self) -> HackingStep {
        self.step
    }

    fn required_resources(&self) -> Option<Vec<HackingResource>> {
        self.resources.clone()
    }
}

/// Mock registry for unit testing path and aggregation logic.
#[derive(Debug, Default)]
pub struct MockRegistry {
    /// Registered steps. `None` means a process without resources.
    entries: HashMap<HackingStep, Option<Vec<HackingResource>>>,
    /// Captured lookups, in order.
    lookup_log: Arc<Mutex<Vec<HackingStep>>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a step whose process declares no resources.
    pub fn with_process(mut self, step: HackingStep) -> Self {
        self.entries.insert(step, None);
        self
    }

    /// Register a step whose process declares `resources`.
    pub fn with_resources(mut self, step: HackingStep, resources: Vec<HackingResource>) -> Self {
        self.entries.insert(step, Some(resources));
        self
    }

    /// Get all captured lookups.
    pub fn get_lookups(&self) -> Vec<HackingStep> {
        self.lookup_log.lock().unwrap().clone()
    }

    /// Clear captured lookups.
    pub fn clear_lookups(&self) {
        self.lookup_log.lock().unwrap().clear();
    }
}

impl ProcessRegistry for MockRegistry {
    fn lookup(
        &self,
        step: HackingStep,
        hacking_dir: &Path,
        sd_card_dir: &Path,
    ) -> Option<Box<dyn HackingProcess>> {
        self.lookup_log.lock().unwrap().push(step);
        let resources = self.entries.get(&step)?.clone();
        Some(Box::new(MockProcess {
            step,
            resources,
            hacking_dir: hacking_dir.to_path_buf(),
            sd_card_dir: sd_card_dir.to_path_buf(),
        }))
    }
}
