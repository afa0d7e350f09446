//! Downloadable resources and their aggregation across a path.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::process::ProcessRegistry;
use crate::step::HackingStep;

/// A remote artifact and where it must be stored.
///
/// Two resources are the same download only when both the URL and the
/// destination match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HackingResource {
    pub url: String,
    pub out: PathBuf,
}

impl HackingResource {
    pub fn new(url: impl Into<String>, out: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            out: out.into(),
        }
    }

    /// Destination file name, used as the worker tag.
    pub fn file_name(&self) -> String {
        self.out
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

impl fmt::Display for HackingResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.url, self.out.display())
    }
}

/// Collect the resources required by every step, without duplicates.
///
/// Steps without a process, or whose process declares nothing, are skipped.
pub fn aggregate_resources(
    steps: &[HackingStep],
    registry: &dyn ProcessRegistry,
    hacking_dir: &Path,
    sd_card_dir: &Path,
) -> HashSet<HackingResource> {
    let mut set = HashSet::new();
    for step in steps {
        let Some(process) = registry.lookup(*step, hacking_dir, sd_card_dir) else {
            debug!(step = %step, "No process for step");
            continue;
        };
        if let Some(resources) = process.required_resources() {
            debug!(step = %step, count = resources.len(), "Step resources");
            set.extend(resources);
        }
    }
    set
}
