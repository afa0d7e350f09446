//! Declarative resource catalog.
//!
//! Maps each step to the files it needs, resolving download locations
//! through the [`UrlTable`]. Archives land in the hacking directory,
//! files the console reads directly land on the SD card.

use std::path::{Path, PathBuf};

use tracing::warn;

use super::traits::{HackingProcess, ProcessRegistry};
use crate::resource::HackingResource;
use crate::step::HackingStep;
use crate::urls::{UrlKey, UrlTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Root {
    Hacking,
    SdCard,
}

/// One catalog line: URL key, destination root, relative destination.
type Requirement = (UrlKey, Root, &'static str);

const B9S_INSTALL: &[Requirement] = &[
    (UrlKey::Boot9strap, Root::Hacking, "boot9strap.zip"),
    (UrlKey::SafeB9sInstaller, Root::Hacking, "SafeB9SInstaller.zip"),
    (UrlKey::Luma3ds, Root::Hacking, "Luma3DS.zip"),
];

fn requirements(step: HackingStep) -> Option<Vec<Requirement>> {
    let extra: &[Requirement] = match step {
        HackingStep::NoOption | HackingStep::RequiresUpdate => return None,
        HackingStep::Boot9strap2xrsa => &[(UrlKey::TwoXrsa, Root::SdCard, "arm11code.bin")],
        HackingStep::Boot9strapBrowser => &[(UrlKey::Browserhax, Root::SdCard, "arm11code.bin")],
        HackingStep::Boot9strapMset => &[(UrlKey::Msethax, Root::SdCard, "Launcher.dat")],
        HackingStep::HomebrewSoundhax => {
            return Some(vec![
                (UrlKey::Soundhax, Root::SdCard, "soundhax.m4a"),
                (UrlKey::Otherapp, Root::SdCard, "otherapp.bin"),
            ]);
        }
        HackingStep::Boot9strapHomebrew => &[],
        HackingStep::Boot9strapFinalSetup => {
            return Some(vec![
                (UrlKey::Luma3ds, Root::Hacking, "Luma3DS.zip"),
                (UrlKey::GodMode9, Root::Hacking, "GodMode9.zip"),
                (UrlKey::Fbi, Root::SdCard, "cias/FBI.cia"),
            ]);
        }
    };
    Some(extra.iter().chain(B9S_INSTALL).copied().collect())
}

/// Process backed by the catalog.
#[derive(Debug, Clone)]
pub struct CatalogProcess {
    step: HackingStep,
    resources: Vec<HackingResource>,
}

impl HackingProcess for CatalogProcess {
    fn step(&self) -> HackingStep {
        self.step
    }

    fn required_resources(&self) -> Option<Vec<HackingResource>> {
        if self.resources.is_empty() {
            None
        } else {
            Some(self.resources.clone())
        }
    }
}

/// Registry resolving catalog entries against a URL table.
#[derive(Debug, Clone, Default)]
pub struct CatalogRegistry {
    urls: UrlTable,
}

impl CatalogRegistry {
    pub fn new(urls: UrlTable) -> Self {
        Self { urls }
    }

    pub fn urls(&self) -> &UrlTable {
        &self.urls
    }
}

impl ProcessRegistry for CatalogRegistry {
    fn lookup(
        &self,
        step: HackingStep,
        hacking_dir: &Path,
        sd_card_dir: &Path,
    ) -> Option<Box<dyn HackingProcess>> {
        let reqs = requirements(step)?;
        let mut resources = Vec::with_capacity(reqs.len());
        for (key, root, rel) in reqs {
            let Some(url) = self.urls.get(key) else {
                warn!(step = %step, key = %key, "URL table has no entry, skipping resource");
                continue;
            };
            let base: &Path = match root {
                Root::Hacking => hacking_dir,
                Root::SdCard => sd_card_dir,
            };
            let out: PathBuf = base.join(rel);
            resources.push(HackingResource::new(url, out));
        }
        Some(Box::new(CatalogProcess { step, resources }))
    }
}
