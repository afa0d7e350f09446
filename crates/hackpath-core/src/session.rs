//! Path session - caller-owned resolver context.
//!
//! Holds the configuration, the observer and the outcome of the last
//! resolution. Nothing here is global: every front end owns its session.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::events::{PathEvent, PathObserver, TracingObserver};
use crate::path::HackingPath;
use crate::process::ProcessRegistry;
use crate::resolver::{self, Resolution};
use crate::resource::HackingResource;
use crate::step::HackingStep;
use crate::urls::UrlTable;
use crate::version::{ConsoleModel, FirmwareVersion, VersionError};
use crate::worker::{self, ResourceWorker, WorkerFactory};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Firmware was not specified")]
    MissingFirmwareIdentity,

    #[error("Hacking path has not been resolved")]
    UninitializedResolverAccess,

    #[error("Firmware {0} is outside every known range")]
    UnresolvedRange(String),

    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Configuration for a path session.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Firmware in long (`11.3.0-36U`) or short (`11.3.0`) form.
    pub firmware: Option<String>,
    /// Console model.
    #[serde(default)]
    pub model: ConsoleModel,
    /// Whether the game cartridge's media was ever updated.
    #[serde(default)]
    pub media_updated: bool,
    /// Working directory for downloaded archives.
    pub hacking_dir: Option<PathBuf>,
    /// Mount point of the SD card.
    pub sd_card_dir: Option<PathBuf>,
    /// Download locations.
    #[serde(default)]
    pub urls: UrlTable,
}

impl SessionConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SessionConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Parse the configured firmware, applying the configured model.
    pub fn firmware_version(&self) -> Result<FirmwareVersion, SessionError> {
        let text = self
            .firmware
            .as_deref()
            .ok_or(SessionError::MissingFirmwareIdentity)?;
        Ok(FirmwareVersion::parse(text)?.with_model(self.model))
    }
}

#[derive(Debug)]
enum SessionState {
    Uninitialized,
    Unresolved(FirmwareVersion),
    Resolved(HackingPath),
}

/// Path session - resolves a firmware and walks its steps.
pub struct PathSession<O: PathObserver> {
    config: SessionConfig,
    observer: Arc<O>,
    state: SessionState,
}

impl PathSession<TracingObserver> {
    /// Create a new session with default tracing observer.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_observer(config, Arc::new(TracingObserver))
    }
}

impl<O: PathObserver + 'static> PathSession<O> {
    /// Create a new session with a custom observer.
    pub fn with_observer(config: SessionConfig, observer: Arc<O>) -> Self {
        Self {
            config,
            observer,
            state: SessionState::Uninitialized,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Resolve the configured firmware, replacing any previous path.
    #[instrument(skip(self))]
    pub fn resolve(&mut self) -> Result<Resolution, SessionError> {
        let firmware = self.config.firmware_version()?;
        let media_updated = self.config.media_updated;

        let resolution = resolver::resolve(&firmware, media_updated);
        match &resolution {
            Resolution::Resolved(steps) => {
                debug!(firmware = %firmware, steps = steps.len(), "Resolved");
                self.observer.on_event(&PathEvent::Resolved {
                    firmware: firmware.to_long_form(),
                    steps: steps.clone(),
                });
                let path = HackingPath::from_steps(firmware, media_updated, steps.clone())
                    .with_dirs(
                        self.config.hacking_dir.clone().unwrap_or_default(),
                        self.config.sd_card_dir.clone().unwrap_or_default(),
                    );
                self.state = SessionState::Resolved(path);
            }
            Resolution::Unresolved => {
                self.observer.on_event(&PathEvent::Unresolved {
                    firmware: firmware.to_long_form(),
                });
                self.state = SessionState::Unresolved(firmware);
            }
        }
        Ok(resolution)
    }

    /// The resolved path. Fails before a successful resolution.
    pub fn path(&self) -> Result<&HackingPath, SessionError> {
        match &self.state {
            SessionState::Resolved(path) => Ok(path),
            SessionState::Unresolved(fw) => Err(SessionError::UnresolvedRange(fw.to_long_form())),
            SessionState::Uninitialized => Err(SessionError::UninitializedResolverAccess),
        }
    }

    pub fn path_mut(&mut self) -> Result<&mut HackingPath, SessionError> {
        match &mut self.state {
            SessionState::Resolved(path) => Ok(path),
            SessionState::Unresolved(fw) => Err(SessionError::UnresolvedRange(fw.to_long_form())),
            SessionState::Uninitialized => Err(SessionError::UninitializedResolverAccess),
        }
    }

    pub fn current_step(&self) -> Result<Option<HackingStep>, SessionError> {
        Ok(self.path()?.current())
    }

    /// Advance the cursor and notify the observer.
    pub fn advance(&mut self) -> Result<Option<HackingStep>, SessionError> {
        let path = self.path_mut()?;
        let from = path.current();
        let to = path.advance();
        self.observer.on_event(&PathEvent::StepChanged { from, to });
        Ok(to)
    }

    /// Unique resources needed by the whole path.
    #[instrument(skip(self, registry))]
    pub fn plan_resources(
        &self,
        registry: &dyn ProcessRegistry,
    ) -> Result<Vec<HackingResource>, SessionError> {
        let resources = self.path()?.resolve_resources(registry);
        self.observer.on_event(&PathEvent::ResourcesPlanned {
            count: resources.len(),
        });
        Ok(resources)
    }

    /// One worker per planned resource, reporting to this session's observer.
    pub fn plan_workers(
        &self,
        registry: &dyn ProcessRegistry,
        factory: &dyn WorkerFactory,
    ) -> Result<Vec<Box<dyn ResourceWorker>>, SessionError> {
        let resources = self.plan_resources(registry)?;
        let receiver: Arc<dyn PathObserver> = self.observer.clone();
        Ok(worker::plan_workers(&resources, factory, receiver))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::recording::RecordingObserver;
    use crate::process::MockRegistry;

    fn config(firmware: &str) -> SessionConfig {
        SessionConfig {
            firmware: Some(firmware.to_string()),
            hacking_dir: Some(PathBuf::from("hack")),
            sd_card_dir: Some(PathBuf::from("sd")),
            ..Default::default()
        }
    }

    #[test]
    fn test_access_before_resolve_fails() {
        let mut session =
            PathSession::with_observer(config("10.0.0"), Arc::new(RecordingObserver::default()));
        assert!(matches!(
            session.path(),
            Err(SessionError::UninitializedResolverAccess)
        ));
        assert!(matches!(
            session.advance(),
            Err(SessionError::UninitializedResolverAccess)
        ));
        assert!(session.plan_resources(&MockRegistry::new()).is_err());
    }

    #[test]
    fn test_missing_firmware() {
        let mut session = PathSession::with_observer(
            SessionConfig::default(),
            Arc::new(RecordingObserver::default()),
        );
        assert!(matches!(
            session.resolve(),
            Err(SessionError::MissingFirmwareIdentity)
        ));
    }

    #[test]
    fn test_invalid_firmware() {
        let mut session =
            PathSession::with_observer(config("eleven"), Arc::new(RecordingObserver::default()));
        assert!(matches!(
            session.resolve(),
            Err(SessionError::Version(VersionError::InvalidVersionFormat(_)))
        ));
    }

    #[test]
    fn test_unresolved_is_distinct() {
        let obs = Arc::new(RecordingObserver::default());
        let mut session = PathSession::with_observer(config("12.0.0"), obs.clone());
        assert_eq!(session.resolve().unwrap(), Resolution::Unresolved);
        assert!(matches!(session.path(), Err(SessionError::UnresolvedRange(_))));
        assert_eq!(obs.rendered(), vec!["12.0.0-0X is not in any range"]);
    }

    #[test]
    fn test_walk_and_plan() {
        let obs = Arc::new(RecordingObserver::default());
        let mut session = PathSession::with_observer(config("9.2.0-20E"), obs.clone());
        let resolution = session.resolve().unwrap();
        assert_eq!(resolution.steps().map(|s| s.len()), Some(3));
        assert_eq!(session.path().unwrap().hacking_dir(), std::path::Path::new("hack"));

        let registry = MockRegistry::new().with_resources(
            HackingStep::Boot9strapFinalSetup,
            vec![HackingResource::new("u", "hack/x.zip")],
        );
        assert_eq!(session.plan_resources(&registry).unwrap().len(), 1);

        assert_eq!(
            session.advance().unwrap(),
            Some(HackingStep::Boot9strapHomebrew)
        );
        assert_eq!(
            session.current_step().unwrap(),
            Some(HackingStep::Boot9strapHomebrew)
        );

        assert_eq!(
            obs.rendered(),
            vec![
                "9.2.0-20E resolved to 3 step(s)",
                "1 resource(s) planned",
                "Homebrew Launcher (Soundhax) -> Install boot9strap (Homebrew Launcher)",
            ]
        );
    }

    #[test]
    fn test_advance_reports_once_per_transition() {
        let obs = Arc::new(RecordingObserver::default());
        let mut session = PathSession::with_observer(config("10.0.0-27U"), obs.clone());
        session.resolve().unwrap();
        while session.advance().unwrap().is_some() {}
        session.advance().unwrap();

        let changes: Vec<_> = obs.rendered().into_iter().skip(1).collect();
        assert_eq!(
            changes,
            vec![
                "Homebrew Launcher (Soundhax) -> Install boot9strap (Homebrew Launcher)",
                "Install boot9strap (Homebrew Launcher) -> Finalizing setup",
                "Finalizing setup -> end",
                "end -> end",
            ]
        );
    }

    struct TagOnly(String);

    impl ResourceWorker for TagOnly {
        fn tag(&self) -> &str {
            &self.0
        }

        fn run(self: Box<Self>) -> Result<(), crate::worker::WorkerError> {
            Ok(())
        }
    }

    struct TagFactory;

    impl WorkerFactory for TagFactory {
        fn worker(
            &self,
            _resource: &HackingResource,
            tag: &str,
            _receiver: Arc<dyn PathObserver>,
        ) -> Box<dyn ResourceWorker> {
            Box::new(TagOnly(tag.to_string()))
        }
    }

    #[test]
    fn test_plan_workers() {
        let mut session =
            PathSession::with_observer(config("9.2.0-20E"), Arc::new(RecordingObserver::default()));
        session.resolve().unwrap();
        let registry = MockRegistry::new()
            .with_resources(
                HackingStep::HomebrewSoundhax,
                vec![HackingResource::new("u1", "sd/soundhax.m4a")],
            )
            .with_resources(
                HackingStep::Boot9strapFinalSetup,
                vec![HackingResource::new("u2", "hack/Luma3DS.zip")],
            );
        let workers = session.plan_workers(&registry, &TagFactory).unwrap();
        let tags: Vec<_> = workers.iter().map(|w| w.tag().to_string()).collect();
        assert_eq!(tags, vec!["soundhax.m4a", "Luma3DS.zip"]);
    }

    #[test]
    fn test_model_applied() {
        let mut cfg = config("8.1.0-18J");
        cfg.model = ConsoleModel::N3ds;
        let mut session = PathSession::with_observer(cfg, Arc::new(RecordingObserver::default()));
        session.resolve().unwrap();
        assert!(session.path().unwrap().requires_update());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("hackpath.toml");

        let mut cfg = config("11.3.0-36U");
        cfg.model = ConsoleModel::N2dsXl;
        cfg.media_updated = true;
        cfg.urls.insert(crate::urls::UrlKey::Guide, "https://3ds.hacks.guide");
        cfg.save_to_file(&file).unwrap();

        let loaded = SessionConfig::load_from_file(&file).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn test_config_minimal() {
        let cfg: SessionConfig = toml::from_str("firmware = \"9.0.0\"\nmodel = \"n3dsxl\"").unwrap();
        assert_eq!(cfg.model, ConsoleModel::N3dsXl);
        assert!(!cfg.media_updated);
        assert!(cfg.urls.is_empty());
        assert_eq!(cfg.firmware_version().unwrap().model, ConsoleModel::N3dsXl);
    }
}
