//! Download worker contract.
//!
//! The core never downloads anything itself. A [`WorkerFactory`] turns
//! each planned [`HackingResource`] into a unit of work that reports back
//! through a [`PathObserver`].

use std::sync::Arc;

use thiserror::Error;

use crate::events::PathObserver;
use crate::resource::HackingResource;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Download of {url} failed: {message}")]
    DownloadFailed { url: String, message: String },
}

/// A background unit of work bound to one resource.
pub trait ResourceWorker: Send {
    /// Caller-defined tag, echoed in every progress event.
    fn tag(&self) -> &str;

    /// Perform the work, reporting progress to the receiver given at
    /// construction.
    fn run(self: Box<Self>) -> Result<(), WorkerError>;
}

/// Resource to worker factory.
pub trait WorkerFactory: Send + Sync {
    fn worker(
        &self,
        resource: &HackingResource,
        tag: &str,
        receiver: Arc<dyn PathObserver>,
    ) -> Box<dyn ResourceWorker>;
}

/// Build one worker per resource, tagged with its destination file name.
///
/// Resources are processed in sorted order so the plan is deterministic.
pub fn plan_workers<'a, I>(
    resources: I,
    factory: &dyn WorkerFactory,
    receiver: Arc<dyn PathObserver>,
) -> Vec<Box<dyn ResourceWorker>>
where
    I: IntoIterator<Item = &'a HackingResource>,
{
    let mut sorted: Vec<&HackingResource> = resources.into_iter().collect();
    sorted.sort();
    sorted
        .into_iter()
        .map(|r| factory.worker(r, &r.file_name(), Arc::clone(&receiver)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::PathEvent;
    use crate::events::recording::RecordingObserver;

    struct EchoWorker {
        tag: String,
        url: String,
        receiver: Arc<dyn PathObserver>,
    }

    impl ResourceWorker for EchoWorker {
        fn tag(&self) -> &str {
            &self.tag
        }

        fn run(self: Box<Self>) -> Result<(), WorkerError> {
            if self.url.is_empty() {
                self.receiver.on_event(&PathEvent::Failed {
                    tag: self.tag.clone(),
                    message: "empty url".into(),
                });
                return Err(WorkerError::DownloadFailed {
                    url: self.url,
                    message: "empty url".into(),
                });
            }
            self.receiver.on_event(&PathEvent::Progress {
                tag: self.tag.clone(),
                current: 1,
                total: 1,
            });
            self.receiver.on_event(&PathEvent::Finished {
                tag: self.tag.clone(),
            });
            Ok(())
        }
    }

    struct EchoFactory;

    impl WorkerFactory for EchoFactory {
        fn worker(
            &self,
            resource: &HackingResource,
            tag: &str,
            receiver: Arc<dyn PathObserver>,
        ) -> Box<dyn ResourceWorker> {
            Box::new(EchoWorker {
                tag: tag.to_string(),
                url: resource.url.clone(),
                receiver,
            })
        }
    }

    #[test]
    fn test_plan_and_run() {
        let resources = vec![
            HackingResource::new("https://example.org/b", "sd/b.bin"),
            HackingResource::new("https://example.org/a", "sd/a.bin"),
        ];
        let obs = Arc::new(RecordingObserver::default());
        let workers = plan_workers(&resources, &EchoFactory, obs.clone());

        let tags: Vec<_> = workers.iter().map(|w| w.tag().to_string()).collect();
        assert_eq!(tags, vec!["a.bin", "b.bin"]);

        for w in workers {
            w.run().unwrap();
        }
        assert_eq!(
            obs.rendered(),
            vec!["a.bin: 1/1", "a.bin: done", "b.bin: 1/1", "b.bin: done"]
        );
    }

    #[test]
    fn test_failure_reported() {
        let resources = [HackingResource::new("", "sd/x.bin")];
        let obs = Arc::new(RecordingObserver::default());
        let mut workers = plan_workers(&resources, &EchoFactory, obs.clone());

        let err = workers.remove(0).run().unwrap_err();
        assert!(matches!(err, WorkerError::DownloadFailed { .. }));
        assert_eq!(obs.rendered(), vec!["x.bin: empty url"]);
    }
}
