//! Asynchronous report jobs and handles to them.

use std::{cell::RefCell, fmt, rc::Rc};

/// Kind of a job which platforms may or may not be capable of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum JobKind {
    /// Building an analysis report of a shader, a compute shader or a material.
    BuildReport,
}

impl fmt::Display for JobKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuildReport => f.write_str("build-report"),
        }
    }
}

/// A unit of cooperative asynchronous work.
///
/// Jobs are advanced by the host one step at a time, each call to [`tick`](AsyncJob::tick)
/// must return quickly.
pub trait AsyncJob {
    /// Advances the job by one step.
    ///
    /// Returns `true` if the job has completed.
    fn tick(&mut self) -> bool;

    /// Returns whether the job has completed.
    fn is_complete(&self) -> bool;

    /// Progress of the job in range `0.0..=1.0`.
    #[inline]
    fn progress(&self) -> f32 {
        if self.is_complete() {
            1.0
        } else {
            0.0
        }
    }

    /// Short description of what the job is currently doing.
    #[inline]
    fn message(&self) -> String {
        if self.is_complete() {
            "done".to_owned()
        } else {
            "running".to_owned()
        }
    }

    /// Why the job did not produce a usable report, if it failed.
    ///
    /// Only meaningful once the job is complete.
    #[inline]
    fn failure(&self) -> Option<String> {
        None
    }
}

/// Shared handle to a submitted [job](AsyncJob).
///
/// The manager keeps one handle in order to advance the job,
/// any other clone may be used to poll the job's state.
#[derive(Clone)]
pub struct JobHandle(Rc<RefCell<Box<dyn AsyncJob>>>);

impl JobHandle {
    /// Wraps the job into a new handle.
    #[inline]
    #[must_use]
    pub fn new(job: Box<dyn AsyncJob>) -> Self {
        Self(Rc::new(RefCell::new(job)))
    }

    /// Returns whether the job has completed.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.0.borrow().is_complete()
    }

    /// Progress of the job in range `0.0..=1.0`.
    #[inline]
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.0.borrow().progress()
    }

    /// Short description of what the job is currently doing.
    #[inline]
    #[must_use]
    pub fn message(&self) -> String {
        self.0.borrow().message()
    }

    /// Why the job failed, if it did.
    #[inline]
    #[must_use]
    pub fn failure(&self) -> Option<String> {
        self.0.borrow().failure()
    }

    /// Returns whether both handles point to the same job.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Advances the job by one step, returning whether it has completed.
    pub(crate) fn tick(&self) -> bool {
        self.0.borrow_mut().tick()
    }
}

impl fmt::Debug for JobHandle {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobHandle")
            .field("complete", &self.is_complete())
            .field("progress", &self.progress())
            .finish()
    }
}
