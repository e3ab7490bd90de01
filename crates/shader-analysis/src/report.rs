//! This module provides [`ShaderAnalysisReport`], the manager of report jobs.
//!
//! The manager accepts requests to build a report of some asset for some platform,
//! and advances exactly one job per host tick until its queue drains:
//! * an asset which is neither a shader, a compute shader nor a material is rejected
//!   with an error,
//! * a platform without a registered factory capable of [building reports](JobKind::BuildReport)
//!   is reported as a warning and no job is created,
//! * completed jobs are removed from the queue, and if any job is still left after that
//!   the request is reported as a warning and no job is created,
//! * otherwise the environment is prepared, the platform's factory creates the job,
//!   and the manager subscribes to the host's [tick source](TickSource).

use std::{
    collections::{HashMap, VecDeque},
    convert::Infallible,
};

use crate::{
    asset::{Asset, InvalidAssetError},
    job::{JobHandle, JobKind},
    platform::{BuildTarget, PlatformJobFactory},
    tick::{NoopTickSource, Subscription, TickSource, UnbalancedUnsubscribeError},
};

/// Sink of non-fatal diagnostics.
pub trait Diagnostics {
    /// Reports a warning.
    fn warn(&mut self, message: &str);
}

/// [`Diagnostics`] forwarding warnings to [`log::warn!`].
#[derive(Debug, Default, Clone, Copy)]
#[non_exhaustive]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    #[inline]
    fn warn(&mut self, message: &str) {
        log::warn!("{message}");
    }
}

/// Environment preparation which does nothing.
pub type NoopPrepareEnvironment = fn();

/// Parameters for [`ShaderAnalysisReport::new()`].
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct ShaderAnalysisReportParams<S, P, D> {
    /// Tick source of the host.
    pub tick_source: S,
    /// Closure called before every job creation.
    /// It must be idempotent, as it is called once per created job.
    pub prepare_environment: P,
    /// Sink of warnings about rejected submissions.
    pub diagnostics: D,
}

impl<S, P, D> ShaderAnalysisReportParams<S, P, D> {
    /// Replaces the tick source of the host.
    #[inline]
    #[must_use]
    pub fn tick_source<NS>(self, tick_source: NS) -> ShaderAnalysisReportParams<NS, P, D> {
        ShaderAnalysisReportParams {
            tick_source,
            prepare_environment: self.prepare_environment,
            diagnostics: self.diagnostics,
        }
    }

    /// Replaces the environment preparation closure.
    #[inline]
    #[must_use]
    pub fn prepare_environment<NP>(
        self,
        prepare_environment: NP,
    ) -> ShaderAnalysisReportParams<S, NP, D> {
        ShaderAnalysisReportParams {
            tick_source: self.tick_source,
            prepare_environment,
            diagnostics: self.diagnostics,
        }
    }

    /// Replaces the sink of warnings.
    #[inline]
    #[must_use]
    pub fn diagnostics<ND>(self, diagnostics: ND) -> ShaderAnalysisReportParams<S, P, ND> {
        ShaderAnalysisReportParams {
            tick_source: self.tick_source,
            prepare_environment: self.prepare_environment,
            diagnostics,
        }
    }
}

/// [`Default`] parameters for [`ShaderAnalysisReport::new()`].
pub type DefaultShaderAnalysisReportParams =
    ShaderAnalysisReportParams<NoopTickSource, NoopPrepareEnvironment, LogDiagnostics>;

impl Default for DefaultShaderAnalysisReportParams {
    #[inline]
    fn default() -> Self {
        Self {
            tick_source: NoopTickSource,
            prepare_environment: || {},
            diagnostics: LogDiagnostics,
        }
    }
}

/// Manager of asynchronous report jobs.
///
/// At most one job is in flight at any time, across all platforms.
/// See the [module level documentation](self) for details.
pub struct ShaderAnalysisReport<
    S = NoopTickSource,
    P = NoopPrepareEnvironment,
    D = LogDiagnostics,
> {
    /// Submitted jobs in submission order, only the first one is ever ticked.
    jobs: VecDeque<JobHandle>,
    /// Job factories of the supported platforms.
    factories: HashMap<BuildTarget, Box<dyn PlatformJobFactory>>,
    /// Registration with the tick source, held by queued jobs and external subscribers alike.
    subscription: Subscription,
    /// Number of unmatched [`subscribe()`](Self::subscribe) calls.
    external_subscriptions: usize,
    tick_source: S,
    prepare_environment: P,
    diagnostics: D,
}

impl Default for ShaderAnalysisReport {
    #[inline]
    fn default() -> Self {
        Self::new(DefaultShaderAnalysisReportParams::default())
    }
}

impl<S, P, D> ShaderAnalysisReport<S, P, D>
where
    S: TickSource,
    P: FnMut(),
    D: Diagnostics,
{
    /// Creates a manager without any supported platforms.
    #[inline]
    #[must_use]
    pub fn new(params: ShaderAnalysisReportParams<S, P, D>) -> Self {
        let ShaderAnalysisReportParams {
            tick_source,
            prepare_environment,
            diagnostics,
        } = params;
        Self {
            jobs: VecDeque::new(),
            factories: HashMap::new(),
            subscription: Subscription::default(),
            external_subscriptions: 0,
            tick_source,
            prepare_environment,
            diagnostics,
        }
    }

    /// Sets the job factory of the given platform, replacing the previous one, if any.
    #[inline]
    pub fn register_platform_jobs<T, F>(&mut self, target: T, factory: F)
    where
        T: Into<BuildTarget>,
        F: PlatformJobFactory + 'static,
    {
        let target = target.into();
        log::debug!("registering job factory for platform {target}");
        if self.factories.insert(target, Box::new(factory)).is_some() {
            log::debug!("previous job factory was replaced");
        }
    }

    /// Returns whether the given platform has a factory capable of jobs of the given kind.
    #[inline]
    #[must_use]
    pub fn supports_job(&self, target: &BuildTarget, kind: JobKind) -> bool {
        self.factories
            .get(target)
            .is_some_and(|factory| factory.has_capability(kind))
    }

    /// Iterates over all the platforms with a registered factory, in no particular order.
    #[inline]
    pub fn supported_build_targets(&self) -> impl Iterator<Item = &BuildTarget> {
        self.factories.keys()
    }

    /// Starts building a report of the given asset for the given platform.
    ///
    /// Returns [`None`] and reports a warning if the platform can't build reports
    /// or another job is still running. The environment is only prepared
    /// if the job is actually created.
    ///
    /// The returned handle can be polled for completion, the job itself
    /// is advanced by [`on_tick()`](Self::on_tick).
    ///
    /// # Errors
    ///
    /// Returns an error if the asset is neither a shader, a compute shader nor a material,
    /// regardless of the platform and any running jobs.
    #[inline]
    pub fn submit_report<A>(
        &mut self,
        asset: A,
        target: &BuildTarget,
    ) -> Result<Option<JobHandle>, SubmitReportError>
    where
        A: TryInto<Asset>,
        SubmitReportError: From<A::Error>,
    {
        let asset = asset.try_into()?;

        if !self.supports_job(target, JobKind::BuildReport) {
            self.diagnostics.warn(&format!(
                "platform {target} is not supported to build shader reports"
            ));
            return Ok(None);
        }

        if self.clear_completed_jobs() {
            self.diagnostics.warn("a build job is already running");
            return Ok(None);
        }

        (self.prepare_environment)();

        #[expect(clippy::unreachable, reason = "support was checked above")]
        let factory = self
            .factories
            .get(target)
            .unwrap_or_else(|| unreachable!("platform support was checked before"));

        log::info!("building report of {asset} for platform {target}");
        let job = match &asset {
            Asset::Shader(shader) => factory.create_shader_report_job(shader),
            Asset::ComputeShader(compute) => factory.create_compute_shader_report_job(compute),
            Asset::Material(material) => factory.create_material_report_job(material),
        };
        let handle = JobHandle::new(job);
        self.jobs.push_back(handle.clone());
        self.subscription.subscribe(&mut self.tick_source);
        Ok(Some(handle))
    }

    /// Advances the oldest job by one step, removing it from the queue once complete.
    ///
    /// Called by the host once per cycle while subscribed. Does nothing if there are no jobs.
    #[inline]
    pub fn on_tick(&mut self) {
        let Some(head) = self.jobs.front() else {
            return;
        };
        if head.tick() {
            log::debug!("job completed, {} left", self.jobs.len().saturating_sub(1));
            self.jobs.pop_front();
            self.release_subscription();
        }
    }

    /// Subscribes to the tick source, registering with it if not yet registered.
    #[inline]
    pub fn subscribe(&mut self) {
        self.external_subscriptions = self.external_subscriptions.saturating_add(1);
        self.subscription.subscribe(&mut self.tick_source);
    }

    /// Undoes one [`subscribe()`](Self::subscribe),
    /// unregistering from the tick source when neither subscriptions nor queued jobs are left.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no [`subscribe()`](Self::subscribe) to undo,
    /// even while jobs keep the tick source registered.
    #[inline]
    pub fn unsubscribe(&mut self) -> Result<(), UnbalancedUnsubscribeError> {
        self.external_subscriptions = self
            .external_subscriptions
            .checked_sub(1)
            .ok_or(UnbalancedUnsubscribeError::new())?;
        self.subscription.unsubscribe(&mut self.tick_source)
    }

    /// Number of jobs in the queue, including completed ones not yet removed.
    #[inline]
    #[must_use]
    pub fn pending_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Returns whether the queue is empty.
    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Number of unmatched subscriptions to the tick source, one per queued job included.
    #[inline]
    #[must_use]
    pub const fn subscription_count(&self) -> usize {
        self.subscription.count()
    }

    /// The tick source of the host.
    #[inline]
    pub const fn tick_source(&self) -> &S {
        &self.tick_source
    }

    /// The sink of warnings.
    #[inline]
    pub const fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Removes all completed jobs, returning whether any job is still running.
    fn clear_completed_jobs(&mut self) -> bool {
        let queued = self.jobs.len();
        self.jobs.retain(|job| !job.is_complete());
        for _ in self.jobs.len()..queued {
            self.release_subscription();
        }
        !self.jobs.is_empty()
    }

    /// Drops the subscription held by a job which left the queue.
    fn release_subscription(&mut self) {
        if let Err(err) = self.subscription.unsubscribe(&mut self.tick_source) {
            log::warn!("{err}");
        }
    }
}

/// An error indicating that a report can not be built for the given asset.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SubmitReportError {
    /// The asset is neither a shader, a compute shader nor a material.
    #[error(transparent)]
    InvalidAsset(#[from] InvalidAssetError),
}

impl From<Infallible> for SubmitReportError {
    #[inline]
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
