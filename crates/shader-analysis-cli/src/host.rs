//! The update loop of the command line host, driving report jobs.

use shader_analysis_offline::shader_analysis::{
    job::JobHandle, report::Diagnostics, tick::TickSource, ShaderAnalysisReport,
};

/// Tick source of the command line host.
///
/// The host keeps cycling its update loop for as long as anything is registered with it.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct HostLoop {
    /// Whether the report manager is registered.
    registered: bool,
    /// Number of registrations so far.
    registrations: usize,
}

impl HostLoop {
    /// Returns whether ticks are being delivered.
    #[inline]
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        self.registered
    }

    /// Number of registrations so far.
    #[inline]
    #[must_use]
    pub const fn registrations(&self) -> usize {
        self.registrations
    }
}

impl TickSource for HostLoop {
    #[inline]
    fn register(&mut self) {
        self.registered = true;
        self.registrations = self.registrations.saturating_add(1);
    }

    #[inline]
    fn unregister(&mut self) {
        self.registered = false;
    }
}

/// Report manager driven by the [`HostLoop`].
pub type HostedReport<P, D> = ShaderAnalysisReport<HostLoop, P, D>;

/// Cycles the update loop until the manager unregisters, returning the number of cycles.
///
/// The given job is only watched for progress logging, the manager decides what to tick.
pub fn run_until_idle<P, D>(report: &mut HostedReport<P, D>, watched: &JobHandle) -> usize
where
    P: FnMut(),
    D: Diagnostics,
{
    let mut cycles = 0_usize;
    while report.tick_source().is_registered() {
        report.on_tick();
        cycles = cycles.saturating_add(1);
        log::trace!(
            "cycle {cycles}: {:>3.0}% {}",
            watched.progress() * 100.0,
            watched.message()
        );
    }
    log::debug!("update loop went idle after {cycles} cycles");
    cycles
}
