//! Registration with the periodic tick source of the host.

/// Periodic callback source of the host, e.g. an editor update loop.
///
/// While registered, the host is expected to call
/// [`ShaderAnalysisReport::on_tick()`](crate::ShaderAnalysisReport::on_tick) once per cycle.
pub trait TickSource {
    /// Starts delivering ticks.
    fn register(&mut self);

    /// Stops delivering ticks.
    fn unregister(&mut self);
}

/// [`TickSource`] which does nothing, for hosts polling the manager unconditionally.
#[derive(Debug, Default, Clone, Copy)]
#[non_exhaustive]
pub struct NoopTickSource;

impl TickSource for NoopTickSource {
    #[inline]
    fn register(&mut self) {}

    #[inline]
    fn unregister(&mut self) {}
}

/// Reference counted registration with some [`TickSource`].
///
/// The tick source is registered with only once, when the count goes from 0 to 1,
/// and unregistered from when it returns to 0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct Subscription {
    /// Number of unmatched [`subscribe`](Self::subscribe) calls.
    count: usize,
}

impl Subscription {
    /// Number of unmatched [`subscribe`](Self::subscribe) calls.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns whether the tick source is currently registered with.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.count > 0
    }

    /// Increments the count, registering with the source on the first subscription.
    #[inline]
    pub fn subscribe<S>(&mut self, source: &mut S)
    where
        S: TickSource + ?Sized,
    {
        if self.count == 0 {
            log::debug!("registering with tick source");
            source.register();
        }
        self.count = self.count.saturating_add(1);
    }

    /// Decrements the count, unregistering from the source on the last unsubscription.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no subscription to undo.
    /// The source is left untouched in that case.
    #[inline]
    pub fn unsubscribe<S>(&mut self, source: &mut S) -> Result<(), UnbalancedUnsubscribeError>
    where
        S: TickSource + ?Sized,
    {
        self.count = self
            .count
            .checked_sub(1)
            .ok_or(UnbalancedUnsubscribeError::new())?;
        if self.count == 0 {
            log::debug!("unregistering from tick source");
            source.unregister();
        }
        Ok(())
    }
}

/// An error indicating that there were more unsubscriptions than subscriptions.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unsubscribed from tick source without a matching subscription")]
pub struct UnbalancedUnsubscribeError(());

impl UnbalancedUnsubscribeError {
    pub(crate) const fn new() -> Self {
        Self(())
    }
}
