//! Runner of asynchronous shader analysis report jobs.
//!
//! This library builds analysis reports of shaders, compute shaders and materials
//! for a set of target platforms, without tying itself to any particular host
//! application or shader compiler.
//!
//! # How it works
//!
//! Each platform registers a [factory](platform::PlatformJobFactory) of report jobs
//! in a [`ShaderAnalysisReport`]. Submitting an asset creates a job using that factory,
//! but only if the platform is supported and no other job is still in flight.
//!
//! Jobs are [cooperative](job::AsyncJob): they never block and instead make a small
//! amount of progress every time they are ticked. The host drives the manager
//! by calling [`ShaderAnalysisReport::on_tick()`] once per cycle of its own loop
//! for as long as the manager is [registered](tick::TickSource) with it.
//! Only the oldest job in the queue is ticked, so jobs run strictly one after another.

#![expect(clippy::pub_use, reason = "part of public API")]

pub use self::report::{ShaderAnalysisReport, ShaderAnalysisReportParams, SubmitReportError};

pub mod asset;
pub mod job;
pub mod platform;
pub mod report;
pub mod tick;
