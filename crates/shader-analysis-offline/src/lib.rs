//! Offline platform of [`shader-analysis`](shader_analysis).
//!
//! This platform does not need any shader compiler: it statically analyses the source
//! of shaders, compute shaders and materials, a few lines per tick, and writes
//! the resulting [report](report::AnalysisReport) as a JSON file.
//!
//! ## Where the reports are
//!
//! Unless configured otherwise, reports are written into the [cache directory](cache::reports_dir()),
//! which path differs by OS you are using.

#![expect(clippy::pub_use, reason = "part of public API")]

pub use shader_analysis;

pub use self::platform::OfflinePlatform;

pub mod analysis;
pub mod cache;
pub mod job;
pub mod platform;
pub mod report;
