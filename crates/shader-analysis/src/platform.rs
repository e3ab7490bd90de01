//! Target platforms and factories of their report jobs.

use std::{convert::Infallible, fmt, str::FromStr};

use crate::{
    asset::{ComputeShaderAsset, MaterialAsset, ShaderAsset},
    job::{AsyncJob, JobKind},
};

/// Identifier of a target platform reports are built for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
#[expect(clippy::exhaustive_structs, reason = "just a newtype")]
pub struct BuildTarget(pub String);

impl BuildTarget {
    /// Creates a build target from its name.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name of the build target.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildTarget {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BuildTarget {
    type Err = Infallible;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for BuildTarget {
    #[inline]
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Creates report jobs for one target platform.
///
/// There is one constructor per [asset](crate::asset::Asset) kind.
pub trait PlatformJobFactory {
    /// Returns whether the platform is capable of running jobs of the given kind.
    fn has_capability(&self, kind: JobKind) -> bool;

    /// Creates a job building a report of the given shader.
    fn create_shader_report_job(&self, shader: &ShaderAsset) -> Box<dyn AsyncJob>;

    /// Creates a job building a report of the given compute shader.
    fn create_compute_shader_report_job(&self, compute: &ComputeShaderAsset) -> Box<dyn AsyncJob>;

    /// Creates a job building a report of the given material.
    fn create_material_report_job(&self, material: &MaterialAsset) -> Box<dyn AsyncJob>;
}
