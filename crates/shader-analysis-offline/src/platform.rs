//! Factory of [`SourceAnalysisJob`]s.

use std::{collections::HashSet, num::NonZeroUsize, path::PathBuf};

use shader_analysis::{
    asset::{Asset, ComputeShaderAsset, MaterialAsset, ShaderAsset},
    job::{AsyncJob, JobKind},
    platform::{BuildTarget, PlatformJobFactory},
};

use crate::job::SourceAnalysisJob;

/// Default number of lines a job scans per tick.
pub const DEFAULT_LINES_PER_TICK: NonZeroUsize = match NonZeroUsize::new(64) {
    Some(lines) => lines,
    None => NonZeroUsize::MIN,
};

/// Platform analysing sources without any shader compiler.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct OfflinePlatform {
    /// Name the reports are labelled with.
    pub build_target: BuildTarget,
    /// Kinds of jobs the platform declares itself capable of.
    pub capabilities: HashSet<JobKind>,
    /// Maximum number of lines a job scans per tick.
    pub lines_per_tick: NonZeroUsize,
    /// Directory the reports are written into.
    pub output_dir: PathBuf,
}

impl OfflinePlatform {
    /// Creates a platform capable of [building reports](JobKind::BuildReport)
    /// into the given output directory.
    #[inline]
    #[must_use]
    pub fn new<T, O>(build_target: T, output_dir: O) -> Self
    where
        T: Into<BuildTarget>,
        O: Into<PathBuf>,
    {
        Self {
            build_target: build_target.into(),
            capabilities: HashSet::from([JobKind::BuildReport]),
            lines_per_tick: DEFAULT_LINES_PER_TICK,
            output_dir: output_dir.into(),
        }
    }

    /// Replaces the declared capabilities.
    #[inline]
    #[must_use]
    pub fn capabilities<I>(self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = JobKind>,
    {
        Self {
            capabilities: capabilities.into_iter().collect(),
            ..self
        }
    }

    /// Replaces the maximum number of lines a job scans per tick.
    #[inline]
    #[must_use]
    pub fn lines_per_tick(self, lines_per_tick: NonZeroUsize) -> Self {
        Self {
            lines_per_tick,
            ..self
        }
    }

    /// Creates the job of the given asset.
    fn create(&self, asset: Asset) -> Box<dyn AsyncJob> {
        Box::new(SourceAnalysisJob::new(
            asset,
            self.build_target.clone(),
            self.lines_per_tick,
            &self.output_dir,
        ))
    }
}

impl PlatformJobFactory for OfflinePlatform {
    #[inline]
    fn has_capability(&self, kind: JobKind) -> bool {
        self.capabilities.contains(&kind)
    }

    #[inline]
    fn create_shader_report_job(&self, shader: &ShaderAsset) -> Box<dyn AsyncJob> {
        self.create(Asset::Shader(shader.clone()))
    }

    #[inline]
    fn create_compute_shader_report_job(&self, compute: &ComputeShaderAsset) -> Box<dyn AsyncJob> {
        self.create(Asset::ComputeShader(compute.clone()))
    }

    #[inline]
    fn create_material_report_job(&self, material: &MaterialAsset) -> Box<dyn AsyncJob> {
        self.create(Asset::Material(material.clone()))
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use shader_analysis::ShaderAnalysisReport;

    use super::*;
    use crate::report::{AnalysisReport, AssetKind};

    #[test_log::test]
    fn builds_reports_through_the_manager() {
        let temp = tempfile::tempdir().unwrap();
        let material = temp.path().join("Rock.mat");
        fs::write(&material, "Material:\n  m_ShaderKeywords: _NORMALMAP\n").unwrap();

        let target = BuildTarget::new("offline");
        let mut report: ShaderAnalysisReport = ShaderAnalysisReport::default();
        let platform = OfflinePlatform::new("offline", temp.path());
        report.register_platform_jobs(target.clone(), platform);

        let job = report
            .submit_report(material.as_path(), &target)
            .unwrap()
            .unwrap();
        while !job.is_complete() {
            report.on_tick();
        }
        assert!(report.is_idle());

        let written = fs::read_to_string(temp.path().join("Rock.mat.offline.json")).unwrap();
        let written: AnalysisReport = serde_json::from_str(&written).unwrap();
        assert_eq!(written.asset_kind, AssetKind::Material);
        assert_eq!(written.analysis.material_keywords, ["_NORMALMAP"]);
    }

    #[test_log::test]
    fn capabilities_can_be_withdrawn() {
        let platform = OfflinePlatform::new("offline", "reports").capabilities([]);
        assert!(!platform.has_capability(JobKind::BuildReport));

        let platform = platform.capabilities([JobKind::BuildReport]);
        assert!(platform.has_capability(JobKind::BuildReport));
    }
}
