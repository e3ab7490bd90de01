//! The report written for every analysed asset.

use std::path::PathBuf;

use shader_analysis::{asset::Asset, platform::BuildTarget};

use crate::analysis::SourceAnalysis;

/// Kind of the analysed asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum AssetKind {
    /// A shader.
    Shader,
    /// A compute shader.
    ComputeShader,
    /// A material.
    Material,
}

impl From<&Asset> for AssetKind {
    #[inline]
    fn from(asset: &Asset) -> Self {
        match asset {
            Asset::Shader(_) => Self::Shader,
            Asset::ComputeShader(_) => Self::ComputeShader,
            Asset::Material(_) => Self::Material,
        }
    }
}

/// Whether the analysis went through.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
#[non_exhaustive]
pub enum ReportStatus {
    /// The whole source was analysed.
    Succeeded,
    /// The analysis failed with the given error.
    Failed {
        /// Description of the error.
        error: String,
    },
}

/// Analysis report of one asset for one platform.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub struct AnalysisReport {
    /// Path to the analysed asset.
    pub asset: PathBuf,
    /// Kind of the analysed asset.
    pub asset_kind: AssetKind,
    /// Platform the report was built for.
    pub build_target: BuildTarget,
    /// Whether the analysis went through.
    #[serde(flatten)]
    pub status: ReportStatus,
    /// Total number of shader variants.
    pub variant_count: u64,
    /// Results of the analysis, possibly partial if it failed.
    #[serde(flatten)]
    pub analysis: SourceAnalysis,
}

impl AnalysisReport {
    /// Creates a report from the given analysis.
    #[inline]
    #[must_use]
    pub fn new(
        asset: &Asset,
        build_target: BuildTarget,
        status: ReportStatus,
        analysis: SourceAnalysis,
    ) -> Self {
        Self {
            asset: asset.path().to_path_buf(),
            asset_kind: asset.into(),
            build_target,
            status,
            variant_count: analysis.variant_count(),
            analysis,
        }
    }

    /// Returns whether the analysis went through.
    #[inline]
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self.status, ReportStatus::Succeeded)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test_log::test]
    fn serializes_flat_kebab_case_json() {
        let mut analysis = SourceAnalysis::default();
        analysis.scan_line("#pragma multi_compile _ FOG");
        let report = AnalysisReport::new(
            &Asset::shader("Lit.shader"),
            BuildTarget::new("offline"),
            ReportStatus::Failed {
                error: "boom".to_owned(),
            },
            analysis,
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["asset-kind"], "shader");
        assert_eq!(json["build-target"], "offline");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "boom");
        assert_eq!(json["variant-count"], 2);
        assert_eq!(json["line-count"], 1);

        let back: AnalysisReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
        assert!(!back.succeeded());
    }
}
