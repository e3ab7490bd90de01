//! The report job of the offline platform.
//!
//! The job goes through the following stages, one tick at a time:
//! * load the whole source of the asset,
//! * scan a limited number of lines per tick,
//! * write the report next to the other reports of the output directory.
//!
//! Failing to read the source still produces a report, marked as failed.

use std::{
    fs, io,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use shader_analysis::{asset::Asset, job::AsyncJob, platform::BuildTarget};

use crate::{
    analysis::SourceAnalysis,
    report::{AnalysisReport, ReportStatus},
};

/// Current stage of a [`SourceAnalysisJob`].
#[derive(Debug)]
enum Stage {
    /// The source is not loaded yet.
    Load,
    /// Lines of the source starting at `next` are not scanned yet.
    Scan {
        /// All lines of the source.
        lines: Vec<String>,
        /// Index of the first line not scanned yet.
        next: usize,
    },
    /// The analysis is over, the report is not written yet.
    Write(ReportStatus),
    /// The report was written, or failed to be.
    Done(Result<PathBuf, String>),
}

/// Job analysing the source of an asset and writing a JSON report of it.
#[derive(Debug)]
pub struct SourceAnalysisJob {
    /// The analysed asset.
    asset: Asset,
    /// Platform the report is built for.
    build_target: BuildTarget,
    /// Maximum number of lines scanned per tick.
    lines_per_tick: NonZeroUsize,
    /// Where the report is written to.
    report_path: PathBuf,
    /// Results so far.
    analysis: SourceAnalysis,
    /// Why the source could not be analysed, if it could not.
    read_error: Option<String>,
    stage: Stage,
}

impl SourceAnalysisJob {
    /// Creates a job writing its report into the given output directory.
    #[inline]
    #[must_use]
    pub fn new(
        asset: Asset,
        build_target: BuildTarget,
        lines_per_tick: NonZeroUsize,
        output_dir: &Path,
    ) -> Self {
        let report_path = report_path(output_dir, &asset, &build_target);
        Self {
            asset,
            build_target,
            lines_per_tick,
            report_path,
            analysis: SourceAnalysis::default(),
            read_error: None,
            stage: Stage::Load,
        }
    }

    /// Path the report is written to.
    #[inline]
    #[must_use]
    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Returns the path of the written report, or why it was not written,
    /// once the job is complete.
    #[inline]
    #[must_use]
    pub fn outcome(&self) -> Option<Result<&Path, &str>> {
        match &self.stage {
            Stage::Done(outcome) => Some(outcome.as_deref().map_err(String::as_str)),
            Stage::Load | Stage::Scan { .. } | Stage::Write(_) => None,
        }
    }

    /// Loads the source, moving on to scanning or straight to a failed report.
    fn load(&mut self) -> Stage {
        let path = self.asset.path();
        log::debug!("loading {}", self.asset);
        match fs::read_to_string(path) {
            Ok(source) => Stage::Scan {
                lines: source.lines().map(str::to_owned).collect(),
                next: 0,
            },
            Err(source) => {
                let err = AnalysisError::ReadSource {
                    path: path.to_path_buf(),
                    source,
                };
                log::warn!("{err}");
                let error = err.to_string();
                self.read_error = Some(error.clone());
                Stage::Write(ReportStatus::Failed { error })
            }
        }
    }

    /// Writes the report, returning its path.
    fn write(&self, status: ReportStatus) -> Result<PathBuf, AnalysisError> {
        let report = AnalysisReport::new(
            &self.asset,
            self.build_target.clone(),
            status,
            self.analysis.clone(),
        );
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(&self.report_path, json).map_err(|source| AnalysisError::WriteReport {
            path: self.report_path.clone(),
            source,
        })?;
        log::info!("wrote report to '{}'", self.report_path.display());
        Ok(self.report_path.clone())
    }
}

impl AsyncJob for SourceAnalysisJob {
    #[inline]
    fn tick(&mut self) -> bool {
        let stage = core::mem::replace(&mut self.stage, Stage::Load);
        self.stage = match stage {
            Stage::Load => self.load(),
            Stage::Scan { lines, next } => {
                let end = next.saturating_add(self.lines_per_tick.get()).min(lines.len());
                for line in lines.get(next..end).unwrap_or_default() {
                    self.analysis.scan_line(line);
                }
                log::trace!("scanned lines {next}..{end} of {}", self.asset);
                if end == lines.len() {
                    Stage::Write(ReportStatus::Succeeded)
                } else {
                    Stage::Scan { lines, next: end }
                }
            }
            Stage::Write(status) => {
                Stage::Done(self.write(status).map_err(|err| {
                    log::error!("{err}");
                    err.to_string()
                }))
            }
            done @ Stage::Done(_) => done,
        };
        self.is_complete()
    }

    #[inline]
    fn is_complete(&self) -> bool {
        matches!(self.stage, Stage::Done(_))
    }

    #[inline]
    #[expect(clippy::cast_precision_loss, reason = "only an estimate")]
    #[expect(clippy::float_arithmetic, reason = "progress is a fraction")]
    fn progress(&self) -> f32 {
        match &self.stage {
            Stage::Load => 0.0,
            Stage::Scan { lines, next } => *next as f32 / lines.len().max(1) as f32,
            Stage::Write(_) | Stage::Done(_) => 1.0,
        }
    }

    #[inline]
    fn message(&self) -> String {
        match &self.stage {
            Stage::Load => format!("loading {}", self.asset),
            Stage::Scan { lines, next } => {
                format!("scanning {} ({next}/{} lines)", self.asset, lines.len())
            }
            Stage::Write(_) => format!("writing report of {}", self.asset),
            Stage::Done(Ok(path)) => format!("wrote report to '{}'", path.display()),
            Stage::Done(Err(err)) => err.clone(),
        }
    }

    #[inline]
    fn failure(&self) -> Option<String> {
        match &self.stage {
            Stage::Done(Err(err)) => Some(err.clone()),
            Stage::Done(Ok(_)) => self.read_error.clone(),
            Stage::Load | Stage::Scan { .. } | Stage::Write(_) => None,
        }
    }
}

/// Returns `<output_dir>/<asset file name>.<build target>.json`.
///
/// The file name keeps its extension, so assets of different kinds never share a report.
#[inline]
#[must_use]
pub fn report_path(output_dir: &Path, asset: &Asset, build_target: &BuildTarget) -> PathBuf {
    let name = asset
        .path()
        .file_name()
        .map_or_else(|| "report".into(), |name| name.to_string_lossy());
    output_dir.join(format!("{name}.{build_target}.json"))
}

/// An error indicating what went wrong while analysing an asset.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AnalysisError {
    /// Failed to read the source of the asset.
    #[error("failed to read '{}': {source}", .path.display())]
    ReadSource {
        /// Path to the asset.
        path: PathBuf,
        /// The source of the error.
        source: io::Error,
    },
    /// Failed to serialize the report.
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Failed to write the report.
    #[error("failed to write report '{}': {source}", .path.display())]
    WriteReport {
        /// Path to the report.
        path: PathBuf,
        /// The source of the error.
        source: io::Error,
    },
}

#[cfg(test)]
mod test {
    use super::*;

    const LIT_SHADER: &str = "\
Shader \"Custom/Lit\" {
    SubShader {
        Pass {
            HLSLPROGRAM
            #pragma vertex Vert
            #pragma fragment Frag
            #pragma multi_compile _ FOG_LINEAR FOG_EXP
            #pragma shader_feature _NORMALMAP
            ENDHLSL
        }
    }
}
";

    fn lines_per_tick(lines: usize) -> NonZeroUsize {
        NonZeroUsize::new(lines).unwrap()
    }

    fn tick_to_completion(job: &mut SourceAnalysisJob) -> usize {
        let mut ticks = 1;
        while !job.tick() {
            ticks += 1;
        }
        ticks
    }

    #[test_log::test]
    fn scans_a_slice_of_lines_per_tick() {
        let temp = tempfile::tempdir().unwrap();
        let shader = temp.path().join("Lit.shader");
        fs::write(&shader, LIT_SHADER).unwrap();

        let mut job = SourceAnalysisJob::new(
            Asset::shader(&shader),
            BuildTarget::new("offline"),
            lines_per_tick(5),
            temp.path(),
        );
        assert!(!job.is_complete());
        assert!(job.outcome().is_none());

        // load, 12 lines in 3 slices, write
        assert_eq!(tick_to_completion(&mut job), 5);
        assert!(job.is_complete());
        assert!(job.tick(), "complete jobs stay complete");

        let report_path = temp.path().join("Lit.shader.offline.json");
        assert_eq!(job.outcome(), Some(Ok(report_path.as_path())));
        assert!((job.progress() - 1.0).abs() < f32::EPSILON);

        let report: AnalysisReport =
            serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
        assert!(report.succeeded());
        assert_eq!(job.failure(), None);
        assert_eq!(report.analysis.line_count, 12);
        assert_eq!(report.analysis.passes, 1);
        assert_eq!(report.analysis.entry_points, ["Vert", "Frag"]);
        assert_eq!(report.variant_count, 6);
    }

    #[test_log::test]
    fn progress_and_message_follow_stages() {
        let temp = tempfile::tempdir().unwrap();
        let compute = temp.path().join("Blur.compute");
        fs::write(&compute, "#pragma kernel BlurH\n#pragma kernel BlurV\n").unwrap();

        let mut job = SourceAnalysisJob::new(
            Asset::compute_shader(&compute),
            BuildTarget::new("offline"),
            lines_per_tick(1),
            temp.path(),
        );
        assert!(job.message().starts_with("loading compute shader"));
        assert!(!job.tick());
        assert!(job.progress().abs() < f32::EPSILON);
        assert!(job.message().contains("(0/2 lines)"));
        assert!(!job.tick());
        assert!((job.progress() - 0.5).abs() < f32::EPSILON);
        assert!(!job.tick());
        assert!(job.message().starts_with("writing report"));
        assert!(job.tick());
        assert!(job.message().starts_with("wrote report"));
    }

    #[test_log::test]
    fn missing_source_yields_failed_report() {
        let temp = tempfile::tempdir().unwrap();
        let mut job = SourceAnalysisJob::new(
            Asset::material(temp.path().join("Missing.mat")),
            BuildTarget::new("offline"),
            lines_per_tick(64),
            temp.path(),
        );

        // load fails, write
        assert_eq!(tick_to_completion(&mut job), 2);
        let report: AnalysisReport =
            serde_json::from_str(&fs::read_to_string(job.report_path()).unwrap()).unwrap();
        assert!(!report.succeeded());
        assert_eq!(report.analysis.line_count, 0);
        assert!(job.failure().is_some_and(|err| err.starts_with("failed to read")));
    }

    #[test_log::test]
    fn unwritable_output_completes_with_error() {
        let temp = tempfile::tempdir().unwrap();
        let shader = temp.path().join("Lit.shader");
        fs::write(&shader, LIT_SHADER).unwrap();

        let mut job = SourceAnalysisJob::new(
            Asset::shader(&shader),
            BuildTarget::new("offline"),
            lines_per_tick(64),
            &temp.path().join("does-not-exist"),
        );
        tick_to_completion(&mut job);
        assert!(matches!(job.outcome(), Some(Err(_))));
        assert!(job.message().starts_with("failed to write report '"));
        assert_eq!(job.failure(), Some(job.message()));
    }

    #[test_log::test]
    fn report_names_keep_the_asset_kind() {
        let output_dir = Path::new("reports");
        let target = BuildTarget::new("offline");
        let shader = report_path(output_dir, &Asset::shader("Lit.shader"), &target);
        let material = report_path(output_dir, &Asset::material("Lit.mat"), &target);
        assert_eq!(shader, output_dir.join("Lit.shader.offline.json"));
        assert_eq!(material, output_dir.join("Lit.mat.offline.json"));
    }
}
