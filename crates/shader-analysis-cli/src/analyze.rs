//! `shader-analysis analyze`, building reports of the given assets one after another

use std::{
    cell::RefCell,
    collections::HashMap,
    ffi::OsString,
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::Context as _;
use shader_analysis_offline::{
    cache::{prepare_output_dir, reports_dir},
    shader_analysis::{
        job::JobHandle, report::DefaultShaderAnalysisReportParams, ShaderAnalysisReport,
    },
    OfflinePlatform,
};

use crate::{
    config::{AnalyzeArgs, Config},
    host::{run_until_idle, HostLoop},
    user_output,
};

/// `shader-analysis analyze` subcommand
#[derive(clap::Parser, Debug)]
#[non_exhaustive]
pub struct Analyze {
    /// Config file to read options and build targets from,
    /// `./shader-analysis.toml` is used if present.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Options of the report builds.
    #[clap(flatten)]
    pub args: AnalyzeArgs,

    /// Shaders (`.shader`), compute shaders (`.compute`) and materials (`.mat`) to analyse.
    #[clap(required = true)]
    pub assets: Vec<PathBuf>,
}

impl Analyze {
    /// Entrypoint
    pub fn run(&self) -> anyhow::Result<()> {
        let config = Config::resolve(self.config.as_deref(), &self.args)?;
        log::debug!("analysing with final merged config: {config:#?}");

        let output_dir = match &config.args.output_dir {
            Some(output_dir) => output_dir.clone(),
            None => reports_dir()?,
        };
        let jobs = analyze_assets(&config, &output_dir, &self.assets)?;
        log::info!("built {} reports into '{}'", jobs.len(), output_dir.display());
        Ok(())
    }
}

/// Builds reports of all the given assets for the configured build target,
/// returning the handles of the completed jobs.
///
/// # Errors
///
/// Fails before building anything if an asset does not exist, or if two assets
/// from different directories have the same file name and so would share a report.
/// Fails after building all the other reports if any of the jobs failed.
pub fn analyze_assets(
    config: &Config,
    output_dir: &Path,
    assets: &[PathBuf],
) -> anyhow::Result<Vec<JobHandle>> {
    let assets = unique_assets(assets)?;

    let prepare_error = Rc::new(RefCell::new(None));
    let prepared_dir = output_dir.to_path_buf();
    let failed_preparation = Rc::clone(&prepare_error);
    let params = DefaultShaderAnalysisReportParams::default()
        .tick_source(HostLoop::default())
        .prepare_environment(move || {
            if let Err(err) = prepare_output_dir(&prepared_dir) {
                *failed_preparation.borrow_mut() = Some(err);
            }
        });
    let mut report = ShaderAnalysisReport::new(params);

    for (target, platform) in &config.platforms {
        let offline = OfflinePlatform::new(target.clone(), output_dir)
            .capabilities(platform.capabilities.iter().copied())
            .lines_per_tick(config.lines_per_tick(target));
        report.register_platform_jobs(target.clone(), offline);
    }

    let target = &config.args.platform;
    let mut jobs = Vec::with_capacity(assets.len());
    let mut failures = Vec::new();
    for asset in &assets {
        let job = report
            .submit_report(asset.as_path(), target)?
            .with_context(|| {
                format!(
                    "could not start building report of '{}' for platform {target}",
                    asset.display()
                )
            })?;
        if let Some(err) = prepare_error.borrow_mut().take() {
            return Err(err).with_context(|| {
                format!("could not create output directory '{}'", output_dir.display())
            });
        }

        user_output!("Analysing '{}' for {target}...", asset.display())?;
        let cycles = run_until_idle(&mut report, &job);
        user_output!("{} ({cycles} ticks)", job.message())?;
        if let Some(failure) = job.failure() {
            log::error!("{failure}");
            failures.push(asset.display().to_string());
        }
        jobs.push(job);
    }

    if !failures.is_empty() {
        anyhow::bail!(
            "failed to build {} of {} reports: {}",
            failures.len(),
            jobs.len(),
            failures.join(", ")
        );
    }
    Ok(jobs)
}

/// Canonicalizes the given assets, dropping repeated ones.
///
/// Reports are named after the file name of their asset,
/// so distinct assets with the same file name are refused.
fn unique_assets(assets: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut by_name = HashMap::<OsString, PathBuf>::with_capacity(assets.len());
    let mut unique = Vec::with_capacity(assets.len());
    for asset in assets {
        let path = dunce::canonicalize(asset)
            .with_context(|| format!("asset '{}' does not exist", asset.display()))?;
        let name = path.file_name().unwrap_or_default().to_os_string();
        match by_name.get(&name) {
            Some(previous) if *previous == path => {
                log::warn!("skipping repeated asset '{}'", asset.display());
            }
            Some(previous) => anyhow::bail!(
                "assets '{}' and '{}' would both be reported into the same file",
                previous.display(),
                path.display()
            ),
            None => {
                by_name.insert(name, path.clone());
                unique.push(path);
            }
        }
    }
    Ok(unique)
}
