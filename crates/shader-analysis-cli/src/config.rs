//! Manage and merge the various sources of config:
//! the `shader-analysis.toml` config file and provided args.

use std::{
    collections::BTreeMap,
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use serde_json::{from_value, to_value, Value};
use shader_analysis_offline::{
    platform::DEFAULT_LINES_PER_TICK,
    shader_analysis::{job::JobKind, platform::BuildTarget},
};

/// Config file looked for in the current directory if none is given.
pub const DEFAULT_CONFIG_FILE: &str = "shader-analysis.toml";

/// Build target available even without a config file.
pub const DEFAULT_BUILD_TARGET: &str = "offline";

/// Options of a report build, settable both in the config file and on the command line.
///
/// A command line value only overrides the config file if it differs from its default.
#[derive(clap::Parser, Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "kebab-case")]
#[non_exhaustive]
pub struct AnalyzeArgs {
    /// Build target to build the reports for.
    ///
    /// Passing the default `offline` does not override a build target set in the config file.
    #[clap(long, short, default_value = DEFAULT_BUILD_TARGET)]
    pub platform: BuildTarget,

    /// Directory to write the reports into.
    ///
    /// Defaults to the reports directory in the user's cache directory.
    #[clap(long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of source lines scanned per tick.
    #[clap(long, default_value_t = DEFAULT_LINES_PER_TICK)]
    pub lines_per_tick: NonZeroUsize,
}

impl Default for AnalyzeArgs {
    #[inline]
    fn default() -> Self {
        Self {
            platform: BuildTarget::new(DEFAULT_BUILD_TARGET),
            output_dir: None,
            lines_per_tick: DEFAULT_LINES_PER_TICK,
        }
    }
}

/// Declaration of a build target in the config file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "kebab-case")]
#[non_exhaustive]
pub struct PlatformConfig {
    /// Kinds of jobs the build target is capable of.
    pub capabilities: Vec<JobKind>,
    /// Overrides [`AnalyzeArgs::lines_per_tick`] for this build target.
    pub lines_per_tick: Option<NonZeroUsize>,
}

impl Default for PlatformConfig {
    #[inline]
    fn default() -> Self {
        Self {
            capabilities: vec![JobKind::BuildReport],
            lines_per_tick: None,
        }
    }
}

/// Contents of the `shader-analysis.toml` config file.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "kebab-case")]
#[non_exhaustive]
pub struct ConfigFile {
    /// Options of report builds.
    #[serde(flatten)]
    pub args: AnalyzeArgs,
    /// Declared build targets.
    pub platforms: BTreeMap<BuildTarget, PlatformConfig>,
}

impl ConfigFile {
    /// Reads and parses the config file at the given path.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        log::debug!("reading config file '{}'", path.display());
        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read config file '{}'", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("could not parse config file '{}'", path.display()))?;
        log::debug!("found config: {config:#?}");
        Ok(config)
    }
}

/// Final config of a run, after merging all of its sources.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Config {
    /// Options of report builds.
    pub args: AnalyzeArgs,
    /// Available build targets.
    pub platforms: BTreeMap<BuildTarget, PlatformConfig>,
}

impl Config {
    /// Overrides the config file, if any, with the provided args.
    ///
    /// The config file is the given one, or [`DEFAULT_CONFIG_FILE`] if it exists
    /// in the current directory. Without any declared build targets,
    /// only the [`DEFAULT_BUILD_TARGET`] is available.
    pub fn resolve(config_file: Option<&Path>, args: &AnalyzeArgs) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) => ConfigFile::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                ConfigFile::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                log::debug!("no config file found, using defaults");
                ConfigFile::default()
            }
        };
        Self::from_file_with_args(file, args)
    }

    /// Overrides the options of the given config file with the provided args.
    pub fn from_file_with_args(file: ConfigFile, args: &AnalyzeArgs) -> anyhow::Result<Self> {
        let args = merge_args(&file.args, args)?;
        let platforms = if file.platforms.is_empty() {
            BTreeMap::from([(
                BuildTarget::new(DEFAULT_BUILD_TARGET),
                PlatformConfig::default(),
            )])
        } else {
            file.platforms
        };
        Ok(Self { args, platforms })
    }

    /// Lines per tick of the given build target.
    #[must_use]
    pub fn lines_per_tick(&self, target: &BuildTarget) -> NonZeroUsize {
        self.platforms
            .get(target)
            .and_then(|platform| platform.lines_per_tick)
            .unwrap_or(self.args.lines_per_tick)
    }
}

/// Overrides `base` args with `patch` args, except for those left at their default value.
fn merge_args(base: &AnalyzeArgs, patch: &AnalyzeArgs) -> anyhow::Result<AnalyzeArgs> {
    let (Value::Object(mut merged), Value::Object(patch), Value::Object(defaults)) = (
        to_value(base)?,
        to_value(patch)?,
        to_value(AnalyzeArgs::default())?,
    ) else {
        anyhow::bail!("args are expected to serialize into a JSON object");
    };
    for (key, value) in patch {
        if defaults.get(&key) != Some(&value) {
            log::debug!("`{key}` overridden by command line: {value}");
            merged.insert(key, value);
        }
    }
    Ok(from_value(Value::Object(merged))?)
}
