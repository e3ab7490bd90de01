//! Display various information about `shader-analysis`, eg where reports are written to.

use std::path::PathBuf;

use shader_analysis_offline::cache::reports_dir;

use crate::{
    config::{AnalyzeArgs, Config},
    user_output,
};

/// `shader-analysis show` subcommands
#[derive(clap::Subcommand, Debug)]
#[non_exhaustive]
pub enum Show {
    /// Displays the directory reports are written into unless `--output-dir` is given.
    ReportsDir,
    /// Lists the build targets reports can be built for.
    Platforms {
        /// Config file declaring the build targets,
        /// `./shader-analysis.toml` is used if present.
        #[clap(long)]
        config: Option<PathBuf>,
    },
}

impl Show {
    /// Entrypoint
    pub fn run(&self) -> anyhow::Result<()> {
        log::info!("{self:?}");
        match self {
            Self::ReportsDir => {
                user_output!("{}", reports_dir()?.display())?;
            }
            Self::Platforms { config } => {
                let config = Config::resolve(config.as_deref(), &AnalyzeArgs::default())?;
                for line in platform_lines(&config) {
                    user_output!("{line}")?;
                }
            }
        }
        Ok(())
    }
}

/// One line per build target, listing its capabilities and lines per tick.
fn platform_lines(config: &Config) -> Vec<String> {
    config
        .platforms
        .iter()
        .map(|(target, platform)| {
            let capabilities = if platform.capabilities.is_empty() {
                "no capabilities".to_owned()
            } else {
                platform
                    .capabilities
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            format!(
                "{target}: {capabilities} ({} lines per tick)",
                config.lines_per_tick(target)
            )
        })
        .collect()
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use shader_analysis_offline::shader_analysis::platform::BuildTarget;

    use super::*;
    use crate::config::{ConfigFile, PlatformConfig};

    #[test_log::test]
    fn lists_default_platform() {
        let config =
            Config::from_file_with_args(ConfigFile::default(), &AnalyzeArgs::default()).unwrap();
        assert_eq!(
            platform_lines(&config),
            ["offline: build-report (64 lines per tick)"]
        );
    }

    #[test_log::test]
    fn lists_declared_platforms_in_order() {
        let mut file = ConfigFile::default();
        file.platforms = BTreeMap::from([
            (
                BuildTarget::new("mobile"),
                PlatformConfig {
                    capabilities: Vec::new(),
                    lines_per_tick: None,
                },
            ),
            (BuildTarget::new("console"), PlatformConfig::default()),
        ]);
        let config = Config::from_file_with_args(file, &AnalyzeArgs::default()).unwrap();
        assert_eq!(
            platform_lines(&config),
            [
                "console: build-report (64 lines per tick)",
                "mobile: no capabilities (64 lines per tick)",
            ]
        );
    }
}
