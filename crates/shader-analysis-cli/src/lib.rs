//! Command line tool for building analysis reports of shaders, compute shaders and materials.
//!
//! ## Analysing assets
//!
//! It takes paths to the assets to analyse and the build target to analyse them for.
//! Assets are analysed one after another: a report job is only started once the previous one
//! has completed. Every report is written as a JSON file into the output directory.
//!
//! ## Configuration
//!
//! Options can also be set in a TOML config file, `shader-analysis.toml` in the current directory
//! by default. Options given on the command line take precedence over the config file.
//! The config file is also where additional build targets are declared:
//!
//! ```toml
//! platform = "mobile"
//! lines-per-tick = 32
//!
//! [platforms.mobile]
//! capabilities = ["build-report"]
//! lines-per-tick = 8
//! ```
//!
//! ## Where the reports are
//!
//! Unless `--output-dir` is given, reports are written into the
//! [reports directory](shader_analysis_offline::cache::reports_dir()),
//! which path differs by OS you are using.

#![expect(clippy::pub_use, reason = "part of public API")]

pub use shader_analysis_offline::shader_analysis;

use self::{analyze::Analyze, show::Show};

pub mod analyze;
pub mod config;
pub mod host;
pub mod show;

/// Central function to write to the user.
#[macro_export]
macro_rules! user_output {
    ($($args: tt)*) => { {
        #[allow(
            clippy::allow_attributes,
            unused_imports,
            reason = "`std::io::Write` is only sometimes called??"
        )]
        use std::io::Write as _;

        writeln!(::std::io::stdout(), $($args)*)
    } }
}

/// All of the available subcommands for `shader-analysis`
#[derive(clap::Subcommand)]
#[non_exhaustive]
pub enum Command {
    /// Build analysis reports of assets.
    Analyze(Box<Analyze>),

    /// Show some useful values.
    #[clap(subcommand)]
    Show(Show),
}

impl Command {
    /// Runs the command
    ///
    /// # Errors
    /// Any errors during execution, usually printed to the user
    #[inline]
    pub fn run(&self) -> anyhow::Result<()> {
        match self {
            Self::Analyze(analyze) => analyze.run()?,
            Self::Show(show) => show.run()?,
        }
        Ok(())
    }
}

/// The struct representing the main CLI.
#[derive(clap::Parser)]
#[clap(author, version, about, subcommand_required = true)]
#[non_exhaustive]
pub struct Cli {
    /// The command to run.
    #[clap(subcommand)]
    pub command: Command,
}
