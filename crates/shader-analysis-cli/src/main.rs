//! main executable of `shader-analysis`

use clap::Parser as _;
use shader_analysis_cli::Cli;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(error) = Cli::parse().command.run() {
        log::error!("{error:#}");
        #[expect(clippy::exit, reason = "we're at the end of main")]
        std::process::exit(1);
    }
}
