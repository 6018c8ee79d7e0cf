use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use ros_cuda_base::cli::{Cli, Commands};
use ros_cuda_base::repositories::DistroConfig;
use ros_cuda_base::{BaseImageResolver, ResolveOptions};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = cli.settings();

    match &cli.command {
        Commands::Distros => {
            let distros = DistroConfig::load(&settings.config_path)?;
            if let Some(default) = distros.default_entry() {
                println!("(default)\t{}:{}", settings.os_repository, default.os_version());
            }
            for name in distros.distro_names() {
                let os = distros.os_version_for(Some(name.as_str())).unwrap_or_default();
                println!("{name}\t{}:{os}", settings.os_repository);
            }
        }
        Commands::Resolve { request, detect } => {
            let resolver = BaseImageResolver::from_settings(settings)?;
            let options = ResolveOptions {
                detect_local_accel: *detect,
            };
            let image = resolver
                .resolve(request.cuda.as_deref(), request.ros.as_deref(), options)
                .await
                .context("resolve base image")?;
            println!("{image}");
        }
        Commands::Plan { request, .. } => {
            let resolver = BaseImageResolver::from_settings(settings)?;
            let plan = resolver
                .plan(request.cuda.as_deref(), request.ros.as_deref())
                .await
                .context("plan image build")?;

            if !plan.is_buildable() {
                warn!(target_image = plan.target_image(), "nothing to build without a base image");
            }
            println!("IMAGE={}", plan.target_image());
            for arg in plan.build_args(cli.verbose) {
                println!("{arg}");
            }
        }
    }

    Ok(())
}
