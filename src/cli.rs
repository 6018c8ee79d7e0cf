use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::registry::{DEFAULT_PAGE_SIZE, DEFAULT_REGISTRY_URL};
use crate::resolver::ResolverSettings;

#[derive(Parser, Debug)]
#[command(
    name = "ros-cuda-base",
    version,
    about = "Pick the base image for a CUDA-enabled ROS image build",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        env = "ROS_CUDA_CONFIG",
        default_value = "ros-versions.yaml",
        help = "Path to the ROS version configuration file"
    )]
    pub config: PathBuf,

    #[arg(
        long,
        global = true,
        env = "ROS_CUDA_REGISTRY_URL",
        default_value = DEFAULT_REGISTRY_URL,
        help = "Tag listing endpoint of the CUDA image repository"
    )]
    pub registry_url: String,

    #[arg(long, global = true, default_value_t = DEFAULT_PAGE_SIZE, help = "Tags requested per page")]
    pub page_size: u32,

    #[arg(short, long, global = true, help = "Show debug logs")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the base image reference
    Resolve {
        #[command(flatten)]
        request: Request,

        #[arg(long, help = "Use the local nvcc version when --cuda is not given")]
        detect: bool,
    },

    /// Print the target image name and the build arguments
    Plan {
        #[command(flatten)]
        request: Request,

        #[arg(long, help = "Repository of the image being built")]
        image_name: Option<String>,
    },

    /// List the configured ROS distributions
    Distros,
}

#[derive(Args, Debug, Clone, Default)]
pub struct Request {
    #[arg(long, help = "CUDA version in X.Y format (e.g. '12.6'), or 'none'")]
    pub cuda: Option<String>,

    #[arg(long, help = "ROS distribution (e.g. 'noetic', 'humble'), or 'none'")]
    pub ros: Option<String>,
}

impl Cli {
    pub fn settings(&self) -> ResolverSettings {
        let mut settings = ResolverSettings {
            config_path: self.config.clone(),
            registry_url: self.registry_url.clone(),
            page_size: self.page_size,
            ..ResolverSettings::default()
        };
        if let Commands::Plan {
            image_name: Some(name),
            ..
        } = &self.command
        {
            settings.target_repository = name.clone();
        }
        settings
    }
}
