//! Picks the base image for a CUDA-enabled ROS image build.
//!
//! A ROS distribution maps to an Ubuntu release through the distro file; a
//! CUDA `X.Y` version is matched against the `nvidia/cuda` tag listing on
//! Docker Hub to find the newest patch release for that Ubuntu release.

pub mod cli;
pub mod error;
pub mod helpers;
pub mod registry;
pub mod repositories;
pub mod resolver;

pub use error::ResolveError;
pub use resolver::{BaseImageResolver, BuildPlan, ResolveOptions, ResolvedImage, ResolverSettings};
