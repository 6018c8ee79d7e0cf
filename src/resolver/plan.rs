use tracing::warn;

use super::{BaseImageResolver, ResolveOptions, ResolvedImage};
use crate::error::ResolveError;
use crate::helpers::AccelVersion;
use crate::registry::TagSource;

/// Everything the image build needs: what to call the result and what to
/// build it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    target_image: String,
    accel_version: Option<AccelVersion>,
    distro: Option<String>,
    base_image: Option<ResolvedImage>,
}

impl BuildPlan {
    /// eg. ros-cuda:12.6-humble
    pub fn target_image(&self) -> &str {
        &self.target_image
    }

    pub fn accel_version(&self) -> Option<&AccelVersion> {
        self.accel_version.as_ref()
    }

    pub fn distro(&self) -> Option<&str> {
        self.distro.as_deref()
    }

    /// `None` when the registry had no matching CUDA image.
    pub fn base_image(&self) -> Option<&ResolvedImage> {
        self.base_image.as_ref()
    }

    pub fn is_buildable(&self) -> bool {
        self.base_image.is_some()
    }

    /// `KEY=value` build arguments, empty values for anything unset.
    /// `verbose` is passed through so the image build can log more.
    pub fn build_args(&self, verbose: bool) -> Vec<String> {
        let base = self.base_image.as_ref().map(ResolvedImage::reference).unwrap_or_default();
        let accel = self.accel_version.as_ref().map(AccelVersion::as_str).unwrap_or_default();

        vec![
            format!("BASE_IMAGE={base}"),
            format!("ROS_DISTRO={}", self.distro.as_deref().unwrap_or_default()),
            format!("CUDA_VERSION={accel}"),
            format!("VERBOSE={verbose}"),
        ]
    }
}

/// Name of the image built on top of the base: `<repository>:<cuda>-<distro>`,
/// with either part left out when it was not requested.
pub fn target_image_name(
    repository: &str,
    accel: Option<&AccelVersion>,
    distro: Option<&str>,
) -> Result<String, ResolveError> {
    let tag = [accel.map(AccelVersion::as_str), distro]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("-");

    if tag.is_empty() {
        return Err(ResolveError::NothingRequested);
    }
    Ok(format!("{repository}:{tag}"))
}

impl<S: TagSource> BaseImageResolver<S> {
    /// Validate the request (detecting a local CUDA version when none was
    /// given), name the target image and look up its base image.
    ///
    /// A missing CUDA image is not an error here; the plan simply has no base
    /// image. Every other failure is returned.
    pub async fn plan(&self, raw_accel: Option<&str>, raw_distro: Option<&str>) -> Result<BuildPlan, ResolveError> {
        let accel = self
            .validate_accel(raw_accel, ResolveOptions::detect_local())
            .await?;
        let distro = self.validate_distro(raw_distro)?;

        let target_image = target_image_name(
            &self.settings.target_repository,
            accel.as_ref(),
            distro.as_deref(),
        )?;

        let base_image = match self.resolve_validated(accel.as_ref(), distro.as_deref()).await {
            Ok(image) => Some(image),
            Err(err) if err.is_not_found() => {
                warn!(%err, target_image = %target_image, "no base image found");
                None
            }
            Err(err) => return Err(err),
        };

        Ok(BuildPlan {
            target_image,
            accel_version: accel,
            distro,
            base_image,
        })
    }
}
