mod image;
mod plan;
mod settings;

pub use image::{ImageKind, ResolvedImage};
pub use plan::{BuildPlan, target_image_name};
pub use settings::ResolverSettings;

use tracing::debug;

use crate::error::ResolveError;
use crate::helpers::{AccelDetector, AccelVersion, NvccDetector, VersionValidator};
use crate::registry::{HttpTagSource, RemoteTagCatalog, TagSource};
use crate::repositories::DistroConfig;

/// Per-call switches for [`BaseImageResolver::resolve`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Ask the local toolchain for a CUDA version when none was supplied.
    pub detect_local_accel: bool,
}

impl ResolveOptions {
    pub fn detect_local() -> Self {
        Self {
            detect_local_accel: true,
        }
    }
}

/// Turns a requested CUDA version and ROS distribution into a base image.
///
/// The distro file is read once when the resolver is built. The registry tag
/// listing is fetched at most once per resolver, on the first lookup that
/// needs it.
pub struct BaseImageResolver<S = HttpTagSource> {
    settings: ResolverSettings,
    distros: DistroConfig,
    validator: VersionValidator,
    catalog: RemoteTagCatalog<S>,
    detector: Box<dyn AccelDetector>,
}

impl BaseImageResolver<HttpTagSource> {
    /// Read the distro file named in `settings` and talk to the real registry.
    pub fn from_settings(settings: ResolverSettings) -> Result<Self, ResolveError> {
        let distros = DistroConfig::load(&settings.config_path)?;
        Self::new(settings, distros, HttpTagSource::default())
    }
}

impl<S: TagSource> BaseImageResolver<S> {
    pub fn new(settings: ResolverSettings, distros: DistroConfig, source: S) -> Result<Self, ResolveError> {
        let first_page = settings
            .first_page_url()
            .map_err(ResolveError::RegistryUnavailable)?;
        let catalog = RemoteTagCatalog::new(source, first_page, settings.excluded_markers.clone());

        Ok(Self {
            settings,
            distros,
            validator: VersionValidator::default(),
            catalog,
            detector: Box::new(NvccDetector),
        })
    }

    pub fn with_detector(mut self, detector: Box<dyn AccelDetector>) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_validator(mut self, validator: VersionValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn catalog(&self) -> &RemoteTagCatalog<S> {
        &self.catalog
    }

    /// Base image for the requested CUDA version and ROS distribution.
    ///
    /// Without a CUDA version this is the plain OS image and the registry is
    /// never contacted.
    pub async fn resolve(
        &self,
        raw_accel: Option<&str>,
        raw_distro: Option<&str>,
        options: ResolveOptions,
    ) -> Result<ResolvedImage, ResolveError> {
        let accel = self.validate_accel(raw_accel, options).await?;
        let distro = self.validate_distro(raw_distro)?;
        self.resolve_validated(accel.as_ref(), distro.as_deref()).await
    }

    async fn validate_accel(
        &self,
        raw_accel: Option<&str>,
        options: ResolveOptions,
    ) -> Result<Option<AccelVersion>, ResolveError> {
        // Only a missing value triggers detection; an explicit "none" opts out.
        let detected = if options.detect_local_accel
            && raw_accel.is_none_or(str::is_empty)
            && self.validator.accel_supported()
        {
            self.detector.detect().await
        } else {
            None
        };

        self.validator
            .validate_accel_version(detected.as_deref().or(raw_accel))
    }

    fn validate_distro(&self, raw_distro: Option<&str>) -> Result<Option<String>, ResolveError> {
        self.validator
            .validate_distro(raw_distro, &self.distros.distro_names())
    }

    async fn resolve_validated(
        &self,
        accel: Option<&AccelVersion>,
        distro: Option<&str>,
    ) -> Result<ResolvedImage, ResolveError> {
        let os_version = self
            .distros
            .os_version_for(distro)
            .unwrap_or(self.settings.default_os_version.as_str());
        debug!(?distro, os_version, accel = ?accel.map(AccelVersion::as_str), "resolving base image");

        match accel {
            None => Ok(ResolvedImage::new(
                ImageKind::Os,
                &self.settings.os_repository,
                os_version,
            )),
            Some(version) => {
                let os_suffix = self.settings.os_suffix(os_version);
                let tag = self.catalog.latest_patch(version, &os_suffix).await?;
                Ok(ResolvedImage::new(
                    ImageKind::Accel,
                    &self.settings.accel_repository,
                    tag,
                ))
            }
        }
    }
}
