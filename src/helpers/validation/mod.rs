use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ResolveError;

const ACCEL_VERSION_PATTERN: &str = r"^\d+\.\d+$";

fn accel_version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ACCEL_VERSION_PATTERN).expect("static pattern is valid"))
}

/// A CUDA `X.Y` version that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccelVersion(String);

impl AccelVersion {
    /// Parse an `X.Y` string; anything else is `InvalidAccelVersion`.
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        if accel_version_re().is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ResolveError::InvalidAccelVersion(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Empty and `none` (any case) both mean "not requested".
pub fn is_unset(raw: Option<&str>) -> bool {
    match raw {
        None => true,
        Some(value) => value.is_empty() || value.eq_ignore_ascii_case("none"),
    }
}

/// Syntactic checks for caller-supplied versions.
#[derive(Debug, Clone, Copy)]
pub struct VersionValidator {
    accel_supported: bool,
}

impl Default for VersionValidator {
    fn default() -> Self {
        Self::new(!cfg!(target_os = "macos"))
    }
}

impl VersionValidator {
    pub fn new(accel_supported: bool) -> Self {
        Self { accel_supported }
    }

    /// Whether this host can run the CUDA runtime at all.
    pub fn accel_supported(&self) -> bool {
        self.accel_supported
    }

    pub fn validate_accel_version(&self, raw: Option<&str>) -> Result<Option<AccelVersion>, ResolveError> {
        let Some(value) = raw.filter(|_| !is_unset(raw)) else {
            return Ok(None);
        };
        if !self.accel_supported {
            return Err(ResolveError::AccelUnsupported(value.to_string()));
        }
        AccelVersion::parse(value).map(Some)
    }

    pub fn validate_distro<S: AsRef<str>>(
        &self,
        raw: Option<&str>,
        known_keys: &[S],
    ) -> Result<Option<String>, ResolveError> {
        let Some(value) = raw.filter(|_| !is_unset(raw)) else {
            return Ok(None);
        };
        if known_keys.iter().any(|k| k.as_ref() == value) {
            return Ok(Some(value.to_string()));
        }
        Err(ResolveError::UnknownDistro {
            requested: value.to_string(),
            available: known_keys.iter().map(|k| k.as_ref().to_string()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISTROS: &[&str] = &["noetic", "humble", "jazzy"];

    #[test]
    fn valid_versions_pass_through_unchanged() {
        let validator = VersionValidator::new(true);
        for raw in ["12.6", "11.8", "0.0", "100.25"] {
            let version = validator.validate_accel_version(Some(raw)).unwrap().unwrap();
            assert_eq!(version.as_str(), raw);
        }
    }

    #[test]
    fn unset_accel_values() {
        let validator = VersionValidator::new(true);
        for raw in [None, Some(""), Some("none"), Some("None"), Some("NONE")] {
            assert_eq!(validator.validate_accel_version(raw).unwrap(), None);
        }
    }

    #[test]
    fn malformed_accel_versions_are_rejected() {
        let validator = VersionValidator::new(true);
        for raw in ["12.6.1", "12", "abcd", "12.x", " 12.6", "12.6 ", "v12.6", "12..6", ".6", "nonee"] {
            let err = validator.validate_accel_version(Some(raw)).unwrap_err();
            assert!(
                matches!(err, ResolveError::InvalidAccelVersion(ref v) if v == raw),
                "{raw} gave {err:?}"
            );
        }
    }

    #[test]
    fn accel_rejected_where_unsupported() {
        let validator = VersionValidator::new(false);

        let err = validator.validate_accel_version(Some("12.6")).unwrap_err();
        assert!(matches!(err, ResolveError::AccelUnsupported(_)));
        assert_eq!(validator.validate_accel_version(Some("none")).unwrap(), None);
    }

    #[test]
    fn distro_must_be_configured() {
        let validator = VersionValidator::default();

        assert_eq!(validator.validate_distro(Some("noetic"), DISTROS).unwrap().as_deref(), Some("noetic"));
        assert_eq!(validator.validate_distro(None, DISTROS).unwrap(), None);
        assert_eq!(validator.validate_distro(Some("None"), DISTROS).unwrap(), None);

        for raw in ["ros", "1234", "galactic", "Noetic", "default"] {
            let err = validator.validate_distro(Some(raw), DISTROS).unwrap_err();
            assert!(matches!(err, ResolveError::UnknownDistro { .. }), "{raw}");
        }
    }

    #[test]
    fn unknown_distro_lists_the_options() {
        let err = VersionValidator::default()
            .validate_distro(Some("galactic"), DISTROS)
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "ROS distribution must be one of the following: noetic, humble, jazzy, not 'galactic'"
        );
    }
}
