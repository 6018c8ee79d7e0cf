use std::fmt;

/// Where the resolved base image comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Plain OS image, no CUDA.
    Os,
    /// CUDA image picked from the tag listing.
    Accel,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Os => "os",
            ImageKind::Accel => "cuda",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base image reference handed to the image build, `repository:tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    kind: ImageKind,
    repository: String,
    tag: String,
}

impl ResolvedImage {
    pub fn new(kind: ImageKind, repository: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            kind,
            repository: repository.into(),
            tag: tag.into(),
        }
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    /// eg. nvidia/cuda
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// eg. 12.6.3-devel-ubuntu24.04
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn reference(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ResolvedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}
