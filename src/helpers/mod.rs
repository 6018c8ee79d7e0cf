pub mod detect;
pub mod validation;

pub use detect::{AccelDetector, NoDetector, NvccDetector};
pub use validation::{AccelVersion, VersionValidator};
