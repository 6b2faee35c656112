pub mod config;
pub mod logging;

pub mod digest;
pub mod manifest;
pub mod runner;

pub use digest::{compute_digest, Algorithm, DigestError};
pub use manifest::{Manifest, ManifestEntry, ManifestError, ManifestLine};
pub use runner::{DigestResult, Runner, Status, Summary, VerificationOutcome, VerifyReport};
