//! Pipeline stages, each consuming the previous stage's ordered output.

mod derivation;
mod scanning;
mod validation;
mod writing;

pub use derivation::{derive_companions, normalize_identifiers};
pub use scanning::scan_descriptors;
pub use validation::filter_existing;
pub use writing::write_manifests;
