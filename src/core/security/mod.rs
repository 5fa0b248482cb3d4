// Security module for path validation
//
// Filesystem tools resolve every client-supplied path through this module so
// that reads and writes stay inside the configured root directory.

pub mod path_validator;

pub use path_validator::{PathSecurityError, validate_output_path, validate_path};
