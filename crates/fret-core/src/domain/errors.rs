//! Error model for the coupling engine.
//!
//! Every failure carries a stable placeholder code (for log scraping and
//! tests) plus a category describing what went wrong. All errors are fatal
//! for the run: this is a single-shot batch computation with no retry or
//! degraded-mode behavior.

use std::path::Path;
use thiserror::Error;

use crate::domain::DensityRole;

pub type ComputeResult<T> = Result<T, FretError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FretErrorCategory {
    /// Input file missing or unreadable.
    FileNotFound,
    /// Cube voxel basis is not diagonal.
    MalformedGeometry,
    /// Reduced-density point count would exceed the hard capacity.
    CapacityExceeded,
    /// Nanoparticle file lacks the expected block marker.
    MissingMarker,
    /// Nanoparticle block header is neither recognized model literal.
    UnrecognizedHeader,
    /// Nanoparticle model contents are structurally invalid.
    InvalidModel,
    /// Deliberately unimplemented computation path.
    NotImplemented,
    /// Configuration or input-deck validation failure.
    InputValidation,
    /// Operating-system level I/O failure.
    IoSystem,
}

impl FretErrorCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FileNotFound => "file-not-found",
            Self::MalformedGeometry => "malformed-geometry",
            Self::CapacityExceeded => "capacity-exceeded",
            Self::MissingMarker => "missing-marker",
            Self::UnrecognizedHeader => "unrecognized-header",
            Self::InvalidModel => "invalid-model",
            Self::NotImplemented => "not-implemented",
            Self::InputValidation => "input-validation",
            Self::IoSystem => "io-system",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("[{placeholder}] {message}")]
pub struct FretError {
    category: FretErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl FretError {
    pub fn new(
        category: FretErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn file_not_found(placeholder: &'static str, path: &Path) -> Self {
        Self::new(
            FretErrorCategory::FileNotFound,
            placeholder,
            format!("file '{}' not found or unreadable", path.display()),
        )
    }

    pub fn malformed_geometry(path: &Path, message: impl Into<String>) -> Self {
        Self::new(
            FretErrorCategory::MalformedGeometry,
            "INPUT.CUBE_GEOMETRY",
            format!("cube file '{}': {}", path.display(), message.into()),
        )
    }

    pub fn capacity_exceeded(role: DensityRole, path: &Path, capacity: usize) -> Self {
        Self::new(
            FretErrorCategory::CapacityExceeded,
            "RUN.REDUCE_CAPACITY",
            format!(
                "{} density '{}' exceeds the reduced-point capacity of {}; raise the cutoff",
                role,
                path.display(),
                capacity
            ),
        )
    }

    pub fn missing_marker(path: &Path, marker: &str) -> Self {
        Self::new(
            FretErrorCategory::MissingMarker,
            "INPUT.NP_MARKER",
            format!(
                "nanoparticle file '{}' does not contain the marker line '{}'",
                path.display(),
                marker
            ),
        )
    }

    pub fn unrecognized_header(path: &Path, header: &str) -> Self {
        Self::new(
            FretErrorCategory::UnrecognizedHeader,
            "INPUT.NP_HEADER",
            format!(
                "nanoparticle file '{}' has an unrecognized model header '{}'",
                path.display(),
                header
            ),
        )
    }

    pub fn invalid_model(path: &Path, message: impl Into<String>) -> Self {
        Self::new(
            FretErrorCategory::InvalidModel,
            "INPUT.NP_MODEL",
            format!("nanoparticle file '{}': {}", path.display(), message.into()),
        )
    }

    pub fn not_implemented(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(FretErrorCategory::NotImplemented, placeholder, message)
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(FretErrorCategory::InputValidation, placeholder, message)
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(FretErrorCategory::IoSystem, placeholder, message)
    }

    pub fn category(&self) -> FretErrorCategory {
        self.category
    }

    pub fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Process exit code for the CLI; every category aborts the run.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::{FretError, FretErrorCategory};
    use crate::domain::DensityRole;
    use std::path::Path;

    #[test]
    fn constructors_set_category_and_placeholder() {
        let error = FretError::file_not_found("IO.CUBE_READ", Path::new("missing.cube"));
        assert_eq!(error.category(), FretErrorCategory::FileNotFound);
        assert_eq!(error.placeholder(), "IO.CUBE_READ");
        assert!(error.message().contains("missing.cube"));
    }

    #[test]
    fn capacity_error_names_role_and_recommends_cutoff() {
        let error =
            FretError::capacity_exceeded(DensityRole::Acceptor, Path::new("acc.cube"), 100);
        assert_eq!(error.category(), FretErrorCategory::CapacityExceeded);
        assert!(error.message().contains("acceptor"));
        assert!(error.message().contains("raise the cutoff"));
    }

    #[test]
    fn display_includes_placeholder_code() {
        let error = FretError::input_validation("INPUT.DECK", "cutoff cannot be negative");
        assert_eq!(
            error.to_string(),
            "[INPUT.DECK] cutoff cannot be negative"
        );
    }
}
