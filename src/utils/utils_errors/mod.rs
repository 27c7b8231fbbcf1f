use thiserror::Error;

/// A common error type returned by functions throughout the benchmarking harness.
///
/// Configuration errors (`UnrecognizedName`, `MissingField`, `InvalidParameter`) and I/O errors
/// (`Io`, `Parse`) are always fatal for the invoking script.  Planning soft failures are not
/// represented here; see `PlanningError` in the planners module.
#[derive(Clone, Debug, Error)]
pub enum BenchmarkError {
    #[error("{0}")]
    GenericError(String),
    #[error("{0}")]
    UnrecognizedName(String),
    #[error("{0}")]
    MissingField(String),
    #[error("{0}")]
    InvalidParameter(String),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Parse(String),
    #[error("{0}")]
    Scene(String)
}
impl BenchmarkError {
    pub fn new_generic_error_str(s: &str, file: &str, line: u32) -> Self {
        let s = format!("ERROR: {} -- File: {}, Line: {}", s, file, line);
        return Self::GenericError(s);
    }
    pub fn new_unrecognized_name_error(kind: &str, name: &str, supported: &[String], file: &str, line: u32) -> Self {
        let s = format!("ERROR: Unrecognized {} name {:?}.  Supported names are {:?} -- File: {}, Line: {}", kind, name, supported, file, line);
        return Self::UnrecognizedName(s);
    }
    pub fn new_missing_field_error(field: &str, context: &str, file: &str, line: u32) -> Self {
        let s = format!("ERROR: Required field {:?} is missing from {} -- File: {}, Line: {}", field, context, file, line);
        return Self::MissingField(s);
    }
    pub fn new_invalid_parameter_error(parameter: &str, message: &str, file: &str, line: u32) -> Self {
        let s = format!("ERROR: Invalid parameter {:?}.  {} -- File: {}, Line: {}", parameter, message, file, line);
        return Self::InvalidParameter(s);
    }
    pub fn new_io_error(path: &str, message: &str, file: &str, line: u32) -> Self {
        let s = format!("ERROR: I/O failure on {:?}: {} -- File: {}, Line: {}", path, message, file, line);
        return Self::Io(s);
    }
    pub fn new_parse_error(what: &str, message: &str, file: &str, line: u32) -> Self {
        let s = format!("ERROR: Could not parse {}: {} -- File: {}, Line: {}", what, message, file, line);
        return Self::Parse(s);
    }
    pub fn new_scene_error(message: &str, file: &str, line: u32) -> Self {
        let s = format!("ERROR: Scene error.  {} -- File: {}, Line: {}", message, file, line);
        return Self::Scene(s);
    }
    pub fn new_check_for_dof_length_mismatch(expected: usize, given: usize, file: &str, line: u32) -> Result<(), Self> {
        if expected != given {
            return Err(Self::new_scene_error(&format!("Expected a DOF vector of length {} but got length {}.", expected, given), file, line));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_record_location() {
        let e = BenchmarkError::new_missing_field_error("env", "query", "query.rs", 12);
        let s = e.to_string();
        assert!(s.contains("\"env\""));
        assert!(s.contains("query.rs"));
        assert!(s.contains("12"));
        assert!(matches!(e, BenchmarkError::MissingField(_)));
    }

    #[test]
    fn dof_length_check() {
        assert!(BenchmarkError::new_check_for_dof_length_mismatch(3, 3, file!(), line!()).is_ok());
        let err = BenchmarkError::new_check_for_dof_length_mismatch(3, 2, file!(), line!()).unwrap_err();
        assert!(matches!(err, BenchmarkError::Scene(_)));
    }
}
