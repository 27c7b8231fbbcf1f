use std::fs;
use std::path::{Path, PathBuf};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;
use crate::utils::utils_errors::BenchmarkError;

/// Convenience struct that holds many class functions related to file utils.
pub struct FileUtils;
impl FileUtils {
    /// Reads contents of file and outputs it to a string.
    pub fn read_file_contents_to_string(p: &Path) -> Result<String, BenchmarkError> {
        return match fs::read_to_string(p) {
            Ok(contents) => { Ok(contents) }
            Err(e) => {
                Err(BenchmarkError::new_io_error(&p.to_string_lossy(), &e.to_string(), file!(), line!()))
            }
        }
    }
    /// Reads the raw bytes of a file.
    pub fn read_file_contents_to_bytes(p: &Path) -> Result<Vec<u8>, BenchmarkError> {
        return match fs::read(p) {
            Ok(contents) => { Ok(contents) }
            Err(e) => {
                Err(BenchmarkError::new_io_error(&p.to_string_lossy(), &e.to_string(), file!(), line!()))
            }
        }
    }
    /// Writes the string to the given path, creating parent directories when needed.
    pub fn write_string_to_file(s: &str, p: &Path) -> Result<(), BenchmarkError> {
        Self::create_parent_directories(p)?;
        return match fs::write(p, s) {
            Ok(_) => { Ok(()) }
            Err(e) => {
                Err(BenchmarkError::new_io_error(&p.to_string_lossy(), &e.to_string(), file!(), line!()))
            }
        }
    }
    pub fn create_parent_directories(p: &Path) -> Result<(), BenchmarkError> {
        if let Some(parent) = p.parent() {
            if parent.as_os_str().is_empty() { return Ok(()); }
            if let Err(e) = fs::create_dir_all(parent) {
                return Err(BenchmarkError::new_io_error(&parent.to_string_lossy(), &e.to_string(), file!(), line!()));
            }
        }
        Ok(())
    }
    pub fn create_directory_if_necessary(p: &Path) -> Result<(), BenchmarkError> {
        if p.is_dir() { return Ok(()); }
        return match fs::create_dir_all(p) {
            Ok(_) => { Ok(()) }
            Err(e) => {
                Err(BenchmarkError::new_io_error(&p.to_string_lossy(), &e.to_string(), file!(), line!()))
            }
        }
    }
    /// Saves given object to a file as a JSON string.  The object must be serializable using serde json.
    pub fn save_object_to_file_as_json<T: Serialize>(object: &T, p: &Path) -> Result<(), BenchmarkError> {
        let s = match serde_json::to_string_pretty(object) {
            Ok(s) => { s }
            Err(e) => { return Err(BenchmarkError::new_parse_error("object as json", &e.to_string(), file!(), line!())) }
        };
        Self::write_string_to_file(&s, p)
    }
    /// Saves given object to a file as a YAML string.
    pub fn save_object_to_file_as_yaml<T: Serialize>(object: &T, p: &Path) -> Result<(), BenchmarkError> {
        let s = match serde_yaml::to_string(object) {
            Ok(s) => { s }
            Err(e) => { return Err(BenchmarkError::new_parse_error("object as yaml", &e.to_string(), file!(), line!())) }
        };
        Self::write_string_to_file(&s, p)
    }
    /// Reads object that was serialized by serde JSON from a file.
    pub fn load_object_from_json_file<T: DeserializeOwned>(p: &Path) -> Result<T, BenchmarkError> {
        let contents = Self::read_file_contents_to_string(p)?;
        Self::load_object_from_json_string(&contents)
    }
    pub fn load_object_from_json_string<T: DeserializeOwned>(json_str: &str) -> Result<T, BenchmarkError> {
        return match serde_json::from_str(json_str) {
            Ok(o) => { Ok(o) }
            Err(e) => {
                Err(BenchmarkError::new_parse_error("json string", &e.to_string(), file!(), line!()))
            }
        }
    }
    /// Reads object that was serialized as YAML from a file.
    pub fn load_object_from_yaml_file<T: DeserializeOwned>(p: &Path) -> Result<T, BenchmarkError> {
        let contents = Self::read_file_contents_to_string(p)?;
        Self::load_object_from_yaml_string(&contents)
    }
    pub fn load_object_from_yaml_string<T: DeserializeOwned>(yaml_str: &str) -> Result<T, BenchmarkError> {
        return match serde_yaml::from_str(yaml_str) {
            Ok(o) => { Ok(o) }
            Err(e) => {
                Err(BenchmarkError::new_parse_error("yaml string", &e.to_string(), file!(), line!()))
            }
        }
    }
    /// Loads a JSON file when the extension is `.json`, otherwise parses the file as YAML
    /// (YAML is a superset of JSON for every file this crate writes).
    pub fn load_object_from_file<T: DeserializeOwned>(p: &Path) -> Result<T, BenchmarkError> {
        return match Self::get_file_extension_string(p).as_deref() {
            Some("json") => { Self::load_object_from_json_file(p) }
            _ => { Self::load_object_from_yaml_file(p) }
        }
    }
    /// Returns file extension of path as string.
    pub fn get_file_extension_string(p: &Path) -> Option<String> {
        p.extension().map(|e| e.to_string_lossy().to_string())
    }
    /// Returns the file name without its directory.
    pub fn basename(p: &Path) -> String {
        return match p.file_name() {
            None => { p.to_string_lossy().to_string() }
            Some(f) => { f.to_string_lossy().to_string() }
        }
    }
    /// Returns the file name without its directory and without its extension.
    pub fn basename_without_extension(p: &Path) -> String {
        return match p.file_stem() {
            None => { Self::basename(p) }
            Some(f) => { f.to_string_lossy().to_string() }
        }
    }
    /// Returns all files under the given directory (recursively), optionally filtered by extension.
    pub fn get_all_files_in_directory(p: &Path, extension: Option<&str>) -> Result<Vec<PathBuf>, BenchmarkError> {
        if !p.is_dir() {
            return Err(BenchmarkError::new_io_error(&p.to_string_lossy(), "directory does not exist", file!(), line!()));
        }
        let mut out = vec![];
        for entry in WalkDir::new(p).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => { entry }
                Err(e) => { return Err(BenchmarkError::new_io_error(&p.to_string_lossy(), &e.to_string(), file!(), line!())) }
            };
            if !entry.file_type().is_file() { continue; }
            let path = entry.into_path();
            if let Some(extension) = extension {
                if Self::get_file_extension_string(&path).as_deref() != Some(extension) { continue; }
            }
            out.push(path);
        }
        Ok(out)
    }
    /// SHA-256 hex digest of the exact bytes of the file.
    pub fn compute_checksum_of_file(p: &Path) -> Result<String, BenchmarkError> {
        let bytes = Self::read_file_contents_to_bytes(p)?;
        Ok(Self::compute_checksum_of_bytes(&bytes))
    }
    pub fn compute_checksum_of_bytes(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let digest = hasher.finalize();
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample { a: f64, b: Vec<usize> }

    #[test]
    fn checksum_matches_known_digest() {
        assert_eq!(FileUtils::compute_checksum_of_bytes(b"abc"),
                   "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn yaml_and_json_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let sample = Sample { a: 1.5, b: vec![1, 2, 3] };

        let yaml_path = dir.path().join("nested").join("sample.yaml");
        FileUtils::save_object_to_file_as_yaml(&sample, &yaml_path).unwrap();
        let loaded: Sample = FileUtils::load_object_from_file(&yaml_path).unwrap();
        assert_eq!(loaded, sample);

        let json_path = dir.path().join("sample.json");
        FileUtils::save_object_to_file_as_json(&sample, &json_path).unwrap();
        let loaded: Sample = FileUtils::load_object_from_file(&json_path).unwrap();
        assert_eq!(loaded, sample);

        let files = FileUtils::get_all_files_in_directory(dir.path(), Some("yaml")).unwrap();
        assert_eq!(files, vec![yaml_path]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let res = FileUtils::read_file_contents_to_string(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(res, Err(BenchmarkError::Io(_))));
    }

    #[test]
    fn basenames() {
        let p = Path::new("/tmp/queries/table_query_3.yaml");
        assert_eq!(FileUtils::basename(p), "table_query_3.yaml");
        assert_eq!(FileUtils::basename_without_extension(p), "table_query_3");
    }
}
