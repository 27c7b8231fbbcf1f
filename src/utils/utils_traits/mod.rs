use std::path::Path;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use crate::utils::utils_errors::BenchmarkError;
use crate::utils::utils_files::FileUtils;

/// Objects that convert to and from a YAML/JSON compatible mapping.  The mapping is the
/// on-disk schema of query, planner and result files; the YAML helpers below are built on it.
pub trait ExternalFormat {
    fn to_external_format(&self) -> Result<Mapping, BenchmarkError>;
    fn from_external_format(mapping: &Mapping) -> Result<Self, BenchmarkError> where Self: Sized;

    fn to_yaml_string(&self) -> Result<String, BenchmarkError> {
        let mapping = self.to_external_format()?;
        return match serde_yaml::to_string(&mapping) {
            Ok(s) => { Ok(s) }
            Err(e) => { Err(BenchmarkError::new_parse_error("mapping as yaml", &e.to_string(), file!(), line!())) }
        }
    }
    fn from_yaml_str(yaml_str: &str) -> Result<Self, BenchmarkError> where Self: Sized {
        let value: Value = FileUtils::load_object_from_yaml_string(yaml_str)?;
        return match value {
            Value::Mapping(mapping) => { Self::from_external_format(&mapping) }
            _ => { Err(BenchmarkError::new_parse_error("yaml document", "top level is not a mapping", file!(), line!())) }
        }
    }
    fn save_to_yaml_file(&self, path: &Path) -> Result<(), BenchmarkError> {
        let s = self.to_yaml_string()?;
        FileUtils::write_string_to_file(&s, path)
    }
    fn load_from_yaml_file(path: &Path) -> Result<Self, BenchmarkError> where Self: Sized {
        let s = FileUtils::read_file_contents_to_string(path)?;
        Self::from_yaml_str(&s)
    }
}

/// Helpers for reading and writing fields of an external format mapping.
pub struct MappingUtils;
impl MappingUtils {
    pub fn get<'a>(mapping: &'a Mapping, key: &str) -> Option<&'a Value> {
        match mapping.get(&Value::String(key.to_string())) {
            None | Some(Value::Null) => { None }
            Some(v) => { Some(v) }
        }
    }
    pub fn get_required<'a>(mapping: &'a Mapping, key: &str, context: &str) -> Result<&'a Value, BenchmarkError> {
        return match Self::get(mapping, key) {
            None => { Err(BenchmarkError::new_missing_field_error(key, context, file!(), line!())) }
            Some(v) => { Ok(v) }
        }
    }
    pub fn get_required_string(mapping: &Mapping, key: &str, context: &str) -> Result<String, BenchmarkError> {
        let v = Self::get_required(mapping, key, context)?;
        return match v {
            Value::String(s) => { Ok(s.clone()) }
            _ => { Err(BenchmarkError::new_parse_error(&format!("field {:?} of {}", key, context), "expected a string", file!(), line!())) }
        }
    }
    /// Deserializes an optional field into `T`, falling back to `default` when the key is absent.
    pub fn get_or_default<T: DeserializeOwned>(mapping: &Mapping, key: &str, context: &str, default: T) -> Result<T, BenchmarkError> {
        return match Self::get(mapping, key) {
            None => { Ok(default) }
            Some(v) => { Self::from_value(v, &format!("field {:?} of {}", key, context)) }
        }
    }
    pub fn get_optional<T: DeserializeOwned>(mapping: &Mapping, key: &str, context: &str) -> Result<Option<T>, BenchmarkError> {
        return match Self::get(mapping, key) {
            None => { Ok(None) }
            Some(v) => { Ok(Some(Self::from_value(v, &format!("field {:?} of {}", key, context))?)) }
        }
    }
    pub fn from_value<T: DeserializeOwned>(value: &Value, what: &str) -> Result<T, BenchmarkError> {
        return match serde_yaml::from_value(value.clone()) {
            Ok(t) => { Ok(t) }
            Err(e) => { Err(BenchmarkError::new_parse_error(what, &e.to_string(), file!(), line!())) }
        }
    }
    pub fn to_value<T: Serialize>(object: &T, what: &str) -> Result<Value, BenchmarkError> {
        return match serde_yaml::to_value(object) {
            Ok(v) => { Ok(v) }
            Err(e) => { Err(BenchmarkError::new_parse_error(what, &e.to_string(), file!(), line!())) }
        }
    }
    pub fn insert<T: Serialize>(mapping: &mut Mapping, key: &str, object: &T) -> Result<(), BenchmarkError> {
        let value = Self::to_value(object, key)?;
        mapping.insert(Value::String(key.to_string()), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_values_count_as_missing() {
        let mapping: Mapping = serde_yaml::from_str("a: 1\nb: ~\nc: text\n").unwrap();
        assert!(MappingUtils::get(&mapping, "a").is_some());
        assert!(MappingUtils::get(&mapping, "b").is_none());
        let err = MappingUtils::get_required(&mapping, "b", "test").unwrap_err();
        assert!(matches!(err, BenchmarkError::MissingField(_)));
        assert_eq!(MappingUtils::get_required_string(&mapping, "c", "test").unwrap(), "text");
        assert_eq!(MappingUtils::get_or_default(&mapping, "z", "test", 4.5).unwrap(), 4.5);
        assert!(MappingUtils::get_required_string(&mapping, "a", "test").is_err());
    }
}
