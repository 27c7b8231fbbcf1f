use std::fmt::Display;
use std::str::FromStr;
use strum::IntoEnumIterator;
use crate::utils::utils_errors::BenchmarkError;

pub struct EnumUtils;
impl EnumUtils {
    pub fn get_all_variants_of_enum<T: IntoEnumIterator>() -> Vec<T> {
        let out: Vec<T> = T::iter().collect();
        out
    }
    pub fn convert_all_variants_of_enum_into_strings<T: IntoEnumIterator + Display>() -> Vec<String> {
        let mut out = vec![];

        let variants = Self::get_all_variants_of_enum::<T>();
        for v in &variants { out.push(v.to_string()); }

        out
    }
    /// Parses a symbolic name into the enum variant.  Unknown names produce an
    /// `UnrecognizedName` error listing every supported name.
    pub fn parse_name<T: IntoEnumIterator + Display + FromStr>(kind: &str, name: &str) -> Result<T, BenchmarkError> {
        return match T::from_str(name) {
            Ok(t) => { Ok(t) }
            Err(_) => {
                let supported = Self::convert_all_variants_of_enum_into_strings::<T>();
                Err(BenchmarkError::new_unrecognized_name_error(kind, name, &supported, file!(), line!()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum_macros::{Display, EnumIter, EnumString};

    #[derive(Clone, Debug, PartialEq, Display, EnumIter, EnumString)]
    #[strum(serialize_all = "snake_case")]
    enum Fruit { Apple, BloodOrange }

    #[test]
    fn parse_known_and_unknown_names() {
        assert_eq!(EnumUtils::parse_name::<Fruit>("fruit", "blood_orange").unwrap(), Fruit::BloodOrange);
        assert_eq!(EnumUtils::convert_all_variants_of_enum_into_strings::<Fruit>(), vec!["apple".to_string(), "blood_orange".to_string()]);
        let err = EnumUtils::parse_name::<Fruit>("fruit", "pear").unwrap_err();
        assert!(matches!(err, BenchmarkError::UnrecognizedName(_)));
        assert!(err.to_string().contains("apple"));
    }
}
