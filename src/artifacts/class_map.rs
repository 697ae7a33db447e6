//! Class name <-> label mapping
//!
//! Built once from the class dictionary artifact and immutable afterwards.
//! The inverse (label -> name) mapping is derived at construction time.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct ClassMap {
    name_to_label: BTreeMap<String, usize>,
    label_to_name: HashMap<usize, String>,
}

impl ClassMap {
    pub fn from_map(name_to_label: BTreeMap<String, usize>) -> Self {
        let label_to_name = name_to_label
            .iter()
            .map(|(name, &label)| (label, name.clone()))
            .collect();
        Self {
            name_to_label,
            label_to_name,
        }
    }

    /// Load from the JSON artifact (`{"name": label, ...}`).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let name_to_label: BTreeMap<String, usize> = serde_json::from_reader(reader)?;
        Ok(Self::from_map(name_to_label))
    }

    /// Translate a predicted label to its class name.
    ///
    /// A missing label means the classifier and dictionary artifacts are out
    /// of sync; that request fails, nothing is retried.
    pub fn name_of(&self, label: usize) -> Result<&str> {
        self.label_to_name
            .get(&label)
            .map(String::as_str)
            .ok_or(Error::UnknownClass { label })
    }

    pub fn label_of(&self, name: &str) -> Option<usize> {
        self.name_to_label.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.name_to_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_label.is_empty()
    }

    /// The full name -> label dictionary, as returned to API clients.
    pub fn as_dictionary(&self) -> &BTreeMap<String, usize> {
        &self.name_to_label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClassMap {
        ClassMap::from_map(BTreeMap::from([
            ("federer".to_string(), 0),
            ("virat".to_string(), 1),
        ]))
    }

    #[test]
    fn inverse_mapping_is_derived() {
        let map = sample();
        assert_eq!(map.name_of(0).unwrap(), "federer");
        assert_eq!(map.name_of(1).unwrap(), "virat");
        assert_eq!(map.label_of("virat"), Some(1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn unknown_label_is_a_lookup_error() {
        let err = sample().name_of(7).unwrap_err();
        assert!(matches!(err, Error::UnknownClass { label: 7 }));
    }

    #[test]
    fn loads_from_json_artifact() {
        let path = std::env::temp_dir().join(format!("classes-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"a": 0, "b": 1}"#).unwrap();
        let map = ClassMap::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(map.name_of(1).unwrap(), "b");
    }
}
