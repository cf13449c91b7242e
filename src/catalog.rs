use crate::config::SpeciesConfig;

/// Ordered, fixed-position class-index mapping. Built once from configuration
/// at startup; positions correspond to the external predictor's numeric class
/// ids and are never user-editable at runtime.
#[derive(Debug, Clone)]
pub struct SpeciesIndex {
    version: u32,
    labels: Vec<String>,
}

impl SpeciesIndex {
    #[must_use]
    pub fn from_config(config: &SpeciesConfig) -> Self {
        Self {
            version: config.version,
            labels: config.labels.clone(),
        }
    }

    /// Resolve a predictor class id to a species name. Out-of-range ids map
    /// to a placeholder that embeds the raw id for diagnosis.
    #[must_use]
    pub fn resolve(&self, class_index: i64) -> String {
        usize::try_from(class_index)
            .ok()
            .and_then(|i| self.labels.get(i))
            .cloned()
            .unwrap_or_else(|| format!("Unknown Species (Class {class_index})"))
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SpeciesIndex {
        SpeciesIndex::from_config(&SpeciesConfig::default())
    }

    #[test]
    fn test_resolves_known_indices() {
        let index = index();
        assert_eq!(index.resolve(0), "Asterionella");
        assert_eq!(index.resolve(4), "Navicula");
        assert_eq!(index.resolve(5), "Nitzschia");
    }

    #[test]
    fn test_out_of_range_index_yields_placeholder() {
        let index = index();
        assert_eq!(index.resolve(6), "Unknown Species (Class 6)");
        assert_eq!(index.resolve(29), "Unknown Species (Class 29)");
        assert_eq!(index.resolve(-1), "Unknown Species (Class -1)");
    }

    #[test]
    fn test_custom_label_list() {
        let config = SpeciesConfig {
            version: 2,
            labels: vec!["Cymbella".to_string(), "Amphora".to_string()],
        };
        let index = SpeciesIndex::from_config(&config);
        assert_eq!(index.len(), 2);
        assert_eq!(index.version(), 2);
        assert_eq!(index.resolve(1), "Amphora");
        assert_eq!(index.resolve(2), "Unknown Species (Class 2)");
    }
}
