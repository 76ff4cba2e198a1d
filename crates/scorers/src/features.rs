//! Item feature space built from catalog metadata.
//!
//! Every item is encoded as a fixed-length one-hot vector over the full
//! (category ∪ tag) vocabulary. The vocabulary is computed once per training
//! pass from the whole catalog, so all item vectors share the same
//! dimensionality and axis ordering.

use data_loader::{Item, ItemCatalog};
use std::collections::{BTreeSet, HashMap};

/// Fixed feature space: category axes first, then tag axes, each block
/// sorted lexicographically for a deterministic layout.
#[derive(Debug, Clone)]
pub struct FeatureSpace {
    axes: Vec<String>,
    category_index: HashMap<String, usize>,
    tag_index: HashMap<String, usize>,
}

impl FeatureSpace {
    /// Build the vocabulary from the full catalog.
    pub fn build(catalog: &ItemCatalog) -> Self {
        let categories: BTreeSet<&str> = catalog
            .items()
            .iter()
            .map(|item| item.category.as_str())
            .collect();
        let tags: BTreeSet<&str> = catalog
            .items()
            .iter()
            .flat_map(|item| item.tags.iter().map(|t| t.as_str()))
            .collect();

        let mut axes = Vec::with_capacity(categories.len() + tags.len());
        let mut category_index = HashMap::new();
        let mut tag_index = HashMap::new();

        for category in categories {
            category_index.insert(category.to_string(), axes.len());
            axes.push(format!("category:{}", category));
        }
        for tag in tags {
            tag_index.insert(tag.to_string(), axes.len());
            axes.push(format!("tag:{}", tag));
        }

        Self {
            axes,
            category_index,
            tag_index,
        }
    }

    /// Number of feature axes
    pub fn dimension(&self) -> usize {
        self.axes.len()
    }

    /// Axis labels, mostly useful for debugging output
    pub fn axes(&self) -> &[String] {
        &self.axes
    }

    /// One-hot encode an item over this space.
    ///
    /// Categories or tags outside the training vocabulary contribute
    /// nothing, which leaves such an item scoring 0 against any profile.
    pub fn encode(&self, item: &Item) -> Vec<f32> {
        let mut vector = vec![0.0; self.axes.len()];
        if let Some(&idx) = self.category_index.get(&item.category) {
            vector[idx] = 1.0;
        }
        for tag in &item.tags {
            if let Some(&idx) = self.tag_index.get(tag) {
                vector[idx] = 1.0;
            }
        }
        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::DEFAULT_CATEGORY;

    fn item(id: &str, category: &str, tags: &[&str]) -> Item {
        Item {
            id: id.to_string(),
            title: id.to_string(),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn test_catalog() -> ItemCatalog {
        let mut catalog = ItemCatalog::new();
        catalog.push(item("a", "Meditation", &["calm", "breathing"]));
        catalog.push(item("b", "Exercise", &["energetic"]));
        catalog.push(item("c", DEFAULT_CATEGORY, &[]));
        catalog
    }

    #[test]
    fn test_dimension_is_categories_plus_tags() {
        let space = FeatureSpace::build(&test_catalog());
        // 3 categories + 3 tags
        assert_eq!(space.dimension(), 6);
    }

    #[test]
    fn test_axis_ordering_is_deterministic() {
        let catalog = test_catalog();
        let space_a = FeatureSpace::build(&catalog);
        let space_b = FeatureSpace::build(&catalog);
        assert_eq!(space_a.axes(), space_b.axes());
        // Category block precedes tag block
        assert!(space_a.axes()[0].starts_with("category:"));
        assert!(space_a.axes().last().unwrap().starts_with("tag:"));
    }

    #[test]
    fn test_encode_sets_category_and_tags() {
        let catalog = test_catalog();
        let space = FeatureSpace::build(&catalog);
        let vector = space.encode(catalog.get("a").unwrap());

        // Exactly one category axis and two tag axes set
        assert_eq!(vector.iter().filter(|&&v| v == 1.0).count(), 3);
        assert_eq!(vector.len(), space.dimension());
    }

    #[test]
    fn test_encode_unknown_vocabulary_contributes_nothing() {
        let space = FeatureSpace::build(&test_catalog());
        let alien = item("x", "NeverSeen", &["unknown-tag"]);
        let vector = space.encode(&alien);
        assert!(vector.iter().all(|&v| v == 0.0));
    }
}
