use crate::common::*;

/// Name of the reserved background class.
pub const BACKGROUND: &str = "BACKGROUND";

/// Ordered class-name to index table with a reserved background entry.
///
/// Built once per dataset split and shared read-only by its samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMap {
    classes: IndexMap<String, usize>,
}

impl ClassMap {
    /// Build from the classes of interest, in order. Names are lowercased
    /// and matched case-insensitively against dataset categories; the
    /// background entry is appended last.
    pub fn new<I, S>(classes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = IndexMap::new();
        for name in classes {
            let name = name.as_ref().to_lowercase();
            ensure!(
                !name.eq_ignore_ascii_case(BACKGROUND),
                "the class name '{}' is reserved",
                BACKGROUND
            );
            let index = map.len();
            ensure!(
                map.insert(name.clone(), index).is_none(),
                "the class '{}' is duplicated",
                name
            );
        }
        ensure!(!map.is_empty(), "at least one class of interest is required");

        let index = map.len();
        map.insert(BACKGROUND.to_owned(), index);

        Ok(Self { classes: map })
    }

    /// Number of classes including the background entry.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Index of the reserved background class.
    pub fn background_index(&self) -> usize {
        self.classes.len() - 1
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.classes
            .get(name)
            .or_else(|| self.classes.get(&name.to_lowercase()))
            .copied()
    }

    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.classes.get_index(index).map(|(name, _)| name.as_str())
    }

    /// Iterate `(name, index)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.classes
            .iter()
            .map(|(name, &index)| (name.as_str(), index))
    }

    /// Remap a dataset's native category ids to target class indices,
    /// keeping only the categories that name a class of interest.
    pub fn remap_categories<'a, I>(&self, categories: I) -> HashMap<i64, usize>
    where
        I: IntoIterator<Item = (i64, &'a str)>,
    {
        categories
            .into_iter()
            .filter_map(|(id, name)| Some((id, self.index_of(name)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_comes_last() {
        let map = ClassMap::new(["Person", "car"]).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.background_index(), 2);
        assert_eq!(map.index_of("person"), Some(0));
        assert_eq!(map.index_of(BACKGROUND), Some(2));
        assert_eq!(map.name_of(1), Some("car"));
    }

    #[test]
    fn background_name_is_reserved() {
        assert!(ClassMap::new(["person", "background"]).is_err());
    }

    #[test]
    fn remap_keeps_wanted_categories_only() {
        let map = ClassMap::new(["person", "car"]).unwrap();
        let remap = map.remap_categories([(0, "Person"), (1, "Bicycle"), (2, "Car")]);
        assert_eq!(remap.len(), 2);
        assert_eq!(remap[&0], 0);
        assert_eq!(remap[&2], 1);
        assert!(!remap.contains_key(&1));
    }
}
