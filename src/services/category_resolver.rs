//! Find-or-create resolution of category titles.

use std::collections::{HashMap, HashSet};

use crate::{
    Error,
    models::{Category, CategoryTitle, DatabaseID},
    stores::CategoryStore,
};

/// Resolves category titles to [Category] records, creating records lazily on
/// first reference.
///
/// The resolver is the only component that creates categories, which is what
/// keeps the one-category-per-title invariant: it always looks before it
/// creates, and the batch path issues exactly one lookup and one create
/// round-trip no matter how many titles are given.
#[derive(Debug)]
pub struct CategoryResolver<'a, C> {
    categories: &'a mut C,
}

impl<'a, C: CategoryStore> CategoryResolver<'a, C> {
    /// Create a resolver over `categories`.
    pub fn new(categories: &'a mut C) -> Self {
        Self { categories }
    }

    /// Get the category titled `title`, creating it if it does not exist.
    ///
    /// Idempotent: calling this twice with the same title returns the same
    /// record both times and writes at most once.
    ///
    /// # Errors
    /// Returns [Error::EmptyCategoryTitle] if `title` is empty, or an error
    /// from the store.
    pub fn resolve_or_create(&mut self, title: &str) -> Result<Category, Error> {
        let title = CategoryTitle::new(title)?;

        if let Some(category) = self.categories.find_by_title(title.as_ref())? {
            tracing::debug!("category \"{title}\" already exists, reusing id {}", category.id);
            return Ok(category);
        }

        self.categories.create(title)
    }

    /// Resolve every title in `titles` to a category, creating the missing
    /// ones in one batch write.
    ///
    /// `titles` may contain duplicates; they map to the same record, and at
    /// most one record is created per distinct title.
    ///
    /// # Errors
    /// Returns [Error::EmptyCategoryTitle] if any title is empty, or an error
    /// from the store. Nothing is created on error.
    pub fn resolve_batch(&mut self, titles: &[String]) -> Result<BatchResolution, Error> {
        let distinct: HashSet<String> = titles.iter().cloned().collect();

        let mut mapping = HashMap::with_capacity(distinct.len());
        for category in self.categories.find_by_titles(&distinct)? {
            mapping.insert(category.title.to_string(), category);
        }

        let missing = distinct
            .iter()
            .filter(|title| !mapping.contains_key(*title))
            .map(|title| CategoryTitle::new(title))
            .collect::<Result<Vec<_>, _>>()?;

        let mut created = Vec::with_capacity(missing.len());

        if !missing.is_empty() {
            for category in self.categories.create_many(missing)? {
                created.push(category.id);
                mapping.insert(category.title.to_string(), category);
            }
        }

        Ok(BatchResolution { mapping, created })
    }
}

/// The result of [CategoryResolver::resolve_batch]: a mapping from every
/// distinct input title to its category, plus the IDs of the categories that
/// the resolution had to create.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResolution {
    mapping: HashMap<String, Category>,
    created: Vec<DatabaseID>,
}

impl BatchResolution {
    /// Look up the category resolved for `title`.
    pub fn get(&self, title: &str) -> Option<&Category> {
        self.mapping.get(title)
    }

    /// The IDs of the categories created by this resolution, used for orphan
    /// cleanup when a subsequent batch write fails.
    pub fn created_ids(&self) -> &[DatabaseID] {
        &self.created
    }

    /// How many categories this resolution created.
    pub fn created_count(&self) -> usize {
        self.created.len()
    }
}

#[cfg(test)]
mod category_resolver_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        stores::{CategoryStore, sqlite::SQLiteCategoryStore},
    };

    use super::CategoryResolver;

    fn get_test_store() -> SQLiteCategoryStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SQLiteCategoryStore::new(Arc::new(Mutex::new(connection)))
    }

    fn count_with_title(store: &SQLiteCategoryStore, title: &str) -> usize {
        let titles = std::collections::HashSet::from([title.to_string()]);
        store.find_by_titles(&titles).unwrap().len()
    }

    #[test]
    fn resolve_or_create_is_idempotent() {
        let mut store = get_test_store();
        let mut resolver = CategoryResolver::new(&mut store);

        let first = resolver.resolve_or_create("Food").unwrap();
        let second = resolver.resolve_or_create("Food").unwrap();

        assert_eq!(first, second);
        assert_eq!(count_with_title(&store, "Food"), 1);
    }

    #[test]
    fn resolve_or_create_rejects_empty_title() {
        let mut store = get_test_store();

        let result = CategoryResolver::new(&mut store).resolve_or_create("");

        assert_eq!(result, Err(Error::EmptyCategoryTitle));
    }

    #[test]
    fn resolve_batch_creates_one_record_per_distinct_title() {
        let mut store = get_test_store();
        let titles = vec!["Food".to_string(), "Food".to_string(), "Bus".to_string()];

        let resolution = CategoryResolver::new(&mut store)
            .resolve_batch(&titles)
            .unwrap();

        assert_eq!(resolution.created_count(), 2);
        assert_eq!(count_with_title(&store, "Food"), 1);
        assert_eq!(count_with_title(&store, "Bus"), 1);
    }

    #[test]
    fn resolve_batch_maps_duplicates_to_the_same_record() {
        let mut store = get_test_store();
        let titles = vec!["Food".to_string(), "Food".to_string(), "Bus".to_string()];

        let resolution = CategoryResolver::new(&mut store)
            .resolve_batch(&titles)
            .unwrap();

        let food = resolution.get("Food").unwrap();
        let bus = resolution.get("Bus").unwrap();

        assert_ne!(food.id, bus.id);
        assert_eq!(resolution.get("Food").unwrap().id, food.id);
    }

    #[test]
    fn resolve_batch_reuses_existing_categories() {
        let mut store = get_test_store();
        let existing = CategoryResolver::new(&mut store)
            .resolve_or_create("Food")
            .unwrap();

        let titles = vec!["Food".to_string(), "Bus".to_string()];
        let resolution = CategoryResolver::new(&mut store)
            .resolve_batch(&titles)
            .unwrap();

        assert_eq!(resolution.created_count(), 1);
        assert_eq!(resolution.get("Food"), Some(&existing));
    }

    #[test]
    fn resolve_batch_with_fully_existing_titles_creates_nothing() {
        let mut store = get_test_store();
        let titles = vec!["Food".to_string(), "Bus".to_string()];
        CategoryResolver::new(&mut store)
            .resolve_batch(&titles)
            .unwrap();

        let resolution = CategoryResolver::new(&mut store)
            .resolve_batch(&titles)
            .unwrap();

        assert_eq!(resolution.created_count(), 0);
    }

    #[test]
    fn resolve_batch_with_no_titles_creates_nothing() {
        let mut store = get_test_store();

        let resolution = CategoryResolver::new(&mut store).resolve_batch(&[]).unwrap();

        assert_eq!(resolution.created_count(), 0);
    }
}
