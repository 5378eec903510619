//! Defines the category store trait.

use std::collections::HashSet;

use crate::{
    Error,
    models::{Category, CategoryTitle, DatabaseID},
};

/// Creates and retrieves transaction categories.
///
/// Implementations must uphold the title invariant: at most one category per
/// exact title. Callers are expected to look before they create; the store
/// surfaces [Error::DuplicateCategoryTitle] when that is violated.
pub trait CategoryStore {
    /// Create a new category and add it to the store.
    fn create(&mut self, title: CategoryTitle) -> Result<Category, Error>;

    /// Create one category per title in one batch write.
    ///
    /// The returned categories are in the order of `titles`.
    fn create_many(&mut self, titles: Vec<CategoryTitle>) -> Result<Vec<Category>, Error>;

    /// Get the category with the exact title `title`, if one exists.
    fn find_by_title(&self, title: &str) -> Result<Option<Category>, Error>;

    /// Get every category whose title is in `titles` with one lookup.
    fn find_by_titles(&self, titles: &HashSet<String>) -> Result<Vec<Category>, Error>;

    /// Remove the category with ID `id` from the store.
    ///
    /// Only used to clean up orphan categories when an import fails between
    /// its two write phases.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;
}
