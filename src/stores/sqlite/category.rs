//! Implements a SQLite backed category store.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, Row, params_from_iter, types::Value};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Category, CategoryTitle, DatabaseID},
    stores::CategoryStore,
};

/// Creates and retrieves transaction categories to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Create a category in the database.
    ///
    /// # Errors
    /// Returns [Error::DuplicateCategoryTitle] if the title already exists,
    /// or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, title: CategoryTitle) -> Result<Category, Error> {
        let connection = self.connection.lock().unwrap();
        connection.execute(
            "INSERT INTO category (title) VALUES (?1);",
            (title.as_ref(),),
        )?;

        let id = connection.last_insert_rowid();

        Ok(Category { id, title })
    }

    /// Create one category per title inside a single SQL transaction.
    ///
    /// # Errors
    /// Returns [Error::DuplicateCategoryTitle] if any title already exists,
    /// or [Error::SqlError] if there is some other SQL error. No category is
    /// persisted on error.
    fn create_many(&mut self, titles: Vec<CategoryTitle>) -> Result<Vec<Category>, Error> {
        let connection = self.connection.lock().unwrap();
        let tx = connection.unchecked_transaction()?;

        let mut categories = Vec::with_capacity(titles.len());

        {
            let mut statement =
                tx.prepare("INSERT INTO category (title) VALUES (?1) RETURNING id, title;")?;

            for title in titles {
                let category = statement.query_row((title.as_ref(),), Self::map_row)?;
                categories.push(category);
            }
        }

        tx.commit()?;

        Ok(categories)
    }

    /// Retrieve the category with the exact title `title`.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if there is an SQL error.
    fn find_by_title(&self, title: &str) -> Result<Option<Category>, Error> {
        let maybe_category = self
            .connection
            .lock()
            .unwrap()
            .prepare("SELECT id, title FROM category WHERE title = :title;")?
            .query_row(&[(":title", title)], Self::map_row);

        match maybe_category {
            Ok(category) => Ok(Some(category)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Retrieve every category whose title is in `titles` with one query.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if there is an SQL error.
    fn find_by_titles(&self, titles: &HashSet<String>) -> Result<Vec<Category>, Error> {
        if titles.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = (1..=titles.len())
            .map(|n| format!("?{n}"))
            .collect::<Vec<_>>()
            .join(", ");
        let query_string =
            format!("SELECT id, title FROM category WHERE title IN ({placeholders});");
        let parameters = titles
            .iter()
            .map(|title| Value::Text(title.clone()))
            .collect::<Vec<_>>();

        self.connection
            .lock()
            .unwrap()
            .prepare(&query_string)?
            .query_map(params_from_iter(parameters.iter()), Self::map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }

    /// Remove the category with ID `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no category has that ID, or
    /// [Error::SqlError] if there is an SQL error.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        let rows_deleted = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM category WHERE id = ?1;", (id,))?;

        if rows_deleted == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL UNIQUE
            );",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;

        let raw_title: String = row.get(offset + 1)?;
        let title = CategoryTitle::new_unchecked(&raw_title);

        Ok(Self::ReturnType { id, title })
    }
}
