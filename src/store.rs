// SQLite storage: a single `id_data` table that grows one nullable TEXT
// column per distinct field name. Every insert writes exactly one field, so
// rows are sparse.

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};
use std::fmt;
use std::path::Path;

pub const TABLE: &str = "id_data";
const ID_COLUMN: &str = "id";

/// One row of the table. `fields` holds every non-id column in table order,
/// including the ones this row never set.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: i64,
    pub fields: Vec<(String, Option<String>)>,
}

impl Record {
    /// Value of the named column, if the column exists and is set.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(column, _)| column.eq_ignore_ascii_case(name))
            .and_then(|(_, value)| value.as_deref())
    }

    /// The populated `(column, value)` pairs of this row.
    pub fn populated(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter_map(|(column, value)| value.as_deref().map(|v| (column.as_str(), v)))
    }
}

/// Renders as a tuple: `(1, 'red', None)`.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.id)?;
        if self.fields.is_empty() {
            return write!(f, ",)");
        }
        for (_, value) in &self.fields {
            match value {
                Some(v) if v.contains('\'') && !v.contains('"') => write!(f, ", \"{}\"", v)?,
                Some(v) => write!(f, ", '{}'", v.replace('\'', "\\'"))?,
                None => write!(f, ", None")?,
            }
        }
        write!(f, ")")
    }
}

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database file and make sure the table exists.
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            // A failure here surfaces as an open error just below.
            let _ = std::fs::create_dir_all(parent);
        }
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened store");
        Self::init(conn)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} ({} INTEGER PRIMARY KEY)",
                quote_ident(TABLE),
                quote_ident(ID_COLUMN)
            ),
            [],
        )?;
        Ok(Store { conn })
    }

    /// Current column names, `id` first.
    pub fn columns(&self) -> rusqlite::Result<Vec<String>> {
        table_columns(&self.conn, TABLE)
    }

    /// Add a column for `name` if needed, then insert a row that sets only
    /// that column. Returns the new row id.
    pub fn insert_field(&self, name: &str, value: &str) -> rusqlite::Result<i64> {
        if ensure_column(&self.conn, TABLE, name)? {
            tracing::info!(column = name, "added column");
        }
        self.conn.execute(
            &format!(
                "INSERT INTO {} ({}) VALUES (?1)",
                quote_ident(TABLE),
                quote_ident(name)
            ),
            params![value],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, field = name, "inserted row");
        Ok(id)
    }

    /// Every row in insertion order.
    pub fn fetch_all(&self) -> rusqlite::Result<Vec<Record>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT * FROM {} ORDER BY {}",
            quote_ident(TABLE),
            quote_ident(ID_COLUMN)
        ))?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let rows = stmt.query_map([], |row| {
            let mut id = 0;
            let mut fields = Vec::with_capacity(names.len().saturating_sub(1));
            for (i, name) in names.iter().enumerate() {
                if name.eq_ignore_ascii_case(ID_COLUMN) {
                    id = row.get(i)?;
                } else {
                    fields.push((name.clone(), value_to_string(row.get_ref(i)?)));
                }
            }
            Ok(Record { id, fields })
        })?;
        rows.collect()
    }
}

/// Add a nullable TEXT column called `name` to `table` unless one already
/// exists (compared case-insensitively, as SQLite does). Returns whether a
/// column was added.
pub fn ensure_column(conn: &Connection, table: &str, name: &str) -> rusqlite::Result<bool> {
    if name.is_empty() {
        return Err(rusqlite::Error::InvalidColumnName(name.to_string()));
    }
    let existing = table_columns(conn, table)?;
    if existing.iter().any(|c| c.eq_ignore_ascii_case(name)) {
        return Ok(false);
    }
    conn.execute(
        &format!(
            "ALTER TABLE {} ADD COLUMN {} TEXT",
            quote_ident(table),
            quote_ident(name)
        ),
        [],
    )?;
    Ok(true)
}

fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
    let columns = stmt.query_map([], |row| row.get::<_, String>(1))?;
    columns.collect()
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn value_to_string(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(n) => Some(n.to_string()),
        ValueRef::Real(n) => Some(n.to_string()),
        ValueRef::Text(text) => Some(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(blob) => Some(format!("<blob:{}>", blob.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_has_only_id_column() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.columns().unwrap(), vec!["id"]);
        assert!(store.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn new_field_adds_one_column_and_one_row() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_field("Color", "red").unwrap();
        assert_eq!(id, 1);
        assert_eq!(store.columns().unwrap(), vec!["id", "Color"]);

        let rows = store.fetch_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Color"), Some("red"));
    }

    #[test]
    fn known_field_adds_row_but_no_column() {
        let store = Store::open_in_memory().unwrap();
        store.insert_field("Color", "red").unwrap();
        store.insert_field("Color", "blue").unwrap();
        assert_eq!(store.columns().unwrap(), vec!["id", "Color"]);

        let values: Vec<_> = store
            .fetch_all()
            .unwrap()
            .iter()
            .map(|r| r.get("Color").map(String::from))
            .collect();
        assert_eq!(values, vec![Some("red".into()), Some("blue".into())]);
    }

    #[test]
    fn rows_are_sparse_and_ordered() {
        let store = Store::open_in_memory().unwrap();
        store.insert_field("Color", "red").unwrap();
        store.insert_field("Shape", "square").unwrap();

        let rows = store.fetch_all().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].get("Color"), Some("red"));
        assert_eq!(rows[0].get("Shape"), None);
        assert_eq!(rows[1].id, 2);
        assert_eq!(rows[1].get("Color"), None);
        assert_eq!(rows[1].get("Shape"), Some("square"));
        assert_eq!(rows[1].populated().collect::<Vec<_>>(), vec![("Shape", "square")]);
    }

    #[test]
    fn column_names_match_case_insensitively() {
        let store = Store::open_in_memory().unwrap();
        store.insert_field("Color", "red").unwrap();
        store.insert_field("color", "green").unwrap();
        assert_eq!(store.columns().unwrap(), vec!["id", "Color"]);
        assert_eq!(store.fetch_all().unwrap()[1].get("Color"), Some("green"));
    }

    #[test]
    fn odd_names_are_quoted_not_executed() {
        let store = Store::open_in_memory().unwrap();
        store.insert_field("Main \"subject\"; DROP TABLE id_data", "cat").unwrap();
        store.insert_field("Number of legs", "4").unwrap();
        assert_eq!(
            store.columns().unwrap(),
            vec!["id", "Main \"subject\"; DROP TABLE id_data", "Number of legs"]
        );
        assert_eq!(store.fetch_all().unwrap().len(), 2);
    }

    #[test]
    fn empty_name_is_rejected() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.insert_field("", "x").is_err());
        assert!(store.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn writing_text_into_id_fails() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.insert_field("id", "abc").is_err());
    }

    #[test]
    fn rows_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("id_data.db");
        {
            let store = Store::open(&path).unwrap();
            store.insert_field("Color", "red").unwrap();
        }
        let store = Store::open(&path).unwrap();
        store.insert_field("Shape", "square").unwrap();

        let rows = store.fetch_all().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Color"), Some("red"));
        assert_eq!(rows[1].id, 2);
    }

    #[test]
    fn display_looks_like_a_tuple() {
        let record = Record {
            id: 3,
            fields: vec![
                ("Color".into(), Some("red".into())),
                ("Shape".into(), None),
                ("Note".into(), Some("it's".into())),
            ],
        };
        assert_eq!(record.to_string(), "(3, 'red', None, \"it's\")");
        let bare = Record {
            id: 1,
            fields: vec![],
        };
        assert_eq!(bare.to_string(), "(1,)");
    }
}
