use log::{debug, error, info};
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Herb {
    pub id: i64,
    pub name: String,
    pub properties: String,
    pub usage: String,
}

/// Payload for a herb that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHerb {
    pub name: String,
    pub properties: String,
    pub usage: String,
}

impl Herb {
    pub fn add(connection: &Connection, src: NewHerb) -> Result<Herb> {
        match connection.execute(
            "INSERT INTO Herb(name, properties, usage) VALUES (?1, ?2, ?3)",
            params![src.name, src.properties, src.usage],
        ) {
            Ok(_) => {
                let id = connection.last_insert_rowid();
                debug!("[DB] Created new Herb {} '{}'", id, src.name);
                Ok(Herb {
                    id,
                    name: src.name,
                    properties: src.properties,
                    usage: src.usage,
                })
            }
            Err(err) => {
                error!("[DB] Error while creating new Herb '{}': {:?}", src.name, err);
                Err(err)
            }
        }
    }

    fn from_row(row: &Row) -> Result<Herb> {
        Ok(Herb {
            id: row.get(0)?,
            name: row.get(1)?,
            properties: row.get(2)?,
            usage: row.get(3)?,
        })
    }

    pub fn get_by_id(connection: &Connection, id: i64) -> Result<Option<Herb>> {
        let mut statement = connection
            .prepare("SELECT id, name, properties, usage FROM Herb WHERE id = :id LIMIT 1")?;
        statement
            .query_row(&[(":id", &id)], |row| Self::from_row(row))
            .optional()
    }

    pub fn get_by_name(connection: &Connection, name: &str) -> Result<Option<Herb>> {
        let mut statement = connection
            .prepare("SELECT id, name, properties, usage FROM Herb WHERE name = :name LIMIT 1")?;
        statement
            .query_row(&[(":name", &name)], |row| Self::from_row(row))
            .optional()
    }

    /// Rows ordered by id. Negative `skip` reads from the start and negative
    /// `limit` returns every remaining row, as SQLite does.
    pub fn get_page(connection: &Connection, skip: i64, limit: i64) -> Result<Vec<Herb>> {
        let mut statement = connection.prepare(
            "SELECT id, name, properties, usage FROM Herb ORDER BY id LIMIT ?1 OFFSET ?2",
        )?;
        let rows = statement.query_map(params![limit, skip], |row| Self::from_row(row))?;

        rows.collect()
    }

    pub fn get_all(connection: &Connection) -> Result<Vec<Herb>> {
        let mut statement =
            connection.prepare("SELECT id, name, properties, usage FROM Herb ORDER BY id")?;
        let rows = statement.query_map([], |row| Self::from_row(row))?;

        rows.collect()
    }
}

pub fn create_or_open(src: &Path) -> Result<Connection> {
    if src.exists() {
        info!("[DB] Opening existing Database at {:?}", src);
    } else {
        info!("[DB] Creating new Database at {:?}", src);
    }
    let now = Instant::now();
    let db = init_db(Connection::open(src)?)?;
    debug!("[DB] Opening took {} ms.", now.elapsed().as_millis());
    Ok(db)
}

pub fn open_in_memory() -> Result<Connection> {
    init_db(Connection::open_in_memory()?)
}

pub fn close_db(connection: Connection) -> Result<()> {
    info!("[DB] Closing Database");
    match connection.close() {
        Ok(_) => Ok(()),
        Err((conn, _)) => {
            error!("[DB] Cannot close connection. Retrying 1/2...");
            match conn.close() {
                Ok(_) => Ok(()),
                Err((conn2, _)) => {
                    error!("[DB] Cannot close connection. Retrying 2/2...");
                    conn2.close().map_err(|(_, err)| err)
                }
            }
        }
    }
}

fn init_db(conn: Connection) -> Result<Connection> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS Herb (
              id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
              name TEXT NOT NULL,
              properties TEXT NOT NULL,
              usage TEXT NOT NULL
            )",
        (),
    )?;
    conn.execute("CREATE INDEX IF NOT EXISTS Herb_name_idx ON Herb(name)", ())?;
    debug!("[DB INIT] Schema ready");

    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn herb(name: &str) -> NewHerb {
        NewHerb {
            name: name.to_string(),
            properties: "Adaptogenic".to_string(),
            usage: "Tea".to_string(),
        }
    }

    #[test]
    fn add_assigns_increasing_ids() {
        let conn = open_in_memory().unwrap();
        let tulsi = Herb::add(&conn, herb("Tulsi")).unwrap();
        let neem = Herb::add(&conn, herb("Neem")).unwrap();

        assert_eq!(tulsi.id, 1);
        assert_eq!(neem.id, 2);
        assert_eq!(neem.name, "Neem");
    }

    #[test]
    fn get_by_id_returns_none_when_absent() {
        let conn = open_in_memory().unwrap();
        Herb::add(&conn, herb("Tulsi")).unwrap();

        assert_eq!(Herb::get_by_id(&conn, 1).unwrap().unwrap().name, "Tulsi");
        assert!(Herb::get_by_id(&conn, 42).unwrap().is_none());
    }

    #[test]
    fn get_page_applies_skip_and_limit() {
        let conn = open_in_memory().unwrap();
        for name in ["Tulsi", "Neem", "Brahmi", "Ginger"] {
            Herb::add(&conn, herb(name)).unwrap();
        }

        let page: Vec<String> = Herb::get_page(&conn, 1, 2)
            .unwrap()
            .into_iter()
            .map(|h| h.name)
            .collect();
        assert_eq!(page, vec!["Neem", "Brahmi"]);

        assert_eq!(Herb::get_page(&conn, 3, 10).unwrap().len(), 1);
        assert!(Herb::get_page(&conn, 10, 10).unwrap().is_empty());
        assert_eq!(Herb::get_page(&conn, 0, -1).unwrap().len(), 4);
    }

    #[test]
    fn get_by_name_matches_exactly() {
        let conn = open_in_memory().unwrap();
        Herb::add(&conn, herb("Ashwagandha")).unwrap();

        assert!(Herb::get_by_name(&conn, "Ashwagandha").unwrap().is_some());
        assert!(Herb::get_by_name(&conn, "ashwagandha").unwrap().is_none());
    }

    #[test]
    fn reopening_a_file_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("herbs.db");

        let conn = create_or_open(&path).unwrap();
        Herb::add(&conn, herb("Tulsi")).unwrap();
        close_db(conn).unwrap();

        let conn = create_or_open(&path).unwrap();
        assert_eq!(Herb::get_all(&conn).unwrap().len(), 1);
    }
}
