//! Named collections of JSON documents keyed by a unique string, stored in
//! the `documents` table. The `(collection, key)` pair is backed by a UNIQUE
//! index, so a second insert for the same key is rejected by the database
//! itself regardless of what callers checked beforehand.

use anyhow::anyhow;
use turso::{Connection, Row};

#[derive(Debug, Default)]
pub struct Document {
    pub id: i64,
    pub collection: String,
    pub key: String,
    pub body: String,
    pub created_at: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Inserted {
    Created(i64),
    /// A document with the same key already exists in the collection.
    Conflict,
}

pub async fn find_one(
    collection: &str,
    key: &str,
    conn: &Connection,
) -> anyhow::Result<Option<Document>> {
    let mut rows = conn
        .query(
            "SELECT id, collection, key, body, created_at FROM documents WHERE collection = ?1 AND key = ?2 LIMIT 1",
            (collection, key),
        )
        .await?;
    row_to_document(rows.next().await?)
}

pub async fn insert_one(
    collection: &str,
    key: &str,
    body: &str,
    conn: &Connection,
) -> anyhow::Result<Inserted> {
    let result = conn
        .execute(
            "INSERT INTO documents (collection, key, body) VALUES (?1, ?2, ?3)",
            (collection, key, body),
        )
        .await;

    match result {
        Ok(_) => Ok(Inserted::Created(conn.last_insert_rowid())),
        Err(e) if is_unique_violation(&e) => Ok(Inserted::Conflict),
        Err(e) => Err(e.into()),
    }
}

pub async fn count(collection: &str, key: &str, conn: &Connection) -> anyhow::Result<i64> {
    let mut rows = conn
        .query(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1 AND key = ?2",
            (collection, key),
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| anyhow!("count returned no rows"))?;
    let count = row
        .get_value(0)?
        .as_integer()
        .ok_or_else(|| anyhow!("count is null"))?
        .to_owned();
    Ok(count)
}

fn is_unique_violation(err: &turso::Error) -> bool {
    err.to_string().contains("UNIQUE constraint failed")
}

fn row_to_document(row: Option<Row>) -> anyhow::Result<Option<Document>> {
    let Some(row) = row else {
        return Ok(None);
    };

    let id = row
        .get_value(0)?
        .as_integer()
        .ok_or_else(|| anyhow!("id is null"))?
        .to_owned();
    let collection = text_column(&row, 1, "collection")?;
    let key = text_column(&row, 2, "key")?;
    let body = text_column(&row, 3, "body")?;
    let created_at = text_column(&row, 4, "created_at")?;

    Ok(Some(Document {
        id,
        collection,
        key,
        body,
        created_at,
    }))
}

fn text_column(row: &Row, index: usize, name: &str) -> anyhow::Result<String> {
    row.get_value(index)?
        .as_text()
        .map(|s| s.to_owned())
        .ok_or_else(|| anyhow!("{name} is null"))
}
