use std::path::Path;

use log::info;

use crate::db::CredentialDatabase;

const MIGRATIONS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS _migrations (
    version INTEGER NOT NULL PRIMARY KEY,
    description TEXT NOT NULL,
    createtime TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

#[derive(Debug, rust_embed::Embed)]
#[folder = "migrations/"]
struct Migrations;

pub async fn migrate(db: &CredentialDatabase) -> anyhow::Result<()> {
    let mut conn = db.connect()?;
    ensure_migrations_table(&conn).await?;
    let mut migrations = load_migrations()?;
    migrations.sort_by_key(|m| m.version);

    for migration in migrations {
        if is_migration_applied(&conn, migration.version).await? {
            continue;
        }
        info!(
            "Applying migration {} ({})",
            migration.version, migration.description
        );
        let tx = conn.transaction().await?;
        tx.execute_batch(&migration.sql).await?;
        tx.execute(
            "INSERT INTO _migrations (version, description) VALUES (?1, ?2)",
            (migration.version, migration.description.as_str()),
        )
        .await?;
        tx.commit().await?;
    }

    Ok(())
}

async fn ensure_migrations_table(conn: &turso::Connection) -> anyhow::Result<()> {
    conn.execute_batch(MIGRATIONS_TABLE_SQL).await?;
    Ok(())
}

async fn is_migration_applied(conn: &turso::Connection, version: i64) -> anyhow::Result<bool> {
    let mut rows = conn
        .query("SELECT 1 FROM _migrations WHERE version = ?1", (version,))
        .await?;
    Ok(rows.next().await?.is_some())
}

struct Migration {
    version: i64,
    description: String,
    sql: String,
}

fn load_migrations() -> anyhow::Result<Vec<Migration>> {
    let mut migrations = Vec::new();
    for path in Migrations::iter() {
        let Some(file) = Migrations::get(&path) else {
            continue;
        };
        let Some((version, description)) = parse_file_name(path.as_ref()) else {
            // not of the format: <VERSION>_<DESCRIPTION>.sql; ignore
            continue;
        };
        let sql = std::str::from_utf8(file.data.as_ref())?.to_owned();
        migrations.push(Migration {
            version: version.parse()?,
            description,
            sql,
        });
    }
    Ok(migrations)
}

fn parse_file_name(path: &str) -> Option<(&str, String)> {
    let name = Path::new(path).file_name()?.to_str()?;
    let (version, rest) = name.split_once('_')?;
    let description = rest.strip_suffix(".sql")?.replace('_', " ");
    Some((version, description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseConfig;

    #[test]
    fn test_parse_file_name() {
        assert_eq!(
            parse_file_name("0001_create_documents.sql"),
            Some(("0001", "create documents".to_string()))
        );
        assert_eq!(parse_file_name("README.md"), None);
        assert_eq!(parse_file_name("0002_notes.txt"), None);
    }

    #[test]
    fn test_embedded_migrations_load() {
        let migrations = load_migrations().unwrap();
        assert!(migrations.iter().any(|m| m.version == 1));
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let db = CredentialDatabase::new(&DatabaseConfig::new(":memory:"))
            .await
            .unwrap();
        migrate(&db).await.unwrap();
        migrate(&db).await.unwrap();

        let conn = db.connect().unwrap();
        let mut rows = conn
            .query("SELECT COUNT(*) FROM _migrations", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get_value(0).unwrap().as_integer(), Some(&1));
    }
}
