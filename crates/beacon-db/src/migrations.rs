use anyhow::Result;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::info;

/// Id of the channel every fresh store starts with.
pub const GENERAL_CHANNEL_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Bring the schema up to date. The version is read under the write lock,
/// so connections racing on a fresh file apply each step exactly once.
pub fn run(conn: &Connection) -> Result<()> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);"
    )?;

    let version: i64 = tx
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        tx.execute_batch(
            "
            CREATE TABLE channels (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE user_subscriptions (
                user_id     TEXT PRIMARY KEY,
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            -- No foreign key to channels: a subscription may outlive its channel.
            CREATE TABLE subscription_channels (
                user_id       TEXT NOT NULL REFERENCES user_subscriptions(user_id) ON DELETE CASCADE,
                channel_name  TEXT NOT NULL,
                position      INTEGER NOT NULL,
                PRIMARY KEY (user_id, channel_name)
            );

            CREATE TABLE messages (
                seq           INTEGER PRIMARY KEY AUTOINCREMENT,
                channel_name  TEXT NOT NULL,
                sender_id     TEXT NOT NULL,
                text          TEXT NOT NULL,
                timestamp     INTEGER NOT NULL
            );

            CREATE INDEX idx_messages_channel
                ON messages(channel_name, seq);

            INSERT INTO channels (id, name)
                VALUES ('00000000-0000-0000-0000-000000000001', 'general');

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    if version < 2 {
        info!("Running migration v2 (fcm tokens)");
        tx.execute_batch(
            "
            CREATE TABLE fcm_tokens (
                user_id     TEXT PRIMARY KEY,
                token       TEXT NOT NULL,
                updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            INSERT INTO schema_version (version) VALUES (2);
            ",
        )?;
    }

    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use super::*;
    use crate::Database;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version, 2);

        let general: String = conn
            .query_row("SELECT name FROM channels WHERE id = ?1", [GENERAL_CHANNEL_ID], |r| r.get(0))
            .unwrap();
        assert_eq!(general, "general");
    }

    #[test]
    fn fresh_file_opened_from_many_threads_migrates_once() {
        for _ in 0..10 {
            let path = std::env::temp_dir().join(format!("beacon_migrate_{}.db", uuid::Uuid::new_v4()));
            let barrier = Arc::new(Barrier::new(4));

            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let path = path.clone();
                    let barrier = barrier.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        Database::open(&path).map(|_| ())
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap().unwrap();
            }

            let db = Database::open(&path).unwrap();
            let (versions, generals) = db
                .with_conn(|conn| {
                    let versions: i64 =
                        conn.query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))?;
                    let generals: i64 = conn.query_row(
                        "SELECT COUNT(*) FROM channels WHERE id = ?1",
                        [GENERAL_CHANNEL_ID],
                        |r| r.get(0),
                    )?;
                    Ok((versions, generals))
                })
                .unwrap();
            assert_eq!(versions, 2);
            assert_eq!(generals, 1);

            drop(db);
            let _ = std::fs::remove_file(&path);
            let _ = std::fs::remove_file(path.with_extension("db-wal"));
            let _ = std::fs::remove_file(path.with_extension("db-shm"));
        }
    }
}
