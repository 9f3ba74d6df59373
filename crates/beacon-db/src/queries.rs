use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use beacon_types::models::{Channel, Message};

use crate::Database;

impl Database {
    // -- Channels --

    /// All channels in insertion order.
    pub fn list_channels(&self) -> Result<Vec<Channel>> {
        self.with_conn(query_channels)
    }

    /// Create a channel with a fresh id. Names are not checked for
    /// uniqueness.
    pub fn add_channel(&self, name: &str) -> Result<Channel> {
        let id = Uuid::new_v4().to_string();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO channels (id, name) VALUES (?1, ?2)",
                (&id, name),
            )?;
            Ok(())
        })?;

        Ok(Channel {
            id,
            name: name.to_string(),
        })
    }

    pub fn get_channel(&self, id: &str) -> Result<Option<Channel>> {
        self.with_conn(|conn| {
            let channel = conn
                .query_row("SELECT id, name FROM channels WHERE id = ?1", [id], |row| {
                    Ok(Channel {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                })
                .optional()?;
            Ok(channel)
        })
    }

    /// Delete a channel record. Subscriptions and messages that mention its
    /// name are left alone. Returns false when the id was unknown.
    pub fn remove_channel(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM channels WHERE id = ?1", [id])?;
            Ok(deleted == 1)
        })
    }

    // -- Messages --

    pub fn insert_message(
        &self,
        channel: &str,
        sender_id: &str,
        text: &str,
        timestamp: i64,
    ) -> Result<Message> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (channel_name, sender_id, text, timestamp) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![channel, sender_id, text, timestamp],
            )?;

            Ok(Message {
                seq: conn.last_insert_rowid(),
                channel: channel.to_string(),
                sender: sender_id.to_string(),
                text: text.to_string(),
                timestamp,
            })
        })
    }

    /// Full history of a channel in store order.
    pub fn get_messages(&self, channel: &str) -> Result<Vec<Message>> {
        self.with_conn(|conn| query_messages(conn, channel, 0))
    }

    /// Messages of `channel` stored after `seq`, used to fill gaps in a
    /// live feed.
    pub fn get_messages_after(&self, channel: &str, seq: i64) -> Result<Vec<Message>> {
        self.with_conn(|conn| query_messages(conn, channel, seq))
    }

    // -- FCM tokens --

    /// Store the device token for a user, replacing any previous one.
    pub fn save_fcm_token(&self, user_id: &str, token: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO fcm_tokens (user_id, token) VALUES (?1, ?2)
                 ON CONFLICT(user_id) DO UPDATE SET token = excluded.token, updated_at = datetime('now')",
                (user_id, token),
            )?;
            Ok(())
        })
    }

    #[cfg(test)]
    pub(crate) fn get_fcm_token(&self, user_id: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let token = conn
                .query_row(
                    "SELECT token FROM fcm_tokens WHERE user_id = ?1",
                    [user_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(token)
        })
    }
}

fn query_channels(conn: &Connection) -> Result<Vec<Channel>> {
    let mut stmt = conn.prepare("SELECT id, name FROM channels ORDER BY rowid")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(Channel {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_messages(conn: &Connection, channel: &str, after: i64) -> Result<Vec<Message>> {
    let mut stmt = conn.prepare(
        "SELECT seq, channel_name, sender_id, text, timestamp
         FROM messages
         WHERE channel_name = ?1 AND seq > ?2
         ORDER BY seq",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![channel, after], |row| {
            Ok(Message {
                seq: row.get(0)?,
                channel: row.get(1)?,
                sender: row.get(2)?,
                text: row.get(3)?,
                timestamp: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
