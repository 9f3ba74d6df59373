//! Per-user channel subscriptions.
//!
//! Every mutation runs inside one `BEGIN IMMEDIATE` transaction and
//! adds or removes a single `(user_id, channel_name)` row, so two writers
//! touching the same user (two tabs, two devices, two server processes on
//! one database file) serialise on the SQLite write lock instead of
//! overwriting each other's view of the list.

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior};

use beacon_types::models::SubscriptionRecord;

use crate::Database;
use crate::models::{SubscribeOutcome, UnsubscribeOutcome};

impl Database {
    /// Channel names the user is subscribed to, oldest first. A user with
    /// no record simply has no subscriptions.
    pub fn get_subscriptions(&self, user_id: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| query_channels(conn, user_id))
    }

    pub fn get_subscription_record(&self, user_id: &str) -> Result<Option<SubscriptionRecord>> {
        self.with_conn(|conn| {
            let exists = conn
                .query_row(
                    "SELECT 1 FROM user_subscriptions WHERE user_id = ?1",
                    [user_id],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();

            if !exists {
                return Ok(None);
            }

            Ok(Some(SubscriptionRecord {
                user_id: user_id.to_string(),
                channels: query_channels(conn, user_id)?,
            }))
        })
    }

    /// Add `channel` to the user's set, creating the record on first use.
    pub fn subscribe(&self, user_id: &str, channel: &str) -> Result<SubscribeOutcome> {
        self.with_conn(|conn| {
            let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

            let created = tx.execute(
                "INSERT OR IGNORE INTO user_subscriptions (user_id) VALUES (?1)",
                [user_id],
            )? == 1;

            let added = tx.execute(
                "INSERT OR IGNORE INTO subscription_channels (user_id, channel_name, position)
                 SELECT ?1, ?2, COALESCE(MAX(position), 0) + 1
                 FROM subscription_channels WHERE user_id = ?1",
                (user_id, channel),
            )? == 1;

            if added && !created {
                touch(&tx, user_id)?;
            }

            tx.commit()?;

            Ok(if created {
                SubscribeOutcome::Created
            } else if added {
                SubscribeOutcome::Added
            } else {
                SubscribeOutcome::AlreadySubscribed
            })
        })
    }

    /// Remove `channel` from the user's set. Absent records and absent
    /// channels are no-ops.
    pub fn unsubscribe(&self, user_id: &str, channel: &str) -> Result<UnsubscribeOutcome> {
        self.with_conn(|conn| {
            let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

            let exists = tx
                .query_row(
                    "SELECT 1 FROM user_subscriptions WHERE user_id = ?1",
                    [user_id],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();

            if !exists {
                return Ok(UnsubscribeOutcome::NoRecord);
            }

            let removed = tx.execute(
                "DELETE FROM subscription_channels WHERE user_id = ?1 AND channel_name = ?2",
                (user_id, channel),
            )? == 1;

            if removed {
                touch(&tx, user_id)?;
            }

            tx.commit()?;

            Ok(if removed {
                UnsubscribeOutcome::Removed
            } else {
                UnsubscribeOutcome::NotSubscribed
            })
        })
    }
}

fn touch(conn: &Connection, user_id: &str) -> Result<()> {
    conn.execute(
        "UPDATE user_subscriptions SET updated_at = datetime('now') WHERE user_id = ?1",
        [user_id],
    )?;
    Ok(())
}

fn query_channels(conn: &Connection, user_id: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT channel_name FROM subscription_channels
         WHERE user_id = ?1
         ORDER BY position",
    )?;

    let rows = stmt
        .query_map([user_id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;

    Ok(rows)
}
