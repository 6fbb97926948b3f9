use redis::{Client, Commands, Connection};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::KeyValueStore;
use crate::error::AppResult;

/// Creates a Redis client
pub fn create_redis_client(redis_url: &str) -> AppResult<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Redis-backed key-value store.
///
/// Keys are stored as `<namespace>:<key>` so several installs can share one
/// server. Writes go straight to Redis; there is no local cache.
pub struct RedisStore {
    conn: Mutex<Connection>,
    namespace: String,
}

impl RedisStore {
    /// Connects to Redis at `redis_url`
    pub fn connect(redis_url: &str, namespace: &str) -> AppResult<Self> {
        let client = create_redis_client(redis_url)?;
        let conn = client.get_connection()?;

        tracing::info!(namespace = %namespace, "Connected to Redis storage");

        Ok(Self {
            conn: Mutex::new(conn),
            namespace: namespace.to_string(),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }
}

impl KeyValueStore for RedisStore {
    fn get_item(&self, key: &str) -> Option<String> {
        let result: redis::RedisResult<Option<String>> = self.conn().get(self.namespaced(key));
        match result {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Failed to read from Redis");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        let _: () = self.conn().set(self.namespaced(key), value)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        let _: () = self.conn().del(self.namespaced(key))?;
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        let prefix = self.namespaced("");
        let result: redis::RedisResult<Vec<String>> = self.conn().keys(format!("{}*", prefix));

        match result {
            Ok(keys) => {
                let mut keys: Vec<String> = keys
                    .into_iter()
                    .filter_map(|k| k.strip_prefix(&prefix).map(str::to_string))
                    .collect();
                keys.sort_unstable();
                keys
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to list Redis keys");
                Vec::new()
            }
        }
    }
}
