use std::collections::HashMap;

use sparkjdbc_core::{
    config::{AppConfig, ConnectionConfig},
    err::Result,
};

/// The outcome of looking up an item which may legitimately not exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            Lookup::NotFound => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(v) => Lookup::Found(f(v)),
            Lookup::NotFound => Lookup::NotFound,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => Lookup::Found(v),
            None => Lookup::NotFound,
        }
    }
}

/// Storage of connections which can be retrieved by id
pub trait ConnectionStore {
    /// Retrieves the connection with the supplied id
    ///
    /// A missing connection is reported as [`Lookup::NotFound`], errors are
    /// reserved for failures of the store itself.
    fn get_connection(&self, conn_id: &str) -> Result<Lookup<ConnectionConfig>>;
}

impl<S: ConnectionStore + ?Sized> ConnectionStore for &S {
    fn get_connection(&self, conn_id: &str) -> Result<Lookup<ConnectionConfig>> {
        (**self).get_connection(conn_id)
    }
}

/// Connection store holding connections in memory, typically
/// those defined in the app configuration
#[derive(Debug, Clone, Default)]
pub struct MemoryConnectionStore {
    connections: HashMap<String, ConnectionConfig>,
}

impl MemoryConnectionStore {
    pub fn new(connections: impl IntoIterator<Item = ConnectionConfig>) -> Self {
        Self {
            connections: connections
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect(),
        }
    }

    pub fn from_config(conf: &AppConfig) -> Self {
        Self::new(conf.connections.iter().cloned())
    }

    /// Adds the connection, replacing any existing connection with the same id
    pub fn insert(&mut self, conn: ConnectionConfig) {
        self.connections.insert(conn.id.clone(), conn);
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl ConnectionStore for MemoryConnectionStore {
    fn get_connection(&self, conn_id: &str) -> Result<Lookup<ConnectionConfig>> {
        Ok(self.connections.get(conn_id).cloned().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_connection() {
        let store = MemoryConnectionStore::new([ConnectionConfig::new("a", "postgres")]);

        assert_eq!(
            store.get_connection("a").unwrap(),
            Lookup::Found(ConnectionConfig::new("a", "postgres"))
        );
        assert_eq!(store.get_connection("b").unwrap(), Lookup::NotFound);
    }

    #[test]
    fn test_memory_store_insert_replaces() {
        let mut store = MemoryConnectionStore::default();
        assert!(store.is_empty());

        store.insert(ConnectionConfig::new("a", "postgres"));
        store.insert(ConnectionConfig::new("a", "mysql"));

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get_connection("a").unwrap().found().unwrap().r#type,
            "mysql"
        );
    }

    #[test]
    fn test_memory_store_from_config() {
        let conf = AppConfig {
            connections: vec![
                ConnectionConfig::new("a", "postgres"),
                ConnectionConfig::new("b", "spark"),
            ],
            jobs: vec![],
        };

        let store = MemoryConnectionStore::from_config(&conf);

        assert!(store.get_connection("b").unwrap().is_found());
    }

    #[test]
    fn test_lookup_map() {
        assert_eq!(Lookup::Found(1).map(|i| i + 1), Lookup::Found(2));
        assert_eq!(Lookup::<i32>::NotFound.map(|i| i + 1), Lookup::NotFound);
    }
}
