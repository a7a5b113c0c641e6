use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sparkjdbc_core::{
    config::{ConnectionConfig, ConnectionExtra},
    err::{anyhow, Context, InvalidConfiguration, Result},
};
use sparkjdbc_logging::{debug, info};

use crate::{ConnectionStore, Lookup};

/// The extra property holding the jdbc url prefix, eg "jdbc:postgresql://"
pub const CONN_PREFIX_EXTRA: &str = "conn_prefix";

/// A validated jdbc connection
///
/// Can only be constructed through [`ConnectionDescriptor::new`], which
/// rejects hosts, schemas and prefixes that would alter the structure of
/// the composed jdbc url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    id: String,
    host: String,
    port: Option<u16>,
    schema: String,
    login: String,
    password: String,
    conn_prefix: String,
    extra: ConnectionExtra,
}

impl ConnectionDescriptor {
    /// Validates the stored connection
    ///
    /// Checks are applied in order and the first violation is returned:
    /// the host must not contain a '/', the schema must not contain a '?'
    /// and the conn_prefix, minus any trailing "://", must not contain a '#'.
    pub fn new(conn: ConnectionConfig) -> Result<Self, InvalidConfiguration> {
        let host = conn.host.unwrap_or_default();
        if host.contains('/') {
            return Err(InvalidConfiguration::HostContainsSlash);
        }

        let schema = conn.schema.unwrap_or_default();
        if schema.contains('?') {
            return Err(InvalidConfiguration::SchemaContainsQuestionMark);
        }

        let conn_prefix = conn
            .extra
            .get(CONN_PREFIX_EXTRA)
            .ok_or(InvalidConfiguration::MissingConnPrefix)?
            .to_string();
        let stripped = conn_prefix.strip_suffix("://").unwrap_or(&conn_prefix);
        if stripped.contains('#') {
            return Err(InvalidConfiguration::ConnPrefixContainsHash);
        }

        Ok(Self {
            id: conn.id,
            host,
            port: conn.port,
            schema,
            login: conn.login.unwrap_or_default(),
            password: conn.password.unwrap_or_default(),
            conn_prefix,
            extra: conn.extra,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn conn_prefix(&self) -> &str {
        &self.conn_prefix
    }

    pub fn extra(&self) -> &ConnectionExtra {
        &self.extra
    }

    /// Projects the descriptor into the resolved connection used to
    /// build the job arguments
    pub fn resolve(&self) -> ResolvedJdbcConnection {
        let url = match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        };

        ResolvedJdbcConnection {
            url,
            schema: self.schema.clone(),
            conn_prefix: self.conn_prefix.clone(),
            user: self.login.clone(),
            password: self.password.clone(),
        }
    }
}

/// A resolved jdbc connection, the url is "{host}:{port}" and is
/// combined with the prefix and schema when building arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedJdbcConnection {
    pub url: String,
    pub schema: String,
    pub conn_prefix: String,
    pub user: String,
    pub password: String,
}

impl ResolvedJdbcConnection {
    /// The full jdbc url, eg "jdbc:postgresql://localhost:5432/default"
    pub fn jdbc_url(&self) -> String {
        format!("{}{}/{}", self.conn_prefix, self.url, self.schema)
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        [
            ("url", &self.url),
            ("schema", &self.schema),
            ("conn_prefix", &self.conn_prefix),
            ("user", &self.user),
            ("password", &self.password),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
    }

    /// Returns a copy with the password masked, for display
    pub fn masked(&self) -> Self {
        Self {
            password: if self.password.is_empty() {
                String::new()
            } else {
                "******".into()
            },
            ..self.clone()
        }
    }
}

/// Resolves jdbc connections from a connection store
#[derive(Debug, Clone)]
pub struct ConnectionResolver<S: ConnectionStore> {
    store: S,
}

impl<S: ConnectionStore> ConnectionResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Looks up and validates the connection with the supplied id
    pub fn descriptor(&self, conn_id: &str) -> Result<ConnectionDescriptor> {
        info!("Resolving jdbc connection \"{}\"", conn_id);

        let conn = match self
            .store
            .get_connection(conn_id)
            .with_context(|| format!("Failed to retrieve connection \"{}\"", conn_id))?
        {
            Lookup::Found(conn) => conn,
            Lookup::NotFound => return Err(anyhow!("Connection \"{}\" does not exist", conn_id)),
        };

        let descriptor = ConnectionDescriptor::new(conn)?;
        debug!(
            "Connection \"{}\" has host \"{}\", port {:?}, schema \"{}\"",
            conn_id,
            descriptor.host(),
            descriptor.port(),
            descriptor.schema()
        );

        Ok(descriptor)
    }

    /// Looks up, validates and projects the connection with the supplied id
    pub fn resolve(&self, conn_id: &str) -> Result<ResolvedJdbcConnection> {
        Ok(self.descriptor(conn_id)?.resolve())
    }
}
