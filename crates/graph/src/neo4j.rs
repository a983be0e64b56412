//! Neo4j store over the HTTP transactional endpoint.
//!
//! Each [`WriteBatch`] is committed as one transaction of parameterized
//! `MERGE` statements, so a failed batch leaves nothing behind.

use crate::batch::{UpsertOp, WriteBatch, UNRESOLVED_FILE};
use crate::error::{GraphError, Result};
use crate::store::GraphStore;
use crate::types::{GraphCounts, NodeLabel, RelationshipType};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_HTTP_PORT: u16 = 7474;

/// Connection parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neo4jConfig {
    pub uri: String,
    pub username: String,
    pub password: String,
    pub database: String,
    /// Extra attempts after a transport failure
    pub max_retries: u32,
    pub timeout: Duration,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: format!("http://localhost:{DEFAULT_HTTP_PORT}"),
            username: "neo4j".to_string(),
            password: String::new(),
            database: "neo4j".to_string(),
            max_retries: 2,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub statement: String,
    pub parameters: Value,
}

impl Statement {
    fn new(statement: impl Into<String>, parameters: Value) -> Self {
        Self {
            statement: statement.into(),
            parameters,
        }
    }
}

#[derive(Serialize)]
struct TxRequest<'a> {
    statements: &'a [Statement],
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<TxResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Debug, Deserialize)]
struct TxResult {
    #[serde(default)]
    data: Vec<TxRow>,
}

#[derive(Debug, Deserialize)]
struct TxRow {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct TxError {
    code: String,
    message: String,
}

/// Map a `bolt://`, `neo4j://` or `http(s)://` URI to the HTTP base URL
pub fn http_base_url(uri: &str) -> Result<String> {
    let uri = uri.trim().trim_end_matches('/');
    let (scheme, rest) = uri
        .split_once("://")
        .ok_or_else(|| GraphError::InvalidConfig(format!("missing scheme in {uri:?}")))?;

    match scheme {
        "http" | "https" => return Ok(uri.to_string()),
        "bolt" | "neo4j" | "bolt+s" | "neo4j+s" | "bolt+ssc" | "neo4j+ssc" => {}
        other => {
            return Err(GraphError::InvalidConfig(format!(
                "unsupported scheme {other:?} in {uri:?}"
            )))
        }
    }

    let authority = rest.split('/').next().unwrap_or_default();
    let host = match authority.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => authority,
    };
    if host.is_empty() {
        return Err(GraphError::InvalidConfig(format!("missing host in {uri:?}")));
    }

    if scheme.ends_with("+s") || scheme.ends_with("+ssc") {
        Ok(format!("https://{host}"))
    } else {
        Ok(format!("http://{host}:{DEFAULT_HTTP_PORT}"))
    }
}

/// Parameterized `MERGE` statement for one upsert
pub fn cypher(op: &UpsertOp) -> Statement {
    match op {
        UpsertOp::File { path, name } => Statement::new(
            "MERGE (f:File {path: $path}) SET f.name = $name",
            json!({ "path": path, "name": name }),
        ),
        UpsertOp::Definition { kind, name, file } => {
            Statement::new(
                format!(
                    "MERGE (n:{} {{name: $name, file: $file}}) \
                     MERGE (f:File {{path: $file}}) \
                     MERGE (n)-[:{}]->(f)",
                    kind.label().as_str(),
                    RelationshipType::DefinedIn
                ),
                json!({ "name": name, "file": file }),
            )
        }
        UpsertOp::Extends {
            child,
            file,
            parent,
        } => Statement::new(
            "MERGE (c:Class {name: $child, file: $file}) \
             MERGE (p:Class {name: $parent, file: $parent_file}) \
             MERGE (c)-[:EXTENDS]->(p)",
            json!({
                "child": child,
                "file": file,
                "parent": parent,
                "parent_file": UNRESOLVED_FILE,
            }),
        ),
        UpsertOp::Import { from, to } => Statement::new(
            "MERGE (a:File {path: $from}) \
             MERGE (b:File {path: $to}) \
             MERGE (a)-[:IMPORTS]->(b)",
            json!({ "from": from, "to": to }),
        ),
        UpsertOp::Call {
            caller,
            callee,
            file,
        } => Statement::new(
            "MERGE (a:Function {name: $caller, file: $file}) \
             MERGE (b:Function {name: $callee, file: $file}) \
             MERGE (a)-[:CALLS]->(b)",
            json!({ "caller": caller, "callee": callee, "file": file }),
        ),
        UpsertOp::UsedIn { callee, file } => Statement::new(
            "MERGE (fn:Function {name: $callee, file: $file}) \
             MERGE (f:File {path: $file}) \
             MERGE (fn)-[:USED_IN]->(f)",
            json!({ "callee": callee, "file": file }),
        ),
    }
}

fn count_statements() -> Vec<Statement> {
    let nodes = [NodeLabel::File, NodeLabel::Function, NodeLabel::Class]
        .into_iter()
        .map(|label| Statement::new(format!("MATCH (n:{}) RETURN count(n)", label.as_str()), json!({})));
    let rels = RelationshipType::ALL
        .into_iter()
        .map(|rel| Statement::new(format!("MATCH ()-[r:{rel}]->() RETURN count(r)"), json!({})));
    nodes.chain(rels).collect()
}

pub struct Neo4jHttpStore {
    config: Neo4jConfig,
    client: reqwest::Client,
    commit_url: String,
}

impl Neo4jHttpStore {
    pub fn new(config: Neo4jConfig) -> Result<Self> {
        let base = http_base_url(&config.uri)?;
        if config.database.trim().is_empty() {
            return Err(GraphError::InvalidConfig("empty database name".to_string()));
        }
        let commit_url = format!("{base}/db/{}/tx/commit", config.database);
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            config,
            client,
            commit_url,
        })
    }

    pub fn commit_url(&self) -> &str {
        &self.commit_url
    }

    async fn send(&self, statements: &[Statement]) -> Result<Vec<TxResult>> {
        let response = self
            .client
            .post(&self.commit_url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(&TxRequest { statements })
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(GraphError::Connection(format!(
                "authentication failed for user {:?} ({status})",
                self.config.username
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GraphError::Write(format!("Neo4j returned {status}: {body}")));
        }

        let body: TxResponse = response.json().await?;
        if let Some(err) = body.errors.into_iter().next() {
            return Err(GraphError::Query {
                code: err.code,
                message: err.message,
            });
        }
        Ok(body.results)
    }

    /// Send with exponential backoff on transport failures
    async fn commit(&self, statements: &[Statement]) -> Result<Vec<TxResult>> {
        let mut attempt = 0;
        loop {
            match self.send(statements).await {
                Ok(results) => return Ok(results),
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = Duration::from_millis(200 * 2u64.pow(attempt - 1));
                    log::warn!("Neo4j request failed ({e}), retry {attempt} in {delay:?}");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl GraphStore for Neo4jHttpStore {
    fn name(&self) -> &str {
        "neo4j"
    }

    async fn verify_connectivity(&mut self) -> Result<()> {
        let probe = [Statement::new("RETURN 1", json!({}))];
        match self.commit(&probe).await {
            Ok(_) => {
                log::info!("Connected to Neo4j at {}", self.commit_url);
                Ok(())
            }
            Err(GraphError::Connection(msg)) => Err(GraphError::Connection(msg)),
            Err(e) => Err(GraphError::Connection(format!(
                "cannot reach {}: {e}",
                self.config.uri
            ))),
        }
    }

    async fn apply(&mut self, batch: &WriteBatch) -> Result<()> {
        let statements: Vec<_> = batch.ops().iter().map(cypher).collect();
        self.commit(&statements).await?;
        Ok(())
    }

    async fn counts(&mut self) -> Result<GraphCounts> {
        let results = self.commit(&count_statements()).await?;
        let values: Vec<u64> = results
            .iter()
            .map(|r| {
                r.data
                    .first()
                    .and_then(|row| row.row.first())
                    .and_then(Value::as_u64)
                    .unwrap_or(0)
            })
            .collect();

        let mut counts = GraphCounts::default();
        let labels = [NodeLabel::File, NodeLabel::Function, NodeLabel::Class];
        for (label, value) in labels.into_iter().zip(values.iter()) {
            counts.set_nodes(label, *value);
        }
        for (rel, value) in RelationshipType::ALL.into_iter().zip(values.iter().skip(labels.len())) {
            counts.set_relationships(rel, *value);
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::DefinitionKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn maps_uri_schemes() {
        assert_eq!(http_base_url("bolt://localhost:7687").unwrap(), "http://localhost:7474");
        assert_eq!(http_base_url("neo4j://db.internal").unwrap(), "http://db.internal:7474");
        assert_eq!(
            http_base_url("neo4j+s://abc.databases.neo4j.io").unwrap(),
            "https://abc.databases.neo4j.io"
        );
        assert_eq!(http_base_url("http://127.0.0.1:7474/").unwrap(), "http://127.0.0.1:7474");
        assert!(http_base_url("localhost:7687").is_err());
        assert!(http_base_url("ftp://host").is_err());
    }

    #[test]
    fn commit_url_includes_database() {
        let store = Neo4jHttpStore::new(Neo4jConfig {
            uri: "bolt://graph:7687".into(),
            database: "code".into(),
            ..Neo4jConfig::default()
        })
        .unwrap();
        assert_eq!(store.commit_url(), "http://graph:7474/db/code/tx/commit");
    }

    #[test]
    fn extends_statement_targets_empty_file() {
        let stmt = cypher(&UpsertOp::Extends {
            child: "B".into(),
            file: "b.ts".into(),
            parent: "A".into(),
        });
        assert!(stmt.statement.contains("[:EXTENDS]"));
        assert_eq!(stmt.parameters["parent_file"], "");
        assert_eq!(stmt.parameters["file"], "b.ts");
    }

    #[test]
    fn definition_statement_uses_label() {
        let stmt = cypher(&UpsertOp::Definition {
            kind: DefinitionKind::Class,
            name: "Repo".into(),
            file: "repo.py".into(),
        });
        assert!(stmt.statement.starts_with("MERGE (n:Class {name: $name, file: $file})"));
        assert!(stmt.statement.ends_with("MERGE (n)-[:DEFINED_IN]->(f)"));
    }

    #[test]
    fn count_statements_cover_schema() {
        let stmts = count_statements();
        assert_eq!(stmts.len(), 8);
        assert_eq!(stmts[3].statement, "MATCH ()-[r:DEFINED_IN]->() RETURN count(r)");
    }
}
