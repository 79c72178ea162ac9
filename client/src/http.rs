//! HTTP client for a node's JSON command API.
//!
//! Every call is a `POST` of `{"command": ..., ...}` to the node endpoint.
//! Nodes answer with a JSON object, or with `{"error": ...}` on rejection.
//!
//! The `trytes` fields carry [`WireRecord`]s (hex of the bincode encoding), so
//! the endpoint must be a node that accepts this wire form. Stock tryte-encoded
//! ledger nodes reject these payloads.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use subgen_types::{Frontier, PreparedRecord, Record, RecordHash};
use subgen_work::WorkGenerator;

use crate::prepare::{prepare_zero_value, PrepareOptions, Transfer};
use crate::wire::{records_to_wire, WireRecord};
use crate::{attach_locally, ClientError, LedgerClient};

/// Default timeout for node requests. Remote attachment can take a while.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// API version header value sent with every request.
const API_VERSION: &str = "1";

/// Where proof-of-work for attachment is performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowMode {
    /// The node attaches records (`attachToTangle`).
    Remote,
    /// Records are attached in-process with [`WorkGenerator`].
    Local,
}

pub struct HttpLedgerClient {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    endpoint: String,
    pow: PowMode,
    generator: WorkGenerator,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TipsResponse {
    trunk_transaction: String,
    branch_transaction: String,
}

#[derive(Debug, Deserialize)]
struct AttachResponse {
    trytes: Vec<WireRecord>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl HttpLedgerClient {
    pub fn new(endpoint: impl Into<String>, pow: PowMode) -> Self {
        Self::with_timeout(endpoint, pow, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: impl Into<String>, pow: PowMode, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            pow,
            generator: WorkGenerator,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn pow_mode(&self) -> PowMode {
        self.pow
    }

    async fn command<T: DeserializeOwned>(
        &self,
        command: &'static str,
        body: serde_json::Value,
    ) -> Result<T, ClientError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .header("X-IOTA-API-Version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Unreachable(format!("{command} timed out: {e}"))
                } else if e.is_connect() {
                    ClientError::Unreachable(format!("connection failed: {e}"))
                } else {
                    ClientError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("{command}: {e}")))?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorResponse>(&text) {
                Ok(err) => ClientError::Rejected {
                    command,
                    message: err.error,
                },
                Err(_) => ClientError::RequestFailed(format!("{command}: HTTP status {status}")),
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| ClientError::InvalidResponse(format!("{command}: {e}")))
    }
}

fn parse_hash(field: &str, value: &str) -> Result<RecordHash, ClientError> {
    value
        .parse()
        .map_err(|e| ClientError::InvalidResponse(format!("{field}: {e}")))
}

impl LedgerClient for HttpLedgerClient {
    async fn get_transactions_to_approve(&self, depth: u32) -> Result<Frontier, ClientError> {
        let tips: TipsResponse = self
            .command(
                "getTransactionsToApprove",
                json!({ "command": "getTransactionsToApprove", "depth": depth }),
            )
            .await?;
        let frontier = Frontier::new(
            parse_hash("trunkTransaction", &tips.trunk_transaction)?,
            parse_hash("branchTransaction", &tips.branch_transaction)?,
        );
        tracing::debug!(trunk = %frontier.trunk, branch = %frontier.branch, "fetched tips");
        Ok(frontier)
    }

    async fn prepare_transfers(
        &self,
        seed: &str,
        transfers: &[Transfer],
        options: &PrepareOptions,
    ) -> Result<Vec<PreparedRecord>, ClientError> {
        if seed.is_empty() {
            return Err(ClientError::Other("empty seed".into()));
        }
        prepare_zero_value(transfers, options)
    }

    async fn attach_to_tangle(
        &self,
        trunk: RecordHash,
        branch: RecordHash,
        min_weight_magnitude: u8,
        prepared: Vec<PreparedRecord>,
    ) -> Result<Vec<Record>, ClientError> {
        match self.pow {
            PowMode::Local => {
                let generator = self.generator;
                tokio::task::spawn_blocking(move || {
                    attach_locally(&generator, trunk, branch, min_weight_magnitude, prepared)
                })
                .await
                .map_err(|e| ClientError::Other(format!("attach task failed: {e}")))?
            }
            PowMode::Remote => {
                let payloads = prepared
                    .iter()
                    .map(WireRecord::encode_prepared)
                    .collect::<Result<Vec<_>, _>>()?;
                let response: AttachResponse = self
                    .command(
                        "attachToTangle",
                        json!({
                            "command": "attachToTangle",
                            "trunkTransaction": trunk.to_string(),
                            "branchTransaction": branch.to_string(),
                            "minWeightMagnitude": min_weight_magnitude,
                            "trytes": payloads,
                        }),
                    )
                    .await?;
                response
                    .trytes
                    .iter()
                    .map(WireRecord::decode_record)
                    .collect()
            }
        }
    }

    fn to_wire(&self, records: &[Record]) -> Result<Vec<WireRecord>, ClientError> {
        records_to_wire(records)
    }

    async fn broadcast_transactions(&self, record: &WireRecord) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .command(
                "broadcastTransactions",
                json!({ "command": "broadcastTransactions", "trytes": [record] }),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_trailing_slash_trimmed() {
        let client = HttpLedgerClient::new("http://localhost:14265/", PowMode::Remote);
        assert_eq!(client.endpoint(), "http://localhost:14265");
        assert_eq!(client.pow_mode(), PowMode::Remote);
    }

    #[test]
    fn tips_response_deserialization() {
        let trunk = "11".repeat(32);
        let branch = "22".repeat(32);
        let json = format!(r#"{{"trunkTransaction":"{trunk}","branchTransaction":"{branch}","duration":3}}"#);
        let tips: TipsResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parse_hash("trunkTransaction", &tips.trunk_transaction).unwrap(),
            RecordHash::new([0x11; 32])
        );
    }

    #[test]
    fn malformed_tip_is_invalid_response() {
        assert!(matches!(
            parse_hash("trunkTransaction", "NOTAHASH"),
            Err(ClientError::InvalidResponse(_))
        ));
    }

    #[test]
    fn error_response_deserialization() {
        let err: ErrorResponse = serde_json::from_str(r#"{"error":"invalid trytes"}"#).unwrap();
        assert_eq!(err.error, "invalid trytes");
    }

    #[tokio::test]
    async fn local_pow_attaches_without_node() {
        let client = HttpLedgerClient::new("http://127.0.0.1:9", PowMode::Local);
        let prepared = client
            .prepare_transfers(
                crate::ANONYMOUS_SEED,
                &[Transfer::empty(subgen_types::Tag::new("SUBGEN").unwrap())],
                &PrepareOptions::default(),
            )
            .await
            .unwrap();
        let trunk = RecordHash::new([5; 32]);
        let branch = RecordHash::new([6; 32]);
        let records = client.attach_to_tangle(trunk, branch, 4, prepared).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].parents(), (trunk, branch));
    }

    #[tokio::test]
    async fn unreachable_node_is_an_error() {
        let client =
            HttpLedgerClient::with_timeout("http://127.0.0.1:9", PowMode::Remote, Duration::from_secs(2));
        assert!(client.get_transactions_to_approve(3).await.is_err());
    }
}
