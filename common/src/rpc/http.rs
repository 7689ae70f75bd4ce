//! `reqwest` implementations of the client traits.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    api::{
        algod::{
            CompileResponse, NodeStatus, PendingTransaction, PostTransactionsResponse,
            SuggestedParams,
        },
        indexer::AccountResponse,
        kmd::{
            ExportKeyRequest, ExportKeyResponse, InitWalletHandleRequest, ListKeysResponse,
            ListWalletsResponse, WalletHandleRequest, WalletHandleResponse,
        },
        ErrorResponse,
    },
    config::{ALGOD_TOKEN_HEADER, INDEXER_TOKEN_HEADER, KMD_TOKEN_HEADER},
    crypto::Address,
    transaction::TxId,
};

use super::{ClientError, IndexerClient, LedgerClient, WalletClient};

/// Timeouts shared by every REST client.
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    // Must exceed one block interval, the node holds wait-for-block requests
    pub request_timeout: Duration,
    pub connection_timeout: Duration,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
        }
    }
}

/// Token-authenticated JSON REST client.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    token_header: &'static str,
    token: String,
}

impl RestClient {
    pub fn new(
        address: &str,
        token_header: &'static str,
        token: &str,
        config: &RestClientConfig,
    ) -> Result<Self, ClientError> {
        let base_url = if address.starts_with("http://") || address.starts_with("https://") {
            address.trim_end_matches('/').to_owned()
        } else {
            format!("http://{}", address.trim_end_matches('/'))
        };

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connection_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            token_header,
            token: token.to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request
            .header(self.token_header, &self.token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|error| error.message)
            .unwrap_or(body);

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(message));
        }

        Err(ClientError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let body = response.bytes().await?;
        if log::log_enabled!(log::Level::Trace) {
            trace!("Response body: {}", String::from_utf8_lossy(&body));
        }
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        if log::log_enabled!(log::Level::Debug) {
            debug!("GET {}", self.url(path));
        }
        let response = self.send(self.client.get(self.url(path))).await?;
        Self::decode(response).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        if log::log_enabled!(log::Level::Debug) {
            debug!("POST {}", self.url(path));
        }
        let response = self
            .send(self.client.post(self.url(path)).json(body))
            .await?;
        Self::decode(response).await
    }

    pub async fn post_raw<T: DeserializeOwned>(
        &self,
        path: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<T, ClientError> {
        if log::log_enabled!(log::Level::Debug) {
            debug!("POST {} ({} bytes)", self.url(path), body.len());
        }
        let request = self
            .client
            .post(self.url(path))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body);
        let response = self.send(request).await?;
        Self::decode(response).await
    }
}

/// algod v2 client.
#[derive(Debug, Clone)]
pub struct AlgodClient {
    rest: RestClient,
}

impl AlgodClient {
    pub fn new(address: &str, token: &str, config: &RestClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            rest: RestClient::new(address, ALGOD_TOKEN_HEADER, token, config)?,
        })
    }
}

#[async_trait]
impl LedgerClient for AlgodClient {
    async fn status(&self) -> Result<NodeStatus, ClientError> {
        self.rest.get("/v2/status").await
    }

    async fn status_after_block(&self, round: u64) -> Result<NodeStatus, ClientError> {
        self.rest
            .get(&format!("/v2/status/wait-for-block-after/{round}"))
            .await
    }

    async fn pending_transaction_info(
        &self,
        tx_id: &TxId,
    ) -> Result<PendingTransaction, ClientError> {
        self.rest
            .get(&format!("/v2/transactions/pending/{tx_id}?format=json"))
            .await
    }

    async fn suggested_params(&self) -> Result<SuggestedParams, ClientError> {
        self.rest.get("/v2/transactions/params").await
    }

    async fn compile(&self, source: &str) -> Result<CompileResponse, ClientError> {
        self.rest
            .post_raw(
                "/v2/teal/compile",
                "text/plain",
                source.as_bytes().to_vec(),
            )
            .await
    }

    async fn send_raw_transaction(&self, bytes: &[u8]) -> Result<TxId, ClientError> {
        let response: PostTransactionsResponse = self
            .rest
            .post_raw("/v2/transactions", "application/x-binary", bytes.to_vec())
            .await
            .map_err(submission_error)?;
        Ok(response.tx_id)
    }
}

// Messages algod uses when a program refuses the transaction
const LOGIC_REJECTION_MARKERS: [&str; 2] = ["logic eval error", "rejected by logic"];

// Only a refusal by program evaluation is a rejection, any other 400 stays a
// plain HTTP error
fn submission_error(error: ClientError) -> ClientError {
    match error {
        ClientError::Http {
            status: 400,
            message,
        } if LOGIC_REJECTION_MARKERS
            .iter()
            .any(|marker| message.contains(marker)) =>
        {
            ClientError::Rejected { message }
        }
        error => error,
    }
}

/// kmd v1 client.
#[derive(Debug, Clone)]
pub struct KmdClient {
    rest: RestClient,
}

impl KmdClient {
    pub fn new(address: &str, token: &str, config: &RestClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            rest: RestClient::new(address, KMD_TOKEN_HEADER, token, config)?,
        })
    }
}

#[async_trait]
impl WalletClient for KmdClient {
    async fn list_wallets(&self) -> Result<ListWalletsResponse, ClientError> {
        self.rest.get("/v1/wallets").await
    }

    async fn init_wallet_handle(
        &self,
        wallet_id: &str,
        password: &str,
    ) -> Result<String, ClientError> {
        let request = InitWalletHandleRequest {
            wallet_id,
            wallet_password: password,
        };
        let response: WalletHandleResponse =
            self.rest.post_json("/v1/wallet/init", &request).await?;
        Ok(response.wallet_handle_token)
    }

    async fn list_keys(&self, handle: &str) -> Result<ListKeysResponse, ClientError> {
        let request = WalletHandleRequest {
            wallet_handle_token: handle,
        };
        self.rest.post_json("/v1/key/list", &request).await
    }

    async fn export_key(
        &self,
        handle: &str,
        password: &str,
        address: &Address,
    ) -> Result<Vec<u8>, ClientError> {
        let request = ExportKeyRequest {
            wallet_handle_token: handle,
            address,
            wallet_password: password,
        };
        let response: ExportKeyResponse = self.rest.post_json("/v1/key/export", &request).await?;
        Ok(response.private_key)
    }

    async fn release_wallet_handle(&self, handle: &str) -> Result<(), ClientError> {
        let request = WalletHandleRequest {
            wallet_handle_token: handle,
        };
        let _: serde_json::Value = self.rest.post_json("/v1/wallet/release", &request).await?;
        Ok(())
    }
}

/// Indexer v2 client.
#[derive(Debug, Clone)]
pub struct IndexerHttpClient {
    rest: RestClient,
}

impl IndexerHttpClient {
    pub fn new(address: &str, token: &str, config: &RestClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            rest: RestClient::new(address, INDEXER_TOKEN_HEADER, token, config)?,
        })
    }
}

#[async_trait]
impl IndexerClient for IndexerHttpClient {
    async fn account_info(&self, address: &Address) -> Result<AccountResponse, ClientError> {
        self.rest.get(&format!("/v2/accounts/{address}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let config = RestClientConfig::default();
        let client = RestClient::new("localhost:4001/", ALGOD_TOKEN_HEADER, "a", &config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:4001");

        let client =
            RestClient::new("https://node.example:443", ALGOD_TOKEN_HEADER, "a", &config).unwrap();
        assert_eq!(client.url("/v2/status"), "https://node.example:443/v2/status");
    }

    #[test]
    fn test_only_logic_failures_are_rejections() {
        let http = |message: &str| ClientError::Http {
            status: 400,
            message: message.to_owned(),
        };

        let logic = submission_error(http(
            "TransactionPool.Remember: transaction ABC: logic eval error: assert failed pc=12",
        ));
        assert!(logic.is_rejection());
        assert!(submission_error(http("rejected by logic")).is_rejection());

        for message in [
            "TransactionPool.Remember: transaction ABC: overspend (account XYZ)",
            "transaction had fee smaller than min",
            "msgpack decode error",
            "txn dead: round 10 outside of 1--5",
        ] {
            let error = submission_error(http(message));
            assert!(!error.is_rejection());
            assert!(matches!(error, ClientError::Http { status: 400, .. }));
        }

        let server = submission_error(ClientError::Http {
            status: 500,
            message: "logic eval error".to_owned(),
        });
        assert!(matches!(server, ClientError::Http { status: 500, .. }));
    }
}
