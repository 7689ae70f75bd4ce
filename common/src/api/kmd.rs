use serde::{Deserialize, Serialize};

use crate::crypto::Address;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub driver_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListWalletsResponse {
    #[serde(default)]
    pub wallets: Vec<WalletInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitWalletHandleRequest<'a> {
    pub wallet_id: &'a str,
    pub wallet_password: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletHandleResponse {
    pub wallet_handle_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WalletHandleRequest<'a> {
    pub wallet_handle_token: &'a str,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListKeysResponse {
    #[serde(default)]
    pub addresses: Vec<Address>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportKeyRequest<'a> {
    pub wallet_handle_token: &'a str,
    pub address: &'a Address,
    pub wallet_password: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportKeyResponse {
    // seed followed by public key
    #[serde(with = "super::base64_bytes")]
    pub private_key: Vec<u8>,
}
