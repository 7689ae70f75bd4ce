use serde::{Deserialize, Serialize};

use crate::{config::ONLINE_STATUS, crypto::Address};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AssetHolding {
    pub asset_id: u64,
    pub amount: u64,
    #[serde(default)]
    pub is_frozen: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AccountInfo {
    pub address: Address,
    pub amount: u64,
    pub status: String,
    #[serde(default)]
    pub created_at_round: Option<u64>,
    #[serde(default)]
    pub assets: Vec<AssetHolding>,
}

impl AccountInfo {
    pub fn is_online(&self) -> bool {
        self.status == ONLINE_STATUS
    }

    // Accounts funded in the genesis block
    pub fn is_genesis(&self) -> bool {
        self.created_at_round == Some(0)
    }

    pub fn holding(&self, asset_id: u64) -> Option<&AssetHolding> {
        self.assets.iter().find(|holding| holding.asset_id == asset_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AccountResponse {
    pub account: AccountInfo,
    pub current_round: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_online_account() {
        let json = format!(
            r#"{{
                "account": {{
                    "address": "{}",
                    "amount": 4000000000000000,
                    "status": "Online",
                    "created-at-round": 0,
                    "assets": [{{"asset-id": 5, "amount": 1, "is-frozen": false}}]
                }},
                "current-round": 17
            }}"#,
            Address::zero()
        );
        let response: AccountResponse = serde_json::from_str(&json).unwrap();
        assert!(response.account.is_online());
        assert!(response.account.is_genesis());
        assert_eq!(response.account.holding(5).map(|h| h.amount), Some(1));
        assert!(response.account.holding(6).is_none());
    }

    #[test]
    fn test_missing_creation_round_is_not_genesis() {
        let json = format!(
            r#"{{"address": "{}", "amount": 0, "status": "Offline"}}"#,
            Address::zero()
        );
        let info: AccountInfo = serde_json::from_str(&json).unwrap();
        assert!(!info.is_online());
        assert!(!info.is_genesis());
    }
}
