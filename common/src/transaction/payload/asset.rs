use crate::{
    crypto::Address,
    serializer::{MapBuilder, Value},
};

/// Parameters of a fungible asset, fixed at creation (role addresses aside).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetParams {
    pub total: u64,
    pub decimals: u32,
    pub default_frozen: bool,
    pub unit_name: String,
    pub asset_name: String,
    pub url: String,
    pub manager: Option<Address>,
    pub reserve: Option<Address>,
    pub freeze: Option<Address>,
    pub clawback: Option<Address>,
}

impl AssetParams {
    // Every role address defaults to the creator
    pub fn owned_by(
        creator: &Address,
        total: u64,
        decimals: u32,
        unit_name: &str,
        asset_name: &str,
    ) -> Self {
        Self {
            total,
            decimals,
            default_frozen: false,
            unit_name: unit_name.to_owned(),
            asset_name: asset_name.to_owned(),
            url: String::new(),
            manager: Some(*creator),
            reserve: Some(*creator),
            freeze: Some(*creator),
            clawback: Some(*creator),
        }
    }

    fn to_value(&self) -> Value {
        let role = |address: &Option<Address>| address.as_ref().map(|a| a.as_bytes().to_vec());
        MapBuilder::new()
            .str("an", &self.asset_name)
            .str("au", &self.url)
            .opt_bytes("c", role(&self.clawback).as_deref())
            .uint("dc", self.decimals as u64)
            .bool("df", self.default_frozen)
            .opt_bytes("f", role(&self.freeze).as_deref())
            .opt_bytes("m", role(&self.manager).as_deref())
            .opt_bytes("r", role(&self.reserve).as_deref())
            .uint("t", self.total)
            .str("un", &self.unit_name)
            .build()
    }
}

// Asset creation (asset_id == 0) or reconfiguration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetConfig {
    pub asset_id: u64,
    pub params: Option<AssetParams>,
}

impl AssetConfig {
    pub fn create(params: AssetParams) -> Self {
        Self {
            asset_id: 0,
            params: Some(params),
        }
    }

    pub fn is_creation(&self) -> bool {
        self.asset_id == 0
    }

    pub(crate) fn write_fields(&self, builder: MapBuilder) -> MapBuilder {
        let builder = match &self.params {
            Some(params) => builder.value("apar", params.to_value()),
            None => builder,
        };
        builder.uint("caid", self.asset_id)
    }
}
