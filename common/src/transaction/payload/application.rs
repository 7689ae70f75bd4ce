use strum::{AsRefStr, FromRepr};

use crate::{
    crypto::Address,
    serializer::{MapBuilder, Value},
};

/// Storage slots reserved for an application, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateSchema {
    pub num_uints: u64,
    pub num_byte_slices: u64,
}

impl StateSchema {
    pub const fn new(num_uints: u64, num_byte_slices: u64) -> Self {
        Self {
            num_uints,
            num_byte_slices,
        }
    }

    fn to_value(self) -> Value {
        MapBuilder::new()
            .uint("nbs", self.num_byte_slices)
            .uint("nui", self.num_uints)
            .build()
    }
}

// Side effect requested alongside an application call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr, FromRepr)]
#[repr(u64)]
pub enum OnComplete {
    #[default]
    NoOp = 0,
    OptIn = 1,
    CloseOut = 2,
    ClearState = 3,
    UpdateApplication = 4,
    DeleteApplication = 5,
}

/// Application call. `app_id == 0` creates the application from the
/// approval and clear programs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationCall {
    pub app_id: u64,
    pub on_complete: OnComplete,
    pub approval_program: Vec<u8>,
    pub clear_program: Vec<u8>,
    pub global_schema: StateSchema,
    pub local_schema: StateSchema,
    pub args: Vec<Vec<u8>>,
    pub accounts: Vec<Address>,
    pub foreign_assets: Vec<u64>,
    pub foreign_apps: Vec<u64>,
}

impl ApplicationCall {
    pub fn create(
        approval_program: Vec<u8>,
        clear_program: Vec<u8>,
        global_schema: StateSchema,
        local_schema: StateSchema,
    ) -> Self {
        Self {
            approval_program,
            clear_program,
            global_schema,
            local_schema,
            ..Default::default()
        }
    }

    pub fn no_op(app_id: u64, args: Vec<Vec<u8>>) -> Self {
        Self {
            app_id,
            args,
            ..Default::default()
        }
    }

    pub fn with_accounts(mut self, accounts: Vec<Address>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_foreign_assets(mut self, foreign_assets: Vec<u64>) -> Self {
        self.foreign_assets = foreign_assets;
        self
    }

    pub fn is_creation(&self) -> bool {
        self.app_id == 0
    }

    // First argument names the method by convention
    pub fn method(&self) -> Option<&[u8]> {
        self.args.first().map(Vec::as_slice)
    }

    pub(crate) fn write_fields(&self, builder: MapBuilder) -> MapBuilder {
        builder
            .value(
                "apaa",
                Value::Array(self.args.iter().cloned().map(Value::Bytes).collect()),
            )
            .uint("apan", self.on_complete as u64)
            .bytes("apap", &self.approval_program)
            .value(
                "apas",
                Value::Array(self.foreign_assets.iter().copied().map(Value::Uint).collect()),
            )
            .value(
                "apat",
                Value::Array(
                    self.accounts
                        .iter()
                        .map(|a| Value::Bytes(a.as_bytes().to_vec()))
                        .collect(),
                ),
            )
            .value(
                "apfa",
                Value::Array(self.foreign_apps.iter().copied().map(Value::Uint).collect()),
            )
            .value("apgs", self.global_schema.to_value())
            .uint("apid", self.app_id)
            .value("apls", self.local_schema.to_value())
            .bytes("apsu", &self.clear_program)
    }
}
