use crate::{crypto::Address, serializer::MapBuilder};

// Base currency transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub receiver: Address,
    pub amount: u64,
    // Close the sender account, sending the remainder here
    pub close_remainder_to: Option<Address>,
}

impl Payment {
    pub fn new(receiver: Address, amount: u64) -> Self {
        Self {
            receiver,
            amount,
            close_remainder_to: None,
        }
    }

    pub(crate) fn write_fields(&self, builder: MapBuilder) -> MapBuilder {
        builder
            .uint("amt", self.amount)
            .opt_bytes(
                "close",
                self.close_remainder_to.as_ref().map(|a| &a.as_bytes()[..]),
            )
            .bytes("rcv", self.receiver.as_bytes())
    }
}
