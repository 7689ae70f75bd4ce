pub const VERSION: &str = env!("BUILD_VERSION");

// Base currency unit: 1 Algo = 1_000_000 microAlgos
pub const MICROALGOS_PER_ALGO: u64 = 1_000_000;

// Flat fee attached to every transaction built by the harness
// Equal to the protocol minimum fee
pub const FLAT_FEE: u64 = 1000;

// Number of rounds a transaction stays valid after its first valid round
pub const VALIDITY_WINDOW: u64 = 1000;

// Domain separation prefixes prepended before hashing or signing
pub const TX_PREFIX: &[u8] = b"TX";
pub const PROGRAM_PREFIX: &[u8] = b"Program";

// API token headers of the three sandbox services
pub const ALGOD_TOKEN_HEADER: &str = "X-Algo-API-Token";
pub const KMD_TOKEN_HEADER: &str = "X-KMD-API-Token";
pub const INDEXER_TOKEN_HEADER: &str = "X-Indexer-API-Token";

// Status reported by the indexer for participating accounts
pub const ONLINE_STATUS: &str = "Online";

pub const fn algos_to_microalgos(algos: u64) -> u64 {
    algos * MICROALGOS_PER_ALGO
}
