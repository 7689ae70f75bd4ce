mod application;
mod asset;
mod payment;

pub use application::*;
pub use asset::*;
pub use payment::*;
