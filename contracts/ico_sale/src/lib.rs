#![no_std]

mod contract;
mod errors;
mod events;
mod storage;
mod types;

#[cfg(test)]
mod test;

pub use contract::{IcoSale, IcoSaleClient};
pub use errors::Error;
pub use events::StructuredLog;
pub use types::{
    reference_params, Phase, SaleConfig, SaleParams, SaleState, TokenMetadata, MAX_CONTRIBUTION,
    MIN_CONTRIBUTION, SALE_CAP, STROOPS_PER_UNIT, TOTAL_SUPPLY, WEEK_IN_SECONDS,
};
