//! Rate source adapters.

mod exchangerate_api;

pub use exchangerate_api::ExchangeRateApiAdapter;
