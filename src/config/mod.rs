// src/config/mod.rs
pub mod valuation;

pub use valuation::{
    HotReloadConfig, ServerSection, ValuationConfig, DEFAULT_VALUATION_CONFIG_PATH,
    ENV_VALUATION_CONFIG_PATH,
};
