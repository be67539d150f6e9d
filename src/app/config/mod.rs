//! Start-up configuration loading.
//!
//! Everything the process reads from its surroundings is captured here once
//! and handed to the rest of the crate as an explicit `Settings` value.

mod load_config;

pub use load_config::{CONFIG_FILE_NAME, CONFIG_PATH_VAR, load_settings, load_settings_from};
