//! Stored admin settings (server parameters and app preferences)

mod entity;
mod store;

pub use entity::{ServerSettings, SettingsUpdate};
pub use store::ConfigStore;

#[cfg(test)]
pub use store::MockConfigStore;
