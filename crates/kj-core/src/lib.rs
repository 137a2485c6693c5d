pub mod clock;
pub mod config;

pub use clock::epoch_millis;
pub use config::KjConfig;
