pub mod factory_config;
pub mod creation_record;
pub mod instance;

pub use factory_config::*;
pub use creation_record::*;
pub use instance::*;
