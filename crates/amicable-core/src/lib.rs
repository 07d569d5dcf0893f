pub mod config_manager;
pub mod divisors;
pub mod error;
pub mod table;

pub use config_manager::*;
pub use divisors::*;
pub use error::*;
pub use table::*;
