pub mod logging;
pub mod name;

pub use logging::init_logging;
pub use name::{NameError, next_name, next_path};
