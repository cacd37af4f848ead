// Common utilities shared by the daemon and the one-shot commands
pub mod constants;
pub mod utils;
