pub mod kind;

pub use mathgrade_error::Error;
