pub mod optimize;
pub mod validate;
