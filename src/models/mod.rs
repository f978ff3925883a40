pub mod consultation;
pub mod enums;
pub mod patient;
pub mod template;

pub use consultation::*;
pub use enums::*;
pub use patient::*;
pub use template::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
