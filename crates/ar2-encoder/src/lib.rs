#![warn(clippy::pedantic)]

pub mod compression;
pub mod encoder;
pub mod error;
pub mod message;
pub mod radial;

pub use encoder::Archive2Encoder;
pub use error::EncodeError;
pub use message::{Message, fixed_message, radial_message};
pub use radial::RadialMessage;
