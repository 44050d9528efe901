//! Slicing assets out of the ROM and handing them to the decoders

mod decoder;
pub use decoder::{DecodeError, DecodeTarget, Decoder, NullDecoder};
mod error;
pub use error::Error;
mod extract;
pub use extract::{extract, read_asset, ExtractOptions};
mod kind;
pub use kind::AssetKind;
mod native;
pub use native::NativeDecoder;
