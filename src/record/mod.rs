pub mod decoder;
pub mod layout;

pub use decoder::{decode, decode_into, preprocess, standardize, DecodedSample};
pub use layout::RecordLayout;
