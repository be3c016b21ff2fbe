pub mod parser;

pub use parser::{KmlDocument, KmlElement, load};
