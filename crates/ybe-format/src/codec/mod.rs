//! Textual codec: exam text to generic tree and back.

mod decode;
mod encode;
mod layout;

pub use self::decode::decode;
pub use self::encode::encode;
pub use self::layout::space_sections;
