pub mod deepl;
pub mod interface;

pub use interface::{Translation, TranslationApi};
