pub mod content;
pub mod release;

pub use content::Content;
pub use release::Releases;
