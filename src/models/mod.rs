pub mod history;
pub mod image;

pub use self::history::*;
pub use self::image::*;
