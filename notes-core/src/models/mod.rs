mod color;
mod note;

pub use color::*;
pub use note::*;
