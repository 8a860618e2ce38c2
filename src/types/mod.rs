//! Data types shared by the grid, the pointer engine and the editor.

mod editing;
mod selection;
mod style;

pub use editing::*;
pub use selection::*;
pub use style::*;
