mod color;
pub use color::*;

mod error;
pub use error::*;

mod tables;
pub use tables::*;

mod palette;
pub use palette::*;

mod map;
pub use map::*;

mod file;
pub use file::*;

mod render;
pub use render::*;
