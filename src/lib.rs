//! prelude exports the mode table along with the native color and tile codecs.

/// prelude exports common items for converting graphics to native formats.
pub mod prelude {
    pub use mode::*;
    pub use native_color::*;
    pub use native_tile::*;
}
