pub mod html;
pub mod render;
pub mod surface;
pub mod terminal;
