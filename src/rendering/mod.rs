pub mod jpeg;
pub mod scene_svg;
pub mod svg_raster;

pub use jpeg::{encode_jpeg, JPEG_MAGIC};
pub use scene_svg::scene_to_svg;
pub use svg_raster::SvgRenderer;
