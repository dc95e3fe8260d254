//! Debug visualization: color-mapped raster export of height and distance
//! fields, plus PNG mask import. None of this is required for transform
//! correctness; it exists to let a human look at the fields.

mod image;
mod renderers;

pub use self::image::FieldImage;
pub use renderers::{
    VizError, distance_to_color, height_to_color, load_mask_png, render_distance_field,
    render_height_field, save_png,
};
