pub mod render;
pub mod text;

pub use render::{SkiaSurface, SurfaceLayout};
pub use text::{load_system_font, parse_css_px, render_text_pixmap, truncate_to_width};
