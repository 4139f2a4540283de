#![forbid(unsafe_code)]

pub mod blur;
pub mod color;
pub mod draw;
pub mod error;
pub mod layer;
pub mod layout;
pub mod style;
pub mod text;
pub mod theme;

pub use color::Rgba;
pub use error::{ThumbsmithError, ThumbsmithResult};
pub use layer::Layer;
pub use layout::DEFAULT_SEED;
pub use style::{Style, ThumbnailSpec, render_thumbnail};
pub use text::FontFace;
pub use theme::BrandTheme;
