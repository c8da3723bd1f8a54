pub mod background;
pub mod gaussian_blur;
pub mod stretch;

pub use background::{subtract_background, subtract_level};
pub use gaussian_blur::gaussian_blur;
pub use stretch::{midtone_transfer, StretchMethod, Stretcher};
