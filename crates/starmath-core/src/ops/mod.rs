pub mod arithmetic;
pub mod crop;
pub mod scale;

pub use arithmetic::{
    add, apply_arithmetic, divide_by, multiply_by, subtract, ArithmeticOp, Operand,
};
pub use crop::{centered_rect, crop, crop_from_center, crop_regions};
pub use scale::{scale, Interpolation, ScaleDirection};
