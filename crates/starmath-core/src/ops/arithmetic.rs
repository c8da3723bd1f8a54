use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Component, Result, StarmathError};
use crate::frame::Image;

/// Right-hand side of an element-wise operation.
#[derive(Clone, Debug)]
pub enum Operand {
    Scalar(f32),
    Image(Arc<Image>),
}

impl From<f32> for Operand {
    fn from(v: f32) -> Self {
        Self::Scalar(v)
    }
}

impl From<Image> for Operand {
    fn from(image: Image) -> Self {
        Self::Image(Arc::new(image))
    }
}

impl From<Arc<Image>> for Operand {
    fn from(image: Arc<Image>) -> Self {
        Self::Image(image)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOp {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply_by",
            Self::Divide => "divide_by",
        }
    }

    fn eval(&self, a: f32, b: f32) -> f32 {
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            // Zero divisor pixels yield 0.
            Self::Divide => {
                if b == 0.0 {
                    0.0
                } else {
                    a / b
                }
            }
        }
    }
}

/// Apply `op` element-wise in place. Results are not clipped to the bit
/// depth's range.
pub fn apply_arithmetic(mut image: Image, op: ArithmeticOp, operand: &Operand) -> Result<Image> {
    match operand {
        Operand::Scalar(s) => {
            if op == ArithmeticOp::Divide && *s == 0.0 {
                return Err(StarmathError::invalid_parameter(
                    Component::Arithmetic,
                    "division by zero",
                ));
            }
            let s = *s;
            image.data.mapv_inplace(|v| op.eval(v, s));
        }
        Operand::Image(other) => {
            if !image.same_size(other) {
                return Err(StarmathError::DimensionMismatch {
                    component: Component::Arithmetic,
                    expected_width: image.width(),
                    expected_height: image.height(),
                    actual_width: other.width(),
                    actual_height: other.height(),
                });
            }
            image.data.zip_mut_with(&other.data, |a, &b| *a = op.eval(*a, b));
        }
    }
    Ok(image)
}

pub fn add(image: Image, operand: &Operand) -> Result<Image> {
    apply_arithmetic(image, ArithmeticOp::Add, operand)
}

pub fn subtract(image: Image, operand: &Operand) -> Result<Image> {
    apply_arithmetic(image, ArithmeticOp::Subtract, operand)
}

pub fn multiply_by(image: Image, operand: &Operand) -> Result<Image> {
    apply_arithmetic(image, ArithmeticOp::Multiply, operand)
}

pub fn divide_by(image: Image, operand: &Operand) -> Result<Image> {
    apply_arithmetic(image, ArithmeticOp::Divide, operand)
}
