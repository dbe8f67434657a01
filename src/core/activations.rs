#[allow(unused)]
use crate::prelude::*;

/// Scalar activation functions paired with their derivatives.
///
/// Derivatives are taken with respect to the raw weighted sum, so callers
/// evaluate them on the pre-activation value, not on the activated output.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Linear,
    Tanh,
    Relu,
    Sigmoid,
    BipolarSigmoid,
}

impl Activation {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            Self::Linear => x,
            Self::Tanh => x.tanh(),
            Self::Relu => relu(x),
            Self::Sigmoid => sigmoid(x),
            Self::BipolarSigmoid => bipolar_sigmoid(x),
        }
    }

    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            Self::Linear => 1.0,
            Self::Tanh => tanh_derivative(x),
            Self::Relu => relu_derivative(x),
            Self::Sigmoid => sigmoid_derivative(x),
            Self::BipolarSigmoid => bipolar_sigmoid_derivative(x),
        }
    }

    pub(crate) fn tag(&self) -> i32 {
        match self {
            Self::Linear => 0,
            Self::Tanh => 1,
            Self::Relu => 2,
            Self::Sigmoid => 3,
            Self::BipolarSigmoid => 4,
        }
    }

    pub(crate) fn from_tag(tag: i32) -> Result<Self> {
        match tag {
            0 => Ok(Self::Linear),
            1 => Ok(Self::Tanh),
            2 => Ok(Self::Relu),
            3 => Ok(Self::Sigmoid),
            4 => Ok(Self::BipolarSigmoid),
            other => Err(NNError::CorruptModelData(format!(
                "unknown activation tag {}",
                other
            ))),
        }
    }
}

fn relu(x: f64) -> f64 {
    x.max(0.0)
}

// The derivative is undefined at exactly 0 and reports NaN there.
fn relu_derivative(x: f64) -> f64 {
    if x < 0.0 {
        0.0
    } else if x == 0.0 {
        f64::NAN
    } else {
        1.0
    }
}

fn tanh_derivative(x: f64) -> f64 {
    let t = x.tanh();
    1.0 - t * t
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn sigmoid_derivative(x: f64) -> f64 {
    let s = sigmoid(x);
    s * (1.0 - s)
}

fn bipolar_sigmoid(x: f64) -> f64 {
    2.0 / (1.0 + (-x).exp()) - 1.0
}

fn bipolar_sigmoid_derivative(x: f64) -> f64 {
    let b = bipolar_sigmoid(x);
    0.5 * (1.0 + b) * (1.0 - b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_derivative_is_one_everywhere() {
        for x in [-10.0, -0.5, 0.0, 0.5, 10.0] {
            assert_eq!(Activation::Linear.function(x), x);
            assert_eq!(Activation::Linear.derivative(x), 1.0);
        }
    }

    #[test]
    fn tanh_derivative_peaks_at_zero() {
        assert_abs_diff_eq!(Activation::Tanh.derivative(0.0), 1.0);
        assert_abs_diff_eq!(
            Activation::Tanh.derivative(1.0),
            1.0 - 1.0f64.tanh().powi(2)
        );
    }

    #[test]
    fn sigmoid_values() {
        assert_abs_diff_eq!(Activation::Sigmoid.function(0.0), 0.5);
        assert_abs_diff_eq!(Activation::Sigmoid.derivative(0.0), 0.25);
    }

    #[test]
    fn bipolar_sigmoid_values() {
        assert_abs_diff_eq!(Activation::BipolarSigmoid.function(0.0), 0.0);
        assert_abs_diff_eq!(Activation::BipolarSigmoid.derivative(0.0), 0.5);
    }

    #[test]
    fn relu_derivative_is_nan_at_zero() {
        assert_eq!(Activation::Relu.function(-2.0), 0.0);
        assert_eq!(Activation::Relu.function(2.0), 2.0);
        assert_eq!(Activation::Relu.derivative(-1.0), 0.0);
        assert_eq!(Activation::Relu.derivative(1.0), 1.0);
        assert!(Activation::Relu.derivative(0.0).is_nan());
    }

    #[test]
    fn tags_round_trip() {
        for activation in [
            Activation::Linear,
            Activation::Tanh,
            Activation::Relu,
            Activation::Sigmoid,
            Activation::BipolarSigmoid,
        ] {
            assert_eq!(Activation::from_tag(activation.tag()).unwrap(), activation);
        }
        assert!(Activation::from_tag(5).is_err());
    }
}
