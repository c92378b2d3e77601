use std::fmt;
use std::str::FromStr;

use linfa::Float;
use ndarray::{ArrayBase, DataMut, Dimension};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::ElmError;

/// Elementwise nonlinearity of the hidden layer
///
/// The set of functions is closed. Construct one directly or parse it from its name, which
/// rejects unknown names up front:
///
/// ```rust
/// use linfa_elm::Activation;
///
/// let act: Activation = "tanh".parse().unwrap();
/// assert_eq!(act, Activation::Tanh);
/// assert!("relu".parse::<Activation>().is_err());
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "lowercase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Activation {
    /// Logistic sigmoid `1 / (1 + exp(-x))`
    #[default]
    Sigmoid,
    /// Hyperbolic tangent
    Tanh,
}

impl Activation {
    /// Apply the function to a single value
    pub fn apply<F: Float>(self, x: F) -> F {
        match self {
            Activation::Sigmoid => sigmoid(x),
            Activation::Tanh => x.tanh(),
        }
    }

    /// Apply the function to every element of `x`
    pub fn apply_inplace<F: Float, S: DataMut<Elem = F>, D: Dimension>(
        self,
        x: &mut ArrayBase<S, D>,
    ) {
        x.mapv_inplace(|v| self.apply(v));
    }

    /// Canonical lower-case name, accepted back by `FromStr`
    pub fn name(self) -> &'static str {
        match self {
            Activation::Sigmoid => "sigmoid",
            Activation::Tanh => "tanh",
        }
    }
}

impl FromStr for Activation {
    type Err = ElmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sigmoid" => Ok(Activation::Sigmoid),
            "tanh" => Ok(Activation::Tanh),
            _ => Err(ElmError::UnknownActivation(s.to_string())),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// exp(35) is far from overflow in f32 and the result is already 1 - 6e-16. NaN passes through.
fn sigmoid<F: Float>(x: F) -> F {
    let bound = F::cast(35.);
    let x = if x > bound {
        bound
    } else if x < -bound {
        -bound
    } else {
        x
    };
    F::one() / (F::one() + F::exp(-x))
}
