//! # Extreme Learning Machine
//!
//! ## The Big Picture
//!
//! `linfa-elm` is a crate in the [`linfa`](https://crates.io/crates/linfa) ecosystem, an effort to create a toolkit for classical Machine Learning implemented in pure Rust, akin to Python's `scikit-learn`.
//!
//! ## Current state
//! `linfa-elm` provides a pure Rust implementation of a two class [Extreme Learning Machine](struct.Elm.html).
//!
//! An Extreme Learning Machine is a single hidden layer network whose input weights and
//! biases are drawn at random and never trained. Only the output layer is fitted, in closed
//! form, by applying the Moore-Penrose pseudo-inverse of the hidden layer output to the
//! targets. Training therefore consists of one matrix product and one singular value
//! decomposition.
//!
//! ## Examples
//!
//! ```rust
//! use linfa::prelude::*;
//! use linfa_elm::Elm;
//! use ndarray::array;
//!
//! let dataset = Dataset::new(
//!     array![[0.0], [0.1], [10.0], [10.1]],
//!     array![false, false, true, true],
//! );
//! let model = Elm::params().hidden_nodes(20).fit(&dataset).unwrap();
//! let pred = model.predict(&dataset);
//! assert_eq!(pred, array![false, false, true, true]);
//! ```
//!
//! There is an usage example in the `demos/` directory. To run, use:
//!
//! ```bash
//! $ cargo run --example winequality
//! ```
//!
mod activation;
mod algorithm;
pub mod error;
mod extract;
mod hyperparams;
mod persist;

pub use activation::Activation;
pub use algorithm::pseudo_inverse;
pub use error::{ElmError, ErrorKind, Result};
pub use extract::{dataset_from_rows, records_from_rows};
pub use hyperparams::{ElmParams, ElmValidParams};

use linfa::Float;
use ndarray::{Array1, Array2};
use rand_xoshiro::Xoshiro256Plus;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A fitted Extreme Learning Machine
///
/// Holds the random input weights `W` with shape `(hidden_nodes, n_features)`, the random
/// biases `b`, the fitted output weights `beta` and the activation function. A sample `x` is
/// scored as `beta . act(W x + b)` and assigned to the positive class if the score reaches
/// the decision threshold, `0.5` unless changed with [`Elm::with_threshold`].
///
/// The model is never mutated after fitting, so it can be shared between threads for
/// prediction.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct Elm<F: Float> {
    weights: Array2<F>,
    bias: Array1<F>,
    beta: Array1<F>,
    activation: Activation,
    threshold: F,
}

impl<F: Float> Elm<F> {
    /// Create default hyperparameters, see [`ElmParams`]
    pub fn params() -> ElmParams<F, Xoshiro256Plus> {
        ElmParams::new()
    }

    pub(crate) fn new(
        weights: Array2<F>,
        bias: Array1<F>,
        beta: Array1<F>,
        activation: Activation,
    ) -> Self {
        Self {
            weights,
            bias,
            beta,
            activation,
            threshold: F::cast(0.5),
        }
    }

    /// Return a copy of the model deciding with a different score threshold
    ///
    /// The threshold must be finite.
    pub fn with_threshold(mut self, threshold: F) -> Result<Self> {
        if !threshold.is_finite() {
            return Err(ElmError::InvalidThreshold(
                threshold.to_f64().unwrap_or(f64::NAN),
            ));
        }
        self.threshold = threshold;
        Ok(self)
    }

    /// Random input weights, shape `(hidden_nodes, n_features)`
    pub fn weights(&self) -> &Array2<F> {
        &self.weights
    }

    /// Random hidden layer biases
    pub fn bias(&self) -> &Array1<F> {
        &self.bias
    }

    /// Fitted output weights
    pub fn beta(&self) -> &Array1<F> {
        &self.beta
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn threshold(&self) -> F {
        self.threshold
    }

    pub fn hidden_nodes(&self) -> usize {
        self.weights.nrows()
    }

    pub fn nfeatures(&self) -> usize {
        self.weights.ncols()
    }
}
