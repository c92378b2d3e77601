use linfa::{DatasetBase, Float, ParamGuard};
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

use crate::activation::Activation;
use crate::error::ElmError;

/// A hyper-parameter set for an Extreme Learning Machine which has not been checked yet
///
/// See [`ElmValidParams`] for the meaning of each value. Checking happens through
/// [`ParamGuard`], either explicitly or implicitly when calling `fit`.
#[derive(Clone, Debug, PartialEq)]
pub struct ElmParams<F: Float, R: Rng + Clone>(pub(crate) ElmValidParams<F, R>);

/// A verified hyper-parameter set ready for fitting an Extreme Learning Machine
///
/// * `hidden_nodes`: number of random projection units `L`
/// * `activation`: nonlinearity applied to the hidden layer
/// * `weight_range`: half-open interval the input weights and biases are sampled from
/// * `frac_test`: share of samples held out by [`ElmValidParams::split_dataset`]
/// * `rng`: random number generator, cloned for every fit
#[derive(Clone, Debug, PartialEq)]
pub struct ElmValidParams<F: Float, R: Rng + Clone> {
    pub(crate) hidden_nodes: usize,
    pub(crate) activation: Activation,
    pub(crate) weight_range: (F, F),
    pub(crate) frac_test: f32,
    pub(crate) rng: R,
}

impl<F: Float> Default for ElmParams<F, Xoshiro256Plus> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> ElmParams<F, Xoshiro256Plus> {
    /// Create default hyperparameters with a [`Xoshiro256Plus`] seeded with `42`
    pub fn new() -> Self {
        Self::default_with_rng(Xoshiro256Plus::seed_from_u64(42))
    }
}

impl<F: Float, R: Rng + Clone> ElmParams<F, R> {
    /// Create default hyperparameters sampling from the provided random number generator
    pub fn default_with_rng(rng: R) -> Self {
        Self(ElmValidParams {
            hidden_nodes: 20,
            activation: Activation::Sigmoid,
            weight_range: (-F::one(), F::one()),
            frac_test: 0.0,
            rng,
        })
    }

    /// Set the number of hidden nodes.
    ///
    /// Defaults to `20` if not set
    ///
    /// `hidden_nodes` must be positive
    pub fn hidden_nodes(mut self, hidden_nodes: usize) -> Self {
        self.0.hidden_nodes = hidden_nodes;
        self
    }

    /// Set the activation function of the hidden layer.
    ///
    /// Defaults to [`Activation::Sigmoid`] if not set
    pub fn activation(mut self, activation: Activation) -> Self {
        self.0.activation = activation;
        self
    }

    /// Set the activation function by name, either `sigmoid` or `tanh`
    ///
    /// Unknown names are rejected immediately.
    pub fn activation_name(self, name: &str) -> Result<Self, ElmError> {
        Ok(self.activation(name.parse()?))
    }

    /// Set the interval `[low, high)` for input weights and biases.
    ///
    /// Defaults to `[-1, 1)` if not set
    ///
    /// Both bounds must be finite and `low < high`
    pub fn weight_range(mut self, low: F, high: F) -> Self {
        self.0.weight_range = (low, high);
        self
    }

    /// Set the fraction of samples held out for testing.
    ///
    /// Defaults to `0.0` if not set
    ///
    /// `frac_test` must be in range `[0, 1)`
    pub fn frac_test(mut self, frac_test: f32) -> Self {
        self.0.frac_test = frac_test;
        self
    }

    /// Replace the random number generator used to sample weights and biases
    pub fn with_rng<R2: Rng + Clone>(self, rng: R2) -> ElmParams<F, R2> {
        ElmParams(ElmValidParams {
            hidden_nodes: self.0.hidden_nodes,
            activation: self.0.activation,
            weight_range: self.0.weight_range,
            frac_test: self.0.frac_test,
            rng,
        })
    }
}

impl<F: Float, R: Rng + Clone> ParamGuard for ElmParams<F, R> {
    type Checked = ElmValidParams<F, R>;
    type Error = ElmError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        let (low, high) = self.0.weight_range;
        if self.0.hidden_nodes == 0 {
            Err(ElmError::ZeroHiddenNodes)
        } else if !low.is_finite() || !high.is_finite() || low >= high {
            Err(ElmError::InvalidWeightRange(
                low.to_f64().unwrap_or(f64::NAN),
                high.to_f64().unwrap_or(f64::NAN),
            ))
        } else if !(0.0..1.0).contains(&self.0.frac_test) {
            Err(ElmError::InvalidTestFraction(self.0.frac_test))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float, R: Rng + Clone> ElmValidParams<F, R> {
    pub fn hidden_nodes(&self) -> usize {
        self.hidden_nodes
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn weight_range(&self) -> (F, F) {
        self.weight_range
    }

    pub fn frac_test(&self) -> f32 {
        self.frac_test
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Split a dataset into a training and a test part according to `frac_test`
    ///
    /// Samples are taken in order, shuffle the dataset beforehand if needed. With `frac_test`
    /// of zero the test part is empty.
    pub fn split_dataset<E: Copy>(
        &self,
        dataset: DatasetBase<Array2<F>, Array1<E>>,
    ) -> (
        DatasetBase<Array2<F>, Array1<E>>,
        DatasetBase<Array2<F>, Array1<E>>,
    ) {
        dataset.split_with_ratio(1.0 - self.frac_test)
    }
}
