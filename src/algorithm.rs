use linfa::dataset::{AsSingleTargets, DatasetBase};
use linfa::traits::{Fit, PredictInplace};
use linfa::Float;
use linfa_linalg::svd::*;
use log::{debug, warn};
use ndarray::{s, Array1, Array2, ArrayBase, Data, Ix1, Ix2, Zip};
use ndarray_rand::RandomExt;
use rand::distributions::Uniform;
use rand::Rng;

use crate::activation::Activation;
use crate::error::{ElmError, Result};
use crate::hyperparams::ElmValidParams;
use crate::Elm;

impl<F, D, T, R> Fit<ArrayBase<D, Ix2>, T, ElmError> for ElmValidParams<F, R>
where
    F: Float,
    D: Data<Elem = F>,
    T: AsSingleTargets<Elem = bool>,
    R: Rng + Clone,
{
    type Object = Elm<F>;

    /// Fit an Extreme Learning Machine given a feature matrix `x` and boolean targets `y`.
    ///
    /// The feature matrix `x` must have shape `(n_samples, n_features)`
    ///
    /// The target variable `y` must have shape `(n_samples)`
    ///
    /// Returns a fitted `Elm` which predicts `true` for the positive class.
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        let targets = dataset
            .as_single_targets()
            .mapv(|t| if t { F::one() } else { F::zero() });

        self.fit_matrix(dataset.records(), &targets)
    }
}

impl<F: Float, R: Rng + Clone> ElmValidParams<F, R> {
    /// Fit on a raw feature matrix and `0`/`1` targets
    ///
    /// All shape and label checks happen before any weights are drawn. The random number
    /// generator of the parameters is cloned, so fitting twice with the same parameters yields
    /// the same model.
    pub fn fit_matrix<D1, D2>(
        &self,
        x: &ArrayBase<D1, Ix2>,
        targets: &ArrayBase<D2, Ix1>,
    ) -> Result<Elm<F>>
    where
        D1: Data<Elem = F>,
        D2: Data<Elem = F>,
    {
        let (n_samples, n_features) = x.dim();
        if n_samples == 0 {
            return Err(ElmError::NotEnoughSamples);
        }
        if n_features == 0 {
            return Err(ElmError::NoFeatures);
        }
        if targets.len() != n_samples {
            return Err(ElmError::MismatchedTargets {
                expected: n_samples,
                found: targets.len(),
            });
        }
        if let Some((index, value)) = targets
            .iter()
            .enumerate()
            .find(|(_, t)| **t != F::zero() && **t != F::one())
        {
            return Err(ElmError::InvalidLabel {
                index,
                value: value.to_f64().unwrap_or(f64::NAN),
            });
        }

        debug!(
            "fitting ELM with {} hidden nodes on {} samples of {} features",
            self.hidden_nodes, n_samples, n_features
        );

        let mut rng = self.rng.clone();
        let (low, high) = self.weight_range;
        let weights = Array2::random_using(
            (self.hidden_nodes, n_features),
            Uniform::new(low, high),
            &mut rng,
        );
        let bias = Array1::random_using(self.hidden_nodes, Uniform::new(low, high), &mut rng);

        let hidden = hidden_layer(x, &weights, &bias, self.activation);
        if hidden.iter().any(|v| !v.is_finite()) {
            return Err(ElmError::NonFiniteHiddenLayer);
        }

        let beta = pseudo_inverse(&hidden)?.dot(targets);
        if beta.iter().any(|v| !v.is_finite()) {
            return Err(ElmError::NonFiniteOutputWeights);
        }

        debug!("fitted ELM output weights of length {}", beta.len());
        Ok(Elm::new(weights, bias, beta, self.activation))
    }
}

/// `act(x W^T + b)` with the bias added to every row
fn hidden_layer<F: Float, D: Data<Elem = F>>(
    x: &ArrayBase<D, Ix2>,
    weights: &Array2<F>,
    bias: &Array1<F>,
    activation: Activation,
) -> Array2<F> {
    let mut hidden = x.dot(&weights.t());
    hidden += bias;
    activation.apply_inplace(&mut hidden);
    hidden
}

/// Moore-Penrose pseudo-inverse of a matrix
///
/// Computed from the singular value decomposition `x = U S V^T` as `V S^+ U^T`, where singular
/// values below `max(S) * max(nrows, ncols) * eps` are treated as zero. The result has shape
/// `(ncols, nrows)`.
///
/// Fails if `x` contains non-finite values or has no singular value above the cutoff.
pub fn pseudo_inverse<F: Float, D: Data<Elem = F>>(x: &ArrayBase<D, Ix2>) -> Result<Array2<F>> {
    if x.iter().any(|v| !v.is_finite()) {
        return Err(ElmError::NonFiniteHiddenLayer);
    }

    let (u, s, vt) = x.svd(true, true)?.sort_svd_desc();
    let (u, vt) = match (u, vt) {
        (Some(u), Some(vt)) => (u, vt),
        _ => return Err(ElmError::DegenerateHiddenLayer),
    };

    let largest = s.iter().next().copied().unwrap_or_else(F::zero);
    let cutoff = largest * F::cast(x.nrows().max(x.ncols())) * F::epsilon();
    let rank = s.iter().filter(|v| **v > cutoff).count();

    if rank == 0 {
        return Err(ElmError::DegenerateHiddenLayer);
    }
    if rank < s.len() {
        warn!(
            "hidden layer is rank deficient: rank {} of {}",
            rank,
            s.len()
        );
    }

    let mut ucut = u.slice_move(s![.., ..rank]);
    ucut /= &s.slice(s![..rank]);

    Ok(vt.slice(s![..rank, ..]).t().dot(&ucut.t()))
}

/// View the fitted parameters and make predictions with a fitted Extreme Learning Machine
impl<F: Float> Elm<F> {
    fn check_features(&self, found: usize) -> Result<()> {
        if found != self.nfeatures() {
            return Err(ElmError::FeatureMismatch {
                expected: self.nfeatures(),
                found,
            });
        }
        Ok(())
    }

    /// Raw score `beta . act(W row + b)` of a single sample
    ///
    /// Non-finite features that reach the hidden layer fail with a numerical error instead of
    /// yielding a NaN score.
    pub fn predict_raw_row<D: Data<Elem = F>>(&self, row: &ArrayBase<D, Ix1>) -> Result<F> {
        self.check_features(row.len())?;

        let mut hidden = self.weights.dot(row) + &self.bias;
        self.activation.apply_inplace(&mut hidden);
        if hidden.iter().any(|v| !v.is_finite()) {
            return Err(ElmError::NonFiniteHiddenLayer);
        }
        Ok(hidden.dot(&self.beta))
    }

    /// Predicted class of a single sample
    pub fn predict_row<D: Data<Elem = F>>(&self, row: &ArrayBase<D, Ix1>) -> Result<bool> {
        Ok(self.predict_raw_row(row)? >= self.threshold)
    }

    /// Raw scores of all rows in `x`, with shape `(n_samples)`
    ///
    /// Equal to calling [`Elm::predict_raw_row`] on every row, but computed with a single
    /// matrix product. Fails if any hidden unit evaluates to a non-finite value.
    pub fn predict_raw<D: Data<Elem = F>>(&self, x: &ArrayBase<D, Ix2>) -> Result<Array1<F>> {
        self.check_features(x.ncols())?;
        let hidden = hidden_layer(x, &self.weights, &self.bias, self.activation);
        if hidden.iter().any(|v| !v.is_finite()) {
            return Err(ElmError::NonFiniteHiddenLayer);
        }
        Ok(hidden.dot(&self.beta))
    }

    /// Two column raw predictions `(-m, m)` with margin `m = score - threshold`
    ///
    /// The index of the larger column is the predicted class, `1` for `true`.
    pub fn predict_margins<D: Data<Elem = F>>(&self, x: &ArrayBase<D, Ix2>) -> Result<Array2<F>> {
        let scores = self.predict_raw(x)?;
        let mut margins = Array2::zeros((scores.len(), 2));
        Zip::from(margins.rows_mut())
            .and(&scores)
            .for_each(|mut out, score| {
                let margin = *score - self.threshold;
                out[0] = -margin;
                out[1] = margin;
            });
        Ok(margins)
    }

    /// Predicted classes of all rows in `x`
    pub fn try_predict<D: Data<Elem = F>>(&self, x: &ArrayBase<D, Ix2>) -> Result<Array1<bool>> {
        Ok(self
            .predict_raw(x)?
            .mapv(|score| score >= self.threshold))
    }
}

impl<F: Float, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<bool>> for Elm<F> {
    /// Given an input matrix `X`, with shape `(n_samples, n_features)`,
    /// `predict` returns the class of every sample.
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<bool>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );
        assert_eq!(
            x.ncols(),
            self.nfeatures(),
            "Number of data features must match the number of features the model was trained with."
        );

        let hidden = hidden_layer(x, &self.weights, &self.bias, self.activation);
        let scores = hidden.dot(&self.beta);
        Zip::from(&scores).and(y).for_each(|score, out| {
            *out = *score >= self.threshold;
        });
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<bool> {
        Array1::from_elem(x.nrows(), false)
    }
}
