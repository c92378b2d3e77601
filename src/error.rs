//! Errors raised while configuring, fitting, evaluating or persisting an ELM
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ElmError>;

/// Coarse classification of an [`ElmError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A hyperparameter or model setting is out of range
    InvalidConfiguration,
    /// The data handed to the model has the wrong shape or content
    InvalidInput,
    /// The linear algebra could not produce a usable solution
    NumericalFailure,
    /// A model could not be written or read back
    Persistence,
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ElmError {
    #[error("unknown activation function `{0}`, expected `sigmoid` or `tanh`")]
    UnknownActivation(String),
    #[error("number of hidden nodes must be positive")]
    ZeroHiddenNodes,
    #[error("weight range must be finite with low < high, got [{0}, {1})")]
    InvalidWeightRange(f64, f64),
    #[error("test fraction must be in range [0, 1), but is {0}")]
    InvalidTestFraction(f32),
    #[error("decision threshold must be finite, but is {0}")]
    InvalidThreshold(f64),
    #[error("at least one sample needed")]
    NotEnoughSamples,
    #[error("at least one feature needed")]
    NoFeatures,
    #[error("expected {expected} targets, one per sample, got {found}")]
    MismatchedTargets { expected: usize, found: usize },
    #[error("row {row} has {found} features, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("model was trained with {expected} features, got {found}")]
    FeatureMismatch { expected: usize, found: usize },
    #[error("label {value} at index {index} is neither 0 nor 1")]
    InvalidLabel { index: usize, value: f64 },
    #[error("hidden layer output contains non-finite values")]
    NonFiniteHiddenLayer,
    #[error("hidden layer output has numerical rank zero")]
    DegenerateHiddenLayer,
    #[error("output weights contain non-finite values")]
    NonFiniteOutputWeights,
    #[error(transparent)]
    Linalg(#[from] linfa_linalg::LinalgError),
    #[error(transparent)]
    LinfaError(#[from] linfa::error::Error),
    #[error("malformed model record: {0}")]
    Persist(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ElmError {
    pub fn kind(&self) -> ErrorKind {
        use ElmError::*;
        match self {
            UnknownActivation(_)
            | ZeroHiddenNodes
            | InvalidWeightRange(..)
            | InvalidTestFraction(_)
            | InvalidThreshold(_) => ErrorKind::InvalidConfiguration,
            NotEnoughSamples
            | NoFeatures
            | MismatchedTargets { .. }
            | RaggedRows { .. }
            | FeatureMismatch { .. }
            | InvalidLabel { .. }
            | LinfaError(_) => ErrorKind::InvalidInput,
            NonFiniteHiddenLayer | DegenerateHiddenLayer | NonFiniteOutputWeights | Linalg(_) => {
                ErrorKind::NumericalFailure
            }
            Persist(_) | Io(_) => ErrorKind::Persistence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_variants() {
        assert_eq!(
            ElmError::UnknownActivation("relu".into()).kind(),
            ErrorKind::InvalidConfiguration
        );
        assert_eq!(ElmError::ZeroHiddenNodes.kind(), ErrorKind::InvalidConfiguration);
        assert_eq!(
            ElmError::FeatureMismatch {
                expected: 2,
                found: 3
            }
            .kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            ElmError::NonFiniteHiddenLayer.kind(),
            ErrorKind::NumericalFailure
        );
        assert_eq!(
            ElmError::Persist("bad magic".into()).kind(),
            ErrorKind::Persistence
        );
    }

    #[test]
    fn messages_name_the_problem() {
        let err = ElmError::RaggedRows {
            row: 3,
            expected: 4,
            found: 2,
        };
        assert_eq!(err.to_string(), "row 3 has 2 features, expected 4");
    }
}
