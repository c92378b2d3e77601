//! Conversion of row-oriented samples into dense records
use linfa::{Dataset, Float};
use ndarray::{Array1, Array2, Ix1};

use crate::error::{ElmError, Result};

/// Stack rows of features into a `(n_samples, n_features)` matrix
///
/// The number of features is taken from the first row, every other row must have the same
/// length.
pub fn records_from_rows<F: Float, S: AsRef<[F]>>(rows: &[S]) -> Result<Array2<F>> {
    let nfeatures = match rows.first() {
        Some(row) => row.as_ref().len(),
        None => return Err(ElmError::NotEnoughSamples),
    };
    if nfeatures == 0 {
        return Err(ElmError::NoFeatures);
    }

    let mut values = Vec::with_capacity(rows.len() * nfeatures);
    for (idx, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != nfeatures {
            return Err(ElmError::RaggedRows {
                row: idx,
                expected: nfeatures,
                found: row.len(),
            });
        }
        values.extend_from_slice(row);
    }

    Array2::from_shape_vec((rows.len(), nfeatures), values)
        .map_err(|err| linfa::Error::from(err).into())
}

/// Build a binary dataset from rows of features and `0`/`1` labels
pub fn dataset_from_rows<F: Float, S: AsRef<[F]>>(
    rows: &[S],
    labels: &[F],
) -> Result<Dataset<F, bool, Ix1>> {
    let records = records_from_rows(rows)?;
    if labels.len() != records.nrows() {
        return Err(ElmError::MismatchedTargets {
            expected: records.nrows(),
            found: labels.len(),
        });
    }

    let targets = labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            if *label == F::one() {
                Ok(true)
            } else if *label == F::zero() {
                Ok(false)
            } else {
                Err(ElmError::InvalidLabel {
                    index,
                    value: label.to_f64().unwrap_or(f64::NAN),
                })
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Dataset::new(records, Array1::from(targets)))
}
