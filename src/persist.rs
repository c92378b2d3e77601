//! Plain text model records
//!
//! A fitted model is stored as
//!
//! ```text
//! linfa-elm v1
//! <n_features> <hidden_nodes>
//! <activation>
//! <threshold>
//! <weights, one line per hidden node>
//! <bias>
//! <beta>
//! ```
//!
//! with values separated by single spaces. Numbers are written with the shortest
//! representation that parses back to the same `f64`.
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use linfa::Float;
use ndarray::{Array1, Array2, ArrayBase, Data, Ix1};

use crate::activation::Activation;
use crate::error::{ElmError, Result};
use crate::Elm;

const MAGIC: &str = "linfa-elm v1";

impl<F: Float> Elm<F> {
    /// Write the model record to `writer`
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", MAGIC)?;
        writeln!(writer, "{} {}", self.nfeatures(), self.hidden_nodes())?;
        writeln!(writer, "{}", self.activation)?;
        writeln!(writer, "{}", format_value(self.threshold))?;
        for row in self.weights.rows() {
            write_values(&mut writer, &row)?;
        }
        write_values(&mut writer, &self.bias)?;
        write_values(&mut writer, &self.beta)?;
        writer.flush()?;

        Ok(())
    }

    /// Read a model record written by [`Elm::write_to`]
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines();
        let mut next_line = move |what: &str| -> Result<String> {
            match lines.next() {
                Some(line) => Ok(line?),
                None => Err(ElmError::Persist(format!("missing {}", what))),
            }
        };

        let magic = next_line("header")?;
        if magic.trim() != MAGIC {
            return Err(ElmError::Persist(format!("unknown header `{}`", magic)));
        }

        let dims = next_line("dimensions")?;
        let dims = dims
            .split_whitespace()
            .map(|v| v.parse::<usize>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|err| ElmError::Persist(format!("invalid dimensions: {}", err)))?;
        let (nfeatures, hidden_nodes) = match dims[..] {
            [nfeatures, hidden_nodes] if nfeatures > 0 && hidden_nodes > 0 => {
                (nfeatures, hidden_nodes)
            }
            _ => {
                return Err(ElmError::Persist(
                    "expected two positive dimensions".to_string(),
                ))
            }
        };

        let activation: Activation = next_line("activation")?.parse()?;
        let threshold = parse_values::<F>(&next_line("threshold")?, 1)?[0];

        if nfeatures.checked_mul(hidden_nodes).is_none() {
            return Err(ElmError::Persist(format!(
                "dimensions {} x {} overflow",
                nfeatures, hidden_nodes
            )));
        }

        // sized by the parsed lines, never by the header
        let mut weights = Vec::new();
        for _ in 0..hidden_nodes {
            weights.extend(parse_values::<F>(&next_line("weights")?, nfeatures)?);
        }
        let weights = Array2::from_shape_vec((hidden_nodes, nfeatures), weights)
            .map_err(linfa::Error::from)?;
        let bias = Array1::from(parse_values::<F>(&next_line("bias")?, hidden_nodes)?);
        let beta = Array1::from(parse_values::<F>(&next_line("beta")?, hidden_nodes)?);

        Elm::new(weights, bias, beta, activation).with_threshold(threshold)
    }

    /// Write the model record to a file, replacing existing content
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_to(BufWriter::new(File::create(path)?))
    }

    /// Load a model record from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read_from(BufReader::new(File::open(path)?))
    }
}

fn format_value<F: Float>(value: F) -> String {
    format!("{:e}", value.to_f64().unwrap_or(f64::NAN))
}

fn write_values<F: Float, D: Data<Elem = F>, W: Write>(
    writer: &mut W,
    values: &ArrayBase<D, Ix1>,
) -> Result<()> {
    let line = values
        .iter()
        .map(|v| format_value(*v))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(writer, "{}", line)?;

    Ok(())
}

fn parse_values<F: Float>(line: &str, expected: usize) -> Result<Vec<F>> {
    let values = line
        .split_whitespace()
        .map(|v| {
            v.parse::<f64>()
                .ok()
                .and_then(F::from_f64)
                .ok_or_else(|| ElmError::Persist(format!("invalid number `{}`", v)))
        })
        .collect::<Result<Vec<F>>>()?;

    if values.len() != expected {
        return Err(ElmError::Persist(format!(
            "expected {} values, found {}",
            expected,
            values.len()
        )));
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use linfa::traits::Fit;
    use linfa::Dataset;
    use ndarray::array;

    fn fitted() -> Elm<f64> {
        let dataset = Dataset::new(
            array![[0.0, 1.0], [0.1, 0.9], [10.0, -3.0], [10.1, -2.5]],
            array![false, false, true, true],
        );
        Elm::params()
            .hidden_nodes(6)
            .activation(Activation::Tanh)
            .fit(&dataset)
            .unwrap()
            .with_threshold(0.4)
            .unwrap()
    }

    #[test]
    fn restores_identical_model() {
        let model = fitted();
        let mut buf = Vec::new();
        model.write_to(&mut buf).unwrap();

        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("linfa-elm v1\n2 6\ntanh\n4e-1\n"));
        assert_eq!(text.lines().count(), 4 + 6 + 2);

        let restored = Elm::<f64>::read_from(buf.as_slice()).unwrap();
        assert_eq!(restored, model);
    }

    #[test]
    fn restores_f32_model() {
        let dataset = Dataset::new(
            array![[0.0f32], [0.1], [10.0], [10.1]],
            array![false, false, true, true],
        );
        let model = Elm::params().fit(&dataset).unwrap();
        let mut buf = Vec::new();
        model.write_to(&mut buf).unwrap();
        assert_eq!(Elm::<f32>::read_from(buf.as_slice()).unwrap(), model);
    }

    #[test]
    fn saves_to_file() {
        let model = fitted();
        let path = std::env::temp_dir().join(format!("linfa-elm-{}.txt", std::process::id()));
        model.save(&path).unwrap();
        let restored = Elm::<f64>::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(restored, model);
    }

    #[test]
    fn rejects_unknown_header() {
        let err = Elm::<f64>::read_from("linfa-svm v1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ElmError::Persist(_)));
        assert_eq!(err.kind(), ErrorKind::Persistence);
    }

    #[test]
    fn rejects_truncated_record() {
        let mut buf = Vec::new();
        fitted().write_to(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let truncated = text.lines().take(6).collect::<Vec<_>>().join("\n");

        let err = Elm::<f64>::read_from(truncated.as_bytes()).unwrap_err();
        assert!(matches!(err, ElmError::Persist(msg) if msg.contains("weights")));
    }

    #[test]
    fn rejects_wrong_value_count() {
        let record = "linfa-elm v1\n1 2\nsigmoid\n5e-1\n1\n2\n0.5 0.5\n1 1 1\n";
        let err = Elm::<f64>::read_from(record.as_bytes()).unwrap_err();
        assert!(matches!(err, ElmError::Persist(msg) if msg.contains("expected 2 values")));
    }

    #[test]
    fn rejects_oversized_dimensions() {
        let record = "linfa-elm v1\n1 18446744073709551615\nsigmoid\n5e-1\n";
        let err = Elm::<f64>::read_from(record.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Persistence);

        let record = "linfa-elm v1\n4294967296 4294967296\nsigmoid\n5e-1\n";
        let err = Elm::<f64>::read_from(record.as_bytes()).unwrap_err();
        assert!(matches!(err, ElmError::Persist(msg) if msg.contains("overflow")));

        // plausible header, but the record ends long before the announced weights
        let record = "linfa-elm v1\n1 1000000000000\nsigmoid\n5e-1\n0.5\n";
        let err = Elm::<f64>::read_from(record.as_bytes()).unwrap_err();
        assert!(matches!(err, ElmError::Persist(msg) if msg.contains("weights")));
    }

    #[test]
    fn rejects_unknown_activation() {
        let record = "linfa-elm v1\n1 1\nrelu\n5e-1\n1\n0\n1\n";
        let err = Elm::<f64>::read_from(record.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }
}
