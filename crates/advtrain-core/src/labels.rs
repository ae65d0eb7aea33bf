//! Conversions between raw classifier output and one-hot labels.

use crate::error::{TrainerError, TrainerResult};
use ndarray::{Array2, ArrayView2, Axis};

/// Index of the largest value in each row. The first maximum wins on ties.
/// An empty row maps to 0.
pub fn argmax_rows(scores: ArrayView2<'_, f32>) -> Vec<usize> {
    scores
        .axis_iter(Axis(0))
        .map(|row| {
            let mut best = 0;
            for (i, &v) in row.iter().enumerate() {
                if v > row[best] {
                    best = i;
                }
            }
            best
        })
        .collect()
}

/// One-hot encode class indices into `n_classes` columns.
pub fn one_hot_from_indices(indices: &[usize], n_classes: usize) -> TrainerResult<Array2<f32>> {
    let mut out = Array2::zeros((indices.len(), n_classes));
    for (row, &class) in indices.iter().enumerate() {
        if class >= n_classes {
            return Err(TrainerError::InvalidLabel {
                index: class,
                n_classes,
            });
        }
        out[[row, class]] = 1.0;
    }
    Ok(out)
}

/// True when every row holds exactly one 1.0 and zeros elsewhere.
pub fn is_one_hot(labels: ArrayView2<'_, f32>) -> bool {
    labels.axis_iter(Axis(0)).all(|row| {
        let mut ones = 0;
        for &v in row.iter() {
            if v == 1.0 {
                ones += 1;
            } else if v != 0.0 {
                return false;
            }
        }
        ones == 1
    })
}

/// Normalize hard or soft predictions to one-hot labels of the same width.
pub fn to_one_hot(predictions: ArrayView2<'_, f32>) -> Array2<f32> {
    if is_one_hot(predictions) {
        return predictions.to_owned();
    }
    let n_classes = predictions.ncols();
    let mut out = Array2::zeros(predictions.raw_dim());
    if n_classes == 0 {
        return out;
    }
    for (row, class) in argmax_rows(predictions).into_iter().enumerate() {
        out[[row, class]] = 1.0;
    }
    out
}
