//! Datasets of (input, label) pairs held as dense arrays.
//!
//! Axis 0 indexes samples in both arrays. Labels are `(n_samples, n_classes)`.

use crate::error::{TrainerError, TrainerResult};
use ndarray::{concatenate, s, Array2, ArrayD, ArrayView2, ArrayViewD, Axis};

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    inputs: ArrayD<f32>,
    labels: Array2<f32>,
}

impl Dataset {
    /// Build a dataset, checking that inputs and labels have the same number
    /// of samples.
    pub fn new(inputs: ArrayD<f32>, labels: Array2<f32>) -> TrainerResult<Self> {
        check_pairing("dataset", inputs.view(), labels.view())?;
        Ok(Self { inputs, labels })
    }

    /// Owned copy of borrowed arrays. Later changes to the source arrays do
    /// not reach the copy.
    pub fn from_views(inputs: ArrayViewD<'_, f32>, labels: ArrayView2<'_, f32>) -> TrainerResult<Self> {
        check_pairing("dataset", inputs.view(), labels)?;
        Ok(Self {
            inputs: inputs.to_owned(),
            labels: labels.to_owned(),
        })
    }

    pub fn len(&self) -> usize {
        self.labels.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn n_classes(&self) -> usize {
        self.labels.ncols()
    }

    /// Shape of a single input, without the sample axis.
    pub fn sample_shape(&self) -> &[usize] {
        &self.inputs.shape()[1..]
    }

    pub fn inputs(&self) -> ArrayViewD<'_, f32> {
        self.inputs.view()
    }

    pub fn labels(&self) -> ArrayView2<'_, f32> {
        self.labels.view()
    }

    pub fn into_parts(self) -> (ArrayD<f32>, Array2<f32>) {
        (self.inputs, self.labels)
    }
}

fn check_pairing(
    context: &str,
    inputs: ArrayViewD<'_, f32>,
    labels: ArrayView2<'_, f32>,
) -> TrainerResult<()> {
    if inputs.ndim() == 0 {
        return Err(TrainerError::shape_described(
            format!("{context} inputs"),
            "at least one axis (samples)",
            inputs.shape(),
        ));
    }
    let n_inputs = inputs.len_of(Axis(0));
    if n_inputs != labels.nrows() {
        return Err(TrainerError::shape(
            format!("{context} sample count"),
            n_inputs,
            labels.nrows(),
        ));
    }
    Ok(())
}

/// The dataset used for the last training pass: every original sample, in
/// order, followed by the successful adversarial samples of each attack.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedDataset {
    data: Dataset,
    original_len: usize,
}

impl AugmentedDataset {
    pub fn dataset(&self) -> &Dataset {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn inputs(&self) -> ArrayViewD<'_, f32> {
        self.data.inputs()
    }

    pub fn labels(&self) -> ArrayView2<'_, f32> {
        self.data.labels()
    }

    pub fn original_len(&self) -> usize {
        self.original_len
    }

    pub fn adversarial_len(&self) -> usize {
        self.len() - self.original_len
    }

    /// The leading original samples.
    pub fn original(&self) -> (ArrayViewD<'_, f32>, ArrayView2<'_, f32>) {
        self.split_at(0, self.original_len)
    }

    /// The appended adversarial samples, in attack-processing order.
    pub fn adversarial(&self) -> (ArrayViewD<'_, f32>, ArrayView2<'_, f32>) {
        self.split_at(self.original_len, self.len())
    }

    fn split_at(&self, start: usize, end: usize) -> (ArrayViewD<'_, f32>, ArrayView2<'_, f32>) {
        let x = self.data.inputs.slice_axis(Axis(0), (start..end).into());
        let y = self.data.labels.slice(s![start..end, ..]);
        (x, y)
    }
}

/// Collects blocks of samples and joins them once at the end.
#[derive(Debug)]
pub(crate) struct Accumulator {
    inputs: Vec<ArrayD<f32>>,
    labels: Vec<Array2<f32>>,
    original_len: usize,
    sample_shape: Vec<usize>,
    n_classes: usize,
}

impl Accumulator {
    pub(crate) fn new(original: Dataset) -> Self {
        let original_len = original.len();
        let sample_shape = original.sample_shape().to_vec();
        let n_classes = original.n_classes();
        let (x, y) = original.into_parts();
        Self {
            inputs: vec![x],
            labels: vec![y],
            original_len,
            sample_shape,
            n_classes,
        }
    }

    pub(crate) fn push(&mut self, inputs: ArrayD<f32>, labels: Array2<f32>) -> TrainerResult<()> {
        check_pairing("adversarial block", inputs.view(), labels.view())?;
        if &inputs.shape()[1..] != self.sample_shape.as_slice() {
            return Err(TrainerError::shape(
                "adversarial sample shape",
                &self.sample_shape,
                &inputs.shape()[1..],
            ));
        }
        if labels.ncols() != self.n_classes {
            return Err(TrainerError::shape(
                "adversarial label width",
                self.n_classes,
                labels.ncols(),
            ));
        }
        self.inputs.push(inputs);
        self.labels.push(labels);
        Ok(())
    }

    pub(crate) fn finish(self) -> TrainerResult<AugmentedDataset> {
        let x_views: Vec<_> = self.inputs.iter().map(ArrayD::view).collect();
        let y_views: Vec<_> = self.labels.iter().map(Array2::view).collect();
        let x = concatenate(Axis(0), &x_views).map_err(|e| TrainerError::ShapeMismatch {
            context: "augmented inputs".into(),
            expected: format!("{:?}", self.sample_shape),
            actual: e.to_string(),
        })?;
        let y = concatenate(Axis(0), &y_views).map_err(|e| TrainerError::ShapeMismatch {
            context: "augmented labels".into(),
            expected: self.n_classes.to_string(),
            actual: e.to_string(),
        })?;
        Ok(AugmentedDataset {
            data: Dataset::new(x, y)?,
            original_len: self.original_len,
        })
    }
}
