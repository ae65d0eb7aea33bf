//! Collaborator contracts: classifiers and attacks.
//!
//! The trainer does not train models or craft perturbations itself. It drives
//! implementations of these traits and only relies on the shapes they return.

use crate::params::Params;
use ndarray::{Array2, ArrayD, ArrayView2, ArrayViewD};
use std::cell::RefCell;
use std::rc::Rc;

/// What a classifier reports about its own training state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitState {
    /// The classifier cannot tell. Treated as not fitted.
    #[default]
    Unknown,
    NotFitted,
    Fitted,
}

impl FitState {
    pub fn is_fitted(self) -> bool {
        matches!(self, FitState::Fitted)
    }
}

pub trait Classifier {
    /// Train on `inputs` (axis 0 = samples) against `(n_samples, n_classes)`
    /// labels. Retrains from scratch when called again.
    fn fit(
        &mut self,
        inputs: ArrayViewD<'_, f32>,
        labels: ArrayView2<'_, f32>,
        options: &Params,
    ) -> anyhow::Result<()>;

    /// Class scores or one-hot predictions, one row per input sample.
    fn predict(&self, inputs: ArrayViewD<'_, f32>, options: &Params) -> anyhow::Result<Array2<f32>>;

    fn fit_state(&self) -> FitState;
}

/// A classifier shared between the trainer and the attacks that target it.
pub type SharedClassifier = Rc<RefCell<dyn Classifier>>;

/// Wrap a classifier for sharing.
pub fn shared<C: Classifier + 'static>(classifier: C) -> SharedClassifier {
    Rc::new(RefCell::new(classifier))
}

pub trait Attack {
    /// Name used in logs, reports and configuration files.
    fn name(&self) -> &str;

    /// The classifier this attack crafts its samples against.
    fn classifier(&self) -> SharedClassifier;

    /// Produce one adversarial input per input sample, in the same order.
    fn generate(&self, inputs: ArrayViewD<'_, f32>, params: &Params) -> anyhow::Result<ArrayD<f32>>;
}

/// A reference to an attack, shared so one instance can be configured once.
pub type AttackRef = Rc<dyn Attack>;
