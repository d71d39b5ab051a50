use ndarray::{Array2, ArrayView3};

use crate::error::Result;

/// A trained sequence model.
///
/// Takes a batch shaped `(samples, lag, n_features)` of normalized values
/// and returns `(samples, horizon)` normalized predictions of the target
/// feature. Implementations are read-only after loading, so one instance
/// may serve concurrent forecasts.
pub trait Predictor: Send + Sync {
    fn lag(&self) -> usize;

    fn n_features(&self) -> usize;

    fn horizon(&self) -> usize;

    fn predict(&self, input: ArrayView3<'_, f64>) -> Result<Array2<f64>>;
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn lag(&self) -> usize {
        (**self).lag()
    }

    fn n_features(&self) -> usize {
        (**self).n_features()
    }

    fn horizon(&self) -> usize {
        (**self).horizon()
    }

    fn predict(&self, input: ArrayView3<'_, f64>) -> Result<Array2<f64>> {
        (**self).predict(input)
    }
}
