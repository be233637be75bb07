use crate::config::ModelFormat;
use crate::error::ModelResult;
use crate::math::Array2;

/// Contract for a loaded, read-only classifier.
///
/// Implementations are immutable after loading and must be safe to share
/// across request handlers, hence the `Send + Sync` bound and `&self`
/// receivers throughout.
pub trait ClassifierModel: Send + Sync {
    /// Predict one integer class label per row of `x`.
    ///
    /// Callers are expected to have checked `x.ncols()` against
    /// [`ClassifierModel::n_features`]; implementations still return an
    /// error rather than panic on a mismatch.
    fn predict(&self, x: &Array2<f32>) -> ModelResult<Vec<i64>>;

    /// Feature dimensionality recorded in the artifact, when it records one.
    fn n_features(&self) -> Option<usize>;

    /// Class labels this model can emit.
    fn classes(&self) -> &[i64];

    fn format(&self) -> ModelFormat;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
