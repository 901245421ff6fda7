//! Projection of embeddings to two dimensions.
//!
//! A projection maps an *n x d* embedding matrix to an *n x 2* matrix
//! of coordinates, such that row *i* of the output corresponds to row
//! *i* of the input. Projections are iterative; the caller is informed
//! of every iteration through a progress callback, which can also stop
//! the optimization early:
//!
//! ```
//! use std::ops::ControlFlow;
//!
//! use ndarray::arr2;
//! use word2vec2d::projection::{Project, Tsne};
//!
//! let data = arr2(&[[0., 0.], [0.1, 0.], [5., 5.], [5.1, 5.]]);
//! let tsne = Tsne::new(2., 100., 50).unwrap().with_seed(42);
//! let coords = tsne
//!     .project(data.view(), |progress| {
//!         if progress.divergence < 1e-3 {
//!             ControlFlow::Break(())
//!         } else {
//!             ControlFlow::Continue(())
//!         }
//!     })
//!     .unwrap();
//! assert_eq!(coords.dim(), (4, 2));
//! ```

use std::ops::ControlFlow;

use ndarray::{Array2, ArrayView2};

use crate::error::Result;

mod tsne;
pub use self::tsne::Tsne;

/// Number of output dimensions of a projection.
pub const OUTPUT_DIMS: usize = 2;

/// State of a projection after an iteration.
#[derive(Clone, Debug)]
pub struct Progress<'a> {
    /// Zero-based iteration.
    pub iteration: usize,

    /// Kullback-Leibler divergence between the input and output
    /// neighborhood distributions.
    pub divergence: f32,

    /// The current coordinates.
    pub embedding: ArrayView2<'a, f32>,
}

/// Projection of a matrix to two dimensions.
pub trait Project {
    /// Project `data` to a matrix with `OUTPUT_DIMS` columns.
    ///
    /// `progress` is called after every iteration. Returning
    /// `ControlFlow::Break` stops the projection, the coordinates of
    /// the last iteration are returned.
    fn project<F>(&self, data: ArrayView2<f32>, progress: F) -> Result<Array2<f32>>
    where
        F: FnMut(Progress) -> ControlFlow<()>;
}
