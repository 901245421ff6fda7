//! Tokens paired with their embedding matrix.

use std::iter::Zip;
use std::slice;

use ndarray::{iter::AxisIter, Array2, ArrayView1, ArrayView2, Axis, Ix1};

use crate::error::{Error, Result};

/// Word embeddings as read from a file.
///
/// A lexicon owns an ordered list of tokens and a dense, row-major
/// matrix with one row per token. The token at index *i* belongs to
/// row *i* of the matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Lexicon {
    tokens: Vec<String>,
    matrix: Array2<f32>,
}

impl Lexicon {
    /// Construct a lexicon from tokens and their embeddings.
    ///
    /// Fails if the number of tokens differs from the number of rows.
    pub fn new(tokens: Vec<String>, matrix: Array2<f32>) -> Result<Self> {
        if tokens.len() != matrix.nrows() {
            return Err(Error::RowMismatch {
                tokens: tokens.len(),
                rows: matrix.nrows(),
            });
        }

        Ok(Lexicon { tokens, matrix })
    }

    /// Construct a lexicon from tokens and a flat row-major buffer.
    pub(crate) fn from_flat(tokens: Vec<String>, dims: usize, data: Vec<f32>) -> Result<Self> {
        let matrix = Array2::from_shape_vec((tokens.len(), dims), data)?;
        Ok(Lexicon { tokens, matrix })
    }

    /// Get the embedding dimensionality.
    pub fn dims(&self) -> usize {
        self.matrix.ncols()
    }

    /// Check whether the lexicon has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Get the number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Get the embedding of the token at `idx`.
    pub fn embedding(&self, idx: usize) -> Option<ArrayView1<f32>> {
        if idx < self.len() {
            Some(self.matrix.row(idx))
        } else {
            None
        }
    }

    /// Iterate over tokens and their embeddings.
    pub fn iter(&self) -> Iter {
        self.tokens.iter().zip(self.matrix.axis_iter(Axis(0)))
    }

    /// Get the embedding matrix.
    pub fn matrix(&self) -> ArrayView2<f32> {
        self.matrix.view()
    }

    /// Get the tokens.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Decompose the lexicon into tokens and matrix.
    pub fn into_parts(self) -> (Vec<String>, Array2<f32>) {
        (self.tokens, self.matrix)
    }
}

/// Iterator over tokens and their embeddings.
pub type Iter<'a> = Zip<slice::Iter<'a, String>, AxisIter<'a, f32, Ix1>>;

impl<'a> IntoIterator for &'a Lexicon {
    type Item = (&'a String, ArrayView1<'a, f32>);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{arr1, arr2, Array2};

    use super::Lexicon;
    use crate::error::Error;

    #[test]
    fn rejects_mismatched_rows() {
        let err = Lexicon::new(vec!["a".to_string()], Array2::zeros((2, 3))).unwrap_err();
        match err {
            Error::RowMismatch { tokens, rows } => {
                assert_eq!(tokens, 1);
                assert_eq!(rows, 2);
            }
            other => panic!("expected row mismatch, got {:?}", other),
        }
    }

    #[test]
    fn rejects_short_flat_buffer() {
        assert!(Lexicon::from_flat(vec!["a".to_string()], 2, vec![1.0]).is_err());
    }

    #[test]
    fn iterates_in_order() {
        let lexicon = Lexicon::new(
            vec!["cat".to_string(), "dog".to_string()],
            arr2(&[[1.0, 2.0], [3.0, 4.0]]),
        )
        .unwrap();

        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.dims(), 2);
        assert_eq!(lexicon.embedding(1).unwrap(), arr1(&[3.0f32, 4.0]));
        assert!(lexicon.embedding(2).is_none());

        let tokens: Vec<_> = lexicon.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(tokens, &["cat", "dog"]);
    }
}
