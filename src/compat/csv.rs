//! Writer for projected coordinates in CSV format.
//!
//! The output starts with the header `word,x,y`, followed by one row
//! per token. This is the format expected by typical scatterplot
//! front ends:
//!
//! ```
//! use ndarray::arr2;
//! use word2vec2d::compat::csv::write_csv;
//!
//! let tokens = vec!["Berlin".to_string(), "Potsdam".to_string()];
//! let coords = arr2(&[[0.5, 1.], [-2., 0.25]]);
//!
//! let mut output = Vec::new();
//! write_csv(&mut output, &tokens, coords.view()).unwrap();
//! assert_eq!(
//!     String::from_utf8(output).unwrap(),
//!     "word,x,y\nBerlin,0.5,1\nPotsdam,-2,0.25\n"
//! );
//! ```

use std::io::Write;

use itertools::Itertools;
use ndarray::{ArrayView2, Axis};

use crate::error::{Error, Result};
use crate::projection::OUTPUT_DIMS;

/// Write tokens with their two-dimensional coordinates.
///
/// Row *i* of `coords` contains the coordinates of `tokens[i]`.
/// Tokens that contain the delimiter or quotes are quoted.
pub fn write_csv<W>(write: &mut W, tokens: &[String], coords: ArrayView2<f32>) -> Result<()>
where
    W: Write,
{
    if tokens.len() != coords.nrows() {
        return Err(Error::RowMismatch {
            tokens: tokens.len(),
            rows: coords.nrows(),
        });
    }

    if coords.ncols() != OUTPUT_DIMS {
        return Err(Error::Config(format!(
            "coordinates should have {} columns, has {}",
            OUTPUT_DIMS,
            coords.ncols()
        )));
    }

    let mut writer = ::csv::Writer::from_writer(write);
    writer
        .write_record(&["word", "x", "y"])
        .map_err(|e| Error::write_error("Cannot write CSV header", e.into()))?;

    for (token, coord) in tokens.iter().zip_eq(coords.axis_iter(Axis(0))) {
        let x = coord[0].to_string();
        let y = coord[1].to_string();
        writer
            .write_record(&[token.as_str(), x.as_str(), y.as_str()])
            .map_err(|e| Error::write_error("Cannot write CSV row", e.into()))?;
    }

    writer
        .flush()
        .map_err(|e| Error::write_error("Cannot flush CSV output", e))
}
