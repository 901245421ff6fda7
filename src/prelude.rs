//! Prelude exports the most commonly-used types and traits.

pub use crate::compat::csv::write_csv;

pub use crate::compat::word2vec::{
    decode, decode_strict, read_header, Header, ReadWord2Vec, SENTINEL,
};

pub use crate::config::{Config, TsneConfig};

pub use crate::error::{Error, Result};

pub use crate::lexicon::Lexicon;

pub use crate::projection::{Progress, Project, Tsne};
