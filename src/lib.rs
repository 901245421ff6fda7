//! A library for projecting word embeddings to two dimensions.
//!
//! word2vec2d reads embeddings in the word2vec binary format, projects
//! them to two dimensions with t-SNE, and writes the resulting
//! coordinates as CSV, so that the embedding space can be inspected
//! with a scatterplot.

pub mod compat;

pub mod config;

pub mod cursor;

pub mod error;

pub mod lexicon;

pub mod pipeline;

pub mod prelude;

pub mod projection;
