//! Readers/writers for other formats.

pub mod csv;

pub mod word2vec;
