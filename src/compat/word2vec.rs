//! Reader for the word2vec binary format.
//!
//! A word2vec binary file starts with an ASCII header containing the
//! number of words and the embedding dimensionality, separated by a
//! space and terminated by a newline. Each following record consists
//! of the word, a space, the embedding as little-endian `f32` values,
//! and a newline.
//!
//! The `</s>` record that word2vec writes for line breaks in the
//! training corpus is skipped. Reading stops silently when the input
//! ends inside a record, so that a prefix of a truncated file can
//! still be used:
//!
//! ```
//! use word2vec2d::compat::word2vec::decode;
//!
//! let mut data = b"2 1\n</s> ".to_vec();
//! data.extend_from_slice(&0f32.to_le_bytes());
//! data.extend_from_slice(b"\nBerlin ");
//! data.extend_from_slice(&1f32.to_le_bytes());
//! data.push(b'\n');
//!
//! let lexicon = decode(&data, 0).unwrap();
//! assert_eq!(lexicon.tokens(), &["Berlin"]);
//! ```

use std::io::Read;
use std::mem;
use std::str;

use tracing::debug;

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::lexicon::Lexicon;

/// Token used by word2vec to represent line breaks.
pub const SENTINEL: &str = "</s>";

/// Shape declared in the header of a word2vec binary file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Header {
    /// Number of records, including the `</s>` record.
    pub n_words: usize,

    /// Embedding dimensionality.
    pub dims: usize,
}

impl Header {
    fn read(cursor: &mut ByteCursor) -> Result<Self> {
        let n_words = read_number(cursor, "word count")?;
        let dims = read_number(cursor, "embedding dimensionality")?;

        // ndarray limits the number of elements of an axis to isize::MAX.
        if dims > isize::MAX as usize / mem::size_of::<f32>() {
            return Err(Error::Format(format!(
                "embedding dimensionality {} is too large",
                dims
            )));
        }

        Ok(Header { n_words, dims })
    }
}

/// Read the header of word2vec binary embeddings.
pub fn read_header(data: &[u8]) -> Result<Header> {
    Header::read(&mut ByteCursor::new(data))
}

/// Decode word2vec binary embeddings from a buffer.
///
/// At most `word_limit` records are read, where `0` means that all
/// records declared in the header are read. Since the declared word
/// count includes the `</s>` record, at most `word_count - 1` tokens
/// are returned.
///
/// Tokens are raw bytes, invalid UTF-8 sequences are replaced by the
/// replacement character. Fails if the header is truncated or
/// malformed, or if a record is not terminated by a newline.
pub fn decode(data: &[u8], word_limit: usize) -> Result<Lexicon> {
    decode_impl(data, word_limit, false)
}

/// Decode word2vec binary embeddings from a buffer.
///
/// In contrast to `decode`, this function fails if a token contains
/// invalid UTF-8.
pub fn decode_strict(data: &[u8], word_limit: usize) -> Result<Lexicon> {
    decode_impl(data, word_limit, true)
}

fn decode_impl(data: &[u8], word_limit: usize, strict: bool) -> Result<Lexicon> {
    let mut cursor = ByteCursor::new(data);

    let Header { n_words, dims } = Header::read(&mut cursor)?;

    let n_records = if word_limit == 0 {
        n_words
    } else {
        n_words.min(word_limit)
    };
    debug!(n_words, dims, n_records, "read word2vec header");

    // The declared count includes one entry that is never part of the output.
    let capacity = n_records.saturating_sub(1);

    // Pre-allocation is bounded by what the buffer can hold.
    let record_len = dims.saturating_mul(4).saturating_add(2);
    let rows_hint = capacity.min(data.len() / record_len);
    let mut tokens = Vec::with_capacity(rows_hint);
    let mut matrix = Vec::with_capacity(rows_hint.saturating_mul(dims));

    for _ in 0..n_records {
        let word = match cursor.read_token() {
            Ok(word) => word,
            Err(err) if err.is_truncated() => {
                debug!(offset = cursor.position(), "input ended before word");
                break;
            }
            Err(err) => return Err(err),
        };

        let is_sentinel = word == SENTINEL.as_bytes();
        if !is_sentinel && tokens.len() == capacity {
            break;
        }

        let start = matrix.len();
        if !read_embedding(&mut cursor, dims, &mut matrix)? {
            debug!(offset = cursor.position(), "input ended inside embedding");
            matrix.truncate(start);
            break;
        }

        if is_sentinel {
            matrix.truncate(start);
        } else {
            tokens.push(token_to_string(word, strict)?);
        }

        match cursor.consume_newline() {
            Ok(()) => (),
            Err(err) if err.is_truncated() => {
                debug!(offset = cursor.position(), "input ended before newline");
                break;
            }
            Err(err) => return Err(err),
        }
    }

    Lexicon::from_flat(tokens, dims, matrix)
}

/// Read `dims` components into `matrix`.
///
/// Returns `false` when the input ended inside the embedding.
fn read_embedding(cursor: &mut ByteCursor, dims: usize, matrix: &mut Vec<f32>) -> Result<bool> {
    for _ in 0..dims {
        match cursor.read_f32() {
            Ok(v) => matrix.push(v),
            Err(err) if err.is_truncated() => return Ok(false),
            Err(err) => return Err(err),
        }
    }

    Ok(true)
}

fn read_number(cursor: &mut ByteCursor, what: &str) -> Result<usize> {
    let field = cursor.read_token()?;
    let field_str = str::from_utf8(field)
        .map_err(|e| Error::Format(format!("Cannot parse {}: {}", what, e)))?;
    field_str
        .parse()
        .map_err(|e| Error::Format(format!("Cannot parse {} '{}': {}", what, field_str, e)))
}

fn token_to_string(token: &[u8], strict: bool) -> Result<String> {
    if strict {
        String::from_utf8(token.to_vec())
            .map_err(|e| Error::Format(format!("Token contains invalid UTF-8: {}", e)))
    } else {
        Ok(String::from_utf8_lossy(token).into_owned())
    }
}

/// Method to construct a `Lexicon` from a word2vec binary file.
///
/// The reader is consumed completely before decoding.
pub trait ReadWord2Vec<R>
where
    Self: Sized,
    R: Read,
{
    /// Read the embeddings from the given reader.
    ///
    /// Invalid UTF-8 in tokens is replaced by the replacement character.
    fn read_word2vec_binary(reader: &mut R, word_limit: usize) -> Result<Self>;

    /// Read the embeddings from the given reader.
    ///
    /// In contrast to `read_word2vec_binary`, this constructor fails
    /// if a token contains invalid UTF-8.
    fn read_word2vec_binary_strict(reader: &mut R, word_limit: usize) -> Result<Self>;
}

impl<R> ReadWord2Vec<R> for Lexicon
where
    R: Read,
{
    fn read_word2vec_binary(reader: &mut R, word_limit: usize) -> Result<Self> {
        decode(&read_all(reader)?, word_limit)
    }

    fn read_word2vec_binary_strict(reader: &mut R, word_limit: usize) -> Result<Self> {
        decode_strict(&read_all(reader)?, word_limit)
    }
}

fn read_all(reader: &mut impl Read) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(|e| Error::read_error("Cannot read word2vec data", e))?;
    Ok(data)
}
