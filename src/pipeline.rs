//! Reading, projecting, and writing embeddings in one pass.

use std::fs;
use std::io::Write;
use std::ops::ControlFlow;
use std::path::Path;

use ndarray::Array2;
use tracing::info;

use crate::compat::csv::write_csv;
use crate::compat::word2vec::{decode, decode_strict, read_header};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::lexicon::Lexicon;
use crate::projection::Project;

/// Read a word2vec binary file.
///
/// The file is read into memory completely before it is decoded.
/// See [`decode`] for the meaning of `word_limit`. If `lossy` is
/// `false`, tokens with invalid UTF-8 are an error.
pub fn load_lexicon(path: impl AsRef<Path>, word_limit: usize, lossy: bool) -> Result<Lexicon> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| {
        Error::read_error(format!("Cannot read embeddings file {}", path.display()), e)
    })?;
    info!("{}: {} bytes", path.display(), data.len());

    let header = read_header(&data)?;
    info!("{} words; {} dimensions", header.n_words, header.dims);
    if word_limit != 0 && word_limit < header.n_words {
        info!("limiting to {} words", word_limit);
    }

    let lexicon = if lossy {
        decode(&data, word_limit)?
    } else {
        decode_strict(&data, word_limit)?
    };
    info!("kept {} words", lexicon.len());

    Ok(lexicon)
}

/// Project a lexicon to two dimensions, logging the progress.
pub fn project_lexicon<P>(projection: &P, lexicon: &Lexicon, interval: usize) -> Result<Array2<f32>>
where
    P: Project,
{
    projection.project(lexicon.matrix(), |progress| {
        if interval != 0 && progress.iteration % interval == 0 {
            info!(
                "[{}]: divergence = {}",
                progress.iteration, progress.divergence
            );
        }
        ControlFlow::Continue(())
    })
}

/// Read the input, project it, and write the coordinates as CSV.
///
/// `open_output` is only called after the input was read and
/// projected, so an existing output is left untouched when reading
/// or projecting fails. Returns the number of rows written.
pub fn run<F, W>(config: &Config, open_output: F) -> Result<usize>
where
    F: FnOnce() -> Result<W>,
    W: Write,
{
    config.validate()?;

    let input = config
        .input
        .as_ref()
        .ok_or_else(|| Error::Config("no input file given".to_string()))?;

    let lexicon = load_lexicon(input, config.word_limit, config.lossy)?;

    let tsne = config.tsne.to_tsne()?;
    info!(
        perplexity = tsne.perplexity(),
        learning_rate = tsne.learning_rate(),
        iterations = tsne.iterations(),
        "projecting with t-SNE"
    );
    let coords = project_lexicon(&tsne, &lexicon, config.tsne.progress_interval)?;

    let mut write = open_output()?;
    write_csv(&mut write, lexicon.tokens(), coords.view())?;

    Ok(lexicon.len())
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use tempfile::TempDir;

    use super::{load_lexicon, run};
    use crate::compat::word2vec::SENTINEL;
    use crate::config::{Config, TsneConfig};
    use crate::error::{Error, Result};
    use crate::tests::Word2VecBuilder;

    fn write_file(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        File::create(&path).unwrap().write_all(data).unwrap();
        path
    }

    fn write_vectors(dir: &TempDir) -> PathBuf {
        let data = Word2VecBuilder::new(5, 3)
            .record(SENTINEL, &[0., 0., 0.])
            .record("Berlin", &[1., 0., 0.])
            .record("Potsdam", &[0.9, 0.1, 0.])
            .record("Paris", &[0., 1., 1.])
            .record("Lyon", &[0., 0.9, 1.])
            .build();

        write_file(dir, "vectors.bin", &data)
    }

    fn test_config(input: PathBuf) -> Config {
        Config {
            input: Some(input),
            word_limit: 0,
            tsne: TsneConfig {
                perplexity: 2.,
                iterations: 20,
                seed: Some(1),
                ..TsneConfig::default()
            },
            ..Config::default()
        }
    }

    fn create(path: &Path) -> Result<File> {
        File::create(path).map_err(|e| Error::write_error("Cannot create output", e))
    }

    #[test]
    fn loads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_vectors(&dir);

        let lexicon = load_lexicon(&path, 3, false).unwrap();
        assert_eq!(lexicon.tokens(), &["Berlin", "Potsdam"]);
    }

    #[test]
    fn loads_invalid_utf8_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let data = Word2VecBuilder::new(3, 1)
            .record(SENTINEL, &[0.])
            .record("cat", &[1.])
            .raw_record(b"caf\xe9", &[2.])
            .build();
        let path = write_file(&dir, "latin1.bin", &data);

        let lexicon = load_lexicon(&path, 0, true).unwrap();
        assert_eq!(lexicon.tokens(), &["cat", "caf\u{FFFD}"]);

        assert!(matches!(
            load_lexicon(&path, 0, false),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_lexicon(dir.path().join("missing.bin"), 0, false),
            Err(Error::Read { .. })
        ));
    }

    #[test]
    fn writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(write_vectors(&dir));

        let mut output = Vec::new();
        let write = &mut output;
        assert_eq!(run(&config, move || Ok(write)).unwrap(), 4);

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "word,x,y");
        assert!(lines[1].starts_with("Berlin,"));
        assert!(lines[4].starts_with("Lyon,"));
    }

    #[test]
    fn writes_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(write_vectors(&dir));
        let output = dir.path().join("data.csv");

        assert_eq!(run(&config, || create(&output)).unwrap(), 4);
        assert!(fs::read_to_string(&output)
            .unwrap()
            .starts_with("word,x,y\nBerlin,"));
    }

    #[test]
    fn failed_input_keeps_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = write_file(&dir, "data.csv", b"word,x,y\nold,1,2\n");

        let missing = test_config(dir.path().join("missing.bin"));
        assert!(matches!(
            run(&missing, || create(&output)),
            Err(Error::Read { .. })
        ));

        let malformed = test_config(write_file(&dir, "bad.bin", b"3 abc\n"));
        assert!(matches!(
            run(&malformed, || create(&output)),
            Err(Error::Format(_))
        ));

        let truncated = test_config(write_file(&dir, "short.bin", b"3"));
        assert!(run(&truncated, || create(&output))
            .unwrap_err()
            .is_truncated());

        assert_eq!(fs::read(&output).unwrap(), b"word,x,y\nold,1,2\n");
    }

    #[test]
    fn requires_input() {
        let mut opened = false;
        assert!(matches!(
            run(&Config::default(), || {
                opened = true;
                Ok(Vec::new())
            }),
            Err(Error::Config(_))
        ));
        assert!(!opened);
    }
}
