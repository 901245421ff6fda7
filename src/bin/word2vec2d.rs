use std::path::PathBuf;

use clap::{App, AppSettings, Arg, ArgMatches};
use stdinout::{OrExit, Output};
use tracing_subscriber::EnvFilter;
use word2vec2d::config::Config;
use word2vec2d::error::Error;
use word2vec2d::pipeline::run;

static DEFAULT_CLAP_SETTINGS: &[AppSettings] = &[
    AppSettings::DontCollapseArgsInUsage,
    AppSettings::UnifiedHelpMessage,
];

// Option constants
static CONFIG: &str = "config";
static ITERATIONS: &str = "iterations";
static LEARNING_RATE: &str = "learning_rate";
static LIMIT: &str = "limit";
static PERPLEXITY: &str = "perplexity";
static SEED: &str = "seed";
static STRICT: &str = "strict";

// Argument constants
static INPUT: &str = "INPUT";
static OUTPUT: &str = "OUTPUT";

fn parse_args() -> ArgMatches<'static> {
    App::new("word2vec2d")
        .settings(DEFAULT_CLAP_SETTINGS)
        .about("Project word2vec binary embeddings to two dimensions as CSV")
        .arg(
            Arg::with_name(CONFIG)
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("TOML configuration file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(LIMIT)
                .short("l")
                .long("limit")
                .value_name("N")
                .help("Maximum number of records to read, 0 for all (default: 1250)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(STRICT)
                .long("strict")
                .help("Fail on words with invalid UTF-8 instead of replacing it"),
        )
        .arg(
            Arg::with_name(PERPLEXITY)
                .short("p")
                .long("perplexity")
                .value_name("P")
                .help("t-SNE perplexity (default: 5)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(LEARNING_RATE)
                .short("r")
                .long("learning-rate")
                .value_name("R")
                .help("t-SNE learning rate (default: 300)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .short("i")
                .long("iterations")
                .value_name("N")
                .help("t-SNE iterations (default: 1500)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(SEED)
                .long("seed")
                .value_name("SEED")
                .help("Seed for the initial layout (default: 0)")
                .takes_value(true),
        )
        .arg(Arg::with_name(INPUT).help("word2vec binary file").index(1))
        .arg(Arg::with_name(OUTPUT).help("CSV output file").index(2))
        .get_matches()
}

fn config_from_matches(matches: &ArgMatches) -> Config {
    let mut config = matches
        .value_of(CONFIG)
        .map(|path| Config::from_file(path).or_exit("Cannot read configuration", 1))
        .unwrap_or_default();

    if let Some(input) = matches.value_of(INPUT) {
        config.input = Some(PathBuf::from(input));
    }
    if let Some(output) = matches.value_of(OUTPUT) {
        config.output = Some(PathBuf::from(output));
    }
    if let Some(limit) = matches.value_of(LIMIT) {
        config.word_limit = limit.parse().or_exit("Cannot parse word limit", 1);
    }
    if matches.is_present(STRICT) {
        config.lossy = false;
    }
    if let Some(perplexity) = matches.value_of(PERPLEXITY) {
        config.tsne.perplexity = perplexity.parse().or_exit("Cannot parse perplexity", 1);
    }
    if let Some(learning_rate) = matches.value_of(LEARNING_RATE) {
        config.tsne.learning_rate = learning_rate
            .parse()
            .or_exit("Cannot parse learning rate", 1);
    }
    if let Some(iterations) = matches.value_of(ITERATIONS) {
        config.tsne.iterations = iterations
            .parse()
            .or_exit("Cannot parse number of iterations", 1);
    }
    if let Some(seed) = matches.value_of(SEED) {
        config.tsne.seed = Some(seed.parse().or_exit("Cannot parse seed", 1));
    }

    config
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let matches = parse_args();
    let config = config_from_matches(&matches);
    config.validate().or_exit("Invalid configuration", 1);

    let output = Output::from(
        config
            .output
            .as_ref()
            .map(|path| path.to_string_lossy().into_owned()),
    );

    run(&config, || {
        output
            .write()
            .map_err(|e| Error::write_error("Cannot open output for writing", e))
    })
    .or_exit("Cannot project embeddings", 1);
}
