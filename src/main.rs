//! km_diff: difference between two sorted k-mer matrices
//!
//! Usage: km_diff [OPTIONS] <MATRIX_1> <MATRIX_2>

use clap::Parser;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use km_diff::commands::DiffCommand;
use km_diff::kmer::{KeyOrder, KmerSize, DEFAULT_KMER_SIZE};
use km_diff::matrix::MatrixError;

#[derive(Parser)]
#[command(name = "km_diff")]
#[command(version)]
#[command(about = "Difference between two sorted k-mer matrices")]
#[command(long_about = "Difference between two sorted k-mer matrices.\n\n\
    Removes from <MATRIX_1> the k-mers in <MATRIX_2>. Both matrices must be \
    sorted under the same order.")]
struct Cli {
    /// First matrix (use - for stdin)
    matrix_1: PathBuf,

    /// Matrix whose k-mers are removed from the first one
    matrix_2: PathBuf,

    /// Size of k-mers of input matrices
    #[arg(short = 'k', long, default_value_t = DEFAULT_KMER_SIZE as i64, allow_negative_numbers = true)]
    kmer_size: i64,

    /// Write output matrix to FILE [default: stdout]
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Use kmtricks order of nucleotides: A<C<T<G
    #[arg(short = 'z', long)]
    kmtricks_order: bool,

    /// Fail on malformed rows instead of ignoring the rest of that matrix
    #[arg(long)]
    strict: bool,

    /// Fail if a matrix is not sorted under the selected order
    #[arg(long)]
    check_sorted: bool,

    /// Print run statistics to stderr
    #[arg(long)]
    stats: bool,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), MatrixError> {
    // Reject a bad k before touching any file
    let kmer_size = KmerSize::new(cli.kmer_size)?;

    // Must be set before any matrix is read
    km_diff::config::set_strict_keys(cli.strict);

    let mut cmd = DiffCommand::new(kmer_size);
    cmd.order = if cli.kmtricks_order {
        KeyOrder::NucleotideRank
    } else {
        KeyOrder::Lexicographic
    };
    cmd.check_sorted = cli.check_sorted;

    if cli.matrix_1 == cli.matrix_2 && cli.matrix_1.as_os_str() == "-" {
        return Err(MatrixError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "only one matrix can be read from stdin",
        )));
    }

    let (left, right) = cmd.open(&cli.matrix_1, &cli.matrix_2)?;

    let mut output: Box<dyn Write> = match cli.output {
        Some(path) => {
            let file = File::create(&path).map_err(|source| MatrixError::Output {
                path: path.clone(),
                source,
            })?;
            Box::new(file)
        }
        None => Box::new(io::stdout().lock()),
    };

    let result = cmd.run_readers(left, right, &mut output)?;

    if cli.stats {
        eprintln!("Diff stats: {}", result);
    }

    Ok(())
}
