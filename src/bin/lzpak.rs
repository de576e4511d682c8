//! lzpak CLI - LZ77 + Huffman file compression tool.
//!
//! Compresses a file into the bespoke `.lzp` artifact format, or restores
//! the original bytes from one. Optionally dumps the input's symbol
//! probability table as CSV for histogram plotting.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

/// A from-scratch LZ77 + Huffman file compressor.
#[derive(Parser, Debug)]
#[command(name = "lzpak")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file path (defaults to INPUT.lzp, or INPUT.out when decompressing)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Decompress instead of compress
    #[arg(short, long)]
    decompress: bool,

    /// Write the input's symbol probability table as CSV (compress only)
    #[arg(long, value_name = "PATH")]
    stats_csv: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.decompress && args.stats_csv.is_some() {
        return Err("--stats-csv is only available when compressing".into());
    }

    let input = fs::read(&args.input)?;
    let output_path = args.output.clone().unwrap_or_else(|| default_output(&args));

    let start = Instant::now();
    let output = if args.decompress {
        lzpak::decompress(&input)?
    } else {
        let (artifact, stats) = lzpak::compress_with_stats(&input)?;

        if let Some(csv_path) = &args.stats_csv {
            let mut csv = Vec::new();
            stats.write_probability_csv(&mut csv)?;
            fs::write(csv_path, csv)?;
            if args.verbose {
                eprintln!("Symbol table: {:?}", csv_path);
            }
        }

        if args.verbose {
            eprintln!(
                "  Triples: {} ({} matches, {} literals)",
                stats.triple_count, stats.match_count, stats.literal_count
            );
            eprintln!("  Entropy: {:.3} bits/symbol", stats.entropy());
            eprintln!("  Rate: {:.3} bits/symbol", stats.average_rate());
            eprintln!("  Ratio: {:.1}%", stats.ratio() * 100.0);
        }
        artifact
    };
    let elapsed = start.elapsed();

    // Written only after the whole transform succeeded, so a failure never
    // leaves a partial artifact behind.
    fs::write(&output_path, &output)?;

    if args.verbose {
        let verb = if args.decompress {
            "Decompressed"
        } else {
            "Compressed"
        };
        eprintln!("{} {:?} -> {:?}", verb, args.input, output_path);
        eprintln!("  {} -> {} bytes", input.len(), output.len());
        eprintln!("  Time: {:.2?}", elapsed);
    }

    Ok(())
}

/// Default output path: add `.lzp` when compressing, swap it for `.out`
/// when decompressing.
fn default_output(args: &Args) -> PathBuf {
    let mut path = args.input.clone();
    if args.decompress {
        if path.extension().is_some_and(|ext| ext == "lzp") {
            path.set_extension("out");
        } else {
            let mut name = path.as_os_str().to_owned();
            name.push(".out");
            path = PathBuf::from(name);
        }
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".lzp");
        path = PathBuf::from(name);
    }
    path
}
