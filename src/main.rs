use clap::{Parser, Subcommand};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rlnc_matrix::{logger, Decoder, Encoder, EngineConfig, Matrix};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "GF(2^8) matrix engine diagnostics", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// TOML file with a [matrix] section
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Prints the identity matrix of the given order
    Identity {
        #[arg(short, long, default_value_t = 4)]
        order: usize,
    },
    /// Encodes random packets, decodes them again and checks the result
    Roundtrip {
        /// Number of packets in the generation
        #[arg(short = 'k', long, default_value_t = 4)]
        packets: usize,

        /// Bytes per packet
        #[arg(short, long, default_value_t = 16)]
        len: usize,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> ExitCode {
    logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match EngineConfig::from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };

    let result = match cli.command {
        Commands::Identity { order } => Matrix::identity(order).map(|m| {
            print!("{}", m.render(config.display_columns));
            true
        }),
        Commands::Roundtrip { packets, len, seed } => run_roundtrip(&config, packets, len, seed),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_roundtrip(
    config: &EngineConfig,
    packets: usize,
    len: usize,
    seed: Option<u64>,
) -> rlnc_matrix::Result<bool> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let encoder = Encoder::new(config)?;
    let decoder = Decoder::new(config)?;

    let data = Matrix::random(packets, len, &mut rng)?;
    println!("source:\n{}", data.render(config.display_columns));

    let coded = encoder.encode(&data, &mut rng)?;
    println!("coefficients:\n{}", coded.coefficients.render(config.display_columns));
    println!("coded:\n{}", coded.payload.render(config.display_columns));

    let recovered = decoder.decode(coded.coefficients, coded.payload)?;
    if !recovered.equals(&data) {
        error!("decoded packets differ from the source");
        return Ok(false);
    }
    info!("recovered {} packets of {} bytes", packets, len);
    recovered.release();
    data.release();
    Ok(true)
}
