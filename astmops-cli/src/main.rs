mod config;
mod error;
mod input;
mod report;

use std::path::PathBuf;

use astmops_pipeline::Evaluator;
use clap::Parser;

#[derive(Parser)]
#[command(name = "astmops")]
#[command(about = "Evaluate A-SMGCS surveillance performance (ED-116/ED-117) from decoded ASTERIX traffic", long_about = None)]
struct Cli {
    /// Decoded-record JSON Lines file (one {"category", "items"} object per line)
    #[arg(value_name = "RECORDS")]
    records: PathBuf,

    /// Aerodrome geometry file (reference point and per-area-kind named polygon rings)
    #[arg(short, long, value_name = "FILE")]
    aerodrome: PathBuf,

    /// Excluded mode-S addresses file (line-oriented hex, `#` comments)
    #[arg(short, long, value_name = "FILE")]
    excluded: Option<PathBuf>,

    /// Session date (YYYY-MM-DD) applied to every time-of-day field
    #[arg(long, value_name = "DATE")]
    date: String,

    /// DGPS processing mode (a single DGPS-equipped vehicle is the reference)
    #[arg(long)]
    dgps: bool,

    /// SICs classified as SMR
    #[arg(long = "smr-sic", value_name = "SIC", value_delimiter = ',')]
    smr_sics: Vec<u8>,

    /// SICs classified as MLAT
    #[arg(long = "mlat-sic", value_name = "SIC", value_delimiter = ',')]
    mlat_sics: Vec<u8>,

    /// SICs classified as ADS-B
    #[arg(long = "adsb-sic", value_name = "SIC", value_delimiter = ',')]
    adsb_sics: Vec<u8>,

    /// DGPS target mode-S address (hex), required in --dgps mode
    #[arg(long, value_name = "HEX")]
    dgps_target_address: Option<String>,

    /// DGPS reference file (timestamp,lat,lon,alt[,speed,heading] per line), required in --dgps mode
    #[arg(long, value_name = "FILE")]
    dgps_reference: Option<PathBuf>,

    /// Percentile of reference PIC values used as the RPA quality baseline
    #[arg(long, default_value = "95.0")]
    rpa_pic_percentile: f64,

    /// Traffic-period pruning threshold, in seconds
    #[arg(long, default_value = "60.0")]
    silence_period_seconds: f64,

    /// Emit the JSON result document instead of plain-text tables
    #[arg(long)]
    json: bool,

    /// Write the result document to a file instead of standard output
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Show verbose (debug-level) logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> error::Result<()> {
    let config = config::build_config(&config::ConfigArgs {
        date: cli.date.clone(),
        dgps: cli.dgps,
        smr_sics: cli.smr_sics.clone(),
        mlat_sics: cli.mlat_sics.clone(),
        adsb_sics: cli.adsb_sics.clone(),
        dgps_target_address: cli.dgps_target_address.clone(),
        rpa_pic_percentile: cli.rpa_pic_percentile,
        silence_period_seconds: cli.silence_period_seconds,
    })?;

    let (aerodrome, origin) = input::read_aerodrome(&cli.aerodrome)?;
    let excluded_addresses = match &cli.excluded {
        Some(path) => input::read_excluded_addresses(path)?,
        None => Default::default(),
    };
    let records = input::read_records(&cli.records)?;
    log::info!("loaded {} decoded records", records.len());

    let mut evaluator = Evaluator::new(&config, &aerodrome, origin).with_excluded_addresses(excluded_addresses);
    if config.processing_mode == astmops_core::config::ProcessingMode::Dgps {
        let reference_path = cli.dgps_reference.as_ref().ok_or(error::CliError::MissingDgpsReferenceFile)?;
        let target_address = config.dgps_target_address.expect("validated by build_config");
        let dgps_track = input::read_dgps_track(reference_path, target_address, origin)?;
        log::info!("loaded {} DGPS reference reports", dgps_track.len());
        evaluator = evaluator.with_dgps_track(dgps_track);
    }

    let result = evaluator.evaluate(records);

    let rendered = if cli.json {
        serde_json::to_string_pretty(&report::render_json(&result)).expect("result document is always serializable")
    } else {
        report::render_text(&result)
    };

    match &cli.output {
        Some(path) => std::fs::write(path, rendered).map_err(|source| error::CliError::Io {
            path: path.clone(),
            source,
        })?,
        None => println!("{rendered}"),
    }

    Ok(())
}
