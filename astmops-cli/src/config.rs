//! Translate CLI arguments into the core's process-wide `Config`.

use std::collections::HashSet;

use astmops_core::config::{Config, ProcessingMode};
use chrono::NaiveDate;

use crate::error::{CliError, Result};

pub struct ConfigArgs {
    pub date: String,
    pub dgps: bool,
    pub smr_sics: Vec<u8>,
    pub mlat_sics: Vec<u8>,
    pub adsb_sics: Vec<u8>,
    pub dgps_target_address: Option<String>,
    pub rpa_pic_percentile: f64,
    pub silence_period_seconds: f64,
}

pub fn build_config(args: &ConfigArgs) -> Result<Config> {
    let date = NaiveDate::parse_from_str(&args.date, "%Y-%m-%d")
        .map_err(|e| CliError::InvalidDate(args.date.clone(), e))?;

    let processing_mode = if args.dgps { ProcessingMode::Dgps } else { ProcessingMode::TestOfOpportunity };

    let mut config = Config::new(date, processing_mode);
    config.smr_sics = args.smr_sics.iter().copied().collect::<HashSet<u8>>();
    config.mlat_sics = args.mlat_sics.iter().copied().collect::<HashSet<u8>>();
    config.adsb_sics = args.adsb_sics.iter().copied().collect::<HashSet<u8>>();
    config.rpa_pic_percentile = args.rpa_pic_percentile;
    config.silence_period_seconds = args.silence_period_seconds;
    config.dgps_target_address = args
        .dgps_target_address
        .as_deref()
        .and_then(|s| u32::from_str_radix(s, 16).ok());

    config.validate()?;
    Ok(config)
}
