use thiserror::Error;

/// Fatal errors: configuration problems and geometry problems, both
/// detected before the pipeline starts running.
#[derive(Debug, Error)]
pub enum CoreErrorKind {
    #[error("sic {sic} appears in more than one of smr_sics/mlat_sics/adsb_sics")]
    OverlappingSicSets { sic: u8 },

    #[error("invalid session date: {0}")]
    InvalidDate(String),

    #[error("rpa_pic_percentile must be in 0..=100, got {0}")]
    InvalidPercentile(f64),

    #[error("aerodrome has no polygons in any area collection")]
    EmptyAerodrome,

    #[error("polygon for area {area:?}/{name} is not closed (first vertex != last)")]
    UnclosedPolygon { area: String, name: String },

    #[error("polygon for area {area:?}/{name} is empty")]
    EmptyPolygon { area: String, name: String },

    #[error("dgps processing mode requires a configured dgps_target_address")]
    MissingDgpsTargetAddress,
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct CoreError(#[from] pub CoreErrorKind);

pub type Result<T> = std::result::Result<T, CoreError>;
