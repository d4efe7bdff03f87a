//! Result-document metric keys. A `strum`-derived enum keeps the JSON and
//! plain-text renderers from hand-rolling the same key string in two places.

use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum MetricKey {
    #[strum(serialize = "ED116RPA")]
    Ed116Rpa,
    #[strum(serialize = "ED116UR")]
    Ed116Ur,
    #[strum(serialize = "ED116PD")]
    Ed116Pd,
    #[strum(serialize = "ED116PFD")]
    Ed116Pfd,
    #[strum(serialize = "ED117RPA")]
    Ed117Rpa,
    #[strum(serialize = "ED117UR")]
    Ed117Ur,
    #[strum(serialize = "ED117PD")]
    Ed117Pd,
    #[strum(serialize = "ED117PFD")]
    Ed117Pfd,
    #[strum(serialize = "ED117PID_Ident")]
    Ed117PidIdent,
    #[strum(serialize = "ED117PID_Mode3A")]
    Ed117PidMode3a,
    #[strum(serialize = "ED117PFID_Ident")]
    Ed117PfidIdent,
    #[strum(serialize = "ED117PFID_Mode3A")]
    Ed117PfidMode3a,
    #[strum(serialize = "ED117PLG")]
    Ed117Plg,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn round_trips_through_display_and_from_str() {
        for key in [MetricKey::Ed117PidIdent, MetricKey::Ed116Rpa] {
            let s = key.to_string();
            assert_eq!(MetricKey::from_str(&s).unwrap(), key);
        }
    }
}
