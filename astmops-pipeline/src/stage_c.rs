//! Stage C — Aerodrome Locator: tag each Target Report with its NamedArea.

use astmops_core::aerodrome::Aerodrome;
use astmops_core::target_report::TargetReport;

pub struct AerodromeLocator<'a> {
    aerodrome: &'a Aerodrome,
}

impl<'a> AerodromeLocator<'a> {
    pub fn new(aerodrome: &'a Aerodrome) -> Self {
        Self { aerodrome }
    }

    pub fn tag(&self, report: &mut TargetReport) {
        report.narea = self.aerodrome.locate_point(report.position, report.on_ground);
    }

    pub fn tag_all(&self, reports: &mut [TargetReport]) {
        for report in reports {
            self.tag(report);
        }
    }
}
