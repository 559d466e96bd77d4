//! Diagnostic side channel.
//!
//! Sinks observe a finished detection. They cannot influence the verdict, and a
//! failing sink is logged rather than propagated.

use super::profile::IntensityProfile;
use super::verdict::Verdict;

/// Boxed error returned by a [`DiagnosticSink`]
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Consumer of the profile and verdict behind each decision.
pub trait DiagnosticSink {
    fn record(&mut self, profile: &IntensityProfile, verdict: &Verdict) -> Result<(), SinkError>;
}

impl<F> DiagnosticSink for F
where
    F: FnMut(&IntensityProfile, &Verdict) -> Result<(), SinkError>,
{
    fn record(&mut self, profile: &IntensityProfile, verdict: &Verdict) -> Result<(), SinkError> {
        self(profile, verdict)
    }
}
