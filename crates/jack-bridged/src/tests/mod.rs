//! Test suites for the JACK bridge daemon.

mod api_behaviour;
pub(crate) mod support;
