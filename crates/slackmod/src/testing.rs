//! Test doubles shared by the unit tests of this crate.

use parking_lot::Mutex;
use slackmod_core::{BoxedHandler, BoxedMiddleware, Matcher, RegistrationError, SlackClient};

/// A client that records the registration calls it receives.
#[derive(Default)]
pub(crate) struct RecordingClient {
    calls: Mutex<Vec<(&'static str, Option<Matcher>)>>,
    reject_duplicates: bool,
}

impl RecordingClient {
    /// A client that refuses a registration identical to an earlier one.
    pub(crate) fn rejecting_duplicates() -> Self {
        Self {
            reject_duplicates: true,
            ..Default::default()
        }
    }

    /// Accepted calls, in order.
    pub(crate) fn calls(&self) -> Vec<(&'static str, Option<Matcher>)> {
        self.calls.lock().clone()
    }

    fn record(
        &self,
        call: &'static str,
        matcher: Option<Matcher>,
    ) -> Result<(), RegistrationError> {
        let mut calls = self.calls.lock();
        let entry = (call, matcher);
        if self.reject_duplicates && calls.contains(&entry) {
            return Err(RegistrationError::rejected(format!(
                "duplicate {call} registration for {:?}",
                entry.1
            )));
        }
        calls.push(entry);
        Ok(())
    }
}

impl SlackClient for RecordingClient {
    fn message(&self, matcher: Option<Matcher>, _: BoxedHandler) -> Result<(), RegistrationError> {
        self.record("message", matcher)
    }

    fn action(&self, matcher: Option<Matcher>, _: BoxedHandler) -> Result<(), RegistrationError> {
        self.record("action", matcher)
    }

    fn command(&self, matcher: Option<Matcher>, _: BoxedHandler) -> Result<(), RegistrationError> {
        self.record("command", matcher)
    }

    fn event(&self, matcher: Option<Matcher>, _: BoxedHandler) -> Result<(), RegistrationError> {
        self.record("event", matcher)
    }

    fn shortcut(&self, matcher: Option<Matcher>, _: BoxedHandler) -> Result<(), RegistrationError> {
        self.record("shortcut", matcher)
    }

    fn view(&self, matcher: Option<Matcher>, _: BoxedHandler) -> Result<(), RegistrationError> {
        self.record("view", matcher)
    }

    fn use_middleware(&self, _: BoxedMiddleware) -> Result<(), RegistrationError> {
        self.record("use_middleware", None)
    }
}
