//! Diagnostic channel for non-fatal access-check failures.

/// Receives fixed human-readable messages from the access checks.
///
/// Reporting never alters control flow; callers observe only the
/// boolean results of the checks themselves.
pub trait DiagnosticSink {
    fn report(&self, message: &str);
}

/// Default sink - routes diagnostics to the `tracing` error channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, message: &str) {
        tracing::error!(target: "user_hive", "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder(RefCell<Vec<String>>);

    impl DiagnosticSink for Recorder {
        fn report(&self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }
    }

    #[test]
    fn sink_receives_messages_in_order() {
        let sink = Recorder(RefCell::new(Vec::new()));
        sink.report("first");
        sink.report("second");
        assert_eq!(*sink.0.borrow(), vec!["first", "second"]);
    }
}
