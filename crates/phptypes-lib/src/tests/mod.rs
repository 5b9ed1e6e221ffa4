//! End-to-end suites: text in, text or verdicts out.
