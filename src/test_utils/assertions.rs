use crate::errors::PixelleError;
use crate::launcher::PreflightReport;
use crate::layout::Severity;

pub fn assert_validation_error<T: std::fmt::Debug>(result: Result<T, PixelleError>, needle: &str) {
    match result {
        Err(PixelleError::ValidationError(msg)) => assert!(
            msg.contains(needle),
            "validation message {msg:?} should mention {needle:?}"
        ),
        other => panic!("Expected ValidationError, got {other:?}"),
    }
}

pub fn assert_has_check(report: &PreflightReport, name: &str, severity: Option<Severity>) {
    let item = report
        .items
        .iter()
        .find(|item| item.name == name)
        .unwrap_or_else(|| panic!("preflight report should contain {name}"));
    assert_eq!(item.severity, severity, "unexpected severity for {name}");
}
