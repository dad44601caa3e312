use super::*;

#[test]
fn report_success_reflects_error_presence() {
    let mut report = StageReport::new();
    assert!(report.success());
    assert!(report.can_continue());

    report.push(Notification::info("stage_a", "looked around"));
    report.push(Notification::warning("stage_a", "approximated a thing"));
    assert!(report.success());

    report.push(Notification::error("stage_a", "nothing to convert"));
    assert!(!report.success());
    assert!(!report.can_continue());
}

#[test]
fn notification_display_names_stage_and_level() {
    let n = Notification::warning("clamp_materials", "value clamped");
    assert_eq!(n.to_string(), "[warning] clamp_materials: value clamped");
}

#[test]
fn notifications_serialize_flat() {
    let n = Notification::error("validate_humanoid", "missing required bone: Head")
        .with_details("resolved 14 of 15 required roles");
    let json = serde_json::to_value(&n).unwrap();
    assert_eq!(json["stage"], "validate_humanoid");
    assert_eq!(json["severity"], "error");
    assert_eq!(json["message"], "missing required bone: Head");
    assert_eq!(json["details"], "resolved 14 of 15 required roles");
    assert!(json["timestamp_ms"].is_u64());
}

#[test]
fn pipeline_report_success_is_halt_absence() {
    let mut report = PipelineReport::default();
    assert!(report.success());
    report.halted_at = Some("validate_humanoid".to_owned());
    assert!(!report.success());
}

#[test]
fn severity_filter_preserves_emission_order() {
    let mut report = PipelineReport::default();
    report
        .notifications
        .push(Notification::warning("a", "first"));
    report.notifications.push(Notification::info("a", "noise"));
    report
        .notifications
        .push(Notification::warning("b", "second"));

    let warnings: Vec<&str> = report
        .at_severity(Severity::Warning)
        .map(|n| n.message.as_str())
        .collect();
    assert_eq!(warnings, vec!["first", "second"]);
}
