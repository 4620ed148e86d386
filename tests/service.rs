#![forbid(unsafe_code)]
use shiftroster::{
    schedule, EmployeeId, ScheduleError, ScheduleRequest, ScheduleResponse, SolveOptions, Verdict,
};
use std::time::Duration;

const REQUEST: &str = r#"{
    "employees": ["A", "B"],
    "days": 2,
    "shifts": 1,
    "availability": [["A", 0, 0], ["A", 1, 0], ["B", 0, 0], ["B", 1, 0]],
    "max_shifts": {"A": 2, "B": 2},
    "coverage": [1]
}"#;

fn request() -> ScheduleRequest {
    serde_json::from_str(REQUEST).unwrap()
}

#[test]
fn success_envelope() {
    let response = ScheduleResponse::from(schedule(&request(), &SolveOptions::default()));
    assert!(response.is_success());
    let json = serde_json::to_string(&response).unwrap();
    insta::assert_snapshot!(json, @r#"{"status":"success","schedule":[{"day":0,"schedule":[{"shift":0,"workers":["A","B"]}]},{"day":1,"schedule":[{"shift":0,"workers":["A","B"]}]}]}"#);
}

#[test]
fn infeasible_request_maps_to_error_envelope() {
    let mut req = request();
    req.coverage = vec![3];
    let result = schedule(&req, &SolveOptions::default());
    assert!(matches!(
        result,
        Err(ScheduleError::NoFeasibleSchedule { verdict: Verdict::Infeasible })
    ));
    let json = serde_json::to_string(&ScheduleResponse::from(result)).unwrap();
    insta::assert_snapshot!(json, @r#"{"status":"error","message":"No feasible schedule found"}"#);
}

#[test]
fn exhausted_budget_is_reported_like_infeasible() {
    let opts = SolveOptions::default()
        .with_time_limit(Duration::ZERO)
        .with_check_interval(1);
    let err = schedule(&request(), &opts).unwrap_err();
    assert!(matches!(err, ScheduleError::NoFeasibleSchedule { verdict: Verdict::Unknown }));
    assert_eq!(err.to_string(), "No feasible schedule found");
}

#[test]
fn invalid_input_names_the_field() {
    let mut req = request();
    req.max_shifts.clear();
    let err = schedule(&req, &SolveOptions::default()).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidInput(_)));
    match ScheduleResponse::from(Err(err)) {
        ScheduleResponse::Error { message } => assert!(message.contains("max_shifts")),
        other => panic!("unexpected response {other:?}"),
    }
}

#[test]
fn null_holidays_are_accepted() {
    let raw = REQUEST.replace("\"coverage\": [1]", "\"coverage\": [1], \"holidays\": null");
    let req: ScheduleRequest = serde_json::from_str(&raw).unwrap();
    assert!(req.holidays.is_none());
    assert!(schedule(&req, &SolveOptions::default()).is_ok());
}

#[test]
fn oversized_horizon_is_rejected_not_built() {
    let mut req = request();
    req.days = i64::MAX / 2;
    let err = schedule(&req, &SolveOptions::default()).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidInput(ref e) if e.field() == "days"));
}

#[test]
fn month_with_no_spare_capacity_is_scheduled() {
    let names: Vec<String> = (0..10).map(|i| format!("e{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let req = ScheduleRequest::fully_available(&refs, 30, 1, 3, vec![1]);
    let opts = SolveOptions::default().with_time_limit(Duration::from_secs(5));

    let roster = schedule(&req, &opts).unwrap();
    assert_eq!(roster.days.len(), 30);
    for name in &names {
        assert_eq!(roster.assignments_for(&EmployeeId::new(name)).len(), 3);
    }
}
