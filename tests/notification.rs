#![forbid(unsafe_code)]
use chrono::{Duration, TimeZone, Utc};
use shiftroster::{
    prepare_message, DayEntry, DaySchedule, DispatchError, Dispatcher, EmployeeId, OutboxSink,
    RateLimiter, Roster, ShiftWorkers, TextMessage,
};

fn sample_roster() -> Roster {
    Roster {
        days: vec![
            DayEntry {
                day: 0,
                schedule: DaySchedule::Shifts(vec![
                    ShiftWorkers { shift: 0, workers: vec![EmployeeId::new("alice")] },
                    ShiftWorkers { shift: 1, workers: vec![EmployeeId::new("bob")] },
                ]),
            },
            DayEntry { day: 1, schedule: DaySchedule::Holiday },
            DayEntry {
                day: 2,
                schedule: DaySchedule::Shifts(vec![
                    ShiftWorkers { shift: 0, workers: vec![] },
                    ShiftWorkers { shift: 1, workers: vec![EmployeeId::new("alice")] },
                ]),
            },
        ],
    }
}

#[test]
fn message_lists_employee_slice() {
    let msg = prepare_message(&sample_roster(), &EmployeeId::new("alice"), " +15550001 ", &TextMessage)
        .unwrap();
    assert_eq!(msg.to, "+15550001");
    insta::assert_snapshot!(msg.body, @"Hi alice, your shifts: day 0 shift 0, day 2 shift 1. Holidays: day 1.");
}

#[test]
fn message_for_idle_employee() {
    let msg = prepare_message(&sample_roster(), &EmployeeId::new("carol"), "+1", &TextMessage).unwrap();
    assert!(msg.body.contains("no shifts"));
    assert!(prepare_message(&sample_roster(), &EmployeeId::new("carol"), "  ", &TextMessage).is_err());
}

#[test]
fn rate_limiter_window_resets() {
    let t0 = Utc.with_ymd_and_hms(2025, 10, 1, 8, 0, 0).unwrap();
    let mut limiter = RateLimiter::new(2, Duration::hours(1));

    assert!(limiter.allow("+1", t0));
    assert!(limiter.allow("+1", t0 + Duration::minutes(10)));
    assert!(!limiter.allow("+1", t0 + Duration::minutes(20)));
    assert!(limiter.allow("+2", t0 + Duration::minutes(20)));
    assert_eq!(limiter.remaining("+1", t0 + Duration::minutes(30)), 0);

    let later = t0 + Duration::hours(1);
    assert_eq!(limiter.remaining("+1", later), 2);
    assert!(limiter.allow("+1", later));

    limiter.prune(t0 + Duration::hours(3));
    assert_eq!(limiter.tracked(), 0);
}

#[test]
fn dispatcher_checks_consent_then_rate() {
    let now = Utc.with_ymd_and_hms(2025, 10, 1, 8, 0, 0).unwrap();
    let msg = prepare_message(&sample_roster(), &EmployeeId::new("bob"), "+33600", &TextMessage).unwrap();
    let mut dispatcher = Dispatcher::new(OutboxSink::default(), RateLimiter::new(1, Duration::hours(1)));

    assert!(matches!(dispatcher.dispatch(&msg, false, now), Err(DispatchError::ConsentRequired)));
    assert!(dispatcher.sink().sent.is_empty());

    let record = dispatcher.dispatch(&msg, true, now).unwrap();
    assert_eq!(record.to, "+33600");
    assert_eq!(record.sent_at, now);
    assert_eq!(dispatcher.sink().sent.len(), 1);

    let err = dispatcher.dispatch(&msg, true, now).unwrap_err();
    assert!(matches!(err, DispatchError::RateLimited { max: 1, .. }));

    dispatcher.limiter_mut().reset();
    assert!(dispatcher.dispatch(&msg, true, now).is_ok());
}

#[test]
fn dispatcher_forgets_expired_recipients() {
    let t0 = Utc.with_ymd_and_hms(2025, 10, 1, 8, 0, 0).unwrap();
    let roster = sample_roster();
    let mut dispatcher = Dispatcher::new(OutboxSink::default(), RateLimiter::new(1, Duration::hours(1)));

    for i in 0..5 {
        let to = format!("+3360{i}");
        let msg = prepare_message(&roster, &EmployeeId::new("alice"), &to, &TextMessage).unwrap();
        dispatcher.dispatch(&msg, true, t0 + Duration::minutes(i)).unwrap();
    }
    assert_eq!(dispatcher.limiter().tracked(), 5);

    let later = t0 + Duration::hours(2);
    let msg = prepare_message(&roster, &EmployeeId::new("bob"), "+33699", &TextMessage).unwrap();
    dispatcher.dispatch(&msg, true, later).unwrap();
    assert_eq!(dispatcher.limiter().tracked(), 1);
    assert_eq!(dispatcher.sink().sent.len(), 6);
}
