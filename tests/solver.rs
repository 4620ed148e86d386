#![forbid(unsafe_code)]
use shiftroster::solver::{solve, LinearConstraint, Problem, SolveOptions, SolveOutcome};
use shiftroster::{build_model, verify_roster, project, ScheduleRequest};
use std::time::Duration;

fn solve_request(req: &ScheduleRequest, opts: &SolveOptions) -> SolveOutcome {
    let model = build_model(req).unwrap();
    solve(model.problem(), opts).outcome
}

#[test]
fn empty_problem_is_feasible() {
    let report = solve(&Problem::new(0), &SolveOptions::default());
    let assignment = report.outcome.assignment().unwrap();
    assert!(assignment.is_empty());
    assert_eq!(report.stats.nodes, 0);
}

#[test]
fn propagation_completes_partial_choice() {
    let mut problem = Problem::new(3);
    problem.add(LinearConstraint::at_least(vec![0, 1, 2], 2));
    problem.add(LinearConstraint::at_most(vec![0, 1], 1));

    let report = solve(&problem, &SolveOptions::default());
    let a = report.outcome.assignment().unwrap();
    assert_eq!(a.get(0), Some(true));
    assert_eq!(a.get(1), Some(false));
    assert_eq!(a.get(2), Some(true));
    assert_eq!(a.get(3), None);
    assert_eq!(report.stats.nodes, 1);
}

#[test]
fn trivially_satisfiable_without_coverage() {
    let req = ScheduleRequest::fully_available(&["a", "b", "c"], 3, 2, 100, vec![0, 0]);
    let outcome = solve_request(&req, &SolveOptions::default());
    assert!(outcome.is_feasible());
}

#[test]
fn coverage_above_headcount_is_infeasible_at_root() {
    let req = ScheduleRequest::fully_available(&["A", "B"], 2, 1, 2, vec![3]);
    let model = build_model(&req).unwrap();
    let report = solve(model.problem(), &SolveOptions::default());
    assert_eq!(report.outcome, SolveOutcome::Infeasible);
    assert_eq!(report.stats.nodes, 0);
}

#[test]
fn two_employees_two_days_is_feasible() {
    let req = ScheduleRequest::fully_available(&["A", "B"], 2, 1, 2, vec![1]);
    let outcome = solve_request(&req, &SolveOptions::default());
    assert!(outcome.is_feasible());
}

#[test]
fn capacity_shortfall_is_cut_at_root() {
    // 3 jours à couvrir, 2 employés plafonnés à 1 shift chacun
    let req = ScheduleRequest::fully_available(&["A", "B"], 3, 1, 1, vec![1]);
    let model = build_model(&req).unwrap();
    let report = solve(model.problem(), &SolveOptions::default());
    assert_eq!(report.outcome, SolveOutcome::Infeasible);
    assert_eq!(report.stats.nodes, 0);
    assert_eq!(report.stats.pruned, 1);
}

#[test]
fn odd_cycle_is_proven_by_search() {
    // au plus une variable vraie par paire, au moins deux vraies au total
    let mut problem = Problem::new(3);
    problem.add(LinearConstraint::at_most(vec![0, 1], 1));
    problem.add(LinearConstraint::at_most(vec![1, 2], 1));
    problem.add(LinearConstraint::at_most(vec![0, 2], 1));
    problem.add(LinearConstraint::at_least(vec![0, 1, 2], 2));

    let report = solve(&problem, &SolveOptions::default());
    assert_eq!(report.outcome, SolveOutcome::Infeasible);
    assert_eq!(report.stats.nodes, 1);
    assert!(report.stats.backtracks >= 1);
}

#[test]
fn tight_month_with_exact_capacity_is_feasible() {
    // 10 × 3 = 30 shifts pour 30 jours : aucune marge
    let names: Vec<String> = (0..10).map(|i| format!("e{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let req = ScheduleRequest::fully_available(&refs, 30, 1, 3, vec![1]);
    let model = build_model(&req).unwrap();

    let opts = SolveOptions::default().with_time_limit(Duration::from_secs(5));
    let report = solve(model.problem(), &opts);
    let assignment = report.outcome.assignment().expect("tight month should be feasible");
    assert_eq!(assignment.count_true(), 30);
    assert!(report.stats.nodes <= 2 * model.num_vars() as u64);

    let roster = project(&model, assignment).unwrap();
    assert!(verify_roster(&model, &roster).is_empty());
}

#[test]
fn surplus_capacity_still_solves_quickly() {
    let names: Vec<String> = (0..12).map(|i| format!("e{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut req = ScheduleRequest::fully_available(&refs, 28, 1, 3, vec![1]);
    req.holidays = Some(vec![6, 13, 20, 27]);
    let model = build_model(&req).unwrap();

    let report = solve(model.problem(), &SolveOptions::default());
    let assignment = report.outcome.assignment().unwrap();
    assert_eq!(model.problem().violated(assignment).count(), 0);
}

#[test]
fn zero_budget_yields_unknown() {
    let req = ScheduleRequest::fully_available(&["A", "B"], 2, 1, 2, vec![1]);
    let opts = SolveOptions::default()
        .with_time_limit(Duration::ZERO)
        .with_check_interval(1);
    assert_eq!(solve_request(&req, &opts), SolveOutcome::Unknown);
}

#[test]
fn rest_rule_is_never_violated() {
    let req = ScheduleRequest::fully_available(&["A", "B"], 4, 2, 100, vec![1, 1]);
    let model = build_model(&req).unwrap();
    let report = solve(model.problem(), &SolveOptions::default());
    let assignment = report.outcome.assignment().unwrap();

    for e in 0..2 {
        for d in 0..3 {
            let closing = assignment.get(model.var(e, d, 1)).unwrap();
            let opening = assignment.get(model.var(e, d + 1, 0)).unwrap();
            assert!(!(closing && opening), "employee {e} closes day {d} and opens day {}", d + 1);
        }
    }
    let roster = project(&model, assignment).unwrap();
    assert!(verify_roster(&model, &roster).is_empty());
}

#[test]
fn solutions_satisfy_every_family() {
    let mut req = ScheduleRequest::fully_available(&["A", "B", "C", "D"], 7, 3, 100, vec![1, 2, 1]);
    req.holidays = Some(vec![6]);
    req.availability.retain(|a| !(a.employee().as_str() == "D" && a.day() < 3));
    let model = build_model(&req).unwrap();
    let report = solve(model.problem(), &SolveOptions::default());
    let assignment = report.outcome.assignment().unwrap();
    assert_eq!(model.problem().violated(assignment).count(), 0);
}

#[test]
fn identical_input_gives_identical_result() {
    let req = ScheduleRequest::fully_available(&["A", "B", "C"], 5, 2, 5, vec![1, 1]);
    let first = solve_request(&req, &SolveOptions::default());
    let second = solve_request(&req, &SolveOptions::default());
    assert!(first.is_feasible());
    assert_eq!(first, second);
}
