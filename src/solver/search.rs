use super::bound::PooledBound;
use super::domain::Domains;
use super::propagate::Propagator;
use super::types::{Problem, SolveOptions, SolveOutcome, SolveStats, VarId};
use std::time::{Duration, Instant};

/// Budget de temps coopératif : l'horloge n'est lue que tous les
/// `check_interval` nœuds.
pub(crate) struct TimeBudget {
    limit: Duration,
    start: Instant,
    check_interval: u64,
    since_last_check: u64,
    exhausted: bool,
}

impl TimeBudget {
    pub fn start(limit: Duration, check_interval: u64) -> Self {
        Self {
            limit,
            start: Instant::now(),
            check_interval: check_interval.max(1),
            // première vérification dès le premier nœud
            since_last_check: check_interval.max(1) - 1,
            exhausted: false,
        }
    }

    pub fn exhausted(&mut self) -> bool {
        if self.exhausted {
            return true;
        }
        self.since_last_check += 1;
        if self.since_last_check >= self.check_interval {
            self.since_last_check = 0;
            self.exhausted = self.start.elapsed() >= self.limit;
        }
        self.exhausted
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Un niveau de décision sur la pile.
#[derive(Debug, Clone, Copy)]
struct Frame {
    var: VarId,
    mark: usize,
    tried_false: bool,
}

/// Recherche en profondeur, branche 1 puis 0, variables dans l'ordre croissant.
pub(crate) fn run(problem: &Problem, opts: &SolveOptions) -> (SolveOutcome, SolveStats) {
    let mut budget = TimeBudget::start(opts.time_limit, opts.check_interval);
    let mut stats = SolveStats::default();
    let mut domains = Domains::new(problem.num_vars);
    let mut propagator = Propagator::new(problem);
    let mut bound = PooledBound::new(problem);

    // niveau racine : jamais défait
    propagator.enqueue_all();
    if !consistent(&mut propagator, &mut bound, &mut domains, &mut stats) {
        stats.propagations = propagator.propagations();
        stats.elapsed = budget.elapsed();
        return (SolveOutcome::Infeasible, stats);
    }

    let mut stack: Vec<Frame> = Vec::new();
    let mut cursor: VarId = 0;

    let outcome = 'search: loop {
        let Some(var) = domains.next_unset(cursor) else {
            debug_assert!(domains.all_fixed());
            let assignment = domains.to_assignment();
            debug_assert!(problem.violated(&assignment).next().is_none());
            break SolveOutcome::Feasible(assignment);
        };

        if budget.exhausted() {
            break SolveOutcome::Unknown;
        }
        stats.nodes += 1;

        stack.push(Frame { var, mark: domains.mark(), tried_false: false });
        propagator.decide(&mut domains, var, true);
        if consistent(&mut propagator, &mut bound, &mut domains, &mut stats) {
            cursor = var + 1;
            continue;
        }

        // retour arrière jusqu'à un niveau dont la branche 0 reste à tenter
        loop {
            stats.backtracks += 1;
            let Some(frame) = stack.last_mut() else {
                break 'search SolveOutcome::Infeasible;
            };
            domains.undo_to(frame.mark);
            if frame.tried_false {
                stack.pop();
                continue;
            }
            frame.tried_false = true;
            let var = frame.var;
            propagator.decide(&mut domains, var, false);
            if consistent(&mut propagator, &mut bound, &mut domains, &mut stats) {
                cursor = var + 1;
                continue 'search;
            }
        }
    };

    stats.propagations = propagator.propagations();
    stats.elapsed = budget.elapsed();
    (outcome, stats)
}

/// Propagation jusqu'au point fixe, puis borne offre/demande.
fn consistent(
    propagator: &mut Propagator<'_>,
    bound: &mut PooledBound<'_>,
    domains: &mut Domains,
    stats: &mut SolveStats,
) -> bool {
    if propagator.propagate(domains).is_err() {
        return false;
    }
    if bound.holds(domains) {
        return true;
    }
    stats.pruned += 1;
    false
}
