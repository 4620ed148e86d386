//! Moteur de faisabilité booléen/linéaire : propagation unitaire + retour arrière.
//!
//! Après chaque propagation, une borne agrégée compare le déficit des
//! contraintes `AtLeast` à ce que les contraintes `AtMost` laissent encore
//! disponible, et coupe la branche si l'écart est négatif.
//!
//! Le moteur ne connaît ni employés ni jours : il reçoit un [`Problem`]
//! (variables 0/1, contraintes `sum <= b` / `sum >= b`) et rend une issue à
//! trois voies ([`SolveOutcome`]). Aucun état global, aucune E/S : deux
//! résolutions concurrentes ne partagent que leurs entrées en lecture seule.

mod bound;
mod domain;
mod propagate;
mod search;
mod types;

pub use types::{
    Assignment, LinearConstraint, Problem, Relation, SolveOptions, SolveOutcome, SolveReport,
    SolveStats, VarId,
};

use tracing::debug;

/// Résout `problem` dans le budget de `opts`.
pub fn solve(problem: &Problem, opts: &SolveOptions) -> SolveReport {
    let (outcome, stats) = search::run(problem, opts);
    match &outcome {
        SolveOutcome::Feasible(a) => {
            debug!(vars = problem.num_vars, assigned = a.count_true(), %stats, "feasible");
        }
        SolveOutcome::Infeasible => debug!(%stats, "proven infeasible"),
        SolveOutcome::Unknown => debug!(%stats, "time budget exhausted"),
    }
    SolveReport { outcome, stats }
}
