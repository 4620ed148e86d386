//! Frontière requête → réponse : builder, moteur, projection.

use crate::builder::{build_model, ModelError};
use crate::model::{Roster, ScheduleRequest};
use crate::roster::{project, ProjectionError};
use crate::solver::{solve, SolveOptions, SolveOutcome};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Pourquoi aucun planning n'a pu être produit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Infeasible,
    /// Budget épuisé : pas de preuve, peut-être faisable avec plus de temps.
    Unknown,
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error(transparent)]
    InvalidInput(#[from] ModelError),
    // même message pour les deux verdicts
    #[error("No feasible schedule found")]
    NoFeasibleSchedule { verdict: Verdict },
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

/// Construit le modèle, le résout et projette le planning.
pub fn schedule(request: &ScheduleRequest, opts: &SolveOptions) -> Result<Roster, ScheduleError> {
    let model = build_model(request)?;
    let report = solve(model.problem(), opts);
    match report.outcome {
        SolveOutcome::Feasible(assignment) => {
            let roster = project(&model, &assignment)?;
            info!(days = roster.days.len(), stats = %report.stats, "schedule produced");
            Ok(roster)
        }
        SolveOutcome::Infeasible => {
            info!("no feasible schedule exists for this request");
            Err(ScheduleError::NoFeasibleSchedule { verdict: Verdict::Infeasible })
        }
        SolveOutcome::Unknown => {
            warn!(limit = ?opts.time_limit, "no schedule confirmed within the time budget");
            Err(ScheduleError::NoFeasibleSchedule { verdict: Verdict::Unknown })
        }
    }
}

/// Enveloppe JSON renvoyée au client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScheduleResponse {
    Success { schedule: Roster },
    Error { message: String },
}

impl From<Result<Roster, ScheduleError>> for ScheduleResponse {
    fn from(result: Result<Roster, ScheduleError>) -> Self {
        match result {
            Ok(schedule) => ScheduleResponse::Success { schedule },
            Err(err) => ScheduleResponse::Error { message: err.to_string() },
        }
    }
}

impl ScheduleResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ScheduleResponse::Success { .. })
    }
}
