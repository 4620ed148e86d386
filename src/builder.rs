//! Traduction d'une [`ScheduleRequest`] en modèle de contraintes.
//!
//! Une variable `x[e, d, s]` par triplet (employé, jour, créneau), rangées
//! employé d'abord, puis jour, puis créneau : l'ordre des index est l'ordre
//! de branchement du moteur.

use crate::model::{EmployeeId, ScheduleRequest};
use crate::solver::{LinearConstraint, Problem, VarId};
use std::collections::{BTreeSet, HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

/// Nombre maximal de variables `x[e, d, s]` (et de créneaux `d × s`) accepté
/// par [`build_model`]. Au-delà, la demande est rejetée avant toute allocation.
pub const MAX_UNIVERSE: usize = 1_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid model input: {field}: {reason}")]
    InvalidModelInput { field: &'static str, reason: String },
}

impl ModelError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ModelError::InvalidModelInput { field, reason: reason.into() }
    }

    /// Nom du champ fautif.
    pub fn field(&self) -> &'static str {
        match self {
            ModelError::InvalidModelInput { field, .. } => *field,
        }
    }
}

/// Famille (et contexte) d'où provient une contrainte du modèle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintOrigin {
    Eligibility { employee: usize, day: usize, shift: usize },
    Capacity { employee: usize },
    Coverage { day: usize, shift: usize },
    Rest { employee: usize, day: usize },
}

/// Modèle normalisé : univers de variables + contraintes étiquetées.
#[derive(Debug, Clone)]
pub struct ShiftModel {
    employees: Vec<EmployeeId>,
    days: usize,
    shifts: usize,
    holidays: BTreeSet<usize>,
    problem: Problem,
    origins: Vec<ConstraintOrigin>,
}

impl ShiftModel {
    pub fn employees(&self) -> &[EmployeeId] {
        &self.employees
    }
    pub fn days(&self) -> usize {
        self.days
    }
    pub fn shifts(&self) -> usize {
        self.shifts
    }
    pub fn holidays(&self) -> &BTreeSet<usize> {
        &self.holidays
    }
    pub fn is_holiday(&self, day: usize) -> bool {
        self.holidays.contains(&day)
    }
    pub fn problem(&self) -> &Problem {
        &self.problem
    }
    pub fn origins(&self) -> &[ConstraintOrigin] {
        &self.origins
    }

    pub fn num_vars(&self) -> usize {
        self.problem.num_vars
    }

    #[inline]
    pub fn var(&self, employee: usize, day: usize, shift: usize) -> VarId {
        debug_assert!(employee < self.employees.len() && day < self.days && shift < self.shifts);
        (employee * self.days + day) * self.shifts + shift
    }

    pub fn employee_index(&self, id: &EmployeeId) -> Option<usize> {
        self.employees.iter().position(|e| e == id)
    }

    fn push(&mut self, constraint: LinearConstraint, origin: ConstraintOrigin) {
        self.problem.add(constraint);
        self.origins.push(origin);
    }
}

/// Valide la demande puis construit les quatre familles de contraintes.
///
/// Aucune variable n'est créée si la demande est rejetée.
pub fn build_model(request: &ScheduleRequest) -> Result<ShiftModel, ModelError> {
    let days = positive("days", request.days)?;
    let shifts = positive("shifts", request.shifts)?;

    let mut seen = HashSet::new();
    for e in &request.employees {
        if e.as_str().trim().is_empty() {
            return Err(ModelError::invalid("employees", "employee id cannot be empty"));
        }
        if !seen.insert(e) {
            return Err(ModelError::invalid("employees", format!("duplicate employee {e}")));
        }
    }
    let num_vars = universe_size(request.employees.len(), days, shifts)?;

    let mut capacities = Vec::with_capacity(request.employees.len());
    for e in &request.employees {
        let cap = request
            .max_shifts
            .get(e)
            .ok_or_else(|| ModelError::invalid("max_shifts", format!("missing entry for {e}")))?;
        let cap = u32::try_from(*cap).map_err(|_| {
            ModelError::invalid("max_shifts", format!("entry for {e} must be >= 0"))
        })?;
        capacities.push(cap);
    }

    if request.coverage.len() != shifts {
        return Err(ModelError::invalid(
            "coverage",
            format!("expected {shifts} entries, got {}", request.coverage.len()),
        ));
    }
    let coverage = request
        .coverage
        .iter()
        .enumerate()
        .map(|(s, c)| {
            u32::try_from(*c).map_err(|_| {
                ModelError::invalid("coverage", format!("entry for shift {s} must be >= 0"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let index: HashMap<&EmployeeId, usize> =
        request.employees.iter().enumerate().map(|(i, e)| (e, i)).collect();

    let mut available = HashSet::with_capacity(request.availability.len());
    for entry in &request.availability {
        let slot = index.get(entry.employee()).and_then(|&e| {
            let d = usize::try_from(entry.day()).ok().filter(|d| *d < days)?;
            let s = usize::try_from(entry.shift()).ok().filter(|s| *s < shifts)?;
            Some((e, d, s))
        });
        match slot {
            Some(triple) => {
                available.insert(triple);
            }
            None => debug!(?entry, "availability outside the variable universe, ignored"),
        }
    }

    let mut holidays = BTreeSet::new();
    for &h in request.holidays.iter().flatten() {
        match usize::try_from(h).ok().filter(|d| *d < days) {
            Some(d) => {
                holidays.insert(d);
            }
            None => debug!(day = h, "holiday outside the horizon, ignored"),
        }
    }

    let num_employees = request.employees.len();
    let mut model = ShiftModel {
        employees: request.employees.clone(),
        days,
        shifts,
        holidays,
        problem: Problem::new(num_vars),
        origins: Vec::new(),
    };

    // 1. éligibilité
    for e in 0..num_employees {
        for d in 0..days {
            for s in 0..shifts {
                if !available.contains(&(e, d, s)) || model.is_holiday(d) {
                    let var = model.var(e, d, s);
                    model.push(
                        LinearConstraint::fix_false(var),
                        ConstraintOrigin::Eligibility { employee: e, day: d, shift: s },
                    );
                }
            }
        }
    }

    // 2. plafond par employé
    for (e, &cap) in capacities.iter().enumerate() {
        let vars = (0..days)
            .flat_map(|d| (0..shifts).map(move |s| (d, s)))
            .map(|(d, s)| model.var(e, d, s))
            .collect();
        model.push(LinearConstraint::at_most(vars, cap), ConstraintOrigin::Capacity { employee: e });
    }

    // 3. couverture minimale, hors jours fériés
    for d in 0..days {
        if model.is_holiday(d) {
            continue;
        }
        for (s, &min) in coverage.iter().enumerate() {
            let vars = (0..num_employees).map(|e| model.var(e, d, s)).collect();
            model.push(
                LinearConstraint::at_least(vars, min),
                ConstraintOrigin::Coverage { day: d, shift: s },
            );
        }
    }

    // 4. repos : pas de fermeture suivie d'une ouverture le lendemain
    if shifts >= 2 {
        let last = shifts - 1;
        for e in 0..num_employees {
            for d in 0..days - 1 {
                let pair = vec![model.var(e, d, last), model.var(e, d + 1, 0)];
                model.push(
                    LinearConstraint::at_most(pair, 1),
                    ConstraintOrigin::Rest { employee: e, day: d },
                );
            }
        }
    }

    debug!(
        employees = num_employees,
        days,
        shifts,
        vars = model.num_vars(),
        constraints = model.problem.constraints.len(),
        holidays = model.holidays.len(),
        "model built"
    );
    Ok(model)
}

/// `employés × jours × créneaux`, borné par [`MAX_UNIVERSE`].
///
/// Les créneaux `jours × créneaux` sont bornés aussi : les contraintes de
/// couverture en dépendent même sans employé.
fn universe_size(employees: usize, days: usize, shifts: usize) -> Result<usize, ModelError> {
    if shifts > MAX_UNIVERSE {
        return Err(ModelError::invalid(
            "shifts",
            format!("{shifts} shifts exceeds the limit of {MAX_UNIVERSE}"),
        ));
    }
    let slots = days.checked_mul(shifts).filter(|n| *n <= MAX_UNIVERSE).ok_or_else(|| {
        ModelError::invalid(
            "days",
            format!("{days} days x {shifts} shifts exceeds the limit of {MAX_UNIVERSE} slots"),
        )
    })?;
    slots.checked_mul(employees).filter(|n| *n <= MAX_UNIVERSE).ok_or_else(|| {
        ModelError::invalid(
            "employees",
            format!("{employees} employees x {slots} slots exceeds the limit of {MAX_UNIVERSE} variables"),
        )
    })
}

fn positive(field: &'static str, value: i64) -> Result<usize, ModelError> {
    if value <= 0 {
        return Err(ModelError::invalid(field, format!("must be > 0, got {value}")));
    }
    usize::try_from(value).map_err(|_| ModelError::invalid(field, "value too large"))
}
