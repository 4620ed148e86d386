//! Projection d'une affectation en planning jour par jour, et contrôle
//! d'un planning existant contre une demande.

use crate::builder::{ConstraintOrigin, ShiftModel};
use crate::model::{DayEntry, DaySchedule, EmployeeId, Roster, ShiftWorkers};
use crate::solver::{Assignment, VarId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("assignment has no value for variable {0}")]
    MissingVariable(VarId),
}

/// Construit le planning à partir d'une affectation faisable.
///
/// Jours dans l'ordre croissant ; un jour férié donne le marqueur `HOLIDAY`,
/// sinon chaque créneau est émis (même vide) avec ses employés dans l'ordre
/// de la liste d'employés.
pub fn project(model: &ShiftModel, assignment: &Assignment) -> Result<Roster, ProjectionError> {
    let mut days = Vec::with_capacity(model.days());
    for day in 0..model.days() {
        if model.is_holiday(day) {
            days.push(DayEntry { day, schedule: DaySchedule::Holiday });
            continue;
        }
        let mut shifts = Vec::with_capacity(model.shifts());
        for shift in 0..model.shifts() {
            let mut workers = Vec::new();
            for (e, id) in model.employees().iter().enumerate() {
                let var = model.var(e, day, shift);
                if assignment.get(var).ok_or(ProjectionError::MissingVariable(var))? {
                    workers.push(id.clone());
                }
            }
            shifts.push(ShiftWorkers { shift, workers });
        }
        days.push(DayEntry { day, schedule: DaySchedule::Shifts(shifts) });
    }
    Ok(Roster { days })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// Employé planifié hors disponibilité ou un jour férié.
    Ineligible,
    OverCapacity,
    UnderCoverage,
    /// Fermeture puis ouverture le lendemain.
    RestViolation,
    UnknownEmployee,
    /// Même employé listé plusieurs fois sur un créneau.
    DuplicateWorker,
    /// Jour ou créneau hors de l'horizon.
    UnknownSlot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub employee: Option<EmployeeId>,
    pub day: Option<usize>,
    pub shift: Option<usize>,
}

impl Violation {
    fn new(kind: ViolationKind) -> Self {
        Self { kind, employee: None, day: None, shift: None }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(e) = &self.employee {
            write!(f, " employee={e}")?;
        }
        if let Some(d) = self.day {
            write!(f, " day={d}")?;
        }
        if let Some(s) = self.shift {
            write!(f, " shift={s}")?;
        }
        Ok(())
    }
}

/// Contrôle `roster` contre le modèle et liste toutes les violations.
///
/// Un jour absent du planning compte comme un jour sans personne.
pub fn verify_roster(model: &ShiftModel, roster: &Roster) -> Vec<Violation> {
    let mut out = Vec::new();
    let mut values = vec![false; model.num_vars()];

    for entry in &roster.days {
        for sw in entry.schedule.shifts() {
            if entry.day >= model.days() || sw.shift >= model.shifts() {
                out.push(Violation {
                    day: Some(entry.day),
                    shift: Some(sw.shift),
                    ..Violation::new(ViolationKind::UnknownSlot)
                });
                continue;
            }
            for worker in &sw.workers {
                match model.employee_index(worker) {
                    Some(e) => {
                        let var = model.var(e, entry.day, sw.shift);
                        if values[var] {
                            out.push(Violation {
                                employee: Some(worker.clone()),
                                day: Some(entry.day),
                                shift: Some(sw.shift),
                                ..Violation::new(ViolationKind::DuplicateWorker)
                            });
                        }
                        values[var] = true;
                    }
                    None => out.push(Violation {
                        employee: Some(worker.clone()),
                        day: Some(entry.day),
                        shift: Some(sw.shift),
                        ..Violation::new(ViolationKind::UnknownEmployee)
                    }),
                }
            }
        }
    }

    let assignment = Assignment::from_values(values);
    let employee = |e: usize| model.employees().get(e).cloned();
    for idx in model.problem().violated(&assignment) {
        let violation = match model.origins()[idx] {
            ConstraintOrigin::Eligibility { employee: e, day, shift } => Violation {
                kind: ViolationKind::Ineligible,
                employee: employee(e),
                day: Some(day),
                shift: Some(shift),
            },
            ConstraintOrigin::Capacity { employee: e } => Violation {
                employee: employee(e),
                ..Violation::new(ViolationKind::OverCapacity)
            },
            ConstraintOrigin::Coverage { day, shift } => Violation {
                day: Some(day),
                shift: Some(shift),
                ..Violation::new(ViolationKind::UnderCoverage)
            },
            ConstraintOrigin::Rest { employee: e, day } => Violation {
                employee: employee(e),
                day: Some(day),
                ..Violation::new(ViolationKind::RestViolation)
            },
        };
        out.push(violation);
    }
    out
}
