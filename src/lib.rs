#![forbid(unsafe_code)]
//! Shiftroster — construction de plannings d'équipes sous contraintes.
//!
//! - Modèle booléen : une variable par (employé, jour, créneau).
//! - Contraintes : disponibilités, jours fériés, plafond par employé,
//!   couverture minimale par créneau, repos entre fermeture et ouverture.
//! - Moteur autonome propagation + retour arrière, borné dans le temps.
//! - Projection en planning jour par jour, sérialisable en JSON.

pub mod builder;
pub mod io;
pub mod model;
pub mod notification;
pub mod roster;
pub mod service;
pub mod solver;
pub mod storage;

pub use builder::{build_model, ConstraintOrigin, ModelError, ShiftModel, MAX_UNIVERSE};
pub use model::{
    AvailabilityEntry, DayEntry, DaySchedule, EmployeeId, Roster, ScheduleRequest, ShiftWorkers,
};
pub use notification::{
    prepare_message, DispatchError, DispatchRecord, Dispatcher, MessageRenderer, MessageSink,
    OutboxSink, RateLimiter, ShiftMessage, TextMessage,
};
pub use roster::{project, verify_roster, ProjectionError, Violation, ViolationKind};
pub use service::{schedule, ScheduleError, ScheduleResponse, Verdict};
pub use solver::{solve, Assignment, SolveOptions, SolveOutcome, SolveReport};
pub use storage::{JsonStorage, Storage};
