use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifiant fort pour un employé
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Disponibilité `(employé, jour, créneau)`.
///
/// Sérialisée comme un triplet JSON `["alice", 0, 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvailabilityEntry(pub EmployeeId, pub i64, pub i64);

impl AvailabilityEntry {
    pub fn new<S: AsRef<str>>(employee: S, day: i64, shift: i64) -> Self {
        Self(EmployeeId::new(employee), day, shift)
    }
    pub fn employee(&self) -> &EmployeeId {
        &self.0
    }
    pub fn day(&self) -> i64 {
        self.1
    }
    pub fn shift(&self) -> i64 {
        self.2
    }
}

/// Demande de planification telle que reçue du client.
///
/// Les entiers restent signés : la validation (jours > 0, etc.) est faite
/// par le builder, qui nomme le champ fautif.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub employees: Vec<EmployeeId>,
    pub days: i64,
    pub shifts: i64,
    #[serde(default)]
    pub availability: Vec<AvailabilityEntry>,
    pub max_shifts: BTreeMap<EmployeeId, i64>,
    pub coverage: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holidays: Option<Vec<i64>>,
}

impl ScheduleRequest {
    /// Demande où chaque employé est disponible sur tous les créneaux.
    pub fn fully_available<S: AsRef<str>>(
        employees: &[S],
        days: i64,
        shifts: i64,
        max_shifts: i64,
        coverage: Vec<i64>,
    ) -> Self {
        let employees: Vec<EmployeeId> = employees.iter().map(EmployeeId::new).collect();
        let mut availability = Vec::new();
        for e in &employees {
            for d in 0..days {
                for s in 0..shifts {
                    availability.push(AvailabilityEntry(e.clone(), d, s));
                }
            }
        }
        let max_shifts = employees.iter().map(|e| (e.clone(), max_shifts)).collect();
        Self {
            employees,
            days,
            shifts,
            availability,
            max_shifts,
            coverage,
            holidays: None,
        }
    }
}

/// Employés affectés à un créneau d'une journée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWorkers {
    pub shift: usize,
    pub workers: Vec<EmployeeId>,
}

/// Contenu d'une journée : férié, ou liste des créneaux (tous présents, même vides).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDaySchedule", into = "RawDaySchedule")]
pub enum DaySchedule {
    Holiday,
    Shifts(Vec<ShiftWorkers>),
}

impl DaySchedule {
    pub fn is_holiday(&self) -> bool {
        matches!(self, DaySchedule::Holiday)
    }

    pub fn shifts(&self) -> &[ShiftWorkers] {
        match self {
            DaySchedule::Holiday => &[],
            DaySchedule::Shifts(shifts) => shifts,
        }
    }
}

// Forme filaire : `"HOLIDAY"` ou `[{shift, workers}, ...]`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawDaySchedule {
    Marker(HolidayMarker),
    Shifts(Vec<ShiftWorkers>),
}

#[derive(Clone, Serialize, Deserialize)]
enum HolidayMarker {
    #[serde(rename = "HOLIDAY")]
    Holiday,
}

impl From<RawDaySchedule> for DaySchedule {
    fn from(raw: RawDaySchedule) -> Self {
        match raw {
            RawDaySchedule::Marker(HolidayMarker::Holiday) => DaySchedule::Holiday,
            RawDaySchedule::Shifts(shifts) => DaySchedule::Shifts(shifts),
        }
    }
}

impl From<DaySchedule> for RawDaySchedule {
    fn from(schedule: DaySchedule) -> Self {
        match schedule {
            DaySchedule::Holiday => RawDaySchedule::Marker(HolidayMarker::Holiday),
            DaySchedule::Shifts(shifts) => RawDaySchedule::Shifts(shifts),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    pub day: usize,
    pub schedule: DaySchedule,
}

/// Planning projeté, un élément par jour, dans l'ordre des jours.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    pub days: Vec<DayEntry>,
}

impl Roster {
    pub fn day(&self, day: usize) -> Option<&DayEntry> {
        self.days.iter().find(|d| d.day == day)
    }

    /// Paires `(jour, créneau)` travaillées par `employee`, dans l'ordre du planning.
    pub fn assignments_for(&self, employee: &EmployeeId) -> Vec<(usize, usize)> {
        self.days
            .iter()
            .flat_map(|entry| {
                entry
                    .schedule
                    .shifts()
                    .iter()
                    .filter(|sw| sw.workers.contains(employee))
                    .map(move |sw| (entry.day, sw.shift))
            })
            .collect()
    }

    pub fn holidays(&self) -> impl Iterator<Item = usize> + '_ {
        self.days
            .iter()
            .filter(|d| d.schedule.is_holiday())
            .map(|d| d.day)
    }
}
