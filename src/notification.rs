use crate::model::{EmployeeId, Roster};
use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Message texte prêt à partir vers un employé.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftMessage {
    pub employee: EmployeeId,
    pub to: String,
    pub body: String,
}

/// Permet de customiser le rendu du message (SMS, mail, etc.).
pub trait MessageRenderer {
    fn render(&self, employee: &EmployeeId, assignments: &[(usize, usize)], holidays: &[usize])
        -> String;
}

/// Gabarit texte court, adapté au SMS.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextMessage;

impl MessageRenderer for TextMessage {
    fn render(
        &self,
        employee: &EmployeeId,
        assignments: &[(usize, usize)],
        holidays: &[usize],
    ) -> String {
        let mut body = format!("Hi {employee}, ");
        if assignments.is_empty() {
            body.push_str("you have no shifts in this schedule.");
        } else {
            let slots: Vec<String> = assignments
                .iter()
                .map(|(day, shift)| format!("day {day} shift {shift}"))
                .collect();
            body.push_str(&format!("your shifts: {}.", slots.join(", ")));
        }
        if !holidays.is_empty() {
            let days: Vec<String> = holidays.iter().map(|d| d.to_string()).collect();
            body.push_str(&format!(" Holidays: day {}.", days.join(", ")));
        }
        body
    }
}

/// Prépare le message d'un employé à partir de sa part du planning.
pub fn prepare_message(
    roster: &Roster,
    employee: &EmployeeId,
    to: &str,
    renderer: &dyn MessageRenderer,
) -> Result<ShiftMessage> {
    if to.trim().is_empty() {
        bail!("recipient phone number cannot be empty");
    }
    let assignments = roster.assignments_for(employee);
    let holidays: Vec<usize> = roster.holidays().collect();
    let body = renderer.render(employee, &assignments, &holidays);
    Ok(ShiftMessage {
        employee: employee.clone(),
        to: to.trim().to_string(),
        body,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WindowEntry {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Limiteur à fenêtre fixe par destinataire.
///
/// La fenêtre d'un destinataire s'ouvre à son premier envoi et expire à
/// `reset_at` ; à partir de là le compteur repart de zéro.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    max_per_window: u32,
    window: Duration,
    entries: HashMap<String, WindowEntry>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(10, Duration::hours(1))
    }
}

impl RateLimiter {
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            max_per_window,
            window,
            entries: HashMap::new(),
        }
    }

    pub fn max_per_window(&self) -> u32 {
        self.max_per_window
    }

    /// Consomme un jeton pour `key` si la fenêtre courante le permet.
    pub fn allow(&mut self, key: &str, now: DateTime<Utc>) -> bool {
        let window = self.window;
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert(WindowEntry { count: 0, reset_at: now + window });
        if now >= entry.reset_at {
            *entry = WindowEntry { count: 0, reset_at: now + window };
        }
        if entry.count >= self.max_per_window {
            return false;
        }
        entry.count += 1;
        true
    }

    /// Envois restants pour `key` dans sa fenêtre.
    pub fn remaining(&self, key: &str, now: DateTime<Utc>) -> u32 {
        match self.entries.get(key) {
            Some(e) if now < e.reset_at => self.max_per_window.saturating_sub(e.count),
            _ => self.max_per_window,
        }
    }

    /// Oublie les fenêtres expirées.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        self.entries.retain(|_, e| now < e.reset_at);
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn tracked(&self) -> usize {
        self.entries.len()
    }
}

/// Canal d'envoi réel (fournisseur SMS, fichier, mémoire).
pub trait MessageSink {
    /// Envoie `body` à `to`, renvoie l'identifiant de reçu du canal.
    fn send(&mut self, to: &str, body: &str) -> Result<String>;
}

/// Canal en mémoire : garde les messages envoyés.
#[derive(Debug, Default, Clone)]
pub struct OutboxSink {
    pub sent: Vec<(String, String)>,
}

impl MessageSink for OutboxSink {
    fn send(&mut self, to: &str, body: &str) -> Result<String> {
        self.sent.push((to.to_string(), body.to_string()));
        Ok(Uuid::new_v4().to_string())
    }
}

#[derive(Debug, Clone)]
pub struct DispatchRecord {
    pub id: Uuid,
    pub to: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub receipt: String,
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("recipient has not consented to messages")]
    ConsentRequired,
    #[error("rate limit exceeded for {to}: max {max} per window")]
    RateLimited { to: String, max: u32 },
    #[error("message body is empty")]
    EmptyMessage,
    #[error(transparent)]
    Sink(#[from] anyhow::Error),
}

/// Envoi avec contrôle du consentement puis du débit.
///
/// L'état du limiteur appartient au dispatcher : aucune donnée globale.
#[derive(Debug)]
pub struct Dispatcher<S: MessageSink> {
    sink: S,
    limiter: RateLimiter,
}

impl<S: MessageSink> Dispatcher<S> {
    pub fn new(sink: S, limiter: RateLimiter) -> Self {
        Self { sink, limiter }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn limiter_mut(&mut self) -> &mut RateLimiter {
        &mut self.limiter
    }

    pub fn dispatch(
        &mut self,
        message: &ShiftMessage,
        consent: bool,
        now: DateTime<Utc>,
    ) -> Result<DispatchRecord, DispatchError> {
        if !consent {
            return Err(DispatchError::ConsentRequired);
        }
        if message.body.trim().is_empty() {
            return Err(DispatchError::EmptyMessage);
        }
        // un destinataire dont la fenêtre a expiré n'occupe plus de place
        self.limiter.prune(now);
        if !self.limiter.allow(&message.to, now) {
            return Err(DispatchError::RateLimited {
                to: message.to.clone(),
                max: self.limiter.max_per_window(),
            });
        }
        let receipt = self.sink.send(&message.to, &message.body)?;
        tracing::info!(to = %message.to, %receipt, "message sent");
        Ok(DispatchRecord {
            id: Uuid::new_v4(),
            to: message.to.clone(),
            body: message.body.clone(),
            sent_at: now,
            receipt,
        })
    }
}
