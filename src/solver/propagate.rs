use super::domain::{Domains, Value};
use super::types::{Problem, Relation, VarId};
use std::collections::VecDeque;

/// Contrainte devenue insatisfiable sous les fixations courantes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Conflict {
    pub constraint: usize,
}

/// Propagation unitaire par files de contraintes.
///
/// Chaque variable surveille les contraintes qui la mentionnent ; fixer une
/// variable remet ces contraintes en file. Une contrainte en file est
/// réévaluée à partir des domaines courants :
/// - `AtMost b` : conflit si plus de `b` vraies, sinon si exactement `b`
///   vraies, les libres passent à 0 ;
/// - `AtLeast b` : conflit si vraies + libres < `b`, sinon si égalité, les
///   libres passent à 1.
pub(crate) struct Propagator<'a> {
    problem: &'a Problem,
    watches: Vec<Vec<usize>>,
    queue: VecDeque<usize>,
    queued: Vec<bool>,
    scratch: Vec<VarId>,
    propagations: u64,
}

impl<'a> Propagator<'a> {
    pub fn new(problem: &'a Problem) -> Self {
        let mut watches = vec![Vec::new(); problem.num_vars];
        for (idx, constraint) in problem.constraints.iter().enumerate() {
            for &var in &constraint.vars {
                watches[var].push(idx);
            }
        }
        Self {
            problem,
            watches,
            queue: VecDeque::with_capacity(problem.constraints.len()),
            queued: vec![false; problem.constraints.len()],
            scratch: Vec::new(),
            propagations: 0,
        }
    }

    pub fn propagations(&self) -> u64 {
        self.propagations
    }

    pub fn enqueue_all(&mut self) {
        for idx in 0..self.problem.constraints.len() {
            self.enqueue(idx);
        }
    }

    #[inline]
    fn enqueue(&mut self, idx: usize) {
        if !self.queued[idx] {
            self.queued[idx] = true;
            self.queue.push_back(idx);
        }
    }

    fn enqueue_watchers(&mut self, var: VarId, except: Option<usize>) {
        for i in 0..self.watches[var].len() {
            let idx = self.watches[var][i];
            if Some(idx) != except {
                self.enqueue(idx);
            }
        }
    }

    /// Décision de branchement : fixe `var` puis met ses contraintes en file.
    pub fn decide(&mut self, domains: &mut Domains, var: VarId, value: bool) {
        domains.assign(var, value);
        self.enqueue_watchers(var, None);
    }

    fn clear_queue(&mut self) {
        while let Some(idx) = self.queue.pop_front() {
            self.queued[idx] = false;
        }
    }

    /// Propage jusqu'au point fixe ou jusqu'au premier conflit.
    pub fn propagate(&mut self, domains: &mut Domains) -> Result<(), Conflict> {
        let problem = self.problem;
        while let Some(idx) = self.queue.pop_front() {
            self.queued[idx] = false;
            let constraint = &problem.constraints[idx];

            let mut fixed_true = 0usize;
            self.scratch.clear();
            for &var in &constraint.vars {
                match domains.get(var) {
                    Value::True => fixed_true += 1,
                    Value::Unset => self.scratch.push(var),
                    Value::False => {}
                }
            }
            let unset = self.scratch.len();
            let bound = constraint.bound as usize;

            let forced = match constraint.relation {
                Relation::AtMost if fixed_true > bound => None,
                Relation::AtMost if fixed_true == bound && unset > 0 => Some(Some(false)),
                Relation::AtMost => Some(None),
                Relation::AtLeast if fixed_true + unset < bound => None,
                Relation::AtLeast if fixed_true + unset == bound && unset > 0 => Some(Some(true)),
                Relation::AtLeast => Some(None),
            };

            match forced {
                None => {
                    self.clear_queue();
                    return Err(Conflict { constraint: idx });
                }
                Some(Some(value)) => {
                    for i in 0..unset {
                        let var = self.scratch[i];
                        domains.assign(var, value);
                        self.propagations += 1;
                        self.enqueue_watchers(var, Some(idx));
                    }
                }
                Some(None) => {}
            }
        }
        Ok(())
    }
}
