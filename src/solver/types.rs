use std::time::Duration;

/// Index d'une variable booléenne dans l'univers du problème.
pub type VarId = usize;

/// Sens d'une contrainte linéaire `sum(vars) <op> bound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    AtMost,
    AtLeast,
}

/// Contrainte linéaire sur des variables booléennes (coefficients unitaires).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    pub vars: Vec<VarId>,
    pub relation: Relation,
    pub bound: u32,
}

impl LinearConstraint {
    pub fn at_most(vars: Vec<VarId>, bound: u32) -> Self {
        Self { vars, relation: Relation::AtMost, bound }
    }

    pub fn at_least(vars: Vec<VarId>, bound: u32) -> Self {
        Self { vars, relation: Relation::AtLeast, bound }
    }

    /// Force `var` à 0.
    pub fn fix_false(var: VarId) -> Self {
        Self::at_most(vec![var], 0)
    }

    /// Vérifie la contrainte sur une affectation totale.
    pub fn holds(&self, values: &Assignment) -> bool {
        let count = self.vars.iter().filter(|&&v| values.value(v)).count();
        match self.relation {
            Relation::AtMost => count <= self.bound as usize,
            Relation::AtLeast => count >= self.bound as usize,
        }
    }
}

/// Problème de faisabilité : `num_vars` booléens, conjonction de contraintes.
#[derive(Debug, Clone, Default)]
pub struct Problem {
    pub num_vars: usize,
    pub constraints: Vec<LinearConstraint>,
}

impl Problem {
    pub fn new(num_vars: usize) -> Self {
        Self { num_vars, constraints: Vec::new() }
    }

    pub fn add(&mut self, constraint: LinearConstraint) -> usize {
        debug_assert!(constraint.vars.iter().all(|&v| v < self.num_vars));
        self.constraints.push(constraint);
        self.constraints.len() - 1
    }

    /// Indices des contraintes violées par `values`.
    pub fn violated<'a>(&'a self, values: &'a Assignment) -> impl Iterator<Item = usize> + 'a {
        self.constraints
            .iter()
            .enumerate()
            .filter(move |(_, c)| !c.holds(values))
            .map(|(i, _)| i)
    }
}

/// Affectation totale 0/1 de l'univers, immuable une fois produite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<bool>,
}

impl Assignment {
    pub fn from_values(values: Vec<bool>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Valeur de `var`, `None` hors univers.
    pub fn get(&self, var: VarId) -> Option<bool> {
        self.values.get(var).copied()
    }

    pub(crate) fn value(&self, var: VarId) -> bool {
        self.values.get(var).copied().unwrap_or(false)
    }

    pub fn count_true(&self) -> usize {
        self.values.iter().filter(|v| **v).count()
    }
}

/// Options de résolution
#[derive(Debug, Clone, Copy)]
pub struct SolveOptions {
    /// Budget de temps mur pour la recherche.
    pub time_limit: Duration,
    /// Nombre de nœuds entre deux lectures de l'horloge.
    pub check_interval: u64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(5),
            check_interval: 1_000,
        }
    }
}

impl SolveOptions {
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_check_interval(mut self, check_interval: u64) -> Self {
        self.check_interval = check_interval.max(1);
        self
    }
}

/// Issue à trois voies de la recherche.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Feasible(Assignment),
    Infeasible,
    /// Budget épuisé sans preuve dans un sens ou dans l'autre.
    Unknown,
}

impl SolveOutcome {
    pub fn is_feasible(&self) -> bool {
        matches!(self, SolveOutcome::Feasible(_))
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            SolveOutcome::Feasible(a) => Some(a),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub nodes: u64,
    pub backtracks: u64,
    pub propagations: u64,
    /// Branches coupées par la borne offre/demande.
    pub pruned: u64,
    pub elapsed: Duration,
}

impl std::fmt::Display for SolveStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "nodes={} backtracks={} propagations={} pruned={} elapsed={:?}",
            self.nodes, self.backtracks, self.propagations, self.pruned, self.elapsed
        )
    }
}

#[derive(Debug, Clone)]
pub struct SolveReport {
    pub outcome: SolveOutcome,
    pub stats: SolveStats,
}
