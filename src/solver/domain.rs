use super::types::{Assignment, VarId};

/// Domaine d'une variable : encore libre, ou fixée.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Value {
    Unset,
    True,
    False,
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        if b {
            Value::True
        } else {
            Value::False
        }
    }
}

/// Domaines à plat indexés par `VarId`, avec une trace pour le retour arrière.
///
/// Chaque fixation est empilée sur `trail` ; `mark()` renvoie la hauteur
/// courante, `undo_to()` libère tout ce qui a été fixé au-delà. Les fixations
/// faites avant la première marque (niveau racine) ne sont jamais défaites.
#[derive(Debug, Clone)]
pub(crate) struct Domains {
    values: Vec<Value>,
    trail: Vec<VarId>,
}

impl Domains {
    pub fn new(num_vars: usize) -> Self {
        Self {
            values: vec![Value::Unset; num_vars],
            trail: Vec::with_capacity(num_vars),
        }
    }

    #[inline]
    pub fn get(&self, var: VarId) -> Value {
        self.values[var]
    }

    #[inline]
    pub fn is_unset(&self, var: VarId) -> bool {
        self.values[var] == Value::Unset
    }

    /// Fixe une variable libre.
    #[inline]
    pub fn assign(&mut self, var: VarId, value: bool) {
        debug_assert!(self.is_unset(var), "variable {var} already fixed");
        self.values[var] = Value::from(value);
        self.trail.push(var);
    }

    #[inline]
    pub fn mark(&self) -> usize {
        self.trail.len()
    }

    pub fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some(var) = self.trail.pop() {
                self.values[var] = Value::Unset;
            }
        }
    }

    /// Première variable libre à partir de `from` (ordre croissant des index).
    pub fn next_unset(&self, from: VarId) -> Option<VarId> {
        (from..self.values.len()).find(|&v| self.values[v] == Value::Unset)
    }

    pub fn all_fixed(&self) -> bool {
        self.trail.len() == self.values.len()
    }

    pub fn to_assignment(&self) -> Assignment {
        Assignment::from_values(self.values.iter().map(|v| *v == Value::True).collect())
    }
}
