use super::domain::{Domains, Value};
use super::types::{Problem, Relation, VarId};
use std::cmp::Reverse;

/// Borne agrégée offre/demande, vérifiée après chaque propagation réussie.
///
/// Les contraintes `AtLeast` retenues (demandes) sont deux à deux disjointes :
/// une variable vraie réduit au plus un déficit. Les contraintes `AtMost`
/// retenues (offres) le sont aussi, choisies des plus larges aux plus étroites.
/// Le nombre de nouvelles variables vraies utiles est alors au plus
/// `somme(min(reste de l'offre, libres utiles de l'offre)) + libres hors offre`.
/// S'il est inférieur au déficit total, aucune complétion n'existe.
///
/// Ne fixe rien : coupe seulement. L'ordre des variables et des valeurs reste
/// celui de la recherche.
pub(crate) struct PooledBound<'a> {
    problem: &'a Problem,
    demands: Vec<usize>,
    supplies: Vec<usize>,
    supply_of: Vec<Option<usize>>,
    useful: Vec<u64>,
}

impl<'a> PooledBound<'a> {
    pub fn new(problem: &'a Problem) -> Self {
        let mut in_demand = vec![false; problem.num_vars];
        let mut demands = Vec::new();
        for (idx, c) in problem.constraints.iter().enumerate() {
            if c.relation != Relation::AtLeast || c.bound == 0 {
                continue;
            }
            if c.vars.iter().any(|&v| in_demand[v]) {
                continue;
            }
            for &v in &c.vars {
                in_demand[v] = true;
            }
            demands.push(idx);
        }

        let mut candidates: Vec<usize> = problem
            .constraints
            .iter()
            .enumerate()
            .filter(|(_, c)| c.relation == Relation::AtMost)
            .map(|(idx, _)| idx)
            .collect();
        // tri stable : à taille égale, l'ordre de déclaration
        candidates.sort_by_key(|&idx| Reverse(problem.constraints[idx].vars.len()));

        let mut supply_of = vec![None; problem.num_vars];
        let mut supplies = Vec::new();
        for idx in candidates {
            let c = &problem.constraints[idx];
            if c.vars.iter().any(|&v| supply_of[v].is_some()) {
                continue;
            }
            for &v in &c.vars {
                supply_of[v] = Some(supplies.len());
            }
            supplies.push(idx);
        }

        Self {
            problem,
            useful: vec![0; supplies.len()],
            demands,
            supplies,
            supply_of,
        }
    }

    /// `false` si le déficit restant dépasse ce que les offres peuvent encore fournir.
    pub fn holds(&mut self, domains: &Domains) -> bool {
        if self.demands.is_empty() {
            return true;
        }
        self.useful.iter_mut().for_each(|n| *n = 0);

        let mut deficit = 0u64;
        let mut reachable = 0u64;
        for &idx in &self.demands {
            let c = &self.problem.constraints[idx];
            let t = count_true(domains, &c.vars);
            if t >= u64::from(c.bound) {
                continue;
            }
            deficit += u64::from(c.bound) - t;
            for &v in c.vars.iter().filter(|&&v| domains.is_unset(v)) {
                match self.supply_of[v] {
                    Some(g) => self.useful[g] += 1,
                    None => reachable += 1,
                }
            }
        }
        if deficit <= reachable {
            return true;
        }

        for (g, &idx) in self.supplies.iter().enumerate() {
            if self.useful[g] == 0 {
                continue;
            }
            let c = &self.problem.constraints[idx];
            let left = u64::from(c.bound).saturating_sub(count_true(domains, &c.vars));
            reachable += left.min(self.useful[g]);
            if reachable >= deficit {
                return true;
            }
        }
        false
    }
}

fn count_true(domains: &Domains, vars: &[VarId]) -> u64 {
    vars.iter().filter(|&&v| domains.get(v) == Value::True).count() as u64
}
