//! Flattening a dependency tree into a delivery plan.

use std::{
    collections::{HashSet, VecDeque},
    sync::Arc,
};

use crate::{errors::DeliveryError, injection::Injection, registry::Registry, token::Token};

/// One step of a delivery plan.
pub(crate) enum Step {
    /// Deliver through an injection that needs `arity` already resolved values.
    Deliver {
        arity: usize,
        injection: Arc<Injection>,
    },
    /// Placeholder for an unprepared token in a lenient plan; produces the
    /// absent value.
    Absent,
}

/// A flat, ordered delivery plan for one token.
///
/// Steps are listed in breadth-first discovery order: the root first, then its
/// ingredients in declared order, then theirs, level by level. No parent or
/// child pointers are stored; the executor recovers the structure purely from
/// this order plus the per-step arities, which is why both have to be exact.
/// Plans are immutable once built and safe to reuse for any number of
/// deliveries.
pub(crate) struct Plan {
    steps: Vec<Step>,
}

impl Plan {
    pub fn build(registry: &Registry, root: &Token, strict: bool) -> Result<Plan, DeliveryError> {
        detect_cycles(registry, root)?;

        let mut steps = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(root.clone());

        while let Some(token) = queue.pop_front() {
            match registry.get(&token) {
                None if strict => return Err(DeliveryError::NotPrepared { token }),
                None => steps.push(Step::Absent),
                Some(injection) => {
                    let ingredients = injection.ingredients();
                    queue.extend(ingredients.iter().cloned());
                    steps.push(Step::Deliver {
                        arity: ingredients.len(),
                        injection: Arc::clone(injection),
                    });
                }
            }
        }

        tracing::debug!(token = %root, steps = steps.len(), strict, "built delivery plan");
        Ok(Plan { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl std::fmt::Debug for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plan")
            .field("steps", &self.steps.len())
            .finish()
    }
}

/// Walks the ingredient edges reachable from `root` depth-first and fails on
/// the first cycle, reporting the token chain that closes it.
///
/// Unprepared tokens are leaves here; whether they are an error is decided by
/// the breadth-first expansion above, per strict flag.
fn detect_cycles(registry: &Registry, root: &Token) -> Result<(), DeliveryError> {
    let mut finished = HashSet::new();
    let mut chain = Vec::new();
    return visit(registry, root, &mut finished, &mut chain);

    fn visit(
        registry: &Registry,
        token: &Token,
        finished: &mut HashSet<Token>,
        chain: &mut Vec<Token>,
    ) -> Result<(), DeliveryError> {
        if let Some(position) = chain.iter().position(|entry| entry == token) {
            let mut cycle = chain[position..].to_vec();
            cycle.push(token.clone());
            return Err(DeliveryError::Cycle { chain: cycle });
        }
        if finished.contains(token) {
            return Ok(());
        }
        let Some(injection) = registry.get(token) else {
            return Ok(());
        };

        chain.push(token.clone());
        for ingredient in injection.ingredients() {
            visit(registry, ingredient, finished, chain)?;
        }
        chain.pop();
        finished.insert(token.clone());
        Ok(())
    }
}
