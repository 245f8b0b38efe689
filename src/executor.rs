//! Reverse walk of a delivery plan.

use crate::{
    errors::DeliveryError,
    plan::{Plan, Step},
    types::Delivered,
};

/// Produce the root value of a plan.
///
/// The plan lists steps in breadth-first discovery order, so walking it from
/// the back delivers the deepest discovered steps first: every step finds its
/// ingredients already produced. Which produced values belong to a step is
/// pure arity bookkeeping: the next `arity` unconsumed entries of the results
/// buffer are its arguments, reversed back into declared order.
///
/// A failing step aborts the walk immediately; values already produced for
/// sibling subtrees are dropped without cleanup.
pub(crate) fn execute(plan: &Plan) -> Result<Delivered, DeliveryError> {
    tracing::trace!(steps = plan.steps().len(), "executing delivery plan");

    let mut produced: Vec<Delivered> = Vec::with_capacity(plan.steps().len());
    let mut consumed = 0;

    for step in plan.steps().iter().rev() {
        match step {
            Step::Absent => produced.push(None),
            Step::Deliver { arity, injection } => {
                let values: Vec<Delivered> = produced[consumed..consumed + *arity]
                    .iter()
                    .rev()
                    .cloned()
                    .collect();
                let value = injection.deliver(values)?;
                consumed += *arity;
                produced.push(value);
            }
        }
    }

    // The last produced value belongs to the root token.
    Ok(produced.pop().flatten())
}
