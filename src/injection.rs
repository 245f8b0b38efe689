//! Injection strategies: how one value gets produced.

use std::sync::Arc;

use crate::{
    errors::DeliveryError,
    resolve::{Construct, Factory, Ingredients},
    token::{SequenceKind, Token},
    types::{Delivered, Injectable, Instance},
};

type ProduceFn = Box<dyn Fn(Vec<Delivered>) -> Result<Instance, DeliveryError> + Send + Sync>;

/// How to produce one value for one token.
///
/// A closed set of strategies, matched exhaustively by the planner. Each
/// variant fixes its ordered ingredient tokens when it is constructed, so no
/// inspection happens at delivery time.
pub enum Injection {
    Value(ValueInjection),
    Class(ClassInjection),
    Lambda(LambdaInjection),
    Function(FunctionInjection),
    Sequence(SequenceInjection),
}

impl Injection {
    /// Ordered tokens that must be resolved before this injection can deliver.
    pub fn ingredients(&self) -> &[Token] {
        match self {
            Injection::Value(_) | Injection::Lambda(_) => &[],
            Injection::Class(class) => &class.ingredients,
            Injection::Function(function) => &function.ingredients,
            Injection::Sequence(sequence) => &sequence.elements,
        }
    }

    /// Produce the value from exactly `ingredients().len()` resolved values,
    /// in declared order. Never recurses into the resolver.
    pub(crate) fn deliver(&self, values: Vec<Delivered>) -> Result<Delivered, DeliveryError> {
        match self {
            Injection::Value(value) => Ok(Some(value.value.clone())),
            Injection::Class(class) => (class.construct)(values).map(Some),
            Injection::Lambda(lambda) => Ok(Some((lambda.produce)())),
            Injection::Function(function) => (function.call)(values).map(Some),
            Injection::Sequence(sequence) => sequence.deliver(values).map(Some),
        }
    }
}

/// Delivers the same shared instance every time.
pub struct ValueInjection {
    value: Instance,
}

impl ValueInjection {
    pub fn new<T: Injectable>(value: T) -> Self {
        ValueInjection {
            value: Instance::new(value),
        }
    }

    /// Share an instance the caller already holds, without re-wrapping it.
    pub fn from_arc<T: Injectable>(value: Arc<T>) -> Self {
        ValueInjection {
            value: Instance::from_arc(value),
        }
    }
}

/// Constructs a fresh instance through a [`Construct`] impl on every delivery.
pub struct ClassInjection {
    ingredients: Vec<Token>,
    construct: ProduceFn,
}

impl ClassInjection {
    pub fn of<T: Construct>() -> Self {
        ClassInjection {
            ingredients: T::Deps::tokens(),
            construct: Box::new(|values| {
                Ok(Instance::new(T::construct(T::Deps::from_delivered(values)?)))
            }),
        }
    }

    /// Construct `C` but deliver it converted into `T`, for registering a
    /// concrete implementation under a different token.
    pub fn of_as<T, C>() -> Self
    where
        T: Injectable,
        C: Construct + Into<T>,
    {
        ClassInjection {
            ingredients: C::Deps::tokens(),
            construct: Box::new(|values| {
                let constructed = C::construct(C::Deps::from_delivered(values)?);
                Ok(Instance::new::<T>(constructed.into()))
            }),
        }
    }
}

/// Invokes a zero-argument factory on every delivery.
///
/// The factory result is wrapped fresh each time; returning `()` or `None`
/// style values is valid, not an error.
pub struct LambdaInjection {
    produce: Box<dyn Fn() -> Instance + Send + Sync>,
}

impl LambdaInjection {
    pub fn new<T, F>(produce: F) -> Self
    where
        T: Injectable,
        F: Fn() -> T + Send + Sync + 'static,
    {
        LambdaInjection {
            produce: Box::new(move || Instance::new(produce())),
        }
    }
}

/// Invokes a factory whose parameters are resolved ingredients.
///
/// Covers plain functions, closures and bound methods (closures capturing
/// their receiver).
pub struct FunctionInjection {
    ingredients: Vec<Token>,
    call: ProduceFn,
}

impl FunctionInjection {
    pub fn new<F, Args>(factory: F) -> Self
    where
        F: Factory<Args>,
    {
        FunctionInjection {
            ingredients: F::tokens(),
            call: Box::new(move |values| Ok(Instance::new(factory.produce(values)?))),
        }
    }
}

/// Collects independently resolved element tokens into a fresh [`Sequence`].
pub struct SequenceInjection {
    kind: SequenceKind,
    elements: Vec<Token>,
}

impl SequenceInjection {
    pub fn new(kind: SequenceKind, elements: Vec<Token>) -> Self {
        SequenceInjection { kind, elements }
    }

    fn deliver(&self, values: Vec<Delivered>) -> Result<Instance, DeliveryError> {
        let items = match self.kind {
            SequenceKind::List | SequenceKind::Tuple => values,
            // Set semantics: keep the first occurrence of each distinct
            // instance, where identity is the shared allocation.
            SequenceKind::Set => {
                let mut kept: Vec<Delivered> = Vec::with_capacity(values.len());
                for value in values {
                    let duplicate = match &value {
                        Some(instance) => kept
                            .iter()
                            .flatten()
                            .any(|existing| existing.same_as(instance)),
                        None => kept.iter().any(|existing| existing.is_none()),
                    };
                    if !duplicate {
                        kept.push(value);
                    }
                }
                kept
            }
        };
        Ok(Instance::new(Sequence {
            kind: self.kind,
            items,
        }))
    }
}

/// A delivered container of resolved elements.
///
/// Every delivery of a sequence token builds a new `Sequence`; two deliveries
/// never share one, so holding on to an earlier result cannot affect a later
/// one.
pub struct Sequence {
    kind: SequenceKind,
    items: Vec<Delivered>,
}

impl Sequence {
    pub fn kind(&self) -> SequenceKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Typed access to the element at `index`; `None` if the slot is out of
    /// range, absent, or of a different type.
    pub fn get<T: Injectable>(&self, index: usize) -> Option<Arc<T>> {
        self.items.get(index)?.as_ref()?.downcast::<T>().ok()
    }

    /// Raw delivered slots, in element token order.
    pub fn iter(&self) -> impl Iterator<Item = &Delivered> {
        self.items.iter()
    }
}
