use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;

use crate::{
    bind::{BindTarget, Bound},
    errors::{DeliveryError, PreparationError},
    executor,
    injection::{
        ClassInjection, FunctionInjection, Injection, LambdaInjection, Sequence,
        SequenceInjection, ValueInjection,
    },
    plan::Plan,
    registry::Registry,
    resolve::{Construct, Factory, Ingredients},
    token::Token,
    types::{Delivered, Injectable},
};

/// The injector: prepared injections plus the memoized delivery plans.
///
/// Configuration (the `prepare` family) takes `&mut self`, delivery takes
/// `&self`; configuring and delivering concurrently is thereby a borrow error
/// instead of a data race. The plan cache is internally locked, so delivering
/// from several threads at once is fine and each `(token, strict)` plan is
/// computed at most once.
pub struct Injector {
    registry: Registry,
    plans: Mutex<HashMap<(Token, bool), Arc<Plan>>>,
}

impl Injector {
    pub fn new() -> Self {
        Injector {
            registry: Registry::default(),
            plans: Mutex::new(HashMap::new()),
        }
    }

    /// Register `T` to construct itself through its [`Construct`] impl.
    pub fn prepare<T: Construct>(&mut self) {
        self.prepare_injection(Token::of::<T>(), Injection::Class(ClassInjection::of::<T>()));
    }

    /// Register concrete `C` under the token of `T`, converting on delivery.
    pub fn prepare_class<T, C>(&mut self)
    where
        T: Injectable,
        C: Construct + Into<T>,
    {
        self.prepare_injection(
            Token::of::<T>(),
            Injection::Class(ClassInjection::of_as::<T, C>()),
        );
    }

    /// Register a fixed instance; every delivery returns the same one.
    pub fn prepare_value<T: Injectable>(&mut self, value: T) {
        self.prepare_injection(Token::of::<T>(), Injection::Value(ValueInjection::new(value)));
    }

    /// Register an instance the caller already shares.
    pub fn prepare_arc<T: Injectable>(&mut self, value: Arc<T>) {
        self.prepare_injection(
            Token::of::<T>(),
            Injection::Value(ValueInjection::from_arc(value)),
        );
    }

    /// Register a zero-argument factory; each delivery invokes it afresh.
    pub fn prepare_lambda<T, F>(&mut self, produce: F)
    where
        T: Injectable,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.prepare_injection(
            Token::of::<T>(),
            Injection::Lambda(LambdaInjection::new(produce)),
        );
    }

    /// Register a factory whose parameters are resolved ingredients.
    ///
    /// The registration token is the factory's return type.
    pub fn prepare_factory<F, Args>(&mut self, factory: F)
    where
        F: Factory<Args>,
    {
        self.prepare_injection(
            Token::of::<F::Output>(),
            Injection::Function(FunctionInjection::new(factory)),
        );
    }

    /// Register the element tokens delivered for a sequence token.
    ///
    /// The container shape is taken from the token itself; a plain type token
    /// is a preparation error.
    pub fn prepare_sequence(
        &mut self,
        token: Token,
        elements: Vec<Token>,
    ) -> Result<(), PreparationError> {
        let Some(kind) = token.sequence_kind() else {
            return Err(PreparationError::NotASequenceToken { token });
        };
        self.prepare_injection(
            token,
            Injection::Sequence(SequenceInjection::new(kind, elements)),
        );
        Ok(())
    }

    /// Register an explicit injection under a token.
    ///
    /// Re-preparing a token replaces its injection; plans already cached keep
    /// delivering with the injection they were built against.
    pub fn prepare_injection(&mut self, token: Token, injection: Injection) {
        self.registry.insert(token, injection);
    }

    /// Strictly deliver a value for the type token of `T`.
    pub fn deliver<T: Injectable>(&self) -> Result<Arc<T>, DeliveryError> {
        let token = Token::of::<T>();
        match self.deliver_token(&token, true)? {
            Some(instance) => instance.downcast(),
            None => Err(DeliveryError::Absent { token }),
        }
    }

    /// Leniently deliver a value for the type token of `T`.
    ///
    /// An unprepared token, anywhere in the tree, produces the absent value
    /// instead of failing; an absent root becomes `Ok(None)`.
    pub fn deliver_opt<T: Injectable>(&self) -> Result<Option<Arc<T>>, DeliveryError> {
        match self.deliver_token(&Token::of::<T>(), false)? {
            Some(instance) => Ok(Some(instance.downcast()?)),
            None => Ok(None),
        }
    }

    /// Strictly deliver the container registered under a sequence token.
    pub fn deliver_sequence(&self, token: &Token) -> Result<Arc<Sequence>, DeliveryError> {
        match self.deliver_token(token, true)? {
            Some(instance) => instance.downcast(),
            None => Err(DeliveryError::Absent {
                token: token.clone(),
            }),
        }
    }

    /// Deliver a value for an arbitrary token. All typed forms route through
    /// here.
    pub fn deliver_token(&self, token: &Token, strict: bool) -> Result<Delivered, DeliveryError> {
        let plan = self.plan_for(token, strict)?;
        executor::execute(&plan)
    }

    fn plan_for(&self, token: &Token, strict: bool) -> Result<Arc<Plan>, DeliveryError> {
        // The lock is held across plan construction: concurrent deliveries of
        // the same key serialize and share one plan. Failed builds are not
        // cached.
        let mut plans = self.plans.lock();
        if let Some(plan) = plans.get(&(token.clone(), strict)) {
            return Ok(Arc::clone(plan));
        }
        let plan = Arc::new(Plan::build(&self.registry, token, strict)?);
        plans.insert((token.clone(), strict), Arc::clone(&plan));
        Ok(plan)
    }

    /// Independent injector with a copy of the current bindings.
    ///
    /// The branch starts with an empty plan cache; neither side sees the
    /// other's later preparations.
    pub fn branch(&self) -> Injector {
        Injector {
            registry: self.registry.branch(),
            plans: Mutex::new(HashMap::new()),
        }
    }

    /// Wrap a callable so its trailing [`Resolve`](crate::Resolve) parameters
    /// are delivered strictly at call time.
    ///
    /// The caller-supplied prefix is picked with the `Caller` tuple type
    /// parameter, the type level rendition of a "skip this many parameters"
    /// count.
    pub fn bind<Caller, Deps, F>(&self, target: F) -> Bound<'_, F, Caller, Deps>
    where
        F: BindTarget<Caller, Deps>,
        Deps: Ingredients,
    {
        Bound::new(self, target, true)
    }

    /// Like [`bind`](Injector::bind) but dependencies resolve leniently:
    /// unprepared tokens become absent values instead of failing the call.
    pub fn bind_lenient<Caller, Deps, F>(&self, target: F) -> Bound<'_, F, Caller, Deps>
    where
        F: BindTarget<Caller, Deps>,
        Deps: Ingredients,
    {
        Bound::new(self, target, false)
    }
}

impl Default for Injector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injector")
            .field("bindings", &self.registry.len())
            .finish()
    }
}
