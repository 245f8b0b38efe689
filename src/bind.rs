//! Call-site injection: wrapping callables whose trailing parameters are
//! resolved dependencies.

use std::marker::PhantomData;

use crate::{
    errors::DeliveryError,
    injector::Injector,
    resolve::{Ingredients, Resolve},
};

/// A callable split into a caller-supplied prefix and resolvable trailing
/// parameters.
///
/// Implemented for `Fn(C1, .., Cm, D1, .., Dn) -> Out` where every `Di`
/// implements [`Resolve`], for caller arities up to three and dependency
/// arities up to four. The split is carried in the trait's type parameters;
/// the bind site fixes the caller tuple and the dependency tuple follows from
/// the callable's signature.
pub trait BindTarget<Caller, Deps> {
    type Output;

    fn invoke(&self, caller: Caller, deps: Deps) -> Self::Output;
}

macro_rules! impl_bind_target {
    ([$($c:ident $cv:ident),*], [$($d:ident $dv:ident),*]) => {
        impl<Fun, Out, $($c,)* $($d,)*> BindTarget<($($c,)*), ($($d,)*)> for Fun
        where
            Fun: Fn($($c,)* $($d,)*) -> Out,
            $($d: Resolve,)*
        {
            type Output = Out;

            #[allow(unused_variables)]
            fn invoke(&self, caller: ($($c,)*), deps: ($($d,)*)) -> Out {
                let ($($cv,)*) = caller;
                let ($($dv,)*) = deps;
                (self)($($cv,)* $($dv,)*)
            }
        }
    };
}

impl_bind_target!([], []);
impl_bind_target!([], [D1 d1]);
impl_bind_target!([], [D1 d1, D2 d2]);
impl_bind_target!([], [D1 d1, D2 d2, D3 d3]);
impl_bind_target!([], [D1 d1, D2 d2, D3 d3, D4 d4]);
impl_bind_target!([C1 c1], []);
impl_bind_target!([C1 c1], [D1 d1]);
impl_bind_target!([C1 c1], [D1 d1, D2 d2]);
impl_bind_target!([C1 c1], [D1 d1, D2 d2, D3 d3]);
impl_bind_target!([C1 c1], [D1 d1, D2 d2, D3 d3, D4 d4]);
impl_bind_target!([C1 c1, C2 c2], []);
impl_bind_target!([C1 c1, C2 c2], [D1 d1]);
impl_bind_target!([C1 c1, C2 c2], [D1 d1, D2 d2]);
impl_bind_target!([C1 c1, C2 c2], [D1 d1, D2 d2, D3 d3]);
impl_bind_target!([C1 c1, C2 c2], [D1 d1, D2 d2, D3 d3, D4 d4]);
impl_bind_target!([C1 c1, C2 c2, C3 c3], []);
impl_bind_target!([C1 c1, C2 c2, C3 c3], [D1 d1]);
impl_bind_target!([C1 c1, C2 c2, C3 c3], [D1 d1, D2 d2]);
impl_bind_target!([C1 c1, C2 c2, C3 c3], [D1 d1, D2 d2, D3 d3]);
impl_bind_target!([C1 c1, C2 c2, C3 c3], [D1 d1, D2 d2, D3 d3, D4 d4]);

/// A bound callable produced by [`Injector::bind`].
///
/// Each call delivers the dependency tokens in declared order through the
/// shared planner and executor, then invokes the target with the caller
/// arguments followed by the resolved dependencies. Resolution is synchronous
/// even for async targets: the target's future is returned as the call
/// result, so `bound.call(args)?.await` works transparently.
pub struct Bound<'injector, F, Caller, Deps> {
    injector: &'injector Injector,
    target: F,
    strict: bool,
    marker: PhantomData<fn(Caller, Deps)>,
}

impl<'injector, F, Caller, Deps> Bound<'injector, F, Caller, Deps>
where
    F: BindTarget<Caller, Deps>,
    Deps: Ingredients,
{
    pub(crate) fn new(injector: &'injector Injector, target: F, strict: bool) -> Self {
        Bound {
            injector,
            target,
            strict,
            marker: PhantomData,
        }
    }

    /// Resolve the trailing dependencies and invoke the target.
    pub fn call(&self, caller: Caller) -> Result<F::Output, DeliveryError> {
        let tokens = Deps::tokens();
        let mut values = Vec::with_capacity(tokens.len());
        for token in &tokens {
            values.push(self.injector.deliver_token(token, self.strict)?);
        }
        let deps = Deps::from_delivered(values)?;
        Ok(self.target.invoke(caller, deps))
    }
}
