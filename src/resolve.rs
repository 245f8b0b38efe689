//! Typed extraction of resolved ingredients.
//!
//! The planner and executor only move type erased [`Delivered`] values around.
//! The traits here are the registration time bridge back into concrete types:
//! a binding declares its ingredient tokens through them when it is prepared,
//! so the resolver never has to inspect anything at delivery time.

use std::sync::Arc;

use crate::{
    errors::DeliveryError,
    token::Token,
    types::{Delivered, Injectable},
};

/// One typed ingredient of a constructor, factory or bound target.
///
/// Implemented for `Arc<T>` (the ingredient is required) and for
/// `Option<Arc<T>>` (an absent value becomes `None` instead of failing the
/// delivery, which is what lenient deliveries produce for unprepared tokens).
pub trait Resolve: Sized + 'static {
    /// Token this ingredient is resolved under.
    fn token() -> Token;

    /// Convert a delivered value into the typed ingredient.
    fn from_delivered(value: Delivered) -> Result<Self, DeliveryError>;
}

impl<T: Injectable> Resolve for Arc<T> {
    fn token() -> Token {
        Token::of::<T>()
    }

    fn from_delivered(value: Delivered) -> Result<Self, DeliveryError> {
        match value {
            Some(instance) => instance.downcast::<T>(),
            None => Err(DeliveryError::Absent {
                token: Token::of::<T>(),
            }),
        }
    }
}

impl<T: Injectable> Resolve for Option<Arc<T>> {
    fn token() -> Token {
        Token::of::<T>()
    }

    fn from_delivered(value: Delivered) -> Result<Self, DeliveryError> {
        match value {
            Some(instance) => Ok(Some(instance.downcast::<T>()?)),
            None => Ok(None),
        }
    }
}

/// An ordered tuple of ingredients.
///
/// Tuple position is ingredient position: the Nth resolved value always lands
/// in the Nth tuple slot, which is what keeps positional constructor
/// arguments lined up across arbitrarily deep dependency trees.
pub trait Ingredients: Sized {
    /// Ingredient tokens in declaration order.
    fn tokens() -> Vec<Token>;

    /// Convert the resolved values, in declaration order, into the tuple.
    fn from_delivered(values: Vec<Delivered>) -> Result<Self, DeliveryError>;
}

impl Ingredients for () {
    fn tokens() -> Vec<Token> {
        Vec::new()
    }

    fn from_delivered(values: Vec<Delivered>) -> Result<Self, DeliveryError> {
        if values.is_empty() {
            Ok(())
        } else {
            Err(DeliveryError::ArityMismatch {
                expected: 0,
                actual: values.len(),
            })
        }
    }
}

macro_rules! impl_ingredients {
    ($($ty:ident $var:ident),+) => {
        impl<$($ty: Resolve),+> Ingredients for ($($ty,)+) {
            fn tokens() -> Vec<Token> {
                vec![$($ty::token()),+]
            }

            fn from_delivered(values: Vec<Delivered>) -> Result<Self, DeliveryError> {
                let expected = [$(stringify!($ty)),+].len();
                if values.len() != expected {
                    return Err(DeliveryError::ArityMismatch {
                        expected,
                        actual: values.len(),
                    });
                }
                let mut values = values.into_iter();
                $(let $var = $ty::from_delivered(values.next().flatten())?;)+
                Ok(($($var,)+))
            }
        }
    };
}

impl_ingredients!(A1 a1);
impl_ingredients!(A1 a1, A2 a2);
impl_ingredients!(A1 a1, A2 a2, A3 a3);
impl_ingredients!(A1 a1, A2 a2, A3 a3, A4 a4);
impl_ingredients!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
impl_ingredients!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);
impl_ingredients!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7);
impl_ingredients!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8);

/// Constructor contract for class bindings.
///
/// The associated `Deps` tuple is the declared ingredient list: each slot
/// names the token resolved for the matching constructor argument.
pub trait Construct: Injectable + Sized {
    type Deps: Ingredients;

    fn construct(deps: Self::Deps) -> Self;
}

/// A factory callable whose parameters are resolvable ingredients.
///
/// Blanket implemented for functions, closures and bound-method style
/// closures of up to eight parameters, each implementing [`Resolve`].
pub trait Factory<Args>: Send + Sync + 'static {
    type Output: Injectable;

    /// Parameter tokens in positional order.
    fn tokens() -> Vec<Token>;

    /// Invoke the factory with the resolved values.
    fn produce(&self, values: Vec<Delivered>) -> Result<Self::Output, DeliveryError>;
}

impl<F, Out> Factory<()> for F
where
    F: Fn() -> Out + Send + Sync + 'static,
    Out: Injectable,
{
    type Output = Out;

    fn tokens() -> Vec<Token> {
        Vec::new()
    }

    fn produce(&self, values: Vec<Delivered>) -> Result<Out, DeliveryError> {
        <() as Ingredients>::from_delivered(values)?;
        Ok((self)())
    }
}

macro_rules! impl_factory {
    ($($ty:ident $var:ident),+) => {
        impl<F, Out, $($ty),+> Factory<($($ty,)+)> for F
        where
            F: Fn($($ty),+) -> Out + Send + Sync + 'static,
            Out: Injectable,
            $($ty: Resolve,)+
        {
            type Output = Out;

            fn tokens() -> Vec<Token> {
                <($($ty,)+) as Ingredients>::tokens()
            }

            fn produce(&self, values: Vec<Delivered>) -> Result<Out, DeliveryError> {
                let ($($var,)+) = <($($ty,)+) as Ingredients>::from_delivered(values)?;
                Ok((self)($($var),+))
            }
        }
    };
}

impl_factory!(A1 a1);
impl_factory!(A1 a1, A2 a2);
impl_factory!(A1 a1, A2 a2, A3 a3);
impl_factory!(A1 a1, A2 a2, A3 a3, A4 a4);
impl_factory!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
impl_factory!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);
impl_factory!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7);
impl_factory!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8);
