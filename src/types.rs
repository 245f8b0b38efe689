use std::{
    any::{Any, TypeId},
    sync::Arc,
};

use crate::errors::DeliveryError;

/// Anything stored in or produced by the injector.
///
/// Delivered values are shared behind [`Arc`]s and may cross threads, so they
/// need to be `Send + Sync` and free of borrowed data.
pub trait Injectable: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Injectable for T {}

/// Type name and type id of a Rust type.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_id: TypeId,
    pub type_name: &'static str,
}

impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}

/// A single delivered value, type erased.
#[derive(Clone)]
pub struct Instance {
    info: TypeInfo,
    value: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    pub(crate) fn new<T: Injectable>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    pub(crate) fn from_arc<T: Injectable>(value: Arc<T>) -> Self {
        Instance {
            info: TypeInfo::of::<T>(),
            value,
        }
    }

    pub fn info(&self) -> TypeInfo {
        self.info
    }

    /// Recover the concrete type of the delivered value.
    pub fn downcast<T: Injectable>(&self) -> Result<Arc<T>, DeliveryError> {
        Arc::downcast::<T>(self.value.clone()).map_err(|_| DeliveryError::Downcast {
            required: std::any::type_name::<T>(),
            actual: self.info.type_name,
        })
    }

    /// Identity comparison: both instances refer to the same allocation.
    pub fn same_as(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Instance").field(&self.info.type_name).finish()
    }
}

/// Outcome of one delivery step.
///
/// `None` is the absent value a lenient delivery produces for tokens that were
/// never prepared.
pub type Delivered = Option<Instance>;
