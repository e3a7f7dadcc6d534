//! Type-erased registry entries for initialized feature slices.
//!
//! Each feature crate builds its state once at startup and hands it to the kernel as an
//! [`InitializedSlice`]; handlers look it up again by concrete type.

use std::any::{Any, TypeId, type_name};
use std::fmt::Debug;

/// Feature state that can be shared across request handlers.
pub trait FeatureSlice: Any + Debug + Send + Sync {
    /// Enables downcasting from the trait object.
    fn as_any(&self) -> &dyn Any;
}

/// An initialized feature keyed by its concrete type.
#[derive(Debug)]
pub struct InitializedSlice {
    pub id: TypeId,
    pub name: &'static str,
    pub state: Box<dyn FeatureSlice>,
}

impl InitializedSlice {
    pub fn new<T: FeatureSlice>(state: T) -> Self {
        Self { id: TypeId::of::<T>(), name: type_name::<T>(), state: Box::new(state) }
    }

    /// Returns the state if it has type `T`.
    #[must_use]
    pub fn downcast<T: FeatureSlice>(&self) -> Option<&T> {
        self.state.as_any().downcast_ref::<T>()
    }
}
