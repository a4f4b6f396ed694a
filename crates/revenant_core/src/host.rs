//! # Host Capabilities
//!
//! The pool never creates, shows or moves engine objects itself. It asks the
//! host through these two traits.

use std::rc::Rc;
use std::sync::Arc;

use revenant_shared::Placement;

/// An engine object that can live in a pool.
pub trait PooledInstance {
    /// Shows/enables the instance, or hides/disables it.
    fn set_active(&mut self, active: bool);

    /// Moves the instance to `placement`.
    fn set_placement(&mut self, placement: Placement);
}

/// Something a pool can manufacture fresh instances from.
pub trait EntityTemplate {
    /// What gets manufactured.
    type Instance: PooledInstance;

    /// Instantiates a new, independent instance.
    fn manufacture(&self) -> Self::Instance;
}

impl<T: EntityTemplate + ?Sized> EntityTemplate for Box<T> {
    type Instance = T::Instance;

    fn manufacture(&self) -> Self::Instance {
        (**self).manufacture()
    }
}

impl<T: EntityTemplate + ?Sized> EntityTemplate for Arc<T> {
    type Instance = T::Instance;

    fn manufacture(&self) -> Self::Instance {
        (**self).manufacture()
    }
}

impl<T: EntityTemplate + ?Sized> EntityTemplate for Rc<T> {
    type Instance = T::Instance;

    fn manufacture(&self) -> Self::Instance {
        (**self).manufacture()
    }
}

/// Template backed by a factory function.
///
/// ```rust,ignore
/// let spark = FnTemplate(|| Spark::new(Color::YELLOW));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct FnTemplate<F>(pub F);

impl<I, F> EntityTemplate for FnTemplate<F>
where
    I: PooledInstance,
    F: Fn() -> I,
{
    type Instance = I;

    #[inline]
    fn manufacture(&self) -> I {
        (self.0)()
    }
}
