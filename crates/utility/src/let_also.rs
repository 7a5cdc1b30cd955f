/// Kotlin-style scope functions, handy at the end of iterator chains.
pub trait LetAlso: Sized {
    /// Passes `self` by value into `f` and returns its result.
    fn let_owned<R, F: FnOnce(Self) -> R>(self, f: F) -> R {
        f(self)
    }

    /// Passes a reference to `self` into `f` and returns its result.
    fn let_ref<R, F: FnOnce(&Self) -> R>(&self, f: F) -> R {
        f(self)
    }

    /// Runs `f` on a mutable reference and returns `self`.
    fn also<F: FnOnce(&mut Self)>(mut self, f: F) -> Self {
        f(&mut self);
        self
    }
}

impl<T> LetAlso for T {}
