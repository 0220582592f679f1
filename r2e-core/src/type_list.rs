//! Compile-time type list used to track which bean types are available in
//! the builder's dependency graph before `build_state()` erases them into a
//! single concrete state type.
//!
//! This is a minimal HList: [`TNil`] is the empty list, [`TCons<H, T>`] is a
//! non-empty list with head `H` and tail `T`. [`Contains`] / [`BuildableFrom`]
//! let bean constructors demand "some type in this list implements X" without
//! knowing the list's shape, resolved entirely at compile time via the
//! [`Here`]/[`There`] marker types.

/// The empty type list.
pub struct TNil;

/// A non-empty type list: head `H`, tail `T`.
pub struct TCons<H, T>(std::marker::PhantomData<(H, T)>);

/// Index marker: the target type is the head of the list.
pub struct Here;

/// Index marker: the target type is somewhere in the tail, found at `I`.
pub struct There<I>(std::marker::PhantomData<I>);

/// Evidence that type `X` appears somewhere in list `L`, located via index `I`.
pub trait Contains<X, I> {}

impl<X, T> Contains<X, Here> for TCons<X, T> {}

impl<X, H, T, I> Contains<X, There<I>> for TCons<H, T> where T: Contains<X, I> {}

/// Append one type list onto another, producing `Output`.
pub trait TAppend<Other> {
    type Output;
}

impl<Other> TAppend<Other> for TNil {
    type Output = Other;
}

impl<H, T, Other> TAppend<Other> for TCons<H, T>
where
    T: TAppend<Other>,
{
    type Output = TCons<H, <T as TAppend<Other>>::Output>;
}

/// Evidence that every dependency named by `Deps` is present in `L`.
///
/// `Idx` carries the (ignored) witness indices; callers never name it
/// explicitly, they just write `where R: AllSatisfied<MyDeps, _>`.
pub trait AllSatisfied<Deps, Idx> {}

impl<L> AllSatisfied<TNil, TNil> for L {}

impl<L, DH, DT, IH, IT> AllSatisfied<TCons<DH, DT>, TCons<IH, IT>> for L
where
    L: Contains<DH, IH>,
    L: AllSatisfied<DT, IT>,
{
}

/// Constructs a value of `Self` from beans registered in list `P`.
///
/// Implemented by `#[derive(Bean)]` / `#[derive(BeanState)]` generated code;
/// `Idx` is the compile-time witness that all declared `#[inject]` fields
/// are present in `P`.
pub trait BuildableFrom<P, Idx> {
    fn build_from(registry: &crate::beans::BeanRegistry) -> Result<Self, crate::beans::BeanError>
    where
        Self: Sized;
}
