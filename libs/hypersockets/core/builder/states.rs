//! Builder progress markers
//!
//! Each required input of the builder is a type parameter that is either
//! [`Missing`] or [`Provided`]. `build()` is only implemented once both the
//! URL and the router slots are `Provided`.

use std::marker::PhantomData;

/// Required input not supplied yet
#[derive(Debug)]
pub struct Missing;

/// Required input supplied
#[derive(Debug)]
pub struct Provided;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Missing {}
    impl Sealed for super::Provided {}
}

/// Implemented by [`Missing`] and [`Provided`] only.
pub trait Slot: sealed::Sealed {}
impl Slot for Missing {}
impl Slot for Provided {}

/// Zero-sized record of which slots are filled: `(url, router)`.
pub(crate) type Progress<U, Ro> = PhantomData<fn() -> (U, Ro)>;
