//! Redefines vectors and points with scalar = `f64`, the only scalar this
//! crate ever works with.

pub use cgmath::prelude::*;

macro_rules! f64_type {
    ($typename: ident) => {
        /// redefinition, scalar = f64
        pub type $typename = cgmath::$typename<f64>;
    };
    ($a: ident, $($b: ident), *) => { f64_type!($a); f64_type!($($b),*); }
}

f64_type!(Vector2, Vector3, Point2, Point3);
