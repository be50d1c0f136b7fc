//! B-spline core algorithms: knot vectors and Cox–de Boor basis functions.

pub mod basis;
pub mod knot;

pub use basis::{basis_function, BasisTable};
pub use knot::{check_degree, parse_knots, KnotType, KnotVector};
