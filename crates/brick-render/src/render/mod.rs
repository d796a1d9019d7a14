//! Rectangle rendering.
//!
//! `RectRenderer` owns one program and the uploaded meshes of every
//! [`ShapeKind`], and issues one transform upload + indexed draw per shape.
//!
//! Convention:
//! - shapes are placed on a grid of `coords::UNIT_SIZE` logical pixels
//! - the projection is built from the surface's display size each draw

mod renderer;
pub mod shader;
pub mod shapes;

pub use renderer::{placement_matrix, RectRenderer};
pub use shapes::{Mesh, Shape, ShapeKind};
