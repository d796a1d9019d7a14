//! Shader sources and the input names the renderer resolves against them.

/// Transforms `a_position` by `u_matrix` into clip space.
pub const VERTEX_SHADER: &str = include_str!("shaders/rect.vert.wgsl");

/// Flat `u_color` fill.
pub const FRAGMENT_SHADER: &str = include_str!("shaders/rect.frag.wgsl");

pub const POSITION_ATTRIB: &str = "a_position";
pub const COLOR_UNIFORM: &str = "u_color";
pub const MATRIX_UNIFORM: &str = "u_matrix";
