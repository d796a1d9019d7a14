//! Fixed shape registry: one mesh and one fill color per drawable kind.

use crate::paint::Color;

/// Rectangle geometry drawn as a four-vertex triangle strip.
///
/// Vertices are `(0,0) (w,0) (0,h) (w,h)` so the strip `0,1,2,3` covers the
/// rectangle with two triangles.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: [f32; 8],
    pub indices: [u16; 4],
}

impl Mesh {
    pub const STRIP_INDICES: [u16; 4] = [0, 1, 2, 3];

    pub const fn rect(width: f32, height: f32) -> Self {
        Self {
            vertices: [
                0.0, 0.0, //
                width, 0.0, //
                0.0, height, //
                width, height,
            ],
            indices: Self::STRIP_INDICES,
        }
    }

    #[inline]
    pub const fn square(size: f32) -> Self {
        Self::rect(size, size)
    }

    #[inline]
    pub const fn vertex_count(&self) -> usize {
        self.vertices.len() / 2
    }

    /// `(width, height)` covered by the mesh.
    #[inline]
    pub const fn size(&self) -> (f32, f32) {
        (self.vertices[6], self.vertices[7])
    }
}

/// Mesh + color record for one [`ShapeKind`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Shape {
    pub mesh: Mesh,
    pub color: Color,
}

/// Every drawable the game knows about.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShapeKind {
    Brick,
    /// Violet enemy.
    CreatureA,
    /// Green enemy.
    CreatureB,
    Heart,
    /// Fill of the level progress bar; drawn with a horizontal scale.
    ProgressBar,
}

impl ShapeKind {
    pub const COUNT: usize = 5;

    pub const ALL: [ShapeKind; Self::COUNT] = [
        ShapeKind::Brick,
        ShapeKind::CreatureA,
        ShapeKind::CreatureB,
        ShapeKind::Heart,
        ShapeKind::ProgressBar,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn shape(self) -> &'static Shape {
        &SHAPES[self.index()]
    }
}

const BRICK_SIZE: f32 = 30.0;
const CREATURE_SIZE: f32 = 20.0;
const HEART_SIZE: f32 = 20.0;

// Indexed by `ShapeKind as usize`.
static SHAPES: [Shape; ShapeKind::COUNT] = [
    Shape {
        mesh: Mesh::square(BRICK_SIZE),
        color: Color::from_rgb_u8(13, 1, 13),
    },
    Shape {
        mesh: Mesh::square(CREATURE_SIZE),
        color: Color::from_rgb_u8(143, 0, 255),
    },
    Shape {
        mesh: Mesh::square(CREATURE_SIZE),
        color: Color::from_rgb_u8(26, 215, 40),
    },
    Shape {
        mesh: Mesh::square(HEART_SIZE),
        color: Color::from_rgb_u8(255, 0, 0),
    },
    Shape {
        mesh: Mesh::rect(100.0, 30.0),
        color: Color::BLACK,
    },
];
