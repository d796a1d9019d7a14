/// 3×3 affine matrix for 2D transforms, stored column-major.
///
/// Element `(row, col)` lives at `m[col * 3 + row]`, which is the layout
/// `mat3` uniforms expect. Builders compose on the right, so
/// `Mat3::projection(w, h).translate(x, y).scale(sx, sy)` scales a point first,
/// then translates it, then projects it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat3 {
    pub m: [f32; 9],
}

impl Mat3 {
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.0, 0.0, 1.0,
        ],
    };

    /// Maps pixel space (origin top-left, +Y down) of a `width`×`height`
    /// surface onto clip space.
    pub fn projection(width: f32, height: f32) -> Self {
        Self {
            m: [
                2.0 / width, 0.0, 0.0, //
                0.0, -2.0 / height, 0.0, //
                -1.0, 1.0, 1.0,
            ],
        }
    }

    pub const fn translation(tx: f32, ty: f32) -> Self {
        Self {
            m: [
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                tx, ty, 1.0,
            ],
        }
    }

    pub const fn scaling(sx: f32, sy: f32) -> Self {
        Self {
            m: [
                sx, 0.0, 0.0, //
                0.0, sy, 0.0, //
                0.0, 0.0, 1.0,
            ],
        }
    }

    /// Returns `self · rhs`.
    pub fn multiply(&self, rhs: &Mat3) -> Mat3 {
        let a = &self.m;
        let b = &rhs.m;
        let mut out = [0.0f32; 9];
        for col in 0..3 {
            for row in 0..3 {
                out[col * 3 + row] = (0..3).map(|k| a[k * 3 + row] * b[col * 3 + k]).sum();
            }
        }
        Mat3 { m: out }
    }

    #[inline]
    pub fn translate(&self, tx: f32, ty: f32) -> Mat3 {
        self.multiply(&Mat3::translation(tx, ty))
    }

    #[inline]
    pub fn scale(&self, sx: f32, sy: f32) -> Mat3 {
        self.multiply(&Mat3::scaling(sx, sy))
    }

    /// Applies the transform to the point `(x, y, 1)`.
    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        let m = &self.m;
        (m[0] * x + m[3] * y + m[6], m[1] * x + m[4] * y + m[7])
    }

    /// Columns padded to 16 bytes, the uniform buffer layout of `mat3x3<f32>`.
    pub fn to_padded_cols(&self) -> [[f32; 4]; 3] {
        let m = &self.m;
        [
            [m[0], m[1], m[2], 0.0],
            [m[3], m[4], m[5], 0.0],
            [m[6], m[7], m[8], 0.0],
        ]
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}
