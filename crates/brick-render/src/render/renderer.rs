use crate::coords::{grid_to_pixels, progress_scale, Viewport};
use crate::gfx::{
    AttribLocation, BufferPair, FrameStatus, GraphicsContext, InitError, Primitive, ProgramId,
    SurfaceHost, UniformLocation, VertexLayout,
};
use crate::math::Mat3;

use super::shader::{COLOR_UNIFORM, FRAGMENT_SHADER, MATRIX_UNIFORM, POSITION_ATTRIB, VERTEX_SHADER};
use super::shapes::ShapeKind;

/// Program inputs resolved once after linking.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct Locations {
    pub position: AttribLocation,
    pub color: UniformLocation,
    pub matrix: UniformLocation,
}

impl Locations {
    fn resolve<C: GraphicsContext>(context: &C, program: ProgramId) -> Result<Self, InitError> {
        Ok(Self {
            position: context
                .attrib_location(program, POSITION_ATTRIB)
                .ok_or(InitError::MissingLocation(POSITION_ATTRIB))?,
            color: context
                .uniform_location(program, COLOR_UNIFORM)
                .ok_or(InitError::MissingLocation(COLOR_UNIFORM))?,
            matrix: context
                .uniform_location(program, MATRIX_UNIFORM)
                .ok_or(InitError::MissingLocation(MATRIX_UNIFORM))?,
        })
    }
}

/// Transform placing a shape's mesh at grid cell `(col, row)`.
///
/// `projection(display) · translate(col·30, row·30) · scale(scale_x, 1)`.
/// Degenerate display sizes are treated as 1 px to keep the matrix finite.
pub fn placement_matrix(display: Viewport, col: i32, row: i32, scale_x: Option<f32>) -> Mat3 {
    let offset = grid_to_pixels(col, row);
    let matrix =
        Mat3::projection(display.width.max(1.0), display.height.max(1.0)).translate(offset.x, offset.y);

    match scale_x {
        Some(sx) => matrix.scale(sx, 1.0),
        None => matrix,
    }
}

/// Draws the game's fixed shapes through a single shader program.
///
/// A value of this type only exists once [`initialize`](Self::initialize)
/// succeeded; there is no separate "not ready" state to check.
///
/// Per frame:
/// 1. [`begin_frame`](Self::begin_frame)
/// 2. any number of `draw_*` calls
/// 3. [`end_frame`](Self::end_frame)
///
/// Drawing outside of that bracket is not rejected; what ends up on screen is
/// up to the backend's leftover state.
pub struct RectRenderer<C: GraphicsContext> {
    context: C,
    program: ProgramId,
    locations: Locations,

    // Indexed by `ShapeKind::index`.
    buffers: [BufferPair; ShapeKind::COUNT],

    warned_erase: bool,
    warned_wait: bool,
}

impl<C: GraphicsContext> RectRenderer<C> {
    /// Opens `surface_id` on `host`, builds the program and uploads every mesh.
    ///
    /// Nothing is allocated when the surface or its context is unavailable.
    pub fn initialize<H>(host: &mut H, surface_id: &str) -> Result<Self, InitError>
    where
        H: SurfaceHost<Context = C>,
    {
        let mut context = host.open_context(surface_id)?;

        let program = context.compile_and_link(VERTEX_SHADER, FRAGMENT_SHADER)?;
        let locations = Locations::resolve(&context, program)?;
        log::debug!("rect program linked: {program:?} {locations:?}");

        let buffers = ShapeKind::ALL.map(|kind| {
            let mesh = kind.shape().mesh;
            context.create_buffer_pair(&mesh.vertices, &mesh.indices)
        });
        log::debug!("uploaded {} shape meshes", buffers.len());

        context.resize_to_display();

        let (w, h) = context.backing_size();
        log::info!("renderer ready on `{surface_id}` ({w}x{h})");

        Ok(Self {
            context,
            program,
            locations,
            buffers,
            warned_erase: false,
            warned_wait: false,
        })
    }

    /// Re-syncs the backing resolution with the surface's display size.
    ///
    /// The renderer never watches for size changes itself; call this whenever
    /// the host window or zoom may have changed.
    pub fn resize(&mut self) {
        if self.context.resize_to_display() {
            let (w, h) = self.context.backing_size();
            log::debug!("surface resized to {w}x{h}");
        }
    }

    /// Full-surface viewport, cleared color buffer, shared program bound.
    pub fn begin_frame(&mut self) {
        let (w, h) = self.context.backing_size();
        self.context.set_viewport(0, 0, w, h);
        self.context.clear();
        self.context.use_program(self.program);
    }

    /// Presents everything drawn since [`begin_frame`](Self::begin_frame).
    pub fn end_frame(&mut self) -> FrameStatus {
        let status = self.context.present();
        match status {
            FrameStatus::Presented => {}
            FrameStatus::Reconfigured | FrameStatus::Skipped => {
                log::debug!("frame not presented: {status:?}");
            }
            FrameStatus::Fatal => log::error!("surface failed fatally while presenting"),
        }
        status
    }

    /// Runs `f` against this renderer immediately.
    pub fn tick<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self),
    {
        f(self)
    }

    /// Draws `kind` at grid cell `(col, row)`.
    ///
    /// `scale_x` stretches the mesh horizontally from its left edge; `None`
    /// draws it at natural width.
    pub fn draw_shape(&mut self, kind: ShapeKind, col: i32, row: i32, scale_x: Option<f32>) {
        let shape = kind.shape();
        let Locations { position, color, matrix } = self.locations;

        self.context.bind_buffer_pair(self.buffers[kind.index()]);
        self.context.vertex_attrib_pointer(position, VertexLayout::POSITION_2D);
        self.context.uniform_4f(color, shape.color.to_array());

        let transform = placement_matrix(self.context.display_size(), col, row, scale_x);
        self.context.uniform_mat3(matrix, &transform);

        self.context
            .draw_elements(Primitive::TriangleStrip, shape.mesh.indices.len() as u32);
    }

    pub fn draw_brick(&mut self, col: i32, row: i32) {
        self.draw_shape(ShapeKind::Brick, col, row, None);
    }

    /// Strokes are drawn as bricks.
    pub fn draw_stroke(&mut self, col: i32, row: i32) {
        self.draw_brick(col, row);
    }

    /// Plates are drawn as bricks.
    pub fn draw_plate(&mut self, col: i32, row: i32) {
        self.draw_brick(col, row);
    }

    pub fn draw_creature_a(&mut self, col: i32, row: i32) {
        self.draw_shape(ShapeKind::CreatureA, col, row, None);
    }

    pub fn draw_creature_b(&mut self, col: i32, row: i32) {
        self.draw_shape(ShapeKind::CreatureB, col, row, None);
    }

    pub fn draw_heart(&mut self, col: i32, row: i32) {
        self.draw_shape(ShapeKind::Heart, col, row, None);
    }

    /// Draws the progress bar filled to `percent` (0–100, not clamped).
    pub fn draw_progress(&mut self, col: i32, row: i32, percent: f32) {
        self.draw_shape(ShapeKind::ProgressBar, col, row, Some(progress_scale(percent)));
    }

    /// Not supported: draws nothing.
    pub fn erase_area(&mut self, _col: i32, _row: i32, _len: u32) {
        warn_unsupported(&mut self.warned_erase, "erase_area");
    }

    /// Not supported: draws nothing.
    pub fn draw_wait_indicator(&mut self, _col: i32, _row: i32) {
        warn_unsupported(&mut self.warned_wait, "draw_wait_indicator");
    }

    #[inline]
    pub fn context(&self) -> &C {
        &self.context
    }

    #[inline]
    pub fn display_size(&self) -> Viewport {
        self.context.display_size()
    }
}

fn warn_unsupported(warned: &mut bool, op: &str) {
    if !*warned {
        log::debug!("RectRenderer: {op} is not supported; ignored");
        *warned = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::recording::{Call, RecordingContext, RecordingHost};

    const SURFACE: &str = "canvas";

    fn ready() -> (RecordingHost, RectRenderer<RecordingContext>) {
        let mut host = RecordingHost::new().with_surface(SURFACE, Viewport::new(300.0, 300.0));
        let renderer = RectRenderer::initialize(&mut host, SURFACE).expect("initialize");
        host.log().borrow_mut().clear();
        (host, renderer)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    // ── initialize ────────────────────────────────────────────────────────

    #[test]
    fn initialize_uploads_one_buffer_pair_per_shape() {
        let mut host = RecordingHost::new().with_surface(SURFACE, Viewport::new(300.0, 300.0));
        RectRenderer::initialize(&mut host, SURFACE).expect("initialize");

        let log = host.log();
        let log = log.borrow();
        let uploads: Vec<_> = log
            .iter()
            .filter_map(|c| match c {
                Call::CreateBufferPair { pair, vertices, indices } => Some((pair, vertices, indices)),
                _ => None,
            })
            .collect();

        assert_eq!(uploads.len(), ShapeKind::COUNT);
        for (pair, vertices, indices) in uploads {
            assert_ne!(pair.vertex, pair.index);
            assert_eq!(vertices.len(), 8);
            assert_eq!(indices, &vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn initialize_links_once_and_syncs_size() {
        let mut host = RecordingHost::new().with_surface(SURFACE, Viewport::new(320.0, 200.0));
        let renderer = RectRenderer::initialize(&mut host, SURFACE).expect("initialize");

        let log = host.log();
        let log = log.borrow();
        let links = log.iter().filter(|c| matches!(c, Call::CompileAndLink)).count();
        assert_eq!(links, 1);
        assert!(matches!(log.last(), Some(Call::ResizeToDisplay { changed: true })));
        assert_eq!(renderer.context().backing_size(), (320, 200));
    }

    #[test]
    fn initialize_without_graphics_support_creates_nothing() {
        let mut host = RecordingHost::new().without_context(SURFACE, Viewport::new(300.0, 300.0));
        let result = RectRenderer::initialize(&mut host, SURFACE);

        assert!(matches!(result, Err(InitError::ContextUnavailable { .. })));
        assert!(host.log().borrow().is_empty());
    }

    #[test]
    fn initialize_unknown_surface_fails() {
        let mut host = RecordingHost::new().with_surface(SURFACE, Viewport::new(300.0, 300.0));
        let result = RectRenderer::initialize(&mut host, "missing");

        assert!(matches!(result, Err(InitError::SurfaceNotFound(id)) if id == "missing"));
        assert!(host.log().borrow().is_empty());
    }

    #[test]
    fn initialize_link_failure_uploads_no_buffers() {
        let mut host = RecordingHost::new()
            .with_surface(SURFACE, Viewport::new(300.0, 300.0))
            .failing_link();
        let result = RectRenderer::initialize(&mut host, SURFACE);

        assert!(matches!(result, Err(InitError::Program(_))));
        let log = host.log();
        assert!(!log.borrow().iter().any(|c| matches!(c, Call::CreateBufferPair { .. })));
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_matches_backing_to_display() {
        let (host, mut renderer) = ready();
        host.set_display(SURFACE, Viewport::new(640.0, 480.0));

        renderer.resize();

        assert_eq!(renderer.context().backing_size(), (640, 480));
        assert_eq!(renderer.display_size(), Viewport::new(640.0, 480.0));
    }

    #[test]
    fn resize_scales_backing_by_scale_factor() {
        let (host, mut renderer) = ready();
        host.set_display(SURFACE, Viewport::new(600.0, 360.0));
        host.set_scale_factor(SURFACE, 2.0);

        renderer.resize();

        let context = renderer.context();
        assert_eq!(context.backing_size(), (1200, 720));
        assert_eq!(
            context.backing_size(),
            renderer.display_size().to_physical(context.scale_factor())
        );
    }

    #[test]
    fn projection_stays_in_display_pixels_when_scaled() {
        let (host, mut renderer) = ready();
        host.set_display(SURFACE, Viewport::new(600.0, 360.0));
        host.set_scale_factor(SURFACE, 2.0);
        renderer.resize();

        renderer.begin_frame();
        renderer.draw_brick(0, 0);

        let log = host.log();
        assert!(log.borrow().contains(&Call::SetViewport { x: 0, y: 0, width: 1200, height: 720 }));
        let draw = &host.draws()[0];
        assert_eq!(draw.matrix, placement_matrix(Viewport::new(600.0, 360.0), 0, 0, None));
    }

    #[test]
    fn resize_without_change_is_quiet() {
        let (host, mut renderer) = ready();
        renderer.resize();
        assert!(matches!(
            host.log().borrow().as_slice(),
            [Call::ResizeToDisplay { changed: false }]
        ));
    }

    // ── begin_frame ───────────────────────────────────────────────────────

    #[test]
    fn begin_frame_sets_viewport_clears_and_binds_program() {
        let (host, mut renderer) = ready();
        renderer.begin_frame();

        let log = host.log();
        let log = log.borrow();
        assert!(matches!(
            log.as_slice(),
            [
                Call::SetViewport { x: 0, y: 0, width: 300, height: 300 },
                Call::Clear,
                Call::UseProgram(_),
            ]
        ));
    }

    // ── draw_shape ────────────────────────────────────────────────────────

    #[test]
    fn draw_shape_issues_full_protocol_in_order() {
        let (host, mut renderer) = ready();
        renderer.draw_heart(1, 1);

        let log = host.log();
        let log = log.borrow();
        assert!(matches!(
            log.as_slice(),
            [
                Call::BindBufferPair(_),
                Call::VertexAttribPointer { layout: VertexLayout::POSITION_2D, .. },
                Call::Uniform4f { .. },
                Call::UniformMat3 { .. },
                Call::DrawElements { primitive: Primitive::TriangleStrip, count: 4 },
            ]
        ));
    }

    #[test]
    fn origin_cell_places_every_shape_at_zero() {
        let (host, mut renderer) = ready();
        for kind in ShapeKind::ALL {
            renderer.draw_shape(kind, 0, 0, None);
        }

        let draws = host.draws();
        assert_eq!(draws.len(), ShapeKind::COUNT);
        let projection = Mat3::projection(300.0, 300.0);
        for draw in draws {
            assert_eq!(draw.matrix, projection.translate(0.0, 0.0));
            let (x, y) = draw.matrix.transform_point(0.0, 0.0);
            assert!(approx(x, -1.0) && approx(y, 1.0));
        }
    }

    #[test]
    fn grid_cells_translate_by_unit_size() {
        let (host, mut renderer) = ready();
        renderer.draw_creature_a(4, 7);

        let draws = host.draws();
        assert_eq!(draws[0].matrix, Mat3::projection(300.0, 300.0).translate(120.0, 210.0));
    }

    #[test]
    fn each_shape_binds_its_own_buffers() {
        let (host, mut renderer) = ready();
        for kind in ShapeKind::ALL {
            renderer.draw_shape(kind, 0, 0, None);
        }

        let draws = host.draws();
        for (kind, draw) in ShapeKind::ALL.iter().zip(&draws) {
            assert_eq!(draw.buffers, Some(renderer.buffers[kind.index()]));
            assert_eq!(draw.color, Some(kind.shape().color.to_array()));
        }
        for (i, a) in draws.iter().enumerate() {
            for b in &draws[i + 1..] {
                assert_ne!(a.buffers, b.buffers);
            }
        }
    }

    #[test]
    fn aliases_draw_bricks() {
        let (host, mut renderer) = ready();
        renderer.draw_stroke(1, 0);
        renderer.draw_plate(2, 0);

        let brick = Some(renderer.buffers[ShapeKind::Brick.index()]);
        assert!(host.draws().iter().all(|d| d.buffers == brick));
    }

    // ── draw_progress ─────────────────────────────────────────────────────

    #[test]
    fn progress_percent_maps_to_horizontal_scale() {
        let (host, mut renderer) = ready();
        for percent in [0.0, 50.0, 100.0] {
            renderer.draw_progress(0, 0, percent);
        }

        let projection = Mat3::projection(300.0, 300.0);
        let draws = host.draws();
        for (draw, sx) in draws.iter().zip([0.0, 0.5, 1.0]) {
            assert_eq!(draw.matrix, projection.translate(0.0, 0.0).scale(sx, 1.0));
        }
    }

    #[test]
    fn progress_is_not_clamped() {
        let (host, mut renderer) = ready();
        renderer.draw_progress(0, 0, 150.0);

        let m = host.draws()[0].matrix;
        let unscaled = Mat3::projection(300.0, 300.0);
        assert!(approx(m.m[0], unscaled.m[0] * 1.5));
    }

    // ── stubs ─────────────────────────────────────────────────────────────

    #[test]
    fn stubs_issue_no_calls() {
        let (host, mut renderer) = ready();
        renderer.erase_area(1, 1, 3);
        renderer.draw_wait_indicator(2, 2);
        renderer.draw_wait_indicator(2, 2);
        assert!(host.log().borrow().is_empty());
    }

    #[test]
    fn each_stub_notes_itself_once() {
        let (_host, mut renderer) = ready();

        renderer.erase_area(1, 1, 3);
        assert!(renderer.warned_erase);
        assert!(!renderer.warned_wait);

        renderer.draw_wait_indicator(2, 2);
        assert!(renderer.warned_wait);
    }

    // ── scenario ──────────────────────────────────────────────────────────

    #[test]
    fn frame_with_brick_and_progress() {
        let (host, mut renderer) = ready();

        renderer.begin_frame();
        renderer.draw_brick(2, 3);
        renderer.draw_progress(0, 0, 75.0);
        assert_eq!(renderer.end_frame(), FrameStatus::Presented);

        let draws = host.draws();
        assert_eq!(draws.len(), 2);
        assert!(draws.iter().all(|d| d.count == 4));

        let brick = &draws[0];
        let [r, g, b, a] = brick.color.expect("brick color");
        assert!(approx(r, 0.051) && approx(g, 0.004) && approx(b, 0.051) && a == 1.0);
        assert_eq!(brick.matrix, Mat3::projection(300.0, 300.0).translate(60.0, 90.0));

        let bar = &draws[1];
        assert_eq!(bar.color, Some([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(
            bar.matrix,
            Mat3::projection(300.0, 300.0).translate(0.0, 0.0).scale(0.75, 1.0)
        );

        assert!(matches!(host.log().borrow().last(), Some(Call::Present)));
    }

    #[test]
    fn tick_runs_callback_immediately() {
        let (host, mut renderer) = ready();
        renderer.tick(|r| r.draw_heart(0, 0));
        assert_eq!(host.draws().len(), 1);
    }

    #[test]
    fn placement_matrix_guards_zero_display() {
        let m = placement_matrix(Viewport::new(0.0, 0.0), 1, 1, None);
        assert!(m.m.iter().all(|v| v.is_finite()));
    }
}
