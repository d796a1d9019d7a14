use anyhow::Result;

use brick_render::core::{App, AppControl, FrameCtx};
use brick_render::device::GpuInit;
use brick_render::logging::{init_logging, LoggingConfig};
use brick_render::window::{Runtime, RuntimeConfig};

mod board;

use board::Board;

/// Frames per full sweep of the progress bar.
const PROGRESS_PERIOD: u64 = 300;

struct Demo {
    board: Board,
}

impl App for Demo {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let percent = (ctx.frame_index % (PROGRESS_PERIOD + 1)) as f32 * 100.0 / PROGRESS_PERIOD as f32;
        let board = &self.board;

        ctx.render(|r| board.draw(r, percent))
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let board = Board::parse(board::LEVEL)?;
    log::info!("loaded {}x{} board", board.width(), board.height());

    let config = RuntimeConfig {
        title: "bricks".to_string(),
        initial_size: winit::dpi::LogicalSize::new(
            board.width() as f64 * 30.0,
            (board.height() + 1) as f64 * 30.0,
        ),
        surface_id: "canvas".to_string(),
    };

    Runtime::run(config, GpuInit::default(), Demo { board })
}
