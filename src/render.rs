//! Rendering
//!
//! Draws boards handed over by the poller. Renderers are owned by a single
//! display thread; boards reach it only through a channel.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam::channel::{Receiver, RecvTimeoutError};

use crate::error::Result;
use crate::grid::{Cell, Grid};

const CLEAR_SCREEN: &str = "\x1b[2J";
const CURSOR_HOME: &str = "\x1b[H";

/// Something that can show a board
pub trait Renderer {
    fn render(&mut self, grid: &Grid) -> Result<()>;
}

/// Glyphs used for the two cell states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub alive: char,
    pub dead: char,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            alive: '█',
            dead: ' ',
        }
    }
}

impl Palette {
    pub fn glyph(&self, cell: Cell) -> char {
        match cell {
            Cell::Alive => self.alive,
            Cell::Dead => self.dead,
        }
    }
}

/// Redraws the board in place on an ANSI terminal
pub struct TerminalRenderer<W: Write> {
    out: W,
    palette: Palette,
    frames: u64,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, palette: Palette) -> Self {
        Self {
            out,
            palette,
            frames: 0,
        }
    }

    /// Boards drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, grid: &Grid) -> Result<()> {
        let mut frame = String::with_capacity((grid.width() + 1) * grid.height() * 3 + 8);
        if self.frames == 0 {
            frame.push_str(CLEAR_SCREEN);
        }
        frame.push_str(CURSOR_HOME);

        for row in grid.rows() {
            frame.extend(row.iter().map(|&cell| self.palette.glyph(cell)));
            frame.push('\n');
        }

        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        self.frames += 1;
        Ok(())
    }
}

/// Draw every board that arrives until `shutdown` is set or the sender hangs up
///
/// `tick` bounds how long a shutdown request can go unnoticed. Between
/// boards the last one stays on screen. Returns the number of boards drawn.
pub fn run_display<R: Renderer>(
    rx: &Receiver<Grid>,
    renderer: &mut R,
    shutdown: &AtomicBool,
    tick: Duration,
) -> Result<u64> {
    let mut drawn = 0;
    while !shutdown.load(Ordering::Relaxed) {
        match rx.recv_timeout(tick) {
            Ok(grid) => {
                renderer.render(&grid)?;
                drawn += 1;
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    Ok(drawn)
}
