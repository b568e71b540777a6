//! Rendering capability
//!
//! The environment hands a [`SceneFrame`] snapshot to its [`Presenter`] after
//! each render request. Presenters only read the snapshot; they never touch
//! the simulation.

use nalgebra::{Isometry2, Point2, Vector2};
use swingup_rl_core::Result;

/// Side length of the square display surface, in pixels
pub const DISPLAY_SIZE: u32 = 800;

/// Everything a presenter needs to draw one frame, in world coordinates (y up)
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    /// Track spans `0..track_length`
    pub track_length: f64,
    /// Height of the track line
    pub track_y: f64,
    /// Cart centre
    pub cart_center: [f64; 2],
    /// Cart half width and half height
    pub cart_half_extents: [f64; 2],
    /// Pole centre
    pub pole_center: [f64; 2],
    /// Pole rotation in radians
    pub pole_angle: f64,
    /// Pole half length and half thickness
    pub pole_half_extents: [f64; 2],
    /// Cart/pole joint position
    pub pivot: [f64; 2],
    /// Target position
    pub target: f64,
    /// Force applied during the last step
    pub force: f64,
    /// Largest force magnitude an action can produce
    pub force_scale: f64,
}

impl SceneFrame {
    /// Cart outline, counter-clockwise
    #[must_use]
    pub fn cart_corners(&self) -> [[f64; 2]; 4] {
        corners(self.cart_center, 0.0, self.cart_half_extents)
    }

    /// Pole outline, counter-clockwise
    #[must_use]
    pub fn pole_corners(&self) -> [[f64; 2]; 4] {
        corners(self.pole_center, self.pole_angle, self.pole_half_extents)
    }
}

fn corners(center: [f64; 2], angle: f64, half: [f64; 2]) -> [[f64; 2]; 4] {
    let frame = Isometry2::new(Vector2::new(center[0], center[1]), angle);
    [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)].map(|(sx, sy)| {
        let p = frame * Point2::new(sx * half[0], sy * half[1]);
        [p.x, p.y]
    })
}

/// Consumer of scene snapshots
pub trait Presenter: Send + Sync {
    /// Display one frame
    fn present(&mut self, frame: &SceneFrame) -> Result<()>;

    /// Release display resources
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Presenter used when rendering is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _frame: &SceneFrame) -> Result<()> {
        Ok(())
    }
}

#[cfg(feature = "visualization")]
pub use frames::FramePresenter;

#[cfg(feature = "visualization")]
mod frames {
    use std::path::{Path, PathBuf};
    use std::time::{Duration, Instant};

    use plotters::prelude::*;
    use swingup_rl_core::{RLError, Result};

    use super::{Presenter, SceneFrame, DISPLAY_SIZE};

    const BACKGROUND: RGBColor = RGBColor(243, 243, 243);
    const TARGET: RGBColor = RGBColor(255, 26, 26);
    const TRACK: RGBColor = RGBColor(90, 90, 90);
    const CART: RGBColor = RGBColor(33, 93, 191);
    const POLE: RGBColor = RGBColor(66, 135, 245);
    const FORCE_RANGE: RGBColor = RGBColor(179, 179, 179);
    const FORCE: RGBColor = RGBColor(255, 0, 0);

    /// Pixels per unit of force on the force indicator
    const FORCE_DRAW_SCALE: f64 = 1.0 / 12.0;

    /// Draws frames with plotters and writes them as numbered PNG files
    pub struct FramePresenter {
        dir: PathBuf,
        size: u32,
        frames_written: u64,
        interval: Option<Duration>,
        last_flush: Option<Instant>,
        closed: bool,
    }

    impl FramePresenter {
        /// Open a presenter writing into `dir`, created if missing.
        ///
        /// Flushes are paced to `frame_rate` per second; 0 writes as fast as
        /// frames arrive.
        pub fn new(dir: impl Into<PathBuf>, frame_rate: u32) -> Result<Self> {
            let dir = dir.into();
            std::fs::create_dir_all(&dir)?;
            tracing::info!(dir = %dir.display(), frame_rate, "frame presenter opened");

            Ok(Self {
                dir,
                size: DISPLAY_SIZE,
                frames_written: 0,
                interval: (frame_rate > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(frame_rate))),
                last_flush: None,
                closed: false,
            })
        }

        /// Output directory
        #[must_use]
        pub fn dir(&self) -> &Path {
            &self.dir
        }

        /// Number of frames flushed so far
        #[must_use]
        pub fn frames_written(&self) -> u64 {
            self.frames_written
        }

        #[allow(clippy::cast_possible_truncation)]
        fn to_screen(&self, point: [f64; 2]) -> (i32, i32) {
            (point[0].round() as i32, (f64::from(self.size) - point[1]).round() as i32)
        }

        fn draw(&self, frame: &SceneFrame, buffer: &mut [u8]) -> Result<()> {
            let root = BitMapBackend::with_buffer(buffer, (self.size, self.size)).into_drawing_area();
            root.fill(&BACKGROUND).map_err(render_error)?;

            let top = self.to_screen([frame.target, f64::from(self.size)]);
            let bottom = self.to_screen([frame.target, 0.0]);
            root.draw(&PathElement::new(vec![top, bottom], TARGET.stroke_width(2)))
                .map_err(render_error)?;

            let track = vec![
                self.to_screen([0.0, frame.track_y]),
                self.to_screen([frame.track_length, frame.track_y]),
            ];
            root.draw(&PathElement::new(track, TRACK.stroke_width(1)))
                .map_err(render_error)?;

            let cart: Vec<(i32, i32)> = frame.cart_corners().iter().map(|p| self.to_screen(*p)).collect();
            root.draw(&Polygon::new(cart, CART.filled())).map_err(render_error)?;

            let pole: Vec<(i32, i32)> = frame.pole_corners().iter().map(|p| self.to_screen(*p)).collect();
            root.draw(&Polygon::new(pole, POLE.filled())).map_err(render_error)?;

            root.draw(&Circle::new(self.to_screen(frame.pivot), 5, CART.filled()))
                .map_err(render_error)?;

            let [x, _] = frame.cart_center;
            let reach = FORCE_DRAW_SCALE * frame.force_scale;
            let range = vec![
                self.to_screen([x - reach, frame.track_y]),
                self.to_screen([x + reach, frame.track_y]),
            ];
            root.draw(&PathElement::new(range, FORCE_RANGE.stroke_width(4)))
                .map_err(render_error)?;

            if frame.force != 0.0 {
                let push = vec![
                    self.to_screen([x, frame.track_y]),
                    self.to_screen([x + FORCE_DRAW_SCALE * frame.force, frame.track_y]),
                ];
                root.draw(&PathElement::new(push, FORCE.stroke_width(4)))
                    .map_err(render_error)?;
            }

            root.present().map_err(render_error)
        }

        fn pace(&mut self) {
            if let Some(interval) = self.interval {
                if let Some(last) = self.last_flush {
                    let elapsed = last.elapsed();
                    if elapsed < interval {
                        std::thread::sleep(interval - elapsed);
                    }
                }
                self.last_flush = Some(Instant::now());
            }
        }
    }

    impl Presenter for FramePresenter {
        fn present(&mut self, frame: &SceneFrame) -> Result<()> {
            if self.closed {
                return Err(RLError::Render("presenter already closed".to_string()));
            }

            let mut buffer = vec![0_u8; (self.size * self.size * 3) as usize];
            self.draw(frame, &mut buffer)?;

            self.pace();
            let path = self.dir.join(format!("frame_{:06}.png", self.frames_written));
            image::save_buffer(&path, &buffer, self.size, self.size, image::ColorType::Rgb8)
                .map_err(render_error)?;
            self.frames_written += 1;
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            if !self.closed {
                self.closed = true;
                tracing::info!(frames = self.frames_written, "frame presenter closed");
            }
            Ok(())
        }
    }

    fn render_error(err: impl std::fmt::Display) -> RLError {
        RLError::Render(err.to_string())
    }

}
