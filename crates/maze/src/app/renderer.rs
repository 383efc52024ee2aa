use std::sync::Arc;

use intent::{Control, SessionStatus};
use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use super::controls::{ControlBar, ScreenRect, CONTROL_BAR_HEIGHT_PX};
use super::walker::{GridWalker, Tile};

pub const TILE_SIZE_PX: u32 = 16;
pub const STATUS_STRIP_HEIGHT_PX: u32 = 6;

const CLEAR_COLOR: [u8; 4] = [16, 18, 24, 255];
const OUTSIDE_COLOR: [u8; 4] = [8, 8, 12, 255];
const FLOOR_COLOR: [u8; 4] = [58, 62, 74, 255];
const WALL_COLOR: [u8; 4] = [112, 83, 58, 255];
const OBSTACLE_COLOR: [u8; 4] = [220, 70, 60, 255];
const WALKER_COLOR: [u8; 4] = [230, 230, 250, 255];
const CONTROL_BAR_COLOR: [u8; 4] = [28, 30, 38, 255];
const STATUS_RUNNING_COLOR: [u8; 4] = [70, 190, 90, 255];
const STATUS_INITIALIZING_COLOR: [u8; 4] = [230, 190, 60, 255];
const STATUS_NOT_RUNNING_COLOR: [u8; 4] = [200, 50, 50, 255];

/// What one presented frame shows.
pub struct FrameView<'a> {
    pub walker: Option<&'a GridWalker>,
    pub status: &'a SessionStatus,
    pub controls: &'a ControlBar,
}

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            width: size.width,
            height: size.height,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width.max(1), height.max(1), surface)
    }

    pub fn present(&mut self, view: &FrameView<'_>) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }
        let (width, height) = (self.width, self.height);
        compose_frame(self.pixels.frame_mut(), width, height, view);
        self.pixels.render()
    }
}

pub(crate) fn compose_frame(frame: &mut [u8], width: u32, height: u32, view: &FrameView<'_>) {
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&CLEAR_COLOR);
    }

    let maze_area = ScreenRect {
        left: 0,
        top: STATUS_STRIP_HEIGHT_PX,
        width,
        height: height.saturating_sub(STATUS_STRIP_HEIGHT_PX + CONTROL_BAR_HEIGHT_PX),
    };
    if let Some(walker) = view.walker {
        draw_maze(frame, width, height, walker, maze_area);
    }

    fill_rect(
        frame,
        width,
        height,
        ScreenRect {
            left: 0,
            top: 0,
            width,
            height: STATUS_STRIP_HEIGHT_PX,
        },
        status_color(view.status),
    );

    fill_rect(
        frame,
        width,
        height,
        ScreenRect {
            left: 0,
            top: height.saturating_sub(CONTROL_BAR_HEIGHT_PX),
            width,
            height: CONTROL_BAR_HEIGHT_PX,
        },
        CONTROL_BAR_COLOR,
    );
    for (control, rect) in view.controls.buttons() {
        fill_rect(frame, width, height, *rect, control_color(*control));
    }
}

fn draw_maze(frame: &mut [u8], width: u32, height: u32, walker: &GridWalker, area: ScreenRect) {
    let cols = (area.width / TILE_SIZE_PX) as i64 + 1;
    let rows = (area.height / TILE_SIZE_PX) as i64 + 1;
    let position = walker.position();
    let origin_x = position.x as i64 - cols / 2;
    let origin_y = position.y as i64 - rows / 2;

    for row in 0..rows {
        for col in 0..cols {
            let color = match walker.tile_at(origin_x + col, origin_y + row) {
                Some(Tile::Floor) => FLOOR_COLOR,
                Some(Tile::Wall) => WALL_COLOR,
                Some(Tile::Obstacle) => OBSTACLE_COLOR,
                None => OUTSIDE_COLOR,
            };
            let cell = clip_to_area(
                area,
                area.left as i64 + col * TILE_SIZE_PX as i64,
                area.top as i64 + row * TILE_SIZE_PX as i64,
                TILE_SIZE_PX,
            );
            if let Some(cell) = cell {
                fill_rect(frame, width, height, cell, color);
            }
        }
    }

    let walker_left = area.left as i64 + (position.x as i64 - origin_x) * TILE_SIZE_PX as i64 + 3;
    let walker_top = area.top as i64 + (position.y as i64 - origin_y) * TILE_SIZE_PX as i64 + 3;
    if let Some(rect) = clip_to_area(area, walker_left, walker_top, TILE_SIZE_PX - 6) {
        fill_rect(frame, width, height, rect, WALKER_COLOR);
    }
}

fn clip_to_area(area: ScreenRect, left: i64, top: i64, size: u32) -> Option<ScreenRect> {
    let area_right = area.left as i64 + area.width as i64;
    let area_bottom = area.top as i64 + area.height as i64;
    let clipped_left = left.max(area.left as i64);
    let clipped_top = top.max(area.top as i64);
    let clipped_right = (left + size as i64).min(area_right);
    let clipped_bottom = (top + size as i64).min(area_bottom);
    if clipped_right <= clipped_left || clipped_bottom <= clipped_top {
        return None;
    }
    Some(ScreenRect {
        left: clipped_left as u32,
        top: clipped_top as u32,
        width: (clipped_right - clipped_left) as u32,
        height: (clipped_bottom - clipped_top) as u32,
    })
}

pub(crate) fn fill_rect(frame: &mut [u8], width: u32, height: u32, rect: ScreenRect, color: [u8; 4]) {
    let right = (rect.left + rect.width).min(width);
    let bottom = (rect.top + rect.height).min(height);
    for y in rect.top.min(height)..bottom {
        let row_start = (y * width + rect.left.min(right)) as usize * 4;
        let row_end = (y * width + right) as usize * 4;
        if let Some(row) = frame.get_mut(row_start..row_end) {
            for pixel in row.chunks_exact_mut(4) {
                pixel.copy_from_slice(&color);
            }
        }
    }
}

fn status_color(status: &SessionStatus) -> [u8; 4] {
    match status {
        SessionStatus::Initializing => STATUS_INITIALIZING_COLOR,
        SessionStatus::Running => STATUS_RUNNING_COLOR,
        SessionStatus::NotRunning { .. } => STATUS_NOT_RUNNING_COLOR,
    }
}

fn control_color(control: Control) -> [u8; 4] {
    match control {
        Control::Up | Control::Down | Control::Left | Control::Right => [72, 96, 140, 255],
        Control::Teleport => [120, 80, 160, 255],
        Control::PlaceObstacle => [160, 80, 60, 255],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let index = ((y * width + x) * 4) as usize;
        [
            frame[index],
            frame[index + 1],
            frame[index + 2],
            frame[index + 3],
        ]
    }

    #[test]
    fn fill_rect_clips_to_frame() {
        let (width, height) = (8u32, 4u32);
        let mut frame = vec![0u8; (width * height * 4) as usize];
        let rect = ScreenRect {
            left: 6,
            top: 2,
            width: 10,
            height: 10,
        };
        fill_rect(&mut frame, width, height, rect, [1, 2, 3, 4]);

        assert_eq!(pixel(&frame, width, 7, 3), [1, 2, 3, 4]);
        assert_eq!(pixel(&frame, width, 5, 3), [0, 0, 0, 0]);
        assert_eq!(pixel(&frame, width, 7, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn status_strip_reflects_session_status() {
        let (width, height) = (96u32, 96u32);
        let mut frame = vec![0u8; (width * height * 4) as usize];
        let controls = ControlBar::default();
        let status = SessionStatus::NotRunning {
            reason: "missing maze".to_string(),
        };
        compose_frame(
            &mut frame,
            width,
            height,
            &FrameView {
                walker: None,
                status: &status,
                controls: &controls,
            },
        );
        assert_eq!(pixel(&frame, width, 10, 0), STATUS_NOT_RUNNING_COLOR);
        assert_eq!(pixel(&frame, width, 10, 20), CLEAR_COLOR);
    }

    #[test]
    fn walker_is_drawn_at_view_center() {
        let walker = GridWalker::parse("#####\n#.@.#\n#####").expect("maze");
        let (width, height) = (160u32, 160u32);
        let mut frame = vec![0u8; (width * height * 4) as usize];
        let controls = ControlBar::layout(width, height);
        compose_frame(
            &mut frame,
            width,
            height,
            &FrameView {
                walker: Some(&walker),
                status: &SessionStatus::Running,
                controls: &controls,
            },
        );

        let area_height = height - STATUS_STRIP_HEIGHT_PX - CONTROL_BAR_HEIGHT_PX;
        let cols = (width / TILE_SIZE_PX) as i64 + 1;
        let rows = (area_height / TILE_SIZE_PX) as i64 + 1;
        let center_x = (cols / 2) as u32 * TILE_SIZE_PX + TILE_SIZE_PX / 2;
        let center_y = STATUS_STRIP_HEIGHT_PX + (rows / 2) as u32 * TILE_SIZE_PX + TILE_SIZE_PX / 2;
        assert_eq!(pixel(&frame, width, center_x, center_y), WALKER_COLOR);
        assert_eq!(pixel(&frame, width, 10, 0), STATUS_RUNNING_COLOR);
    }

    #[test]
    fn clip_to_area_drops_cells_outside() {
        let area = ScreenRect {
            left: 0,
            top: 6,
            width: 32,
            height: 32,
        };
        assert!(clip_to_area(area, 40, 6, 16).is_none());
        let partial = clip_to_area(area, 24, 0, 16).expect("partial");
        assert_eq!(partial.left, 24);
        assert_eq!(partial.top, 6);
        assert_eq!(partial.width, 8);
        assert_eq!(partial.height, 10);
    }
}
