// The drawing surface: every editor is drawn on one canvas at its fixed origin,
// and pointer input is forwarded with canvas-relative pixel coordinates.

// The selected-tile outline lives on a second canvas stacked on top: Iced does not
// draw rectangles over images within a single canvas.
use iced::{
    mouse,
    widget::canvas::{self, Frame},
    Point, Rectangle, Size,
};
use log::error;

use crate::{
    common::{ColorRGB, PixelCoord},
    editor::Workspace,
    grid::Grid,
    helpers::{alpha_blend, rgba_pixels, to_iced_color},
    message::Message,
};

pub struct EditorCanvas<'a> {
    pub workspace: &'a Workspace,
    pub identify_tile: bool,
}

#[derive(Default)]
pub struct InternalState {
    clicking: bool,
}

fn pixel(p: Point) -> (PixelCoord, PixelCoord) {
    (p.x.floor() as PixelCoord, p.y.floor() as PixelCoord)
}

fn origin_point(p: Point<PixelCoord>) -> Point {
    Point::new(p.x as f32, p.y as f32)
}

/// Nearest-filtered image of `grid`, scaled so each cell covers `scale` pixels.
fn draw_grid_image(frame: &mut Frame, grid: &Grid, origin: Point, scale: f32, data: Vec<u8>) {
    let image = iced::advanced::image::Image::new(iced::advanced::image::Handle::from_rgba(
        grid.width() as u32,
        grid.height() as u32,
        data,
    ))
    .filter_method(iced::widget::image::FilterMethod::Nearest)
    .snap(true);
    frame.draw_image(
        Rectangle::new(
            origin,
            Size {
                width: grid.width() as f32 * scale,
                height: grid.height() as f32 * scale,
            },
        ),
        image,
    );
}

impl<'a> EditorCanvas<'a> {
    fn color(&self, idx: u8) -> ColorRGB {
        self.workspace.colors.color_at(idx).unwrap_or_else(|e| {
            error!("{}", e);
            [0, 0, 0]
        })
    }

    fn draw_colors(&self, frame: &mut Frame) {
        let cs = &self.workspace.colors;
        let s = cs.cell_size as f32;
        let origin = origin_point(cs.origin);
        for (i, &c) in cs.colors().iter().enumerate() {
            let top_left = Point::new(origin.x, origin.y + i as f32 * s);
            frame.fill_rectangle(top_left, Size::new(s, s), to_iced_color(c));
            frame.stroke_rectangle(
                top_left,
                Size::new(s, s),
                canvas::Stroke {
                    width: 1.0,
                    style: iced::Color::BLACK.into(),
                    ..Default::default()
                },
            );
        }
        let selected = cs.selected();
        frame.stroke_rectangle(
            Point::new(origin.x, origin.y + selected as f32 * s),
            Size::new(s, s),
            canvas::Stroke {
                width: 5.0,
                style: iced::Color::WHITE.into(),
                ..Default::default()
            },
        );
    }

    fn draw_sprite(&self, frame: &mut Frame) {
        let ed = &self.workspace.sprite;
        let s = ed.cell_size as f32;
        let origin = origin_point(ed.origin);
        for (y, row) in ed.sprite().rows().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                frame.fill_rectangle(
                    Point::new(origin.x + x as f32 * s, origin.y + y as f32 * s),
                    Size::new(s, s),
                    to_iced_color(self.color(value)),
                );
            }
        }
    }

    fn draw_palette(&self, frame: &mut Frame) {
        let pal = &self.workspace.palette;
        let s = pal.cell_size as f32;
        let origin = origin_point(pal.origin);
        let data = rgba_pixels(pal.bitmap(), |_, _, value| self.color(value));
        draw_grid_image(frame, pal.bitmap(), origin, s, data);
    }

    // The map is rendered as one image assembled from the tileset's pixels.
    fn draw_map(&self, frame: &mut Frame) {
        let (pixels, highlight) = map_layers(self.workspace, self.identify_tile);
        let data = rgba_pixels(&pixels, |x, y, value| {
            let color = self.color(value);
            if highlight.get(y, x) == Some(1) {
                let pink_highlight = [255, 105, 180];
                alpha_blend(color, pink_highlight, 0.5)
            } else {
                color
            }
        });
        let scale = self.workspace.palette.cell_size as f32;
        let origin = origin_point(self.workspace.map.origin);
        draw_grid_image(frame, &pixels, origin, scale, data);
    }
}

/// Tileset pixels laid out by the map, plus a mask set to 1 under every map
/// cell holding the selected tile when `identify_tile` is on.
fn map_layers(workspace: &Workspace, identify_tile: bool) -> (Grid, Grid) {
    let pal = &workspace.palette;
    let map = workspace.map.map();
    let sw = pal.sprite_width;
    let sh = pal.sprite_height;
    let selected = pal.selected_index();
    let mut pixels = Grid::new(map.width() * sw, map.height() * sh);
    let mut highlight = Grid::new(pixels.width(), pixels.height());
    let mut mark = Grid::new(sw, sh);
    mark.fill(1);
    for (ty, row) in map.rows().enumerate() {
        for (tx, &tile) in row.iter().enumerate() {
            let tile_idx = tile as usize;
            let (sx, sy) = (tile_idx % pal.tiles_wide, tile_idx / pal.tiles_wide);
            let block = match pal.extract_tile(sx, sy) {
                Ok(b) => b,
                Err(e) => {
                    error!("Map cell ({}, {}): {}", tx, ty, e);
                    continue;
                }
            };
            if let Err(e) = pixels.write_block(ty * sh, tx * sw, &block) {
                error!("{}", e);
            }
            if identify_tile && tile == selected {
                if let Err(e) = highlight.write_block(ty * sh, tx * sw, &mark) {
                    error!("{}", e);
                }
            }
        }
    }
    (pixels, highlight)
}

impl<'a> canvas::Program<Message> for EditorCanvas<'a> {
    type State = InternalState;

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: iced::Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let Some(p) = cursor.position_in(bounds) else {
            if let canvas::Event::Mouse(mouse::Event::CursorLeft) = event {
                state.clicking = false;
            }
            return (canvas::event::Status::Ignored, None);
        };
        let (x, y) = pixel(p);

        match event {
            canvas::Event::Mouse(mouse_event) => match mouse_event {
                mouse::Event::ButtonPressed(mouse::Button::Left) => {
                    state.clicking = true;
                    (canvas::event::Status::Captured, Some(Message::Click(x, y)))
                }
                mouse::Event::ButtonReleased(mouse::Button::Left) => {
                    state.clicking = false;
                    (canvas::event::Status::Captured, None)
                }
                mouse::Event::CursorMoved { .. } if state.clicking => {
                    (canvas::event::Status::Captured, Some(Message::Drag(x, y)))
                }
                mouse::Event::CursorLeft => {
                    state.clicking = false;
                    (canvas::event::Status::Ignored, None)
                }
                _ => (canvas::event::Status::Ignored, None),
            },
            _ => (canvas::event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &InternalState,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: iced::Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), iced::Color::BLACK);
        self.draw_colors(&mut frame);
        self.draw_sprite(&mut frame);
        self.draw_palette(&mut frame);
        self.draw_map(&mut frame);
        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _interaction: &Self::State,
        bounds: iced::Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}

pub struct TileSelect<'a> {
    pub workspace: &'a Workspace,
}

impl<'a> canvas::Program<Message> for TileSelect<'a> {
    // No internal state
    type State = ();

    fn draw(
        &self,
        _state: &(),
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: iced::Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let pal = &self.workspace.palette;
        let s = pal.cell_size as f32;
        let origin = origin_point(pal.origin);
        let (sx, sy) = pal.selected();
        let tile_w = s * pal.sprite_width as f32;
        let tile_h = s * pal.sprite_height as f32;
        let path = canvas::Path::rectangle(
            Point::new(origin.x + sx as f32 * tile_w, origin.y + sy as f32 * tile_h),
            Size::new(tile_w, tile_h),
        );
        for i in 0..2 {
            frame.stroke(
                &path,
                canvas::Stroke {
                    style: if i == 0 {
                        canvas::stroke::Style::Solid(iced::Color::WHITE)
                    } else {
                        canvas::stroke::Style::Solid(iced::Color::BLACK)
                    },
                    width: 1.0,
                    line_dash: canvas::LineDash {
                        offset: i,
                        segments: &[0.0, 0.0, 4.0, 4.0],
                    },
                    ..Default::default()
                },
            );
        }
        vec![frame.into_geometry()]
    }
}
