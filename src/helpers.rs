use crate::common::ColorRGB;

pub fn to_iced_color(c: ColorRGB) -> iced::Color {
    iced::Color::from_rgb8(c[0], c[1], c[2])
}

pub fn alpha_blend(bg: ColorRGB, fg: ColorRGB, alpha: f32) -> ColorRGB {
    let gamma = 2.2;
    let mut out: ColorRGB = [0, 0, 0];
    for i in 0..3 {
        out[i] = f32::powf(
            (1.0 - alpha) * f32::powf(bg[i] as f32, gamma) + alpha * f32::powf(fg[i] as f32, gamma),
            1.0 / gamma,
        ) as u8;
    }
    out
}

/// RGBA bytes of `grid`, one pixel per cell, looking colors up through `color_of`.
pub fn rgba_pixels(
    grid: &crate::grid::Grid,
    mut color_of: impl FnMut(usize, usize, u8) -> ColorRGB,
) -> Vec<u8> {
    let mut data: Vec<u8> = Vec::with_capacity(grid.width() * grid.height() * 4);
    for (y, row) in grid.rows().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            data.extend(color_of(x, y, value));
            data.push(255); // alpha channel
        }
    }
    data
}
