use crate::constants::{BAR_OVERLAP_PX, SAMPLE_RANGE};
use crate::levels::SpectrumLevels;
use glam::Vec2;

/// A 2-D drawing target sized once at creation. Paint colors belong to the
/// surface: bars use the spectrograph color, polylines the oscilloscope color.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn clear(&mut self);
    fn fill_bar(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn stroke_polyline(&mut self, points: &[Vec2]);
}

pub fn draw_spectrum<S: Surface + ?Sized>(surface: &mut S, levels: &SpectrumLevels) {
    if levels.is_empty() {
        return;
    }
    let width = surface.width();
    let height = surface.height();
    let bar_width = width / levels.len() as f32;
    for (i, level) in levels.as_slice().iter().enumerate() {
        let h = level * height;
        surface.fill_bar(i as f32 * bar_width, height - h, bar_width + BAR_OVERLAP_PX, h);
    }
}

/// Map every `stride`-th waveform byte onto the canvas: index spans the width,
/// value `[0, 256)` spans the height.
pub fn oscilloscope_points(
    samples: &[u8],
    width: f32,
    height: f32,
    stride: usize,
    out: &mut Vec<Vec2>,
) {
    out.clear();
    if samples.is_empty() {
        return;
    }
    let step = width / samples.len() as f32;
    for i in (0..samples.len()).step_by(stride.max(1)) {
        let percent = f32::from(samples[i]) / SAMPLE_RANGE;
        out.push(Vec2::new(i as f32 * step, height * percent));
    }
}
