use crate::{
    domain::geometry::Vec2,
    host::{BlendMode, SpriteDraw, SpriteSurface, TextureHandle},
};

const GLYPH_RAMP: [char; 8] = [' ', '.', ':', '-', '=', '+', '*', '#'];

/// A character-cell backbuffer that accumulates additive sprites. Each ray
/// is rasterised as a procedural beam, brightest down its centre line and
/// fading towards its far end, so no texture pixels are needed.
#[derive(Debug, Clone)]
pub struct GlyphCanvas {
    cols: u16,
    rows: u16,
    cell_w: f32,
    cell_h: f32,
    cells: Vec<[f32; 3]>,
    mode: BlendMode,
    open: bool,
    ray_draws: usize,
}

impl GlyphCanvas {
    /// `screen` is the backbuffer size in host pixels that the grid covers.
    #[must_use]
    pub fn new(cols: u16, rows: u16, screen: (f32, f32)) -> Self {
        let mut canvas = Self {
            cols: 0,
            rows: 0,
            cell_w: 1.0,
            cell_h: 1.0,
            cells: Vec::new(),
            mode: BlendMode::AlphaBlend,
            open: false,
            ray_draws: 0,
        };
        canvas.resize(cols, rows, screen);
        canvas
    }

    pub fn resize(&mut self, cols: u16, rows: u16, screen: (f32, f32)) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self.cell_w = screen.0 / f32::from(self.cols);
        self.cell_h = screen.1 / f32::from(self.rows);
        self.cells = vec![[0.0; 3]; usize::from(self.cols) * usize::from(self.rows)];
    }

    pub fn clear(&mut self) {
        self.cells.fill([0.0; 3]);
        self.ray_draws = 0;
    }

    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    #[must_use]
    pub fn ray_draws(&self) -> usize {
        self.ray_draws
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Accumulated light in a cell, each channel clamped to `0.0..=1.0`.
    #[must_use]
    pub fn light(&self, col: u16, row: u16) -> [f32; 3] {
        let [r, g, b] = self.cells[self.index(col, row)];
        [r.min(1.0), g.min(1.0), b.min(1.0)]
    }

    #[must_use]
    pub fn glyph(&self, col: u16, row: u16) -> char {
        let [r, g, b] = self.light(col, row);
        let level = r.max(g).max(b);
        let last = GLYPH_RAMP.len() - 1;
        let step = (level * last as f32).round() as usize;
        GLYPH_RAMP[step.min(last)]
    }

    fn index(&self, col: u16, row: u16) -> usize {
        usize::from(row) * usize::from(self.cols) + usize::from(col)
    }

    fn rasterize(&mut self, sprite: &SpriteDraw) {
        let size = Vec2::new(sprite.source.width as f32, sprite.source.height as f32);
        if size.x <= 0.0 || size.y <= 0.0 || sprite.scale <= 0.0 {
            return;
        }

        let to_screen = |local: Vec2| {
            let scaled = Vec2::new(
                (local.x - sprite.origin.x) * sprite.scale,
                (local.y - sprite.origin.y) * sprite.scale,
            );
            let turned = scaled.rotated(sprite.rotation);
            Vec2::new(sprite.position.x + turned.x, sprite.position.y + turned.y)
        };
        let corners = [
            to_screen(Vec2::new(0.0, 0.0)),
            to_screen(Vec2::new(size.x, 0.0)),
            to_screen(Vec2::new(0.0, size.y)),
            to_screen(size),
        ];
        let (min, max) = corners.iter().fold(
            (
                Vec2::new(f32::INFINITY, f32::INFINITY),
                Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
            ),
            |(lo, hi), c| {
                (
                    Vec2::new(lo.x.min(c.x), lo.y.min(c.y)),
                    Vec2::new(hi.x.max(c.x), hi.y.max(c.y)),
                )
            },
        );

        let col_range = self.span(min.x, max.x, self.cell_w, self.cols);
        let row_range = self.span(min.y, max.y, self.cell_h, self.rows);
        let Some(((col_lo, col_hi), (row_lo, row_hi))) = col_range.zip(row_range) else {
            return;
        };

        let color = sprite.color;
        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                let center = Vec2::new(
                    (f32::from(col) + 0.5) * self.cell_w,
                    (f32::from(row) + 0.5) * self.cell_h,
                );
                let back = Vec2::new(center.x - sprite.position.x, center.y - sprite.position.y)
                    .rotated(-sprite.rotation);
                let local = Vec2::new(
                    back.x / sprite.scale + sprite.origin.x,
                    back.y / sprite.scale + sprite.origin.y,
                );
                let u = local.x / size.x;
                let v = local.y / size.y;
                if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
                    continue;
                }
                let beam = (1.0 - (2.0 * u - 1.0).abs()) * (1.0 - v);
                let index = self.index(col, row);
                let cell = &mut self.cells[index];
                cell[0] += color.r * beam;
                cell[1] += color.g * beam;
                cell[2] += color.b * beam;
            }
        }
    }

    /// Cells touched by the pixel range `lo..=hi`, or `None` when it falls
    /// entirely off the grid.
    fn span(&self, lo: f32, hi: f32, cell: f32, count: u16) -> Option<(u16, u16)> {
        let first = (lo / cell).floor();
        let last = (hi / cell).floor();
        if last < 0.0 || first >= f32::from(count) {
            return None;
        }
        let clamp = |v: f32| v.clamp(0.0, f32::from(count - 1)) as u16;
        Some((clamp(first), clamp(last)))
    }
}

impl SpriteSurface for GlyphCanvas {
    fn blend_mode(&self) -> BlendMode {
        self.mode
    }

    fn begin(&mut self, mode: BlendMode) {
        self.mode = mode;
        self.open = true;
    }

    fn end(&mut self) {
        self.open = false;
    }

    fn draw(&mut self, _texture: TextureHandle, sprite: &SpriteDraw) {
        if !self.open {
            return;
        }
        if self.mode == BlendMode::Additive {
            self.ray_draws += 1;
            self.rasterize(sprite);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{color::Tint, geometry::Rect};

    fn beam(position: Vec2, rotation: f32) -> SpriteDraw {
        SpriteDraw {
            position,
            source: Rect::new(0, 0, 128, 128),
            color: Tint::WHITE,
            rotation,
            origin: Vec2::new(64.0, 0.0),
            scale: 1.0,
            layer_depth: 1.0,
        }
    }

    fn canvas() -> GlyphCanvas {
        GlyphCanvas::new(40, 20, (400.0, 200.0))
    }

    #[test]
    fn additive_draw_lights_cells_under_the_beam() {
        let mut canvas = canvas();
        canvas.begin(BlendMode::Additive);
        canvas.draw(TextureHandle(1), &beam(Vec2::new(200.0, 0.0), 0.0));
        canvas.end();

        assert_eq!(canvas.ray_draws(), 1);
        assert!(canvas.light(19, 0)[0] > 0.8);
        assert!(canvas.light(19, 10)[0] < canvas.light(19, 0)[0]);
        assert_eq!(canvas.light(0, 0), [0.0; 3]);
        assert_eq!(canvas.glyph(0, 0), ' ');
        assert_eq!(canvas.glyph(19, 0), '*');
    }

    #[test]
    fn alpha_blend_draws_are_ignored() {
        let mut canvas = canvas();
        canvas.begin(BlendMode::AlphaBlend);
        canvas.draw(TextureHandle(1), &beam(Vec2::new(200.0, 0.0), 0.0));
        assert_eq!(canvas.ray_draws(), 0);
        assert_eq!(canvas.light(19, 0), [0.0; 3]);
    }

    #[test]
    fn draws_outside_a_batch_are_dropped() {
        let mut canvas = canvas();
        canvas.draw(TextureHandle(1), &beam(Vec2::new(200.0, 0.0), 0.0));
        assert_eq!(canvas.ray_draws(), 0);
    }

    #[test]
    fn rotation_swings_the_beam() {
        let mut canvas = canvas();
        canvas.begin(BlendMode::Additive);
        canvas.draw(
            TextureHandle(1),
            &beam(Vec2::new(200.0, 0.0), -std::f32::consts::FRAC_PI_2),
        );
        // A quarter turn counter-clockwise lays the beam along +x.
        assert!(canvas.light(25, 0)[0] > 0.0 || canvas.light(25, 1)[0] > 0.0);
        assert_eq!(canvas.light(19, 15), [0.0; 3]);
    }

    #[test]
    fn offscreen_sprites_touch_nothing() {
        let mut canvas = canvas();
        canvas.begin(BlendMode::Additive);
        canvas.draw(TextureHandle(1), &beam(Vec2::new(-500.0, 0.0), 0.0));
        assert!(canvas.cells.iter().all(|cell| *cell == [0.0; 3]));
    }

    #[test]
    fn clear_and_resize_reset_the_buffer() {
        let mut canvas = canvas();
        canvas.begin(BlendMode::Additive);
        canvas.draw(TextureHandle(1), &beam(Vec2::new(200.0, 0.0), 0.0));
        canvas.clear();
        assert_eq!(canvas.ray_draws(), 0);
        assert_eq!(canvas.light(19, 0), [0.0; 3]);

        canvas.resize(80, 0, (800.0, 200.0));
        assert_eq!(canvas.size(), (80, 1));
    }
}
