use crate::config::PlotConfig;
use crate::sequence::Sequences;

pub const Q_FORMULA: &str = "Q(n) = {\n  2   if n = 1\n  2   if n = 2\n  1   if n = 3\n  Q(n - Q(n-1)) + Q(n - Q(n-2))   if n >= 4";
pub const A_FORMULA: &str = "a(n) = {\n  1   if n = 1\n  1   if n = 2\n  2   if n = 3\n  a(a(n-1)) + a(n - a(n-1))   if n >= 4";

const GLYPH_W: usize = 3;
const GLYPH_H: usize = 5;
const TICKS: i64 = 4;
const TICK_LEN: usize = 6;

// Simple 3x5 pixel font, case-insensitive
fn glyph(ch: char) -> &'static [u8] {
    match ch.to_ascii_lowercase() {
        '0' => &[0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => &[0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => &[0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => &[0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => &[0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => &[0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => &[0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => &[0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => &[0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => &[0b111, 0b101, 0b111, 0b001, 0b111],
        '.' => &[0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => &[0b000, 0b000, 0b000, 0b010, 0b100],
        '-' => &[0b000, 0b000, 0b111, 0b000, 0b000],
        '+' => &[0b000, 0b010, 0b111, 0b010, 0b000],
        '=' => &[0b000, 0b111, 0b000, 0b111, 0b000],
        ':' => &[0b000, 0b010, 0b000, 0b010, 0b000],
        '(' => &[0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => &[0b100, 0b010, 0b010, 0b010, 0b100],
        '{' => &[0b011, 0b010, 0b110, 0b010, 0b011],
        '}' => &[0b110, 0b010, 0b011, 0b010, 0b110],
        '>' => &[0b100, 0b010, 0b001, 0b010, 0b100],
        '<' => &[0b001, 0b010, 0b100, 0b010, 0b001],
        'a' => &[0b111, 0b101, 0b111, 0b101, 0b101],
        'b' => &[0b110, 0b101, 0b110, 0b101, 0b110],
        'c' => &[0b111, 0b100, 0b100, 0b100, 0b111],
        'd' => &[0b110, 0b101, 0b101, 0b101, 0b110],
        'e' => &[0b111, 0b100, 0b111, 0b100, 0b111],
        'f' => &[0b111, 0b100, 0b111, 0b100, 0b100],
        'g' => &[0b111, 0b100, 0b101, 0b101, 0b111],
        'h' => &[0b101, 0b101, 0b111, 0b101, 0b101],
        'i' => &[0b111, 0b010, 0b010, 0b010, 0b111],
        'j' => &[0b001, 0b001, 0b001, 0b101, 0b111],
        'k' => &[0b101, 0b101, 0b110, 0b101, 0b101],
        'l' => &[0b100, 0b100, 0b100, 0b100, 0b111],
        'm' => &[0b101, 0b111, 0b111, 0b101, 0b101],
        'n' => &[0b101, 0b111, 0b111, 0b111, 0b101],
        'o' => &[0b111, 0b101, 0b101, 0b101, 0b111],
        'p' => &[0b111, 0b101, 0b111, 0b100, 0b100],
        'q' => &[0b111, 0b101, 0b101, 0b111, 0b001],
        'r' => &[0b110, 0b101, 0b110, 0b101, 0b101],
        's' => &[0b111, 0b100, 0b111, 0b001, 0b111],
        't' => &[0b111, 0b010, 0b010, 0b010, 0b010],
        'u' => &[0b101, 0b101, 0b101, 0b101, 0b111],
        'v' => &[0b101, 0b101, 0b101, 0b101, 0b010],
        'w' => &[0b101, 0b101, 0b111, 0b111, 0b101],
        'x' => &[0b101, 0b101, 0b010, 0b101, 0b101],
        'y' => &[0b101, 0b101, 0b111, 0b010, 0b010],
        'z' => &[0b111, 0b001, 0b010, 0b100, 0b111],
        _ => &[0b000, 0b000, 0b000, 0b000, 0b000],
    }
}

/// Horizontal advance of one character at `scale`.
pub fn char_advance(scale: usize) -> usize {
    (GLYPH_W + 1) * scale
}

pub fn line_height(scale: usize) -> usize {
    (GLYPH_H + 3) * scale
}

pub fn text_width(text: &str, scale: usize) -> usize {
    text.chars().count() * char_advance(scale)
}

/// `0x00RRGGBB` pixel buffer, row-major, the layout minifb expects.
#[derive(Clone, Debug)]
pub struct Canvas {
    width: usize,
    height: usize,
    buffer: Vec<u32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: u32) -> Self {
        Canvas { width, height, buffer: vec![background; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.buffer
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height { return None; }
        Some(self.buffer[y * self.width + x])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x >= self.width || y >= self.height { return; }
        self.buffer[y * self.width + x] = color;
    }

    /// Composite `color` over the current pixel with opacity `alpha`.
    pub fn blend_pixel(&mut self, x: usize, y: usize, color: u32, alpha: f32) {
        let Some(dst) = self.pixel(x, y) else { return };
        let mix = |shift: u32| {
            let s = ((color >> shift) & 0xFF) as f32;
            let d = ((dst >> shift) & 0xFF) as f32;
            ((s * alpha + d * (1.0 - alpha)).round() as u32).min(0xFF) << shift
        };
        self.buffer[y * self.width + x] = mix(16) | mix(8) | mix(0);
    }

    pub fn hline(&mut self, x0: usize, x1: usize, y: usize, color: u32) {
        for x in x0..=x1 {
            self.set_pixel(x, y, color);
        }
    }

    pub fn vline(&mut self, x: usize, y0: usize, y1: usize, color: u32) {
        for y in y0..=y1 {
            self.set_pixel(x, y, color);
        }
    }

    pub fn draw_char(&mut self, x: usize, y: usize, ch: char, color: u32, scale: usize) {
        for (dy, &row) in glyph(ch).iter().enumerate() {
            for dx in 0..GLYPH_W {
                if row & (1 << (GLYPH_W - 1 - dx)) == 0 { continue; }
                for sy in 0..scale {
                    for sx in 0..scale {
                        self.set_pixel(x + dx * scale + sx, y + dy * scale + sy, color);
                    }
                }
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`. Clipped at the canvas edge.
    pub fn draw_text(&mut self, x: usize, y: usize, text: &str, color: u32, scale: usize) {
        let mut offset_x = x;
        for ch in text.chars() {
            if offset_x >= self.width { break; }
            self.draw_char(offset_x, y, ch, color, scale);
            offset_x += char_advance(scale);
        }
    }

    /// Multi-line text, one `line_height` per line.
    pub fn draw_block(&mut self, x: usize, y: usize, text: &str, color: u32, scale: usize) {
        for (i, line) in text.lines().enumerate() {
            self.draw_text(x, y + i * line_height(scale), line, color, scale);
        }
    }

    /// Draw `text` vertically, one character per row, top to bottom.
    pub fn draw_text_vertical(&mut self, x: usize, y: usize, text: &str, color: u32, scale: usize) {
        for (i, ch) in text.chars().enumerate() {
            self.draw_char(x, y + i * (GLYPH_H + 1) * scale, ch, color, scale);
        }
    }
}

/// Maps data coordinates onto the plot area of a canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Viewport {
    /// Plot area of `config`, leaving margins for title, labels and ticks.
    pub fn for_config(config: &PlotConfig) -> Self {
        let scale = config.text_scale;
        let tick_chars = digits(config.y_min).max(digits(config.y_max)) + 1;
        let left = text_width(&"0".repeat(tick_chars), scale) + 3 * char_advance(scale) + TICK_LEN;
        let top = 3 * line_height(scale);
        let bottom = 3 * line_height(scale) + TICK_LEN;
        let right = 3 * char_advance(scale);

        Viewport {
            left: left.min(config.width / 4),
            top: top.min(config.height / 4),
            right: config.width.saturating_sub(right.min(config.width / 4)) - 1,
            bottom: config.height.saturating_sub(bottom.min(config.height / 4)) - 1,
            x_min: 0.0,
            x_max: config.bound as f64,
            y_min: config.y_min as f64,
            y_max: config.y_max as f64,
        }
    }

    pub fn width(&self) -> usize {
        self.right - self.left
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top
    }

    /// Pixel for a data point, `None` when it falls outside the axes limits.
    pub fn to_pixel(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if x < self.x_min || x > self.x_max || y < self.y_min || y > self.y_max {
            return None;
        }
        let fx = (x - self.x_min) / (self.x_max - self.x_min);
        let fy = (y - self.y_min) / (self.y_max - self.y_min);
        Some(self.fraction(fx, fy))
    }

    /// Pixel for axes-fraction coordinates, origin at the bottom left.
    pub fn fraction(&self, fx: f64, fy: f64) -> (usize, usize) {
        let px = self.left as f64 + fx.clamp(0.0, 1.0) * self.width() as f64;
        let py = self.bottom as f64 - fy.clamp(0.0, 1.0) * self.height() as f64;
        (px.round() as usize, py.round() as usize)
    }
}

fn digits(value: i64) -> usize {
    value.unsigned_abs().to_string().len()
}

/// Scatter plot of `a(n) - Q(n)` against `n`.
pub fn render(sequences: &Sequences, config: &PlotConfig) -> Canvas {
    let mut canvas = Canvas::new(config.width, config.height, config.background.to_u32());
    let view = Viewport::for_config(config);
    let ink = config.ink.to_u32();

    let point = config.point_color.to_u32();
    let mut plotted = 0usize;
    for (n, diff) in sequences.difference() {
        if let Some((x, y)) = view.to_pixel(n as f64, diff as f64) {
            canvas.blend_pixel(x, y, point, config.point_alpha);
            plotted += 1;
        }
    }
    tracing::debug!(plotted, total = sequences.len(), "scatter points rasterized");

    draw_axes(&mut canvas, &view, ink, config.text_scale);
    annotate(&mut canvas, &view, config);
    canvas
}

fn draw_axes(canvas: &mut Canvas, view: &Viewport, ink: u32, scale: usize) {
    canvas.hline(view.left, view.right, view.top, ink);
    canvas.hline(view.left, view.right, view.bottom, ink);
    canvas.vline(view.left, view.top, view.bottom, ink);
    canvas.vline(view.right, view.top, view.bottom, ink);

    for i in 0..=TICKS {
        let value = view.x_min + (view.x_max - view.x_min) * i as f64 / TICKS as f64;
        let (x, _) = view.fraction(i as f64 / TICKS as f64, 0.0);
        canvas.vline(x, view.bottom, view.bottom + TICK_LEN, ink);

        let label = (value.round() as i64).to_string();
        let half = text_width(&label, scale) / 2;
        canvas.draw_text(x.saturating_sub(half), view.bottom + TICK_LEN + scale, &label, ink, scale);
    }

    for i in 0..=TICKS {
        let value = view.y_min + (view.y_max - view.y_min) * i as f64 / TICKS as f64;
        let (_, y) = view.fraction(0.0, i as f64 / TICKS as f64);
        canvas.hline(view.left.saturating_sub(TICK_LEN), view.left, y, ink);

        let label = (value.round() as i64).to_string();
        let x = view.left.saturating_sub(TICK_LEN + scale + text_width(&label, scale));
        canvas.draw_text(x, y.saturating_sub(GLYPH_H * scale / 2), &label, ink, scale);
    }
}

fn annotate(canvas: &mut Canvas, view: &Viewport, config: &PlotConfig) {
    let ink = config.ink.to_u32();
    let scale = config.text_scale;

    let title_scale = scale + 1;
    let title_x = (config.width.saturating_sub(text_width(&config.title, title_scale))) / 2;
    canvas.draw_text(title_x, line_height(scale), &config.title, ink, title_scale);

    let x_label_x = view.left + (view.width().saturating_sub(text_width(&config.x_label, scale))) / 2;
    canvas.draw_text(x_label_x, view.bottom + TICK_LEN + line_height(scale) + scale, &config.x_label, ink, scale);

    let y_label_h = config.y_label.chars().count() * (GLYPH_H + 1) * scale;
    let y_label_y = view.top + (view.height().saturating_sub(y_label_h)) / 2;
    canvas.draw_text_vertical(scale, y_label_y, &config.y_label, ink, scale);

    if config.show_formulae {
        let (x, y) = view.fraction(0.05, 0.88);
        canvas.draw_block(x, y, Q_FORMULA, ink, scale);
        let (x, y) = view.fraction(0.05, 0.72);
        canvas.draw_block(x, y, A_FORMULA, ink, scale);
    }

    if let Some(credit) = &config.credit {
        let (x, y) = view.fraction(0.98, 0.02);
        let x = x.saturating_sub(text_width(credit, scale));
        let y = y.saturating_sub(GLYPH_H * scale);
        canvas.draw_text(x, y, credit, ink, scale);
    }
}
