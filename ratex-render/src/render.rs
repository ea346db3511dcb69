use std::collections::HashMap;
use std::sync::Arc;

use ab_glyph::FontArc;
use anyhow::{Context, Result};
use bytemuck::{try_cast_slice, try_cast_slice_mut};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Transform};

use ratex_cache::intern_label;
use ratex_core::{ScaleDescriptor, TrialConfig, TrialSurface, fixed_default};

use crate::text::{parse_css_px, render_text_pixmap, truncate_to_width};

// Palette: black surface, rgb(10,171,216) accent.
const ACCENT: [u8; 4] = [10, 171, 216, 255];
const TEXT_COLOR: [u8; 4] = [255, 255, 255, 255];
const TRACK_COLOR: [u8; 4] = [90, 90, 90, 255];

const MARGIN: f32 = 24.0;
const PREAMBLE_PX: f32 = 22.0;
const PROMPT_PX: f32 = 22.0;
const CAPTION_PX: f32 = 20.0;
const READOUT_PX: f32 = 18.0;
const BUTTON_PX: f32 = 20.0;
const STIMULUS_ROW_H: f32 = 280.0;
const TRACK_H: f32 = 6.0;
const THUMB_R: f32 = 9.0;
const BUTTON_W: f32 = 200.0;
const BUTTON_H: f32 = 44.0;

fn background() -> Color {
    Color::from_rgba8(0, 0, 0, 255)
}

/// Track geometry of one rendered slider, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderLayout {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    /// Top of the whole scale block, for partial repaints.
    pub block_y: f32,
    pub block_h: f32,
}

/// Where everything landed. Fixed structural order: preamble, stimulus pair,
/// one block per scale, submit button.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceLayout {
    pub preamble: Option<(f32, f32)>,
    pub image_box: (f32, f32, f32, f32),
    pub word_box: (f32, f32, f32, f32),
    pub sliders: Vec<SliderLayout>,
    pub button: (f32, f32, f32, f32),
}

/// Software trial surface: the full visual is painted onto a pixmap, and the
/// slider/button geometry is kept for pointer hit-testing. Implements
/// `TrialSurface` so the controller can mirror values without knowing any of
/// this exists.
pub struct SkiaSurface {
    config: TrialConfig,
    font: Option<FontArc>,
    word_px: f32,
    canvas: Pixmap,
    layout: SurfaceLayout,
    values: Vec<i64>,
    label_cache: HashMap<usize, Arc<Pixmap>>,
    stimulus: Option<Pixmap>,
    cleared: bool,
}

impl SkiaSurface {
    /// Build and paint the full surface. Configuration errors surface here,
    /// before any pixel is touched.
    pub fn render(
        config: &TrialConfig,
        width: u32,
        height: u32,
        font: Option<FontArc>,
    ) -> Result<Self> {
        config.validate()?;

        let canvas = Pixmap::new(width, height)
            .with_context(|| format!("canvas allocation {width}x{height}"))?;
        let layout = Self::compute_layout(config, width as f32);
        // Every control opens on the literal 50; the controller re-pushes
        // its own default policy at surface-ready.
        let values = config.questions.iter().map(fixed_default).collect();

        let mut surface = Self {
            config: config.clone(),
            word_px: parse_css_px(&config.stimulus_font_size),
            font,
            canvas,
            layout,
            values,
            label_cache: HashMap::new(),
            stimulus: None,
            cleared: false,
        };
        surface.paint_all();
        Ok(surface)
    }

    /// Host-decoded stimulus pixels (RGBA8). Asset loading stays on the host
    /// side; this only paints what it is handed.
    pub fn set_stimulus_pixels(&mut self, rgba: &[u8], width: u32, height: u32) -> Result<()> {
        let mut pm = Pixmap::new(width.max(1), height.max(1))
            .with_context(|| format!("stimulus pixmap {width}x{height}"))?;
        let n = pm.data().len().min(rgba.len());
        pm.data_mut()[..n].copy_from_slice(&rgba[..n]);
        self.stimulus = Some(pm);
        self.paint_all();
        Ok(())
    }

    fn compute_layout(config: &TrialConfig, width: f32) -> SurfaceLayout {
        let mut y = MARGIN;

        let preamble = config.image_preamble.as_ref().map(|_| {
            let pos = (width / 2.0, y);
            y += PREAMBLE_PX + 14.0;
            pos
        });

        // Side-by-side stimulus pair: image left, word right.
        let half = width / 2.0;
        let image_w = (config.image_width as f32).min(half - 2.0 * MARGIN).max(1.0);
        let image_box = (
            half - MARGIN - image_w,
            y,
            image_w,
            STIMULUS_ROW_H,
        );
        let word_box = (half + MARGIN, y, half - 2.0 * MARGIN, STIMULUS_ROW_H);
        y += STIMULUS_ROW_H + MARGIN;

        let block_h = (config.scale_height as f32).max(90.0);
        let track_w = 700.0f32.min(width - 2.0 * MARGIN - 120.0);
        let track_x = (width - track_w) / 2.0;
        let mut sliders = Vec::with_capacity(config.questions.len());
        for _ in &config.questions {
            let block_y = y;
            let track_y = block_y + PROMPT_PX + 18.0;
            sliders.push(SliderLayout {
                x: track_x,
                y: track_y,
                w: track_w,
                block_y,
                block_h,
            });
            y += block_h;
        }

        // 25px gap above the submit control.
        let button = ((width - BUTTON_W) / 2.0, y + 25.0, BUTTON_W, BUTTON_H);

        SurfaceLayout {
            preamble,
            image_box,
            word_box,
            sliders,
            button,
        }
    }

    fn paint_all(&mut self) {
        self.canvas.fill(background());
        if self.cleared {
            return;
        }

        if let (Some((cx, ty)), Some(preamble)) =
            (self.layout.preamble, self.config.image_preamble.clone())
        {
            self.blit_text_centered(&preamble, PREAMBLE_PX, cx, ty, TEXT_COLOR);
        }

        self.paint_stimulus_pair();

        for index in 0..self.layout.sliders.len() {
            self.paint_scale_block(index);
        }

        self.paint_button();
    }

    fn paint_stimulus_pair(&mut self) {
        let (ix, iy, iw, ih) = self.layout.image_box;
        match self.stimulus.take() {
            Some(pm) => {
                let sx = iw / pm.width() as f32;
                let sy = ih / pm.height() as f32;
                let s = sx.min(sy).min(1.0);
                let transform = Transform::from_scale(s, s).post_translate(ix, iy);
                self.canvas.draw_pixmap(
                    0,
                    0,
                    pm.as_ref(),
                    &PixmapPaint::default(),
                    transform,
                    None,
                );
                self.stimulus = Some(pm);
            }
            None => {
                // Placeholder box until the host supplies pixels.
                self.fill_rect(ix, iy, iw, ih, Color::from_rgba8(40, 40, 40, 255));
            }
        }

        let (wx, wy, ww, wh) = self.layout.word_box;
        let word = match &self.font {
            Some(font) => truncate_to_width(&self.config.stimulus_word, self.word_px, font, ww),
            None => self.config.stimulus_word.clone(),
        };
        self.blit_text_centered(&word, self.word_px, wx + ww / 2.0, wy + wh / 2.0, TEXT_COLOR);
    }

    fn paint_scale_block(&mut self, index: usize) {
        let Some(slider) = self.layout.sliders.get(index).copied() else {
            return;
        };
        let Some(question) = self.config.questions.get(index).cloned() else {
            return;
        };
        let value = self.values.get(index).copied().unwrap_or(0);

        // Repaint the whole block so thumb and readout updates leave no
        // residue behind.
        self.fill_rect(
            0.0,
            slider.block_y,
            self.canvas.width() as f32,
            slider.block_h,
            background(),
        );

        if !question.prompt.is_empty() {
            self.blit_text_centered(
                &question.prompt,
                PROMPT_PX,
                slider.x + slider.w / 2.0,
                slider.block_y,
                TEXT_COLOR,
            );
        }

        // Track and thumb.
        self.fill_rect(
            slider.x,
            slider.y - TRACK_H / 2.0,
            slider.w,
            TRACK_H,
            color(TRACK_COLOR),
        );
        let frac = thumb_fraction(&question, value);
        let cx = slider.x + frac * slider.w;
        self.fill_circle(cx, slider.y, THUMB_R, color(ACCENT));

        // End captions sit under the two ends of the track.
        let caption_y = slider.y + 20.0;
        let leftmost = self.config.leftmost_label.clone();
        if !leftmost.is_empty() {
            self.blit_text_centered(&leftmost, CAPTION_PX, slider.x, caption_y, TEXT_COLOR);
        }
        let rightmost = self.config.rightmost_label.clone();
        if !rightmost.is_empty() {
            self.blit_text_centered(
                &rightmost,
                CAPTION_PX,
                slider.x + slider.w,
                caption_y,
                TEXT_COLOR,
            );
        }

        // Live numeric readout to the right of the track.
        self.blit_text_centered(
            &value.to_string(),
            READOUT_PX,
            slider.x + slider.w + 50.0,
            slider.y - READOUT_PX / 2.0,
            ACCENT,
        );
    }

    fn paint_button(&mut self) {
        let (bx, by, bw, bh) = self.layout.button;
        self.fill_rect(bx, by, bw, bh, Color::from_rgba8(25, 25, 25, 255));
        self.fill_rect(bx, by + bh - 3.0, bw, 3.0, color(ACCENT));
        let label = self.config.button_label.clone();
        self.blit_text_centered(&label, BUTTON_PX, bx + bw / 2.0, by + bh / 2.0 - BUTTON_PX / 2.0, TEXT_COLOR);
    }

    /// Blit one line of text horizontally centered on `cx`, top edge at `y`.
    /// Rasterized labels are interned and cached so repeated readout values
    /// reuse their pixmaps.
    fn blit_text_centered(&mut self, text: &str, px: f32, cx: f32, y: f32, rgba: [u8; 4]) {
        let Some(font) = self.font.clone() else {
            return;
        };
        if text.is_empty() {
            return;
        }
        let key = intern_label(&format!("{px}|{:?}|{text}", rgba));
        let pm = match self.label_cache.get(&key) {
            Some(pm) => Arc::clone(pm),
            None => {
                let pm = Arc::new(render_text_pixmap(text, px, &font, rgba));
                self.label_cache.insert(key, Arc::clone(&pm));
                pm
            }
        };
        let x = cx - pm.width() as f32 / 2.0;
        self.canvas.draw_pixmap(
            x.round() as i32,
            y.round() as i32,
            pm.as_ref().as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, c: Color) {
        let mut paint = Paint::default();
        paint.set_color(c);
        if let Some(rect) = Rect::from_xywh(x, y, w, h) {
            self.canvas
                .fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, c: Color) {
        let mut paint = Paint::default();
        paint.set_color(c);
        paint.anti_alias = true;
        let mut pb = PathBuilder::new();
        pb.push_circle(cx, cy, r);
        if let Some(path) = pb.finish() {
            self.canvas
                .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    /// Map a pointer position to (scale index, snapped value). The grab zone
    /// extends a little past the track the way a native range control does.
    pub fn slider_at(&self, x: f32, y: f32) -> Option<(usize, i64)> {
        for (index, slider) in self.layout.sliders.iter().enumerate() {
            let within_y = (y - slider.y).abs() <= THUMB_R + 6.0;
            let within_x = x >= slider.x - THUMB_R && x <= slider.x + slider.w + THUMB_R;
            if within_y && within_x {
                let question = self.config.questions.get(index)?;
                let frac = ((x - slider.x) / slider.w).clamp(0.0, 1.0) as f64;
                let raw = question.min as f64 + frac * (question.max - question.min) as f64;
                return Some((index, question.snap(raw)));
            }
        }
        None
    }

    pub fn button_contains(&self, x: f32, y: f32) -> bool {
        if self.cleared {
            return false;
        }
        let (bx, by, bw, bh) = self.layout.button;
        x >= bx && x <= bx + bw && y >= by && y <= by + bh
    }

    pub fn thumb_value(&self, index: usize) -> Option<i64> {
        self.values.get(index).copied()
    }

    pub fn layout(&self) -> &SurfaceLayout {
        &self.layout
    }

    pub fn canvas(&self) -> &Pixmap {
        &self.canvas
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    /// Copy the premultiplied canvas into an RGBA frame buffer. Word-wide
    /// copies when both buffers are aligned, byte fallback otherwise.
    pub fn copy_to_frame(&self, frame: &mut [u8]) {
        let data = self.canvas.data();
        if let (Ok(src), Ok(dst)) = (
            try_cast_slice::<u8, u32>(data),
            try_cast_slice_mut::<u8, u32>(frame),
        ) {
            let n = src.len().min(dst.len());
            dst[..n].copy_from_slice(&src[..n]);
        } else {
            let n = data.len().min(frame.len());
            frame[..n].copy_from_slice(&data[..n]);
        }
    }
}

impl TrialSurface for SkiaSurface {
    fn set_thumb(&mut self, index: usize, value: i64) {
        if self.cleared || index >= self.values.len() {
            return;
        }
        self.values[index] = value;
        self.paint_scale_block(index);
    }

    fn set_readout(&mut self, index: usize, value: i64) {
        // Thumb and readout live in the same block repaint.
        self.set_thumb(index, value);
    }

    fn clear(&mut self) {
        // Dropping the layout drops the hit-test bindings with it; nothing
        // rendered for this trial outlives Done.
        self.cleared = true;
        self.layout.sliders.clear();
        self.values.clear();
        self.canvas.fill(background());
    }
}

fn color(rgba: [u8; 4]) -> Color {
    Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

fn thumb_fraction(question: &ScaleDescriptor, value: i64) -> f32 {
    let span = (question.max - question.min) as f32;
    if span <= 0.0 {
        return 0.0;
    }
    (((value - question.min) as f32) / span).clamp(0.0, 1.0)
}
