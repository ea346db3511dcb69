use ab_glyph::{Font, FontArc, Glyph, PxScale, ScaleFont, point};
use tiny_skia::{Pixmap, PremultipliedColorU8};

/// Parse the numeric prefix of a CSS-style size string ("35px"). The string
/// itself passes through the data model verbatim; only rasterization needs a
/// number, and anything unparsable falls back to 35.
pub fn parse_css_px(s: &str) -> f32 {
    s.trim()
        .trim_end_matches("px")
        .trim()
        .parse()
        .unwrap_or(35.0)
}

/// Look for a usable TTF in the usual system locations. Without one the
/// surface still lays out and hit-tests normally, it just paints no glyphs.
pub fn load_system_font() -> Option<FontArc> {
    const CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    for path in CANDIDATES {
        if let Ok(bytes) = std::fs::read(path) {
            if let Ok(font) = FontArc::try_from_vec(bytes) {
                return Some(font);
            }
        }
    }
    None
}

pub fn measure_text_width(text: &str, font_size: f32, font: &FontArc) -> f32 {
    let sf = font.as_scaled(PxScale::from(font_size));
    let mut width = 0.0f32;
    let mut prev = None;
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = prev {
            width += sf.kern(prev, id);
        }
        width += sf.h_advance(id);
        prev = Some(id);
    }
    width
}

/// Visually truncate overflowing text with an ellipsis. Presentation detail
/// only; the underlying data is untouched.
pub fn truncate_to_width(text: &str, font_size: f32, font: &FontArc, max_width: f32) -> String {
    if measure_text_width(text, font_size, font) <= max_width {
        return text.to_string();
    }
    let ellipsis_w = measure_text_width("…", font_size, font);
    let mut out = String::new();
    let mut width = 0.0f32;
    for ch in text.chars() {
        let ch_w = measure_text_width(&ch.to_string(), font_size, font);
        if width + ch_w + ellipsis_w > max_width {
            break;
        }
        width += ch_w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Rasterize one line of text into a tight transparent pixmap. Glyphs are
/// laid out with kerning, baseline at ascent, then drawn coverage-scaled in
/// premultiplied space.
pub fn render_text_pixmap(
    text: &str,
    font_size: f32,
    font: &FontArc,
    color: [u8; 4],
) -> Pixmap {
    let scale = PxScale::from(font_size);
    let sf = font.as_scaled(scale);

    let mut pen_x = 0.0f32;
    let mut glyphs = Vec::<Glyph>::new();
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = glyphs.last() {
            pen_x += sf.kern(prev.id, id);
        }
        glyphs.push(Glyph {
            id,
            scale,
            position: point(pen_x, sf.ascent()),
        });
        pen_x += sf.h_advance(id);
    }

    // Union pixel bounds of the outlined glyphs.
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for g in &glyphs {
        if let Some(out) = font.outline_glyph(g.clone()) {
            let b = out.px_bounds();
            min_x = min_x.min(b.min.x);
            min_y = min_y.min(b.min.y);
            max_x = max_x.max(b.max.x);
            max_y = max_y.max(b.max.y);
        }
    }
    if min_x == f32::INFINITY {
        return Pixmap::new(1, 1).expect("pixmap");
    }

    let w = (max_x.ceil() - min_x.floor()).max(1.0) as u32;
    let h = (max_y.ceil() - min_y.floor()).max(1.0) as u32;
    let mut pm = Pixmap::new(w, h).expect("pixmap");

    let stride = pm.width() as usize;
    let dst = pm.pixels_mut();

    for g in &glyphs {
        if let Some(out) = font.outline_glyph(g.clone()) {
            let b = out.px_bounds();
            out.draw(|x, y, cov| {
                if cov <= f32::EPSILON {
                    return;
                }
                let ix = (x as f32 + b.min.x - min_x).floor() as i32;
                let iy = (y as f32 + b.min.y - min_y).floor() as i32;
                if ix < 0 || iy < 0 || ix >= w as i32 || iy >= h as i32 {
                    return;
                }
                let i = iy as usize * stride + ix as usize;

                // Premultiply by coverage * alpha; overlapping glyph edges
                // keep whichever sample covers more.
                let a_lin = (cov * color[3] as f32 / 255.0).clamp(0.0, 1.0);
                let sa = (a_lin * 255.0) as u8;
                if dst[i].alpha() >= sa {
                    return;
                }
                let sr = (color[0] as f32 * a_lin) as u8;
                let sg = (color[1] as f32 * a_lin) as u8;
                let sb = (color[2] as f32 * a_lin) as u8;
                if let Some(px) = PremultipliedColorU8::from_rgba(sr, sg, sb, sa) {
                    dst[i] = px;
                }
            });
        }
    }

    pm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_px_parses_suffixed_sizes() {
        assert_eq!(parse_css_px("35px"), 35.0);
        assert_eq!(parse_css_px(" 18 px"), 18.0);
        assert_eq!(parse_css_px("24"), 24.0);
    }

    #[test]
    fn css_px_falls_back_on_garbage() {
        assert_eq!(parse_css_px("large"), 35.0);
        assert_eq!(parse_css_px(""), 35.0);
        assert_eq!(parse_css_px("2.5em"), 35.0);
    }

    #[test]
    fn rasterization_and_truncation_with_a_real_font() {
        // Glyph-dependent checks only run where a system font exists.
        let Some(font) = load_system_font() else {
            return;
        };

        let pm = render_text_pixmap("Submit response", 20.0, &font, [255, 255, 255, 255]);
        assert!(pm.width() > 1);
        assert!(pm.data().iter().any(|&b| b != 0));

        let long = "pneumonoultramicroscopicsilicovolcanoconiosis";
        let full_w = measure_text_width(long, 20.0, &font);
        let cut = truncate_to_width(long, 20.0, &font, full_w / 2.0);
        assert!(cut.ends_with('…'));
        assert!(measure_text_width(&cut, 20.0, &font) <= full_w / 2.0);

        let short = truncate_to_width("ok", 20.0, &font, full_w);
        assert_eq!(short, "ok");
    }
}
