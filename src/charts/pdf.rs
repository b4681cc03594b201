//! PDF Drawing Backend
//! A `plotters` backend that writes a single-page vector PDF.
//!
//! The document is assembled by hand (catalog, page, content stream, font,
//! xref table) and only uses the built-in Helvetica face, so no font files
//! are embedded. One backend unit is one PDF point; the backend origin is the
//! top-left corner and y grows downwards, which is flipped when writing.

use plotters_backend::text_anchor::{HPos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
    FontTransform,
};
use thiserror::Error;

/// Glyph widths of Helvetica for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];
const DEFAULT_GLYPH_WIDTH: u16 = 556;

/// Helvetica ascender and descender as a fraction of the font size.
const ASCENT: f64 = 0.718;
const DESCENT: f64 = 0.207;

const PRODUCER: &str = "batch_plotter";

/// Width of `text` set in Helvetica at `size` points.
pub fn text_width(text: &str, size: f64) -> f64 {
    let em: u32 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if (32..=126).contains(&code) {
                u32::from(HELVETICA_WIDTHS[(code - 32) as usize])
            } else {
                u32::from(DEFAULT_GLYPH_WIDTH)
            }
        })
        .sum();
    f64::from(em) * size / 1000.0
}

/// Height of a line of Helvetica at `size` points.
pub fn text_height(size: f64) -> f64 {
    (ASCENT + DESCENT) * size
}

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("PDF page was already written")]
    AlreadyPresented,
}

/// Renders into a caller-owned byte buffer, written on `present`.
pub struct PdfBackend<'a> {
    target: &'a mut Vec<u8>,
    size: (u32, u32),
    title: String,
    content: String,
    presented: bool,
}

impl<'a> PdfBackend<'a> {
    /// Create a page of `size` points that is written into `target`.
    pub fn with_buffer(target: &'a mut Vec<u8>, size: (u32, u32)) -> Self {
        Self {
            target,
            size,
            title: String::new(),
            content: String::new(),
            presented: false,
        }
    }

    /// Set the document `/Title`.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    fn check_open(&self) -> Result<(), DrawingErrorKind<PdfError>> {
        if self.presented {
            Err(DrawingErrorKind::DrawingError(PdfError::AlreadyPresented))
        } else {
            Ok(())
        }
    }

    /// Backend coordinate to PDF user space.
    fn to_pdf(&self, (x, y): BackendCoord) -> (f64, f64) {
        (f64::from(x), f64::from(self.size.1) - f64::from(y))
    }

    fn set_stroke(&mut self, color: BackendColor, width: u32) {
        let (r, g, b) = color.rgb;
        self.content.push_str(&format!(
            "{} {} {} RG {} w\n",
            channel(r),
            channel(g),
            channel(b),
            width.max(1)
        ));
    }

    fn set_fill(&mut self, color: BackendColor) {
        let (r, g, b) = color.rgb;
        self.content.push_str(&format!(
            "{} {} {} rg\n",
            channel(r),
            channel(g),
            channel(b)
        ));
    }

    fn push_polyline<I: IntoIterator<Item = BackendCoord>>(&mut self, points: I) -> usize {
        let mut count = 0;
        for point in points {
            let (x, y) = self.to_pdf(point);
            let op = if count == 0 { "m" } else { "l" };
            self.content
                .push_str(&format!("{} {} {}\n", num(x), num(y), op));
            count += 1;
        }
        count
    }
}

impl<'a> DrawingBackend for PdfBackend<'a> {
    type ErrorType = PdfError;

    fn get_size(&self) -> (u32, u32) {
        self.size
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<PdfError>> {
        self.check_open()
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<PdfError>> {
        if self.presented {
            return Ok(());
        }
        let document = PdfDocument::single_page(self.size, &self.title, &self.content);
        self.target.clear();
        self.target.extend_from_slice(&document);
        self.presented = true;
        Ok(())
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<PdfError>> {
        self.check_open()?;
        if color.alpha == 0.0 {
            return Ok(());
        }
        let (x, y) = self.to_pdf(point);
        self.set_fill(color);
        self.content
            .push_str(&format!("{} {} 1 1 re f\n", num(x), num(y - 1.0)));
        Ok(())
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<PdfError>> {
        self.draw_path([from, to], style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<PdfError>> {
        self.check_open()?;
        let color = style.color();
        if color.alpha == 0.0 {
            return Ok(());
        }
        let (x0, y0) = self.to_pdf(upper_left);
        let (x1, y1) = self.to_pdf(bottom_right);
        let rect = format!(
            "{} {} {} {} re",
            num(x0.min(x1)),
            num(y0.min(y1)),
            num((x1 - x0).abs()),
            num((y1 - y0).abs())
        );

        if fill {
            self.set_fill(color);
            self.content.push_str(&format!("{} f\n", rect));
        } else {
            self.set_stroke(color, style.stroke_width());
            self.content.push_str(&format!("{} S\n", rect));
        }
        Ok(())
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<PdfError>> {
        self.check_open()?;
        let color = style.color();
        if color.alpha == 0.0 {
            return Ok(());
        }
        self.set_stroke(color, style.stroke_width());
        if self.push_polyline(path) > 0 {
            self.content.push_str("S\n");
        }
        Ok(())
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<PdfError>> {
        self.check_open()?;
        let color = style.color();
        if color.alpha == 0.0 {
            return Ok(());
        }
        self.set_fill(color);
        if self.push_polyline(vert) > 0 {
            self.content.push_str("h f\n");
        }
        Ok(())
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<PdfError>> {
        self.check_open()?;
        let color = style.color();
        if color.alpha == 0.0 || text.is_empty() {
            return Ok(());
        }

        let size = style.size();
        let width = text_width(text, size);
        let anchor = style.anchor();

        // Offset from the anchor point to the start of the baseline, in the
        // text's own (unrotated, y-up) frame.
        let dx = match anchor.h_pos {
            HPos::Left => 0.0,
            HPos::Center => -width / 2.0,
            HPos::Right => -width,
        };
        let dy = match anchor.v_pos {
            VPos::Top => -ASCENT * size,
            VPos::Center => -(ASCENT - DESCENT) * size / 2.0,
            VPos::Bottom => DESCENT * size,
        };

        // Text matrix rotation. Screen rotations are clockwise with y down,
        // so Rotate270 reads bottom to top.
        let (a, b, c, d) = match style.transform() {
            FontTransform::Rotate90 => (0.0, -1.0, 1.0, 0.0),
            FontTransform::Rotate180 => (-1.0, 0.0, 0.0, -1.0),
            FontTransform::Rotate270 => (0.0, 1.0, -1.0, 0.0),
            _ => (1.0, 0.0, 0.0, 1.0),
        };

        let (x, y) = self.to_pdf(pos);
        let e = x + a * dx + c * dy;
        let f = y + b * dx + d * dy;

        self.set_fill(color);
        self.content.push_str(&format!(
            "BT\n/F1 {} Tf\n{} {} {} {} {} {} Tm\n({}) Tj\nET\n",
            num(size),
            num(a),
            num(b),
            num(c),
            num(d),
            num(e),
            num(f),
            escape_text(text)
        ));
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<PdfError>> {
        let size = style.size();
        Ok((
            text_width(text, size).ceil() as u32,
            text_height(size).ceil() as u32,
        ))
    }
}

impl Drop for PdfBackend<'_> {
    fn drop(&mut self) {
        if !self.presented {
            let _ = self.present();
        }
    }
}

/// Writes the PDF file structure around a page content stream.
struct PdfDocument {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfDocument {
    fn single_page((width, height): (u32, u32), title: &str, content: &str) -> Vec<u8> {
        let mut doc = Self {
            buf: Vec::new(),
            offsets: Vec::new(),
        };

        doc.buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        // 1. Catalog
        doc.push_object("<< /Type /Catalog /Pages 2 0 R >>");

        // 2. Page tree
        doc.push_object("<< /Type /Pages /Kids [3 0 R] /Count 1 >>");

        // 3. Page
        doc.push_object(&format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 5 0 R >> >> \
             /Contents 4 0 R >>",
            width, height
        ));

        // 4. Content stream
        doc.push_object(&format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ));

        // 5. Font
        doc.push_object(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        );

        // 6. Document info
        doc.push_object(&format!(
            "<< /Title ({}) /Producer ({}) >>",
            escape_text(title),
            PRODUCER
        ));

        doc.finish()
    }

    fn push_object(&mut self, body: &str) {
        self.offsets.push(self.buf.len());
        let id = self.offsets.len();
        self.buf
            .extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", id, body).as_bytes());
    }

    fn finish(mut self) -> Vec<u8> {
        let xref_offset = self.buf.len();
        let size = self.offsets.len() + 1;

        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", size);
        for offset in &self.offsets {
            xref.push_str(&format!("{:010} 00000 n \n", offset));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            size,
            self.offsets.len(),
            xref_offset
        ));

        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}

/// Color channel as a PDF operand in 0..1.
fn channel(value: u8) -> String {
    num(f64::from(value) / 255.0)
}

/// Compact decimal: at most three fraction digits, no trailing zeros.
fn num(value: f64) -> String {
    let formatted = format!("{:.3}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Escape a string for a PDF literal in WinAnsi encoding.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => out.push_str(&format!("\\{:03o}", c as u32)),
            _ => out.push('?'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotters::coord::Shift;
    use plotters::prelude::*;

    fn render<F>(draw: F) -> Vec<u8>
    where
        F: FnOnce(&DrawingArea<PdfBackend<'_>, Shift>),
    {
        let mut buf = Vec::new();
        {
            let root = PdfBackend::with_buffer(&mut buf, (200, 100))
                .with_title("test")
                .into_drawing_area();
            draw(&root);
            root.present().unwrap();
        }
        buf
    }

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).to_string()
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack
            .windows(needle.len())
            .position(|window| window == needle)
    }

    fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack
            .windows(needle.len())
            .rposition(|window| window == needle)
    }

    fn shapes(root: &DrawingArea<PdfBackend<'_>, Shift>) {
        root.fill(&WHITE).unwrap();
        root.draw(&PathElement::new(vec![(50, 40), (60, 60)], BLUE))
            .unwrap();
        root.draw(&Rectangle::new([(5, 5), (40, 30)], RED)).unwrap();
    }

    #[test]
    fn document_structure() {
        let pdf = as_text(&render(|root| {
            root.fill(&WHITE).unwrap();
        }));

        assert!(pdf.starts_with("%PDF-1.4"));
        assert!(pdf.contains("/MediaBox [0 0 200 100]"));
        assert!(pdf.contains("/Count 1"));
        assert!(pdf.contains("/BaseFont /Helvetica "));
        assert!(pdf.contains("/Title (test)"));
        assert!(pdf.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let pdf = render(|root| {
            root.fill(&WHITE).unwrap();
        });

        let start = rfind(&pdf, b"startxref\n").unwrap() + b"startxref\n".len();
        let tail = as_text(&pdf[start..]);
        let xref_offset: usize = tail.lines().next().unwrap().parse().unwrap();
        assert!(pdf[xref_offset..].starts_with(b"xref"));

        let table = as_text(&pdf[xref_offset..]);
        let entries: Vec<usize> = table
            .lines()
            .skip(3)
            .take_while(|line| line.ends_with(" n "))
            .map(|line| line[..10].parse().unwrap())
            .collect();
        assert_eq!(entries.len(), 6);
        for (idx, offset) in entries.iter().enumerate() {
            let header = format!("{} 0 obj", idx + 1);
            assert!(pdf[*offset..].starts_with(header.as_bytes()));
        }
    }

    #[test]
    fn stream_length_matches_content() {
        let pdf = render(|root| {
            root.draw(&PathElement::new(vec![(0, 0), (50, 50)], BLACK))
                .unwrap();
        });

        let len_start = find(&pdf, b"/Length ").unwrap() + b"/Length ".len();
        let len: usize = as_text(&pdf[len_start..])
            .split_whitespace()
            .next()
            .unwrap()
            .parse()
            .unwrap();
        let stream_start = find(&pdf, b"stream\n").unwrap() + b"stream\n".len();
        let stream_end = find(&pdf, b"endstream").unwrap();
        assert_eq!(stream_end - stream_start, len);
    }

    #[test]
    fn lines_are_flipped_to_pdf_space() {
        let pdf = as_text(&render(|root| {
            root.draw(&PathElement::new(vec![(10, 0), (20, 90)], BLACK))
                .unwrap();
        }));

        assert!(pdf.contains("10 100 m\n20 10 l\nS\n"));
    }

    #[test]
    fn text_is_escaped_and_sized() {
        let pdf = as_text(&render(|root| {
            let style = ("sans-serif", 10).into_font().color(&BLACK);
            root.draw_text("f(x)", &style, (0, 0)).unwrap();
        }));

        assert!(pdf.contains("(f\\(x\\)) Tj"));
        assert!(pdf.contains("/F1 10 Tf"));
    }

    #[test]
    fn rotated_text_uses_rotation_matrix() {
        let pdf = as_text(&render(|root| {
            let style = ("sans-serif", 10)
                .into_font()
                .transform(FontTransform::Rotate270)
                .color(&BLACK);
            root.draw_text("Mean", &style, (20, 50)).unwrap();
        }));

        assert!(pdf.contains(" 0 1 -1 0 "));
        assert!(pdf.contains("(Mean) Tj"));
    }

    #[test]
    fn same_drawing_gives_identical_bytes() {
        assert_eq!(render(shapes), render(shapes));
    }

    #[test]
    fn helvetica_metrics() {
        assert_eq!(text_width("", 10.0), 0.0);
        assert!((text_width("0", 10.0) - 5.56).abs() < 1e-9);
        assert!(text_width("Mean", 10.0) > text_width("Min", 10.0));
        assert!((text_height(10.0) - 9.25).abs() < 1e-9);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(100.0), "100");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(123.4567), "123.457");
    }

    #[test]
    fn text_escaping() {
        assert_eq!(escape_text("é"), "\\351");
        assert_eq!(escape_text("→"), "?");
        assert_eq!(escape_text("a\\b"), "a\\\\b");
    }
}
