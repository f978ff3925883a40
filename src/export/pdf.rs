//! Renders a [`LayoutPlan`] with `printpdf` builtin fonts.

use std::io::BufWriter;

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};

use super::layout::{DrawOp, FontStyle, LayoutPlan, RgbColor, PT_TO_MM};
use super::ExportError;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

fn pdf_color(c: RgbColor) -> Color {
    Color::Rgb(Rgb::new(c.r, c.g, c.b, None))
}

fn draw(layer: &PdfLayerReference, fonts: &Fonts, op: &DrawOp, width: f32, height: f32) {
    match op {
        DrawOp::Text { x, y, size, style, color, text } => {
            layer.set_fill_color(pdf_color(*color));
            layer.use_text(text.as_str(), *size, Mm(*x), Mm(height - y), fonts.get(*style));
        }
        DrawOp::Rule { x1, x2, y, thickness, color } => {
            layer.set_outline_color(pdf_color(*color));
            layer.set_outline_thickness(*thickness / PT_TO_MM);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(*x1), Mm(height - y)), false),
                    (Point::new(Mm(*x2), Mm(height - y)), false),
                ],
                is_closed: false,
            });
        }
        DrawOp::Watermark { text, size, color } => {
            // Centred horizontally from an average glyph width estimate.
            let approx_width = text.chars().count() as f32 * size * PT_TO_MM * 0.55;
            let x = ((width - approx_width) / 2.0).max(0.0);
            layer.set_fill_color(pdf_color(*color));
            layer.use_text(text.as_str(), *size, Mm(x), Mm(height / 2.0), &fonts.bold);
        }
    }
}

/// Draws every page of `plan`. Returns the PDF bytes.
pub fn render_pdf(plan: &LayoutPlan) -> Result<Vec<u8>, ExportError> {
    let (width, height) = (plan.width, plan.height);
    let (doc, first_page, first_layer) =
        PdfDocument::new(&plan.title, Mm(width), Mm(height), "Layer 1");

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Font(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Font(e.to_string()))?,
        italic: doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(|e| ExportError::Font(e.to_string()))?,
    };

    for (i, page) in plan.pages.iter().enumerate() {
        let (page_idx, layer_idx) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(width), Mm(height), format!("Page {}", page.number))
        };
        let layer = doc.get_page(page_idx).get_layer(layer_idx);
        for op in &page.ops {
            draw(&layer, &fonts, op, width, height);
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ExportError::Save(e.to_string()))?;
    buf.into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))
}
