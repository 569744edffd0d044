//! Content-stream graphics operations, trimmed to what the emitter
//! draws: stroked rectangles for visual cues.

use std::fmt::Write;

/// An RGB color with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    pub fn gray(level: f64) -> Self {
        Self::rgb(level, level, level)
    }

    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }
}

#[derive(Debug, Clone)]
pub struct GraphicsContext {
    operations: String,
    stroke_color: Color,
}

impl GraphicsContext {
    pub fn new() -> Self {
        Self {
            operations: String::new(),
            stroke_color: Color::black(),
        }
    }

    pub fn set_stroke_color(&mut self, color: Color) -> &mut Self {
        self.stroke_color = color;
        self
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        writeln!(&mut self.operations, "{width:.2} w").unwrap();
        self
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        writeln!(
            &mut self.operations,
            "{x:.2} {y:.2} {width:.2} {height:.2} re"
        )
        .unwrap();
        self
    }

    pub fn stroke(&mut self) -> &mut Self {
        let c = self.stroke_color;
        writeln!(&mut self.operations, "{:.3} {:.3} {:.3} RG", c.r, c.g, c.b).unwrap();
        self.operations.push_str("S\n");
        self
    }

    pub(crate) fn generate_operations(&self) -> Vec<u8> {
        self.operations.as_bytes().to_vec()
    }
}

impl Default for GraphicsContext {
    fn default() -> Self {
        Self::new()
    }
}
