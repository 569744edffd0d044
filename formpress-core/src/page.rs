use crate::graphics::GraphicsContext;
use crate::objects::Dictionary;
use crate::text::TextContext;

/// A single page: fixed size, static content, widget annotations.
///
/// Static text and graphics accumulate in the two contexts; fillable
/// widgets ride along as complete annotation dictionaries and are wired
/// into the AcroForm by the writer.
#[derive(Clone)]
pub struct Page {
    width: f64,
    height: f64,
    graphics_context: GraphicsContext,
    text_context: TextContext,
    widgets: Vec<Dictionary>,
}

impl Page {
    /// Creates a new page with the specified width and height in points.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            graphics_context: GraphicsContext::new(),
            text_context: TextContext::new(),
            widgets: Vec::new(),
        }
    }

    /// Creates a new A4 page (595 x 842 points).
    pub fn a4() -> Self {
        Self::new(595.0, 842.0)
    }

    /// Returns a mutable reference to the graphics context for drawing shapes.
    pub fn graphics(&mut self) -> &mut GraphicsContext {
        &mut self.graphics_context
    }

    /// Returns a mutable reference to the text context for adding text.
    pub fn text(&mut self) -> &mut TextContext {
        &mut self.text_context
    }

    /// Adds a complete widget annotation dictionary to the page.
    pub fn add_widget(&mut self, widget: Dictionary) {
        self.widgets.push(widget);
    }

    pub(crate) fn widgets(&self) -> &[Dictionary] {
        &self.widgets
    }

    pub(crate) fn width(&self) -> f64 {
        self.width
    }

    pub(crate) fn height(&self) -> f64 {
        self.height
    }

    pub(crate) fn generate_content(&self) -> Vec<u8> {
        let mut content = Vec::new();
        content.extend_from_slice(&self.graphics_context.generate_operations());
        content.extend_from_slice(&self.text_context.generate_operations());
        content
    }
}
