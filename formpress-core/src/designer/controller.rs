use super::Interaction;
use crate::error::{FormError, Result};
use crate::geometry::Point;
use crate::model::{Field, FieldKind, MIN_FIELD_SIZE, PAGE_HEIGHT, PAGE_WIDTH};
use tracing::debug;

/// Owner of the single ordered field collection and the live gesture.
///
/// All mutation goes through this type; there is exactly one writer,
/// driven synchronously by user gestures.
pub struct FormDesigner {
    fields: Vec<Field>,
    next_id: u64,
    placements: u64,
    interaction: Interaction,
}

impl FormDesigner {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            next_id: 1,
            placements: 0,
            interaction: Interaction::Idle,
        }
    }

    /// The collection, in insertion order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    fn field_mut(&mut self, id: &str) -> Result<&mut Field> {
        self.fields
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| FormError::UnknownField(id.to_string()))
    }

    // ---- collection operations -------------------------------------

    /// Creates a field of the given kind with catalog defaults, placed
    /// at a cascading offset so successive additions stay visible.
    pub fn add_field(&mut self, kind: FieldKind) -> &Field {
        let defaults = kind.defaults();

        let step = (self.placements % 10) as f64;
        let x = 40.0 + step * 24.0;
        let y = 40.0 + step * 24.0;
        self.placements += 1;

        let field = Field {
            id: format!("field-{}", self.next_id),
            kind,
            label: defaults.label.to_string(),
            x,
            y,
            width: defaults.width,
            height: defaults.height,
            options: kind
                .has_options()
                .then(|| defaults.options.iter().map(|s| s.to_string()).collect()),
        };
        self.next_id += 1;

        debug!(id = %field.id, kind = %kind, "field added");
        self.fields.push(field);
        self.fields.last().unwrap()
    }

    /// Moves a field, clamped so it stays fully inside the canvas. A
    /// field resized larger than the page pins to the origin edge.
    pub fn move_field(&mut self, id: &str, x: f64, y: f64) -> Result<()> {
        let field = self.field_mut(id)?;
        field.x = x.clamp(0.0, (PAGE_WIDTH - field.width).max(0.0));
        field.y = y.clamp(0.0, (PAGE_HEIGHT - field.height).max(0.0));
        debug!(id, x = field.x, y = field.y, "field moved");
        Ok(())
    }

    /// Resizes a field. Both axes clamp to the minimum size; square
    /// kinds (checkbox, radio) take the larger of the two results on
    /// both axes.
    pub fn resize_field(&mut self, id: &str, width: f64, height: f64) -> Result<()> {
        let field = self.field_mut(id)?;
        let mut width = width.max(MIN_FIELD_SIZE);
        let mut height = height.max(MIN_FIELD_SIZE);

        if field.kind.keeps_square() {
            let side = width.max(height);
            width = side;
            height = side;
        }

        field.width = width;
        field.height = height;
        debug!(id, width, height, "field resized");
        Ok(())
    }

    /// Sets the caption of a `Label` field. Blank text restores the
    /// kind's default label.
    pub fn set_label(&mut self, id: &str, text: &str) -> Result<()> {
        let field = self.field_mut(id)?;
        if field.kind != FieldKind::Label {
            return Err(FormError::UnsupportedFieldOperation {
                id: id.to_string(),
                operation: "label editing",
            });
        }

        let text = text.trim();
        field.label = if text.is_empty() {
            field.kind.defaults().label.to_string()
        } else {
            text.to_string()
        };
        Ok(())
    }

    /// Sets the option list of an option-bearing field from raw
    /// newline-separated text. Blank lines are discarded; an empty
    /// result substitutes the kind's default list.
    pub fn set_options(&mut self, id: &str, text: &str) -> Result<()> {
        let field = self.field_mut(id)?;
        if !field.kind.has_options() {
            return Err(FormError::UnsupportedFieldOperation {
                id: id.to_string(),
                operation: "option editing",
            });
        }

        let mut lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        if lines.is_empty() {
            lines = field
                .kind
                .defaults()
                .options
                .iter()
                .map(|s| s.to_string())
                .collect();
        }

        field.options = Some(lines);
        Ok(())
    }

    /// Removes a field immediately. Its id is never reused.
    pub fn remove_field(&mut self, id: &str) -> Result<()> {
        let before = self.fields.len();
        self.fields.retain(|f| f.id != id);
        if self.fields.len() == before {
            return Err(FormError::UnknownField(id.to_string()));
        }

        if self.interaction.involves(id) {
            self.interaction = Interaction::Idle;
        }
        debug!(id, "field removed");
        Ok(())
    }

    // ---- pointer gestures ------------------------------------------

    /// Pointer-down over a field body: begins a drag.
    ///
    /// Suppressed while any gesture is active, including edit mode on
    /// the same field. Returns whether a drag started.
    pub fn pointer_down(&mut self, id: &str, at: Point) -> bool {
        if !self.interaction.is_idle() {
            return false;
        }
        let Some(field) = self.field(id) else {
            return false;
        };

        self.interaction = Interaction::Dragging {
            id: id.to_string(),
            grab: Point::new(at.x - field.x, at.y - field.y),
            live: Point::new(field.x, field.y),
        };
        true
    }

    /// Pointer-down over the bottom-right resize handle: begins a
    /// resize. Returns whether a resize started.
    pub fn handle_down(&mut self, id: &str, at: Point) -> bool {
        if !self.interaction.is_idle() {
            return false;
        }
        let Some(field) = self.field(id) else {
            return false;
        };

        self.interaction = Interaction::Resizing {
            id: id.to_string(),
            start: at,
            origin_width: field.width,
            origin_height: field.height,
        };
        true
    }

    /// Pointer movement during a gesture.
    ///
    /// Dragging tracks the clamped live position without touching the
    /// field; resizing commits continuously with
    /// `max(MIN_FIELD_SIZE, origin + delta)` per axis.
    pub fn pointer_move(&mut self, at: Point) {
        match self.interaction.clone() {
            Interaction::Dragging { id, grab, .. } => {
                let Some(field) = self.field(&id) else {
                    self.interaction = Interaction::Idle;
                    return;
                };
                let live = Point::new(
                    (at.x - grab.x).clamp(0.0, (PAGE_WIDTH - field.width).max(0.0)),
                    (at.y - grab.y).clamp(0.0, (PAGE_HEIGHT - field.height).max(0.0)),
                );
                self.interaction = Interaction::Dragging { id, grab, live };
            }
            Interaction::Resizing {
                id,
                start,
                origin_width,
                origin_height,
            } => {
                let width = origin_width + (at.x - start.x);
                let height = origin_height + (at.y - start.y);
                // resize_field applies the floor and the square rule
                let _ = self.resize_field(&id, width, height);
            }
            Interaction::Idle | Interaction::Editing { .. } => {}
        }
    }

    /// Pointer release: commits a drag's final position and returns the
    /// designer to idle. Resizes have already been committed.
    pub fn pointer_up(&mut self) {
        if let Interaction::Dragging { id, live, .. } = self.interaction.clone() {
            let _ = self.move_field(&id, live.x, live.y);
        }
        match self.interaction {
            Interaction::Editing { .. } => {}
            _ => self.interaction = Interaction::Idle,
        }
    }

    /// Double-click: enters edit mode for label and option-bearing
    /// kinds. Returns whether edit mode was entered.
    pub fn double_click(&mut self, id: &str) -> bool {
        if !self.interaction.is_idle() {
            return false;
        }
        let Some(field) = self.field(id) else {
            return false;
        };
        if !field.kind.inline_editable() {
            return false;
        }

        self.interaction = Interaction::Editing { id: id.to_string() };
        true
    }

    /// Commits the inline editor's raw text (blur or Enter) and leaves
    /// edit mode: label text for `Label` fields, newline-separated
    /// options for the rest.
    pub fn commit_edit(&mut self, text: &str) -> Result<()> {
        let Interaction::Editing { id } = self.interaction.clone() else {
            return Ok(());
        };
        self.interaction = Interaction::Idle;

        let kind = self.field_mut(&id)?.kind;
        if kind == FieldKind::Label {
            self.set_label(&id, text)
        } else {
            self.set_options(&id, text)
        }
    }
}

impl Default for FormDesigner {
    fn default() -> Self {
        Self::new()
    }
}
