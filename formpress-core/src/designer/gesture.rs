use crate::geometry::Point;

/// The live pointer gesture, at most one per designer.
///
/// `Dragging` and `Resizing` are only reachable from `Idle`, never from
/// `Editing`; `Editing` is only reachable from `Idle` and only for
/// kinds that support inline editing.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Idle,
    Dragging {
        id: String,
        /// Pointer offset within the field body at gesture start
        grab: Point,
        /// Current (not yet committed) top-left position
        live: Point,
    },
    Resizing {
        id: String,
        /// Pointer position at gesture start
        start: Point,
        /// Field size at gesture start
        origin_width: f64,
        origin_height: f64,
    },
    Editing {
        id: String,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    /// The id of the field being edited, if any.
    pub fn editing_id(&self) -> Option<&str> {
        match self {
            Interaction::Editing { id } => Some(id),
            _ => None,
        }
    }

    /// Whether this gesture involves the given field.
    pub fn involves(&self, field_id: &str) -> bool {
        match self {
            Interaction::Idle => false,
            Interaction::Dragging { id, .. }
            | Interaction::Resizing { id, .. }
            | Interaction::Editing { id } => id == field_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_involves() {
        let idle = Interaction::Idle;
        assert!(!idle.involves("field-1"));
        assert!(idle.is_idle());

        let editing = Interaction::Editing {
            id: "field-1".to_string(),
        };
        assert!(editing.involves("field-1"));
        assert!(!editing.involves("field-2"));
        assert_eq!(editing.editing_id(), Some("field-1"));
    }
}
