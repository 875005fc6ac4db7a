//! Ordered log of committed drawables with undo/redo.

use crate::drawables::{Drawable, DrawableId, DrawableTrait};
use kurbo::Point;

/// Committed drawables (oldest first) plus the stack of undone ones.
#[derive(Debug, Clone, Default)]
pub struct History {
    committed: Vec<Drawable>,
    redo_stack: Vec<Drawable>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a drawable. Any pending redo is discarded.
    pub fn commit(&mut self, drawable: Drawable) -> DrawableId {
        debug_assert!(!drawable.is_preview(), "previews are never committed");
        let id = drawable.id();
        self.committed.push(drawable);
        if !self.redo_stack.is_empty() {
            log::debug!("Commit discarded {} redo entries", self.redo_stack.len());
            self.redo_stack.clear();
        }
        id
    }

    /// Move the newest drawable onto the redo stack.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        if let Some(drawable) = self.committed.pop() {
            self.redo_stack.push(drawable);
            true
        } else {
            false
        }
    }

    /// Restore the most recently undone drawable.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        if let Some(drawable) = self.redo_stack.pop() {
            self.committed.push(drawable);
            true
        } else {
            false
        }
    }

    /// Empty both the committed sequence and the redo stack.
    pub fn clear(&mut self) {
        self.committed.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.committed.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of committed drawables.
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Committed drawables in insertion order (back to front).
    pub fn iter(&self) -> std::slice::Iter<'_, Drawable> {
        self.committed.iter()
    }

    pub fn committed(&self) -> &[Drawable] {
        &self.committed
    }

    /// Undone drawables; the last element is restored first.
    pub fn redo_stack(&self) -> &[Drawable] {
        &self.redo_stack
    }

    pub fn last(&self) -> Option<&Drawable> {
        self.committed.last()
    }

    /// Committed drawable with this id.
    ///
    /// Searches newest first since the live stroke is almost always last.
    pub fn get(&self, id: DrawableId) -> Option<&Drawable> {
        self.committed.iter().rev().find(|d| d.id() == id)
    }

    /// Mutable access to a committed drawable. Same search order as [`History::get`].
    pub fn get_mut(&mut self, id: DrawableId) -> Option<&mut Drawable> {
        self.committed.iter_mut().rev().find(|d| d.id() == id)
    }

    /// Top-most placed sticker within grabbing distance of `point`.
    pub fn sticker_at(&self, point: Point) -> Option<DrawableId> {
        self.committed
            .iter()
            .rev()
            .filter_map(Drawable::as_sticker)
            .find(|s| s.contains(point))
            .map(|s| s.id())
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Drawable;
    type IntoIter = std::slice::Iter<'a, Drawable>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawables::{Sticker, Stroke};

    fn stroke() -> Drawable {
        Drawable::Stroke(Stroke::from_points(
            vec![Point::new(10.0, 10.0), Point::new(20.0, 20.0)],
            4.0,
        ))
    }

    fn cat() -> Drawable {
        Drawable::Sticker(Sticker::new(Point::new(50.0, 50.0), "🐱", 32.0))
    }

    #[test]
    fn test_commit_undo_redo_roundtrip() {
        let mut history = History::new();
        let original = stroke();
        history.commit(original.clone());
        assert_eq!(history.len(), 1);

        assert!(history.undo());
        assert_eq!(history.len(), 0);
        assert_eq!(history.redo_len(), 1);

        assert!(history.redo());
        assert_eq!(history.len(), 1);
        assert_eq!(history.redo_len(), 0);
        assert_eq!(history.last(), Some(&original));
    }

    #[test]
    fn test_commit_clears_redo() {
        let mut history = History::new();
        history.commit(stroke());
        history.commit(cat());
        history.undo();
        history.undo();
        assert_eq!(history.redo_len(), 2);

        history.commit(stroke());
        assert_eq!(history.redo_len(), 0);
        assert!(!history.redo());
    }

    #[test]
    fn test_undo_empty_is_noop() {
        let mut history = History::new();
        assert!(!history.undo());
        assert!(!history.redo());
        assert!(history.is_empty());
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn test_undo_twice_then_redo_restores_order() {
        let mut history = History::new();
        let first = cat();
        let second = stroke();
        history.commit(first.clone());
        history.commit(second.clone());

        assert!(history.undo());
        assert!(history.undo());
        assert_eq!(history.len(), 0);
        assert_eq!(history.redo_len(), 2);
        // Top of the redo stack is the first commit.
        assert_eq!(history.redo_stack().last(), Some(&first));

        assert!(history.redo());
        assert!(history.redo());
        assert_eq!(history.committed(), &[first, second]);
    }

    #[test]
    fn test_clear_empties_both_stacks() {
        let mut history = History::new();
        history.commit(stroke());
        history.commit(cat());
        history.undo();

        history.clear();
        assert!(history.is_empty());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_sticker_at_prefers_topmost() {
        let mut history = History::new();
        let bottom = history.commit(cat());
        history.commit(stroke());
        let top = history.commit(Drawable::Sticker(Sticker::new(
            Point::new(60.0, 50.0),
            "🌵",
            32.0,
        )));

        assert_eq!(history.sticker_at(Point::new(55.0, 50.0)), Some(top));
        assert_eq!(history.sticker_at(Point::new(25.0, 50.0)), Some(bottom));
        assert_eq!(history.sticker_at(Point::new(200.0, 200.0)), None);
    }

    #[test]
    fn test_get_mut_finds_by_id() {
        let mut history = History::new();
        let id = history.commit(stroke());
        history.commit(cat());

        let drawable = history.get_mut(id).unwrap();
        drawable.as_stroke_mut().unwrap().extend(Point::new(30.0, 30.0));
        assert_eq!(history.get(id).and_then(Drawable::as_stroke).map(Stroke::len), Some(3));
    }

    #[test]
    fn test_get_and_get_mut_agree_on_repeated_id() {
        let mut history = History::new();
        let sticker = cat();
        let id = history.commit(sticker.clone());
        history.commit(sticker);

        history
            .get_mut(id)
            .and_then(Drawable::as_sticker_mut)
            .unwrap()
            .reposition(Point::new(90.0, 90.0));
        let seen = history.get(id).and_then(Drawable::as_sticker).map(|s| s.position);
        assert_eq!(seen, Some(Point::new(90.0, 90.0)));
        assert_eq!(
            history.committed()[0].as_sticker().map(|s| s.position),
            Some(Point::new(50.0, 50.0))
        );
    }
}
