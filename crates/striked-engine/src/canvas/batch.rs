use crate::coords::Rect;

use super::DrawItem;

/// Ordered draw items of one canvas.
///
/// Insertion order is paint order: later items draw over earlier ones. No
/// sorting or de-duplication happens here.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - `clear()` keeps the allocation, so steady-state rebuilds do not allocate
#[derive(Debug, Default, PartialEq)]
pub struct Batch {
    items: Vec<DrawItem>,
}

impl Batch {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, item: DrawItem) {
        self.items.push(item);
    }

    /// Removes every item. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, DrawItem> {
        self.items.iter()
    }

    /// Union of every item's rect, or `None` for an empty batch.
    pub fn bounds(&self) -> Option<Rect> {
        self.items.iter().map(DrawItem::rect).reduce(Rect::union)
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a DrawItem;
    type IntoIter = std::slice::Iter<'a, DrawItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RectItem;
    use crate::coords::Vec2;
    use crate::paint::Color;

    fn rect(x: f32) -> DrawItem {
        DrawItem::Rect(RectItem {
            position: Vec2::new(x, 0.0),
            size: Vec2::new(10.0, 10.0),
            color: Color::WHITE,
        })
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut batch = Batch::new();
        for x in [30.0, 10.0, 20.0] {
            batch.push(rect(x));
        }
        let xs: Vec<f32> = batch.iter().map(|i| i.position().x).collect();
        assert_eq!(xs, vec![30.0, 10.0, 20.0]);
    }

    #[test]
    fn duplicates_are_kept() {
        let mut batch = Batch::new();
        batch.push(rect(0.0));
        batch.push(rect(0.0));
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn clear_empties_but_keeps_capacity() {
        let mut batch = Batch::new();
        for x in 0..16 {
            batch.push(rect(x as f32));
        }
        let cap = batch.items.capacity();
        batch.clear();
        assert!(batch.is_empty());
        assert_eq!(batch.items.capacity(), cap);
    }

    #[test]
    fn bounds_cover_every_item() {
        let mut batch = Batch::new();
        assert_eq!(batch.bounds(), None);
        batch.push(rect(0.0));
        batch.push(rect(50.0));
        assert_eq!(batch.bounds(), Some(Rect::new(0.0, 0.0, 60.0, 10.0)));
    }
}
