// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Ordered image list with a bounded cursor.

use super::image::Image;

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    images: Vec<Image>,
    cursor: usize,
}

impl Navigator {
    pub fn new(images: Vec<Image>) -> Self {
        Self { images, cursor: 0 }
    }

    /// The image under the cursor, or `None` for an empty list.
    pub fn current(&self) -> Option<&Image> {
        self.images.get(self.cursor)
    }

    /// Move forward one image. At the last image this is a no-op.
    pub fn next(&mut self) -> Option<&Image> {
        if self.has_next() {
            self.cursor += 1;
        }
        self.current()
    }

    /// Move back one image. At the first image this is a no-op.
    pub fn previous(&mut self) -> Option<&Image> {
        if self.has_previous() {
            self.cursor -= 1;
        }
        self.current()
    }

    pub fn has_next(&self) -> bool {
        self.cursor + 1 < self.images.len()
    }

    pub fn has_previous(&self) -> bool {
        self.cursor > 0
    }

    /// Images within `radius` steps of the cursor, the current one included.
    pub fn nearby(&self, radius: usize) -> &[Image] {
        let start = self.cursor.saturating_sub(radius);
        let end = self.cursor.saturating_add(radius).saturating_add(1).min(self.images.len());
        &self.images[start.min(end)..end]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(n: i64) -> Vec<Image> {
        (1..=n).map(|i| Image::new(i, format!("{}.png", i))).collect()
    }

    #[test]
    fn test_empty_has_no_current() {
        let mut nav = Navigator::new(Vec::new());
        assert!(nav.current().is_none());
        assert!(nav.next().is_none());
        assert!(nav.previous().is_none());
        assert_eq!(nav.cursor(), 0);
        assert!(!nav.has_next() && !nav.has_previous());
    }

    #[test]
    fn test_bounds_do_not_wrap() {
        let mut nav = Navigator::new(images(2));
        assert_eq!(nav.previous().map(|i| i.url.as_str()), Some("1.png"));
        assert_eq!(nav.next().map(|i| i.url.as_str()), Some("2.png"));
        assert_eq!(nav.next().map(|i| i.url.as_str()), Some("2.png"));
        assert_eq!(nav.cursor(), 1);
        assert!(!nav.has_next());
        assert!(nav.has_previous());
    }

    #[test]
    fn test_nearby_window_is_clamped() {
        let urls = |nav: &Navigator| -> Vec<String> { nav.nearby(1).iter().map(|i| i.url.clone()).collect() };

        let mut nav = Navigator::new(images(5));
        assert_eq!(urls(&nav), vec!["1.png", "2.png"]);

        nav.next();
        nav.next();
        assert_eq!(urls(&nav), vec!["2.png", "3.png", "4.png"]);

        nav.next();
        nav.next();
        assert_eq!(urls(&nav), vec!["4.png", "5.png"]);
        assert_eq!(nav.nearby(0).len(), 1);

        assert!(Navigator::new(Vec::new()).nearby(1).is_empty());
    }

    #[test]
    fn test_cursor_stays_in_range_for_any_walk() {
        // Deterministic pseudo-random walk over a few list sizes.
        let mut seed: u32 = 0x2545_f491;
        for n in 1..=5 {
            let mut nav = Navigator::new(images(n));
            for _ in 0..200 {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                if seed % 2 == 0 {
                    nav.next();
                } else {
                    nav.previous();
                }
                assert!(nav.cursor() < nav.len());
                assert!(nav.current().is_some());
            }
        }
    }
}
