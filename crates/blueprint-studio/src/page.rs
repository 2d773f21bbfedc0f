//! The scrolling page the choreography is laid out on.
//!
//! All lengths are in viewport heights, so the layout (and every scroll range
//! resolved against it) is independent of the window size.

use anyhow::{Context, Result};

use blueprint_engine::anim::{ScrollAnchor, ScrollRange, Span};
use blueprint_engine::input::{InputFrame, Key};

/// Scroll distance of one wheel notch.
const WHEEL_LINE: f32 = 0.05;
/// Scroll distance of an arrow key press.
const ARROW_STEP: f32 = 0.1;
/// PageUp/PageDown/Space keep a sliver of the previous screen in view.
const PAGE_STEP: f32 = 0.9;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Section {
    pub selector: &'static str,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Page {
    sections: Vec<Section>,
    document_height: f32,
    scroll: f32,
}

impl Page {
    /// Viewport height in page units.
    pub const VIEWPORT: f32 = 1.0;

    pub fn new(sections: Vec<Section>) -> Self {
        let document_height = sections
            .iter()
            .map(|s| s.span.bottom())
            .fold(Self::VIEWPORT, f32::max);
        Self { sections, document_height, scroll: 0.0 }
    }

    /// The showcase layout: an intro screen, three measurement sections, the
    /// blueprint reveal and the ground, all inside `.content`.
    pub fn showcase() -> Self {
        Self::new(vec![
            Section { selector: ".content", span: Span::new(0.0, 6.0) },
            Section { selector: ".length", span: Span::new(1.0, 1.0) },
            Section { selector: ".wingspan", span: Span::new(2.0, 1.0) },
            Section { selector: ".phalange", span: Span::new(3.0, 1.0) },
            Section { selector: ".blueprint", span: Span::new(4.0, 1.0) },
            Section { selector: ".ground-container", span: Span::new(5.0, 1.0) },
        ])
    }

    pub fn span(&self, selector: &str) -> Option<Span> {
        self.sections.iter().find(|s| s.selector == selector).map(|s| s.span)
    }

    pub fn document_height(&self) -> f32 {
        self.document_height
    }

    pub fn max_scroll(&self) -> f32 {
        (self.document_height - Self::VIEWPORT).max(0.0)
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Clamps to `[0, max_scroll]`. Returns whether the offset changed.
    pub fn set_scroll(&mut self, offset: f32) -> bool {
        let offset = if offset.is_nan() { 0.0 } else { offset.clamp(0.0, self.max_scroll()) };
        if offset == self.scroll {
            return false;
        }
        self.scroll = offset;
        true
    }

    /// Scroll range of `trigger` between two anchors such as `"top bottom"`.
    pub fn range(&self, trigger: &str, start: &str, end: &str) -> Result<ScrollRange> {
        let span = self
            .span(trigger)
            .with_context(|| format!("no section `{trigger}` on the page"))?;
        let start: ScrollAnchor = start
            .parse()
            .with_context(|| format!("bad start anchor for `{trigger}`"))?;
        let end: ScrollAnchor = end
            .parse()
            .with_context(|| format!("bad end anchor for `{trigger}`"))?;
        Ok(ScrollRange::between(span, start, end, Self::VIEWPORT))
    }

    /// Applies this frame's wheel and key input. `viewport_px` is the window
    /// height in logical pixels, for pixel-precise wheels.
    ///
    /// Returns whether the scroll offset changed.
    pub fn apply_input(&mut self, frame: &InputFrame, viewport_px: f32, shift: bool) -> bool {
        let mut target = self.scroll;

        // Positive wheel deltas move the content down, toward the top of the page.
        target -= frame.wheel_lines * WHEEL_LINE;
        if viewport_px > 0.0 {
            target -= frame.wheel_pixels / viewport_px;
        }

        for key in &frame.keys_pressed {
            match key {
                Key::ArrowDown => target += ARROW_STEP,
                Key::ArrowUp => target -= ARROW_STEP,
                Key::PageDown => target += PAGE_STEP,
                Key::PageUp => target -= PAGE_STEP,
                Key::Space if shift => target -= PAGE_STEP,
                Key::Space => target += PAGE_STEP,
                Key::Home => target = 0.0,
                Key::End => target = self.max_scroll(),
                _ => {}
            }
        }

        self.set_scroll(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn showcase_layout() {
        let page = Page::showcase();
        assert_eq!(page.document_height(), 6.0);
        assert_eq!(page.max_scroll(), 5.0);
        assert_eq!(page.span(".blueprint"), Some(Span::new(4.0, 1.0)));
        assert!(page.span(".missing").is_none());
    }

    #[test]
    fn scroll_clamps_to_document() {
        let mut page = Page::showcase();
        assert!(page.set_scroll(9.0));
        assert_eq!(page.scroll(), 5.0);
        assert!(page.set_scroll(-1.0));
        assert_eq!(page.scroll(), 0.0);
        assert!(!page.set_scroll(-3.0));
        assert!(!page.set_scroll(f32::NAN));
    }

    #[test]
    fn blueprint_ranges() {
        let page = Page::showcase();
        let grow = page.range(".blueprint", "top bottom", "top top").unwrap();
        assert_eq!((grow.start, grow.end), (3.0, 4.0));
        let shrink = page.range(".blueprint", "bottom bottom", "bottom top").unwrap();
        assert_eq!((shrink.start, shrink.end), (4.0, 5.0));
        let flight = page.range(".content", "top top", "bottom bottom").unwrap();
        assert_eq!((flight.start, flight.end), (0.0, 5.0));
    }

    #[test]
    fn percentage_anchors() {
        let page = Page::showcase();
        let r = page.range(".wingspan", "top 25%", "bottom 50%").unwrap();
        assert_eq!((r.start, r.end), (1.75, 2.5));
    }

    #[test]
    fn bad_ranges_are_errors() {
        let page = Page::showcase();
        assert!(page.range(".nope", "top top", "bottom top").is_err());
        assert!(page.range(".length", "middle", "bottom top").is_err());
    }

    #[test]
    fn wheel_and_keys_move_the_page() {
        let mut page = Page::showcase();

        let mut frame = InputFrame::default();
        frame.wheel_lines = -4.0;
        assert!(page.apply_input(&frame, 800.0, false));
        assert!((page.scroll() - 0.2).abs() < 1e-6);

        let mut frame = InputFrame::default();
        frame.wheel_pixels = 400.0;
        page.apply_input(&frame, 800.0, false);
        assert_eq!(page.scroll(), 0.0);

        let mut frame = InputFrame::default();
        frame.keys_pressed = vec![Key::End];
        page.apply_input(&frame, 800.0, false);
        assert_eq!(page.scroll(), 5.0);

        let mut frame = InputFrame::default();
        frame.keys_pressed = vec![Key::Space];
        page.apply_input(&frame, 800.0, true);
        assert!((page.scroll() - 4.1).abs() < 1e-5);

        let mut frame = InputFrame::default();
        frame.keys_pressed = vec![Key::Home];
        page.apply_input(&frame, 800.0, false);
        assert_eq!(page.scroll(), 0.0);
    }

    #[test]
    fn empty_frame_changes_nothing() {
        let mut page = Page::showcase();
        assert!(!page.apply_input(&InputFrame::default(), 800.0, false));
    }
}
