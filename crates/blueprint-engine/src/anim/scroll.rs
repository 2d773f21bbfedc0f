use std::fmt;
use std::str::FromStr;

/// Vertical extent of a page element, in the same unit as the scroll offset.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Span {
    pub top: f32,
    pub height: f32,
}

impl Span {
    pub const fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    #[inline]
    pub fn bottom(self) -> f32 {
        self.top + self.height
    }
}

/// A point along an element or the viewport, as a fraction of its height.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AnchorPoint(pub f32);

impl AnchorPoint {
    pub const TOP: Self = Self(0.0);
    pub const CENTER: Self = Self(0.5);
    pub const BOTTOM: Self = Self(1.0);

    fn parse(token: &str) -> Option<Self> {
        match token {
            "top" => Some(Self::TOP),
            "center" => Some(Self::CENTER),
            "bottom" => Some(Self::BOTTOM),
            _ => {
                let pct: f32 = token.strip_suffix('%')?.parse().ok()?;
                pct.is_finite().then_some(Self(pct / 100.0))
            }
        }
    }
}

/// "`<element point> <viewport point>`": the scroll offset at which the
/// element point meets the viewport point, e.g. `"top bottom"` is reached
/// when the element's top enters at the bottom of the viewport.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollAnchor {
    pub element: AnchorPoint,
    pub viewport: AnchorPoint,
}

impl ScrollAnchor {
    pub const fn new(element: AnchorPoint, viewport: AnchorPoint) -> Self {
        Self { element, viewport }
    }

    /// Scroll offset at which this anchor is reached.
    pub fn resolve(self, element: Span, viewport_height: f32) -> f32 {
        element.top + element.height * self.element.0 - viewport_height * self.viewport.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorParseError {
    input: String,
}

impl fmt::Display for AnchorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid scroll anchor `{}`: expected `<top|center|bottom|N%> <top|center|bottom|N%>`",
            self.input
        )
    }
}

impl std::error::Error for AnchorParseError {}

impl FromStr for ScrollAnchor {
    type Err = AnchorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || AnchorParseError { input: s.to_string() };
        let mut parts = s.split_whitespace();
        let element = parts.next().and_then(AnchorPoint::parse).ok_or_else(err)?;
        let viewport = parts.next().and_then(AnchorPoint::parse).ok_or_else(err)?;
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(Self { element, viewport })
    }
}

/// Scroll offsets between which an animation scrubs.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollRange {
    pub start: f32,
    pub end: f32,
}

impl ScrollRange {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    pub fn between(trigger: Span, start: ScrollAnchor, end: ScrollAnchor, viewport_height: f32) -> Self {
        Self {
            start: start.resolve(trigger, viewport_height),
            end: end.resolve(trigger, viewport_height),
        }
    }

    /// Progress in `[0, 1]` at `scroll`. An empty or inverted range acts as a
    /// step at `start`.
    pub fn progress(self, scroll: f32) -> f32 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / span).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(s: &str) -> ScrollAnchor {
        s.parse().unwrap()
    }

    #[test]
    fn parses_keywords_and_percentages() {
        assert_eq!(anchor("top bottom"), ScrollAnchor::new(AnchorPoint::TOP, AnchorPoint::BOTTOM));
        assert_eq!(anchor("center 25%"), ScrollAnchor::new(AnchorPoint::CENTER, AnchorPoint(0.25)));
        assert_eq!(anchor("  bottom   100% "), ScrollAnchor::new(AnchorPoint::BOTTOM, AnchorPoint::BOTTOM));
    }

    #[test]
    fn rejects_malformed_anchors() {
        for bad in ["", "top", "top bottom left", "middle top", "top 25", "top x%"] {
            assert!(bad.parse::<ScrollAnchor>().is_err(), "{bad:?}");
        }
    }

    #[test]
    fn resolves_against_element_and_viewport() {
        let section = Span::new(4.0, 1.0);
        assert_eq!(anchor("top bottom").resolve(section, 1.0), 3.0);
        assert_eq!(anchor("top top").resolve(section, 1.0), 4.0);
        assert_eq!(anchor("bottom bottom").resolve(section, 1.0), 4.0);
        assert_eq!(anchor("bottom top").resolve(section, 1.0), 5.0);
        assert_eq!(anchor("top 25%").resolve(Span::new(2.0, 1.0), 800.0), 2.0 - 200.0);
    }

    #[test]
    fn progress_clamps() {
        let r = ScrollRange::new(3.0, 4.0);
        assert_eq!(r.progress(0.0), 0.0);
        assert_eq!(r.progress(3.5), 0.5);
        assert_eq!(r.progress(9.0), 1.0);
    }

    #[test]
    fn empty_range_is_a_step() {
        let r = ScrollRange::new(2.0, 2.0);
        assert_eq!(r.progress(1.99), 0.0);
        assert_eq!(r.progress(2.0), 1.0);
        assert_eq!(ScrollRange::new(5.0, 1.0).progress(3.0), 0.0);
    }

    #[test]
    fn between_uses_both_anchors() {
        let r = ScrollRange::between(Span::new(0.0, 6.0), anchor("top top"), anchor("bottom bottom"), 1.0);
        assert_eq!(r, ScrollRange::new(0.0, 5.0));
    }
}
