//! Page elements drawn around the 3D canvas, and their animatable styles.

use glam::Vec2;

use blueprint_engine::coords::Rect;
use blueprint_engine::paint::Color;
use blueprint_engine::render::OverlayRect;

use crate::page::Page;

pub const BACKDROP: u32 = 0xe9e4de;
const BLUEPRINT: u32 = 0x2b4f7e;
const GROUND: u32 = 0x3b3a36;
const CLOUDS: u32 = 0xf7f5f2;
const INK: u32 = 0x171511;

/// Stroke width of line-draw indicators, logical pixels.
const STROKE: f32 = 2.0;

/// Animated page elements, named after their selectors.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    Canvas,
    Loading,
    ScrollCta,
    Svg,
    Ground,
    Clouds,
    LineLength,
    LineWingspan,
    CirclePhalange,
}

impl Element {
    pub const COUNT: usize = 9;

    pub const ALL: [Element; Self::COUNT] = [
        Element::Canvas,
        Element::Loading,
        Element::ScrollCta,
        Element::Svg,
        Element::Ground,
        Element::Clouds,
        Element::LineLength,
        Element::LineWingspan,
        Element::CirclePhalange,
    ];

    pub fn selector(self) -> &'static str {
        match self {
            Element::Canvas => "canvas",
            Element::Loading => ".loading",
            Element::ScrollCta => ".scroll-cta",
            Element::Svg => "svg",
            Element::Ground => ".ground",
            Element::Clouds => ".clouds",
            Element::LineLength => "#line-length",
            Element::LineWingspan => "#line-wingspan",
            Element::CirclePhalange => "#circle-phalange",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// One animatable style property.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Style {
    Opacity,
    /// Horizontal translation as a fraction of the element's width.
    X,
    /// Vertical translation as a fraction of the element's height.
    Y,
    /// Visible fraction of a stroke, `0..=1`.
    Draw,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ElementStyle {
    pub opacity: f32,
    pub x: f32,
    pub y: f32,
    pub draw: f32,
}

impl ElementStyle {
    const SHOWN: Self = Self { opacity: 1.0, x: 0.0, y: 0.0, draw: 1.0 };
    const HIDDEN: Self = Self { opacity: 0.0, ..Self::SHOWN };
}

/// Current style of every [`Element`].
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayState {
    styles: [ElementStyle; Element::COUNT],
}

impl Default for OverlayState {
    /// The page before the model arrives: only the loading indicator and the
    /// ground are visible.
    fn default() -> Self {
        let mut styles = [ElementStyle::SHOWN; Element::COUNT];
        for hidden in [Element::Canvas, Element::ScrollCta, Element::Svg] {
            styles[hidden.index()] = ElementStyle::HIDDEN;
        }
        for line in [Element::LineLength, Element::LineWingspan, Element::CirclePhalange] {
            styles[line.index()].draw = 0.0;
        }
        Self { styles }
    }
}

impl OverlayState {
    pub fn style(&self, element: Element) -> ElementStyle {
        self.styles[element.index()]
    }

    pub fn get(&self, element: Element, style: Style) -> f32 {
        let s = &self.styles[element.index()];
        match style {
            Style::Opacity => s.opacity,
            Style::X => s.x,
            Style::Y => s.y,
            Style::Draw => s.draw,
        }
    }

    /// Opacity and draw are clamped to `[0, 1]`.
    pub fn set(&mut self, element: Element, style: Style, value: f32) {
        let s = &mut self.styles[element.index()];
        match style {
            Style::Opacity => s.opacity = value.clamp(0.0, 1.0),
            Style::X => s.x = value,
            Style::Y => s.y = value,
            Style::Draw => s.draw = value.clamp(0.0, 1.0),
        }
    }
}

/// Overlay rectangles for one frame.
#[derive(Debug, Clone, Default)]
pub struct OverlayLayers {
    /// Drawn under the canvas.
    pub back: Vec<OverlayRect>,
    /// Drawn over the canvas.
    pub front: Vec<OverlayRect>,
}

/// Lays out the page at its current scroll offset in a `viewport` of logical
/// pixels.
pub fn layout(state: &OverlayState, page: &Page, viewport: Vec2) -> OverlayLayers {
    let mut layers = OverlayLayers::default();
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return layers;
    }
    let screen = Rect::new(0.0, 0.0, viewport.x, viewport.y);
    let section_rect = |selector: &str| {
        page.span(selector).map(|span| {
            let top = (span.top - page.scroll()) * viewport.y;
            Rect::new(0.0, top, viewport.x, span.height * viewport.y)
        })
    };

    // Back: the blueprint backdrop the wireframe view reveals, then the
    // parallax bands clipped to their container.
    if let Some(r) = section_rect(".blueprint").and_then(|r| r.intersect(screen)) {
        layers.back.push(OverlayRect::new(r, Color::from_hex(BLUEPRINT)));
    }
    if let Some(container) = section_rect(".ground-container") {
        let band = container.size.y * 0.5;
        let clouds = state.style(Element::Clouds);
        let ground = state.style(Element::Ground);
        let bands = [
            (container.origin.y + clouds.y * band, clouds, CLOUDS),
            (container.origin.y + band + ground.y * band, ground, GROUND),
        ];
        for (top, style, hex) in bands {
            let rect = Rect::new(0.0, top, viewport.x, band);
            layers.back.push(
                OverlayRect::new(rect, Color::from_hex(hex).faded(style.opacity)).clipped(container),
            );
        }
    }

    // Front: line-draw indicators, then the page chrome.
    let svg = state.style(Element::Svg).opacity;
    let ink = |element: Element| {
        let s = state.style(element);
        (Color::from_hex(INK).faded(s.opacity * svg), s.draw)
    };

    let (color, draw) = ink(Element::LineLength);
    let length = Rect::new(viewport.x * 0.2, viewport.y * 0.75, viewport.x * 0.6 * draw, STROKE);
    layers.front.push(OverlayRect::new(length, color));

    let (color, draw) = ink(Element::LineWingspan);
    let wingspan = Rect::new(viewport.x * 0.8, viewport.y * 0.2, STROKE, viewport.y * 0.6 * draw);
    layers.front.push(OverlayRect::new(wingspan, color));

    let (color, draw) = ink(Element::CirclePhalange);
    let radius = viewport.x.min(viewport.y) * 0.15;
    layers.front.push(OverlayRect::ring(viewport * 0.5, radius, STROKE, draw, color));

    let cta = state.style(Element::ScrollCta);
    let cta_color = Color::from_hex(INK).faded(cta.opacity);
    layers.front.push(OverlayRect::new(
        Rect::new(viewport.x * 0.5 - STROKE * 0.5, viewport.y - 72.0, STROKE, 40.0),
        cta_color,
    ));

    let loading = state.style(Element::Loading);
    layers.front.push(OverlayRect::new(
        Rect::new(viewport.x * 0.5 - 60.0, viewport.y * 0.5 - 2.0, 120.0, 4.0),
        Color::from_hex(INK).faded(loading.opacity),
    ));

    layers
}
