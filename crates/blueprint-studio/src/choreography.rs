//! What moves, when: the intro, the scroll-bound tweens and the flight
//! timeline, all written through [`ShowcaseSink`].

use std::f32::consts::TAU;

use anyhow::Result;

use blueprint_engine::anim::{
    Ease, PropertySink, ScrollDriver, Step, TimeDriver, TimeTween, Timeline, Tween,
};
use blueprint_engine::compositor::ViewportCompositor;
use blueprint_engine::scene::Axis;

use crate::overlay::{Element, OverlayState, Style};
use crate::page::Page;

/// View showing the wireframe layer.
pub const WIREFRAME_VIEW: usize = 1;

/// Duration of wall-clock tweens that do not name one.
pub const DEFAULT_TIME_DURATION: f32 = 0.5;

/// An animatable property of the showcase.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Prop {
    ViewBottom(usize),
    ViewHeight(usize),
    /// Tracked object position component.
    Position(Axis),
    /// Tracked object Euler rotation component, radians.
    Rotation(Axis),
    Overlay(Element, Style),
}

/// Routes [`Prop`] writes to the compositor's views, the tracked object and
/// the overlay.
pub struct ShowcaseSink<'a> {
    pub compositor: &'a mut ViewportCompositor,
    pub overlay: &'a mut OverlayState,
}

impl PropertySink<Prop> for ShowcaseSink<'_> {
    fn get(&self, key: Prop) -> f32 {
        let views = self.compositor.views();
        let ctx = self.compositor.context();
        match key {
            Prop::ViewBottom(i) => views.get(i).map_or(0.0, |v| v.bottom),
            Prop::ViewHeight(i) => views.get(i).map_or(0.0, |v| v.height),
            Prop::Position(axis) => ctx
                .tracked
                .transform(&ctx.scene)
                .map_or(0.0, |t| axis.get(t.position)),
            Prop::Rotation(axis) => ctx
                .tracked
                .transform(&ctx.scene)
                .map_or(0.0, |t| axis.get(t.rotation)),
            Prop::Overlay(element, style) => self.overlay.get(element, style),
        }
    }

    fn set(&mut self, key: Prop, value: f32) {
        match key {
            Prop::ViewBottom(i) => {
                if let Some(v) = self.compositor.view_mut(i) {
                    v.bottom = value;
                }
            }
            Prop::ViewHeight(i) => {
                if let Some(v) = self.compositor.view_mut(i) {
                    v.height = value;
                }
            }
            Prop::Position(axis) | Prop::Rotation(axis) => {
                let ctx = self.compositor.context_mut();
                let Some(t) = ctx.tracked.transform_mut(&mut ctx.scene) else { return };
                let target = match key {
                    Prop::Position(_) => &mut t.position,
                    _ => &mut t.rotation,
                };
                axis.set(target, value);
            }
            Prop::Overlay(element, style) => self.overlay.set(element, style, value),
        }
    }
}

fn position(x: f32, y: f32, z: f32) -> [(Prop, f32); 3] {
    [
        (Prop::Position(Axis::X), x),
        (Prop::Position(Axis::Y), y),
        (Prop::Position(Axis::Z), z),
    ]
}

/// Euler components in turns.
fn rotation(x: f32, y: f32, z: f32) -> [(Prop, f32); 3] {
    [
        (Prop::Rotation(Axis::X), TAU * x),
        (Prop::Rotation(Axis::Y), TAU * y),
        (Prop::Rotation(Axis::Z), TAU * z),
    ]
}

/// Where the object waits before the page is scrolled: off to the lower
/// right, nose toward the viewer.
pub fn initial_pose(sink: &mut impl PropertySink<Prop>) {
    sink.set(Prop::Rotation(Axis::Y), -TAU * 0.25);
    for (key, value) in position(80.0, -32.0, -60.0) {
        sink.set(key, value);
    }
}

/// Starts the intro: the canvas slides in from the right and fades up, the
/// loading indicator fades out and the scroll hint fades in.
pub fn intro(sink: &mut impl PropertySink<Prop>) -> TimeDriver<Prop> {
    let mut driver = TimeDriver::new();

    let canvas = Tween::new(Ease::default())
        .from_to(Prop::Overlay(Element::Canvas, Style::X), 0.5, 0.0)
        .from_to(Prop::Overlay(Element::Canvas, Style::Opacity), 0.0, 1.0);
    driver.play(TimeTween::new(canvas, 1.0), sink);

    let loading = Tween::new(Ease::default()).to(Prop::Overlay(Element::Loading, Style::Opacity), 0.0);
    driver.play(TimeTween::new(loading, DEFAULT_TIME_DURATION), sink);

    let cta = Tween::new(Ease::default()).to(Prop::Overlay(Element::ScrollCta, Style::Opacity), 1.0);
    driver.play(TimeTween::new(cta, DEFAULT_TIME_DURATION), sink);

    sink.set(Prop::Overlay(Element::Svg, Style::Opacity), 1.0);
    driver
}

/// Registers every scroll-bound animation of the page.
///
/// Registration order matters for the immediate renders: of the two blueprint
/// tweens the reveal is registered last, so the wireframe view starts empty.
pub fn scroll_driver(page: &Page, sink: &mut impl PropertySink<Prop>) -> Result<ScrollDriver<Prop>> {
    let mut driver = ScrollDriver::new();
    let view = WIREFRAME_VIEW;

    driver.add_tween(
        "blueprint-exit",
        page.range(".blueprint", "bottom bottom", "bottom top")?,
        Tween::new(Ease::NONE)
            .from_to(Prop::ViewHeight(view), 1.0, 0.0)
            .from_to(Prop::ViewBottom(view), 0.0, 1.0),
        sink,
    );
    driver.add_tween(
        "blueprint-reveal",
        page.range(".blueprint", "top bottom", "top top")?,
        Tween::new(Ease::NONE)
            .from_to(Prop::ViewHeight(view), 0.0, 1.0)
            .from_to(Prop::ViewBottom(view), 0.0, 0.0),
        sink,
    );

    let ground = page.range(".ground-container", "top bottom", "bottom top")?;
    driver.add_tween(
        "ground",
        ground,
        Tween::new(Ease::default()).to(Prop::Overlay(Element::Ground, Style::Y), 0.3),
        sink,
    );
    let clouds =
        Tween::new(Ease::default()).from(Prop::Overlay(Element::Clouds, Style::Y), 0.25, &*sink);
    driver.add_tween("clouds", ground, clouds, sink);

    let lines = [
        (["line-length", "line-length-fade"], Element::LineLength, ".length", ("top bottom", "top top")),
        (["line-wingspan", "line-wingspan-fade"], Element::LineWingspan, ".wingspan", ("top 25%", "bottom 50%")),
        (["circle-phalange", "circle-phalange-fade"], Element::CirclePhalange, ".phalange", ("top 50%", "bottom 100%")),
    ];
    for ([draw, fade], element, section, (start, end)) in lines {
        driver.add_tween(
            draw,
            page.range(section, start, end)?,
            Tween::new(Ease::default()).to(Prop::Overlay(element, Style::Draw), 1.0),
            sink,
        );
        driver.add_tween(
            fade,
            page.range(section, "top top", "bottom top")?,
            Tween::new(Ease::default())
                .to(Prop::Overlay(element, Style::Opacity), 0.0)
                .to(Prop::Overlay(element, Style::Draw), 0.0),
            sink,
        );
    }

    driver.add_timeline("flight", page.range(".content", "top top", "bottom bottom")?, flight()?);

    log::debug!("{} scroll animations registered", driver.len());
    Ok(driver)
}

/// The object's path through the page, on a timeline of 6.5 units.
pub fn flight() -> Result<Timeline<Prop>> {
    let mut tl = Timeline::new(1.0, "power2.inOut".parse()?);

    tl.add(0.0, Step::to([(Prop::Overlay(Element::ScrollCta, Style::Opacity), 0.0)]).duration(0.25))
        .add(0.0, Step::to([(Prop::Position(Axis::X), -10.0)]).ease("power1.in".parse()?));

    tl.add(1.0, Step::to(rotation(0.25, 0.0, -0.05)).ease("power1.inOut".parse()?))
        .add(1.0, Step::to(position(-40.0, 0.0, -60.0)).ease("power1.inOut".parse()?));

    tl.add(2.0, Step::to(rotation(0.25, 0.0, 0.05)).ease("power3.inOut".parse()?))
        .add(2.0, Step::to(position(40.0, 0.0, -60.0)).ease("power2.inOut".parse()?));

    tl.add(3.5, Step::to(position(-60.0, -6.0, -80.0)).ease("power2.inOut".parse()?))
        .add(3.5, Step::to(rotation(0.3, 0.25, 0.0)).ease("power3.inOut".parse()?));

    tl.add(4.5, Step::to(rotation(0.25, 0.5, 0.25)))
        .add(4.5, Step::to(position(0.0, -12.0, -100.0)));

    tl.add(5.5, Step::to(rotation(0.0, 0.5, 0.0)).ease("power2.inOut".parse()?))
        .add(5.5, Step::to(position(0.0, 0.0, -120.0)).ease("power2.inOut".parse()?));

    Ok(tl)
}
