use super::{PropertySink, ScrollRange, Timeline, Tween};

#[derive(Debug, Clone)]
enum Scrubbed<K> {
    Tween(Tween<K>),
    Timeline(Timeline<K>),
}

impl<K: Copy + PartialEq> Scrubbed<K> {
    fn target(&self, key: K) -> Option<f32> {
        match self {
            Scrubbed::Tween(t) => t.target(key),
            Scrubbed::Timeline(t) => t.target(key),
        }
    }

    fn capture(&mut self, sink: &impl PropertySink<K>) {
        match self {
            Scrubbed::Tween(t) => t.capture(sink),
            Scrubbed::Timeline(t) => t.capture(sink),
        }
    }

    fn sample(&self, progress: f32) -> Vec<(K, f32)> {
        match self {
            Scrubbed::Tween(t) => t.sample(progress).collect(),
            Scrubbed::Timeline(t) => t.sample_progress(progress),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry<K> {
    label: &'static str,
    range: ScrollRange,
    progress: f32,
    /// Whether the offset has reached `range.start`; decides shared keys even
    /// at progress 0.
    started: bool,
    animation: Scrubbed<K>,
}

/// Scroll-scrubbed animations.
///
/// Each entry maps the scroll offset through its [`ScrollRange`] to a
/// progress. The written state depends on the offset alone: per key, the
/// entry with the latest start at or before the offset decides, and before
/// any of them has started the earliest one holds its start value. This is
/// the rule [`Timeline::sample`] applies to its own steps.
///
/// A `to` track whose key an earlier-starting entry already animates starts
/// from that entry's end value. Other `to` tracks capture their start from
/// the sink on the first write.
#[derive(Debug, Clone)]
pub struct ScrollDriver<K> {
    entries: Vec<Entry<K>>,
    captured: bool,
}

impl<K> Default for ScrollDriver<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            captured: false,
        }
    }
}

impl<K: Copy + PartialEq> ScrollDriver<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a scrubbed tween and immediately renders its explicit start
    /// values.
    pub fn add_tween(
        &mut self,
        label: &'static str,
        range: ScrollRange,
        mut tween: Tween<K>,
        sink: &mut impl PropertySink<K>,
    ) {
        // Chained starts are not rendered: only explicit `from` values are.
        tween.render_start(sink);
        tween.fill_starts(|key| self.chained_start(range.start, key));
        self.insert(label, range, Scrubbed::Tween(tween));
    }

    /// Registers a scrubbed timeline. Nothing is written until the first
    /// update that changes a progress.
    pub fn add_timeline(&mut self, label: &'static str, range: ScrollRange, timeline: Timeline<K>) {
        self.insert(label, range, Scrubbed::Timeline(timeline));
    }

    /// End value of the latest-starting entry on `key` that starts no later
    /// than `start`.
    fn chained_start(&self, start: f32, key: K) -> Option<f32> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.range.start <= start)
            .find_map(|e| e.animation.target(key))
    }

    fn insert(&mut self, label: &'static str, range: ScrollRange, animation: Scrubbed<K>) {
        log::debug!("scroll entry `{label}` {:.3}..{:.3}", range.start, range.end);
        self.entries.push(Entry {
            label,
            range,
            progress: 0.0,
            started: false,
            animation,
        });
        // Stable: equal starts keep registration order.
        self.entries
            .sort_by(|a, b| a.range.start.total_cmp(&b.range.start));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current progress of the entry registered as `label`.
    pub fn progress(&self, label: &str) -> Option<f32> {
        self.entries.iter().find(|e| e.label == label).map(|e| e.progress)
    }

    /// Values every animated key holds at `scroll`.
    ///
    /// Keys whose start is still uncaptured are left out.
    pub fn sample(&self, scroll: f32) -> Vec<(K, f32)> {
        let mut resolved: Vec<(K, f32)> = Vec::new();
        // Ascending start order: a started entry overrides everything before it.
        for entry in &self.entries {
            let started = entry.range.start <= scroll;
            for (key, value) in entry.animation.sample(entry.range.progress(scroll)) {
                match resolved.iter_mut().find(|(k, _)| *k == key) {
                    Some(slot) if started => slot.1 = value,
                    Some(_) => {}
                    None => resolved.push((key, value)),
                }
            }
        }
        resolved
    }

    /// Scrubs every entry to `scroll`.
    ///
    /// When any entry's progress or started state changed, every key is
    /// written with its value at `scroll` and `on_update` runs once
    /// afterwards. Returns whether it ran.
    pub fn update<S: PropertySink<K>>(
        &mut self,
        scroll: f32,
        sink: &mut S,
        on_update: impl FnOnce(&mut S),
    ) -> bool {
        let mut changed = false;
        for entry in &mut self.entries {
            let progress = entry.range.progress(scroll);
            let started = entry.range.start <= scroll;
            if progress != entry.progress || started != entry.started {
                entry.progress = progress;
                entry.started = started;
                log::trace!("scroll entry `{}` -> {progress:.3}", entry.label);
                changed = true;
            }
        }
        if !changed {
            return false;
        }

        if !self.captured {
            self.captured = true;
            for entry in &mut self.entries {
                entry.animation.capture(sink);
            }
        }
        for (key, value) in self.sample(scroll) {
            sink.set(key, value);
        }
        on_update(sink);
        true
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::anim::{Ease, Step};

    type Sink = HashMap<&'static str, f32>;

    /// The blueprint slice: grows over 3..4, then slides up and shrinks over 4..5.
    fn blueprint(sink: &mut Sink) -> ScrollDriver<&'static str> {
        let mut d = ScrollDriver::new();
        d.add_tween(
            "shrink",
            ScrollRange::new(4.0, 5.0),
            Tween::new(Ease::Linear).from_to("h", 1.0, 0.0).from_to("b", 0.0, 1.0),
            sink,
        );
        d.add_tween(
            "grow",
            ScrollRange::new(3.0, 4.0),
            Tween::new(Ease::Linear).from_to("h", 0.0, 1.0).from_to("b", 0.0, 0.0),
            sink,
        );
        d
    }

    #[test]
    fn registration_renders_in_registration_order() {
        let mut sink = Sink::new();
        blueprint(&mut sink);
        assert_eq!((sink["b"], sink["h"]), (0.0, 0.0));
    }

    #[test]
    fn later_range_wins_shared_keys() {
        let mut sink = Sink::new();
        let mut d = blueprint(&mut sink);

        d.update(3.5, &mut sink, |_| {});
        assert_eq!((sink["b"], sink["h"]), (0.0, 0.5));

        d.update(4.5, &mut sink, |_| {});
        assert_eq!((sink["b"], sink["h"]), (0.5, 0.5));

        d.update(5.0, &mut sink, |_| {});
        assert_eq!((sink["b"], sink["h"]), (1.0, 0.0));
    }

    #[test]
    fn jumping_past_both_ranges_lands_on_final_state() {
        let mut sink = Sink::new();
        let mut d = blueprint(&mut sink);
        d.update(10.0, &mut sink, |_| {});
        assert_eq!((sink["b"], sink["h"]), (1.0, 0.0));

        // Back at the top the nearer range decides: the slice is closed again.
        d.update(0.0, &mut sink, |_| {});
        assert_eq!((sink["b"], sink["h"]), (0.0, 0.0));
    }

    #[test]
    fn scrolling_up_through_the_seam_hands_back_to_the_earlier_range() {
        let mut sink = Sink::new();
        let mut d = blueprint(&mut sink);
        d.update(4.5, &mut sink, |_| {});
        d.update(3.9, &mut sink, |_| {});
        assert_eq!(sink["b"], 0.0);
        assert!((sink["h"] - 0.9).abs() < 1e-5);
    }

    #[test]
    fn callback_fires_once_and_only_on_change() {
        let mut sink = Sink::new();
        let mut d = blueprint(&mut sink);
        let mut calls = 0;

        assert!(!d.update(0.0, &mut sink, |_| calls += 1));
        assert!(d.update(4.5, &mut sink, |_| calls += 1));
        assert!(!d.update(4.5, &mut sink, |_| calls += 1));
        assert_eq!(calls, 1);
        assert_eq!(d.progress("grow"), Some(1.0));
        assert_eq!(d.progress("shrink"), Some(0.5));
    }

    /// Two overlapping ranges on one key: a draw-in over 1..3 and a
    /// draw-out over 2..4 chained from the draw-in's end.
    fn draw_then_fade(sink: &mut Sink) -> ScrollDriver<&'static str> {
        let mut d = ScrollDriver::new();
        d.add_tween("draw", ScrollRange::new(1.0, 3.0), Tween::new(Ease::Linear).to("draw", 1.0), sink);
        d.add_tween(
            "fade",
            ScrollRange::new(2.0, 4.0),
            Tween::new(Ease::Linear).to("draw", 0.0).to("opacity", 0.0),
            sink,
        );
        d
    }

    #[test]
    fn chained_to_starts_from_the_earlier_range_end() {
        let mut sink = Sink::from([("draw", 0.0), ("opacity", 1.0)]);
        let mut d = draw_then_fade(&mut sink);
        d.update(3.0, &mut sink, |_| {});
        assert_eq!((sink["draw"], sink["opacity"]), (0.5, 0.5));
    }

    #[test]
    fn overlapping_ranges_resolve_from_the_offset_alone() {
        let walk = |offsets: &[f32]| {
            let mut sink = Sink::from([("draw", 0.0), ("opacity", 1.0)]);
            let mut d = draw_then_fade(&mut sink);
            for &offset in offsets {
                d.update(offset, &mut sink, |_| {});
            }
            (sink["draw"], sink["opacity"])
        };

        let from_below = walk(&[0.5, 1.5, 2.0, 2.5]);
        let from_above = walk(&[0.5, 1.5, 2.0, 3.5, 2.5]);
        let jumped = walk(&[2.5]);
        assert_eq!(from_below, (0.75, 0.75));
        assert_eq!(from_above, from_below);
        assert_eq!(jumped, from_below);

        // Before the fade starts the draw-in alone decides.
        assert_eq!(walk(&[3.5, 1.5]), (0.25, 1.0));
    }

    #[test]
    fn sample_matches_what_update_writes() {
        let mut sink = Sink::new();
        let mut d = blueprint(&mut sink);
        d.update(4.25, &mut sink, |_| {});
        for (key, value) in d.sample(4.25) {
            assert_eq!(sink[key], value);
        }
        assert_eq!(d.sample(0.0), vec![("h", 0.0), ("b", 0.0)]);
    }

    #[test]
    fn timeline_captures_on_first_scrub() {
        let mut sink = Sink::from([("x", 80.0)]);
        let mut tl = Timeline::new(1.0, Ease::Linear);
        tl.add(0.0, Step::to([("x", -10.0)]));
        let mut d = ScrollDriver::new();
        d.add_timeline("flight", ScrollRange::new(0.0, 2.0), tl);
        assert_eq!(sink["x"], 80.0);

        sink.insert("x", 90.0);
        d.update(1.0, &mut sink, |_| {});
        assert_eq!(sink["x"], 40.0);
    }
}
