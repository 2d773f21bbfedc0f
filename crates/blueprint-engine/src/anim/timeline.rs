use super::{Ease, PropertySink, Track};

/// One `to` step added to a [`Timeline`].
#[derive(Debug, Clone)]
pub struct Step<K> {
    values: Vec<(K, f32)>,
    duration: Option<f32>,
    ease: Option<Ease>,
}

impl<K> Step<K> {
    pub fn to(values: impl IntoIterator<Item = (K, f32)>) -> Self {
        Self {
            values: values.into_iter().collect(),
            duration: None,
            ease: None,
        }
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }
}

#[derive(Debug, Clone)]
struct Segment<K> {
    start: f32,
    duration: f32,
    ease: Ease,
    track: Track<K>,
}

impl<K: Copy> Segment<K> {
    fn end(&self) -> f32 {
        self.start + self.duration
    }

    fn value_at(&self, t: f32) -> Option<f32> {
        let progress = if self.duration <= 0.0 {
            if t >= self.start { 1.0 } else { 0.0 }
        } else {
            (t - self.start) / self.duration
        };
        self.track.value_at(self.ease.apply(progress))
    }
}

/// Tweens placed at absolute positions on a shared time axis.
///
/// Each step chains from the previous step's end value on the same key; the
/// first step on a key captures its start from the sink on the first write.
#[derive(Debug, Clone)]
pub struct Timeline<K> {
    default_duration: f32,
    default_ease: Ease,
    segments: Vec<Segment<K>>,
}

impl<K: Copy + PartialEq> Timeline<K> {
    pub fn new(default_duration: f32, default_ease: Ease) -> Self {
        Self {
            default_duration,
            default_ease,
            segments: Vec::new(),
        }
    }

    /// Adds `step` starting at `position`.
    pub fn add(&mut self, position: f32, step: Step<K>) -> &mut Self {
        let duration = step.duration.unwrap_or(self.default_duration).max(0.0);
        let ease = step.ease.unwrap_or(self.default_ease);
        for (key, to) in step.values {
            let from = self
                .segments
                .iter()
                .rev()
                .find(|s| s.track.key == key)
                .map(|s| s.track.to);
            self.segments.push(Segment {
                start: position,
                duration,
                ease,
                track: Track { key, from, to },
            });
        }
        self
    }

    /// End of the last segment.
    pub fn duration(&self) -> f32 {
        self.segments.iter().map(Segment::end).fold(0.0, f32::max)
    }

    /// Keys in first-use order.
    pub fn keys(&self) -> Vec<K> {
        let mut keys: Vec<K> = Vec::new();
        for s in &self.segments {
            if !keys.contains(&s.track.key) {
                keys.push(s.track.key);
            }
        }
        keys
    }

    /// Values at time `t`.
    ///
    /// Per key, the segment that started most recently decides; before any
    /// segment on a key has started, the key holds its earliest segment's
    /// start value.
    pub fn sample(&self, t: f32) -> Vec<(K, f32)> {
        self.keys()
            .into_iter()
            .filter_map(|key| {
                let on_key = || self.segments.iter().filter(move |s| s.track.key == key);
                let active = on_key()
                    .filter(|s| s.start <= t)
                    .fold(None::<&Segment<K>>, |best, s| match best {
                        Some(b) if b.start > s.start => Some(b),
                        _ => Some(s),
                    });
                let value = match active {
                    Some(s) => s.value_at(t),
                    None => on_key()
                        .fold(None::<&Segment<K>>, |first, s| match first {
                            Some(f) if f.start <= s.start => Some(f),
                            _ => Some(s),
                        })
                        .and_then(|s| s.track.from),
                };
                value.map(|v| (key, v))
            })
            .collect()
    }

    /// Samples at `progress` of the total duration.
    pub fn sample_progress(&self, progress: f32) -> Vec<(K, f32)> {
        self.sample(progress.clamp(0.0, 1.0) * self.duration())
    }

    /// End value of the last step on `key`.
    pub fn target(&self, key: K) -> Option<f32> {
        self.segments
            .iter()
            .filter(|s| s.track.key == key)
            .max_by(|a, b| a.end().total_cmp(&b.end()))
            .map(|s| s.track.to)
    }

    /// Captures missing start values from `sink`.
    pub fn capture(&mut self, sink: &impl PropertySink<K>) {
        for s in self.segments.iter_mut().filter(|s| s.track.from.is_none()) {
            s.track.from = Some(sink.get(s.track.key));
        }
    }

    /// Captures missing start values, then writes every key at `progress`.
    pub fn apply(&mut self, progress: f32, sink: &mut impl PropertySink<K>) {
        self.capture(sink);
        for (key, value) in self.sample_progress(progress) {
            sink.set(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn flight() -> Timeline<&'static str> {
        let mut tl = Timeline::new(1.0, Ease::Linear);
        tl.add(0.0, Step::to([("x", 10.0)]))
            .add(1.0, Step::to([("x", 20.0), ("y", 5.0)]))
            .add(2.5, Step::to([("x", 0.0)]).duration(0.5));
        tl
    }

    #[test]
    fn duration_is_last_end() {
        assert_eq!(flight().duration(), 3.0);
    }

    #[test]
    fn steps_chain_from_previous_end() {
        let mut tl = flight();
        let mut sink: HashMap<&str, f32> = HashMap::from([("x", 0.0), ("y", 1.0)]);
        tl.apply(0.0, &mut sink);

        let at = |t: f32| tl.sample(t).into_iter().collect::<HashMap<_, _>>();
        assert_eq!(at(0.5)["x"], 5.0);
        assert_eq!(at(1.5)["x"], 15.0);
        assert_eq!(at(2.0)["x"], 20.0);
        assert_eq!(at(2.75)["x"], 10.0);
        assert_eq!(at(3.0)["x"], 0.0);
    }

    #[test]
    fn key_holds_start_before_its_first_step() {
        let mut tl = flight();
        let mut sink: HashMap<&str, f32> = HashMap::from([("x", 0.0), ("y", 1.0)]);
        tl.apply(0.0, &mut sink);
        assert_eq!(sink["y"], 1.0);

        let at = tl.sample(0.5).into_iter().collect::<HashMap<_, _>>();
        assert_eq!(at["y"], 1.0);
        let at = tl.sample(1.5).into_iter().collect::<HashMap<_, _>>();
        assert_eq!(at["y"], 3.0);
    }

    #[test]
    fn defaults_and_overrides() {
        let mut tl = Timeline::new(1.0, Ease::Power(2, crate::anim::EaseMode::InOut));
        tl.add(0.0, Step::to([("a", 1.0)]).duration(0.25).ease(Ease::Linear));
        let mut sink: HashMap<&str, f32> = HashMap::from([("a", 0.0)]);
        tl.apply(0.0, &mut sink);
        assert_eq!(tl.duration(), 0.25);
        assert_eq!(tl.sample(0.125), vec![("a", 0.5)]);
    }

    #[test]
    fn progress_maps_to_total_duration() {
        let mut tl = flight();
        let mut sink: HashMap<&str, f32> = HashMap::from([("x", 0.0), ("y", 0.0)]);
        tl.apply(0.5, &mut sink);
        // t = 1.5
        assert_eq!(sink["x"], 15.0);
        assert_eq!(sink["y"], 2.5);
    }
}
