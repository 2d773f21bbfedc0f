use super::{Ease, PropertySink};

/// One animated property.
///
/// `from: None` means the start value is captured from the sink on the first
/// write, so a `to` tween starts wherever the property happens to be.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Track<K> {
    pub key: K,
    pub from: Option<f32>,
    pub to: f32,
}

impl<K> Track<K> {
    #[inline]
    pub fn value_at(&self, eased: f32) -> Option<f32> {
        self.from.map(|from| from + (self.to - from) * eased)
    }
}

/// A set of property tracks sharing one ease.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween<K> {
    tracks: Vec<Track<K>>,
    ease: Ease,
}

impl<K: Copy> Tween<K> {
    pub fn new(ease: Ease) -> Self {
        Self {
            tracks: Vec::new(),
            ease,
        }
    }

    /// Animates `key` between explicit endpoints.
    pub fn from_to(mut self, key: K, from: f32, to: f32) -> Self {
        self.tracks.push(Track {
            key,
            from: Some(from),
            to,
        });
        self
    }

    /// Animates `key` from its value at the first write to `to`.
    pub fn to(mut self, key: K, to: f32) -> Self {
        self.tracks.push(Track { key, from: None, to });
        self
    }

    /// Animates `key` from `from` to its current value in `sink`.
    pub fn from(mut self, key: K, from: f32, sink: &impl PropertySink<K>) -> Self {
        let to = sink.get(key);
        self.tracks.push(Track {
            key,
            from: Some(from),
            to,
        });
        self
    }

    #[inline]
    pub fn ease(&self) -> Ease {
        self.ease
    }

    #[inline]
    pub fn tracks(&self) -> &[Track<K>] {
        &self.tracks
    }

    /// Values at `progress`; tracks with an uncaptured start are skipped.
    pub fn sample(&self, progress: f32) -> impl Iterator<Item = (K, f32)> + '_ {
        let eased = self.ease.apply(progress);
        self.tracks
            .iter()
            .filter_map(move |t| t.value_at(eased).map(|v| (t.key, v)))
    }

    /// Writes only the tracks whose start is already known.
    ///
    /// Used for the immediate render at registration: `from_to` and `from`
    /// tracks show their start values, `to` tracks leave the target alone.
    pub fn render_start(&self, sink: &mut impl PropertySink<K>) {
        for (key, value) in self.sample(0.0) {
            sink.set(key, value);
        }
    }

    /// End value of the last track on `key`.
    pub fn target(&self, key: K) -> Option<f32>
    where
        K: PartialEq,
    {
        self.tracks.iter().rev().find(|t| t.key == key).map(|t| t.to)
    }

    /// Fills uncaptured start values from `start`; keys it returns `None`
    /// for stay uncaptured.
    pub fn fill_starts(&mut self, mut start: impl FnMut(K) -> Option<f32>) {
        for track in self.tracks.iter_mut().filter(|t| t.from.is_none()) {
            track.from = start(track.key);
        }
    }

    /// Captures missing start values from `sink`.
    pub fn capture(&mut self, sink: &impl PropertySink<K>) {
        self.fill_starts(|key| Some(sink.get(key)));
    }

    /// Captures missing start values, then writes every track at `progress`.
    pub fn apply(&mut self, progress: f32, sink: &mut impl PropertySink<K>) {
        self.capture(sink);
        for (key, value) in self.sample(progress) {
            sink.set(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn sample_is_pure() {
        let tween = Tween::new(Ease::Linear).from_to("h", 1.0, 0.0).from_to("b", 0.0, 1.0);
        let at_quarter: Vec<_> = tween.sample(0.25).collect();
        assert_eq!(at_quarter, vec![("h", 0.75), ("b", 0.25)]);
        assert_eq!(tween.sample(0.25).collect::<Vec<_>>(), at_quarter);
    }

    #[test]
    fn progress_is_clamped() {
        let tween = Tween::new(Ease::Linear).from_to("x", 0.0, 10.0);
        assert_eq!(tween.sample(3.0).next(), Some(("x", 10.0)));
        assert_eq!(tween.sample(-1.0).next(), Some(("x", 0.0)));
    }

    #[test]
    fn to_captures_start_on_first_apply() {
        let mut sink: HashMap<&str, f32> = HashMap::from([("y", 4.0)]);
        let mut tween = Tween::new(Ease::Linear).to("y", 8.0);
        assert_eq!(tween.sample(0.5).count(), 0);

        tween.render_start(&mut sink);
        assert_eq!(sink["y"], 4.0);

        tween.apply(0.5, &mut sink);
        assert_eq!(sink["y"], 6.0);

        // Start stays captured even after the sink moved.
        tween.apply(0.0, &mut sink);
        assert_eq!(sink["y"], 4.0);
    }

    #[test]
    fn fill_starts_leaves_unknown_keys_open() {
        let mut tween = Tween::new(Ease::Linear).to("draw", 0.0).to("opacity", 0.0);
        tween.fill_starts(|key| (key == "draw").then_some(1.0));
        assert_eq!(tween.sample(0.5).collect::<Vec<_>>(), vec![("draw", 0.5)]);
        assert_eq!(tween.target("opacity"), Some(0.0));
        assert_eq!(tween.target("x"), None);
    }

    #[test]
    fn from_ends_at_current_value() {
        let mut sink: HashMap<&str, f32> = HashMap::from([("clouds", 0.0)]);
        let tween = Tween::new(Ease::default()).from("clouds", 0.25, &sink);
        tween.render_start(&mut sink);
        assert_eq!(sink["clouds"], 0.25);
        assert_eq!(tween.sample(1.0).next(), Some(("clouds", 0.0)));
    }
}
