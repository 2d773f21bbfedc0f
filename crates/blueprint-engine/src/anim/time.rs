use super::{PropertySink, Tween};

/// A tween played over wall-clock time.
#[derive(Debug, Clone)]
pub struct TimeTween<K> {
    tween: Tween<K>,
    duration: f32,
    delay: f32,
    elapsed: f32,
}

impl<K: Copy> TimeTween<K> {
    pub fn new(tween: Tween<K>, duration: f32) -> Self {
        Self {
            tween,
            duration: duration.max(0.0),
            delay: 0.0,
            elapsed: 0.0,
        }
    }

    pub fn with_delay(mut self, seconds: f32) -> Self {
        self.delay = seconds.max(0.0);
        self
    }

    pub fn progress(&self) -> f32 {
        let local = self.elapsed - self.delay;
        if local < 0.0 {
            0.0
        } else if self.duration <= 0.0 {
            1.0
        } else {
            (local / self.duration).min(1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.delay + self.duration
    }

    fn started(&self) -> bool {
        self.elapsed >= self.delay
    }
}

/// Plays [`TimeTween`]s by frame delta and drops them once finished.
#[derive(Debug, Clone)]
pub struct TimeDriver<K> {
    tweens: Vec<TimeTween<K>>,
}

impl<K> Default for TimeDriver<K> {
    fn default() -> Self {
        Self { tweens: Vec::new() }
    }
}

impl<K: Copy> TimeDriver<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `tween`, immediately showing its known start values.
    pub fn play(&mut self, tween: TimeTween<K>, sink: &mut impl PropertySink<K>) {
        tween.tween.render_start(sink);
        self.tweens.push(tween);
    }

    /// Whether any tween still needs frames.
    pub fn is_active(&self) -> bool {
        !self.tweens.is_empty()
    }

    /// Advances all tweens by `dt` seconds and writes them; finished tweens
    /// write their end values once and are removed. `on_update` runs after
    /// the writes when anything was written.
    pub fn advance<S: PropertySink<K>>(
        &mut self,
        dt: f32,
        sink: &mut S,
        on_update: impl FnOnce(&mut S),
    ) -> bool {
        let mut wrote = false;
        for t in &mut self.tweens {
            t.elapsed += dt.max(0.0);
            if t.started() {
                let progress = t.progress();
                t.tween.apply(progress, sink);
                wrote = true;
            }
        }
        self.tweens.retain(|t| !t.is_finished());
        if wrote {
            on_update(sink);
        }
        wrote
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::anim::Ease;

    #[test]
    fn from_to_renders_start_then_plays_to_end() {
        let mut sink: HashMap<&str, f32> = HashMap::new();
        let mut d = TimeDriver::new();
        d.play(
            TimeTween::new(Tween::new(Ease::Linear).from_to("opacity", 0.0, 1.0).from_to("x", 0.5, 0.0), 1.0),
            &mut sink,
        );
        assert_eq!(sink["opacity"], 0.0);
        assert_eq!(sink["x"], 0.5);

        d.advance(0.5, &mut sink, |_| {});
        assert_eq!(sink["opacity"], 0.5);
        assert!(d.is_active());

        d.advance(0.75, &mut sink, |_| {});
        assert_eq!(sink["opacity"], 1.0);
        assert_eq!(sink["x"], 0.0);
        assert!(!d.is_active());
    }

    #[test]
    fn to_starts_from_current_value() {
        let mut sink: HashMap<&str, f32> = HashMap::from([("loading", 1.0)]);
        let mut d = TimeDriver::new();
        d.play(TimeTween::new(Tween::new(Ease::Linear).to("loading", 0.0), 0.5), &mut sink);
        assert_eq!(sink["loading"], 1.0);
        d.advance(0.25, &mut sink, |_| {});
        assert_eq!(sink["loading"], 0.5);
    }

    #[test]
    fn delay_holds_writes() {
        let mut sink: HashMap<&str, f32> = HashMap::from([("a", 3.0)]);
        let mut d = TimeDriver::new();
        d.play(TimeTween::new(Tween::new(Ease::Linear).to("a", 0.0), 1.0).with_delay(1.0), &mut sink);
        let mut calls = 0;
        assert!(!d.advance(0.5, &mut sink, |_| calls += 1));
        assert_eq!(calls, 0);
        assert!(d.advance(1.0, &mut sink, |_| calls += 1));
        assert_eq!(calls, 1);
        assert_eq!(sink["a"], 1.5);
    }

    #[test]
    fn zero_duration_jumps_to_end() {
        let mut sink: HashMap<&str, f32> = HashMap::new();
        let mut d = TimeDriver::new();
        d.play(TimeTween::new(Tween::new(Ease::default()).from_to("svg", 0.0, 1.0), 0.0), &mut sink);
        d.advance(0.016, &mut sink, |_| {});
        assert_eq!(sink["svg"], 1.0);
        assert!(!d.is_active());
    }
}
