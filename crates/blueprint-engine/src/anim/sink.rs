use std::collections::HashMap;
use std::hash::Hash;

/// Named `f32` properties an animation reads and writes.
pub trait PropertySink<K> {
    fn get(&self, key: K) -> f32;
    fn set(&mut self, key: K, value: f32);
}

/// Missing keys read as `0.0`.
impl<K: Eq + Hash> PropertySink<K> for HashMap<K, f32> {
    fn get(&self, key: K) -> f32 {
        HashMap::get(self, &key).copied().unwrap_or(0.0)
    }

    fn set(&mut self, key: K, value: f32) {
        self.insert(key, value);
    }
}
