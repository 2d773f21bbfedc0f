/// Visibility layer mask.
///
/// 32 layers, one bit each. Objects and cameras both carry a mask; an object
/// is visible to a camera when the masks share at least one bit. New masks
/// start on layer 0.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Layers(u32);

impl Layers {
    pub const COUNT: u8 = 32;

    /// Mask containing only `layer`.
    #[inline]
    pub const fn only(layer: u8) -> Self {
        Self(bit(layer))
    }

    #[inline]
    pub const fn none() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn mask(self) -> u32 {
        self.0
    }

    /// Replaces the mask with exactly `layer`.
    #[inline]
    pub fn set(&mut self, layer: u8) {
        self.0 = bit(layer);
    }

    #[inline]
    pub fn enable(&mut self, layer: u8) {
        self.0 |= bit(layer);
    }

    #[inline]
    pub fn disable(&mut self, layer: u8) {
        self.0 &= !bit(layer);
    }

    #[inline]
    pub fn disable_all(&mut self) {
        self.0 = 0;
    }

    #[inline]
    pub const fn contains(self, layer: u8) -> bool {
        self.0 & bit(layer) != 0
    }

    /// True when the two masks share a layer.
    #[inline]
    pub const fn test(self, other: Layers) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for Layers {
    fn default() -> Self {
        Self::only(0)
    }
}

const fn bit(layer: u8) -> u32 {
    debug_assert!(layer < Layers::COUNT);
    1u32 << (layer % Layers::COUNT)
}
