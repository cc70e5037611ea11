//! Lock-free slots for state crossing the gesture/refresh boundary
//!
//! Gesture handling and the per-refresh tick may run on different threads.
//! They only communicate through two vectors:
//! - [`InputSlot`]: written by the joystick listener, read by the frame loop
//! - [`PositionSlot`]: written by the frame loop, read by the renderer
//!
//! Each slot packs both `f32` components into one `AtomicU64`, so a reader
//! never observes `x` from one write and `y` from another. Last writer wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::geometry::Vec2;
use crate::joystick::MoveListener;

fn pack(value: Vec2) -> u64 {
    ((value.x.to_bits() as u64) << 32) | value.y.to_bits() as u64
}

fn unpack(bits: u64) -> Vec2 {
    Vec2::new(f32::from_bits((bits >> 32) as u32), f32::from_bits(bits as u32))
}

/// Atomic `(x, y)` pair
#[derive(Debug)]
pub struct SharedVec2 {
    bits: AtomicU64,
}

impl SharedVec2 {
    pub fn new(value: Vec2) -> Self {
        Self {
            bits: AtomicU64::new(pack(value)),
        }
    }

    pub fn store(&self, value: Vec2) {
        self.bits.store(pack(value), Ordering::Release);
    }

    pub fn load(&self) -> Vec2 {
        unpack(self.bits.load(Ordering::Acquire))
    }

    pub fn reset(&self) {
        self.store(Vec2::ZERO);
    }
}

impl Default for SharedVec2 {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

/// Latest joystick vector, shared between the gesture side and the frame loop
#[derive(Debug, Clone, Default)]
pub struct InputSlot(Arc<SharedVec2>);

impl InputSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, value: Vec2) {
        self.0.store(value);
    }

    pub fn load(&self) -> Vec2 {
        self.0.load()
    }

    /// Joystick listener that copies every reported vector into this slot
    pub fn listener(&self) -> MoveListener {
        let slot = Arc::clone(&self.0);
        Arc::new(move |x, y| slot.store(Vec2::new(x, y)))
    }
}

/// Current character position, written once per tick
#[derive(Debug, Clone, Default)]
pub struct PositionSlot(Arc<SharedVec2>);

impl PositionSlot {
    pub fn new(initial: Vec2) -> Self {
        Self(Arc::new(SharedVec2::new(initial)))
    }

    pub fn store(&self, value: Vec2) {
        self.0.store(value);
    }

    pub fn load(&self) -> Vec2 {
        self.0.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_store_and_load() {
        let slot = SharedVec2::default();
        assert_eq!(slot.load(), Vec2::ZERO);

        slot.store(Vec2::new(-0.75, 1.0));
        assert_eq!(slot.load(), Vec2::new(-0.75, 1.0));

        slot.reset();
        assert_eq!(slot.load(), Vec2::ZERO);
    }

    #[test]
    fn test_pack_preserves_bits() {
        for value in [
            Vec2::new(f32::MIN_POSITIVE, -0.0),
            Vec2::new(975.0, 25.0),
            Vec2::new(-1.0, 0.333_333_34),
        ] {
            let back = unpack(pack(value));
            assert_eq!(back.x.to_bits(), value.x.to_bits());
            assert_eq!(back.y.to_bits(), value.y.to_bits());
        }
    }

    #[test]
    fn test_input_slot_listener() {
        let slot = InputSlot::new();
        let listener = slot.listener();

        listener(0.5, -0.25);
        assert_eq!(slot.load(), Vec2::new(0.5, -0.25));

        listener(0.0, 0.0);
        assert_eq!(slot.load(), Vec2::ZERO);
    }

    #[test]
    fn test_clones_share_state() {
        let slot = PositionSlot::new(Vec2::new(500.0, 500.0));
        let reader = slot.clone();
        slot.store(Vec2::new(505.0, 500.0));
        assert_eq!(reader.load(), Vec2::new(505.0, 500.0));
    }

    #[test]
    fn test_concurrent_writers_never_tear() {
        let slot = InputSlot::new();

        // Each writer stores pairs with x == y; a torn read would break that
        let writers: Vec<_> = (1..=4)
            .map(|n| {
                let slot = slot.clone();
                thread::spawn(move || {
                    for i in 0..10_000 {
                        let v = (n * 10_000 + i) as f32;
                        slot.store(Vec2::new(v, v));
                    }
                })
            })
            .collect();

        let reader = {
            let slot = slot.clone();
            thread::spawn(move || {
                for _ in 0..10_000 {
                    let v = slot.load();
                    assert_eq!(v.x, v.y);
                }
            })
        };

        for w in writers {
            w.join().unwrap();
        }
        reader.join().unwrap();
    }
}
