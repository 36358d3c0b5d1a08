//! 256-entry lookup tables and the bounded cache that memoizes them.
//!
//! Table generation is O(256) per parameter value, so tables are keyed by the
//! parameter rounded to the nearest multiple of the cache step (5 by default).
//! Neighbouring slider values share one table.
//!
//! The cache is bounded and evicts in insertion order (FIFO), not by access.

use std::collections::{HashMap, VecDeque};

use log::trace;

use crate::buffer::ImageBuffer;

/// Default number of tables kept alive.
pub const DEFAULT_LUT_CAPACITY: usize = 20;

/// Default quantization step for cache keys.
pub const DEFAULT_LUT_STEP: i32 = 5;

/// Pre-computed lookup table mapping an input intensity to an output intensity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lut {
    /// LUT values: table[input] = output
    pub table: [u8; 256],
}

impl Lut {
    /// Create identity LUT (no change).
    pub fn identity() -> Self {
        Self::from_fn(|i| i)
    }

    /// Build a table by evaluating `f` for every input intensity.
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(u8) -> u8,
    {
        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = f(i as u8);
        }
        Self { table }
    }

    /// Check if this LUT is identity.
    pub fn is_identity(&self) -> bool {
        self.table.iter().enumerate().all(|(i, &v)| v == i as u8)
    }

    /// Map every sample of every channel through the table.
    pub fn apply(&self, image: &ImageBuffer) -> ImageBuffer {
        let pixels = image
            .pixels
            .iter()
            .map(|&v| self.table[v as usize])
            .collect();
        ImageBuffer::new(image.width, image.height, pixels)
    }
}

impl Default for Lut {
    fn default() -> Self {
        Self::identity()
    }
}

/// Bounded FIFO cache of lookup tables keyed by quantized parameter value.
#[derive(Debug, Clone)]
pub struct LutCache {
    capacity: usize,
    step: i32,
    tables: HashMap<i32, Lut>,
    /// Keys in insertion order, oldest first.
    order: VecDeque<i32>,
}

impl LutCache {
    /// Create a cache holding at most `capacity` tables, keyed in multiples of `step`.
    pub fn new(capacity: usize, step: i32) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            step: step.max(1),
            tables: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Round `raw` to the nearest multiple of the cache step.
    pub fn quantize(&self, raw: i32) -> i32 {
        let step = self.step as f64;
        ((raw as f64 / step).round() * step) as i32
    }

    /// Return the table for `raw`'s bucket, building it with `generator` on a miss.
    ///
    /// The generator receives the quantized value, never the raw one.
    pub fn get_or_create<F>(&mut self, raw: i32, generator: F) -> &Lut
    where
        F: FnOnce(i32) -> Lut,
    {
        let key = self.quantize(raw);

        if self.tables.contains_key(&key) {
            trace!("LUT cache hit for {raw} (bucket {key})");
        } else {
            trace!("LUT cache miss for {raw} (bucket {key})");
            while self.order.len() >= self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.tables.remove(&oldest);
                    trace!("LUT cache evicted bucket {oldest}");
                }
            }
            self.order.push_back(key);
        }

        self.tables.entry(key).or_insert_with(|| generator(key))
    }

    /// Check whether a bucket is currently cached.
    pub fn contains(&self, quantized: i32) -> bool {
        self.tables.contains_key(&quantized)
    }

    /// Number of cached tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if the cache holds no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Maximum number of tables kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every cached table.
    pub fn clear(&mut self) {
        self.tables.clear();
        self.order.clear();
    }
}

impl Default for LutCache {
    fn default() -> Self {
        Self::new(DEFAULT_LUT_CAPACITY, DEFAULT_LUT_STEP)
    }
}
