//! Fixture records and the fixture table
//!
//! A fixture is one virtual light unit: five color channels, a dimmer, a
//! strobe rate, and layout metadata for the on-screen preview. All channel
//! values are normalized floats in [0,1] and are clamped at every mutation
//! point, never at read.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixture identifier. Ids are 1-based; id 0 is rejected at the decode edge.
pub type FixtureId = u32;

/// Shape used to draw a fixture in the preview canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FixtureShape {
    /// Round wash fixture
    #[default]
    Circle,
    /// Directional beam fixture
    Beam,
}

/// The closed set of per-fixture value channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureChannel {
    /// Red intensity
    Red,
    /// Green intensity
    Green,
    /// Blue intensity
    Blue,
    /// Amber intensity
    Amber,
    /// White intensity
    White,
    /// Master dimmer
    Dimmer,
    /// Strobe rate
    Strobe,
}

/// Clamp a channel value to [0,1]. Non-finite input folds to 0.
fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// A single fixture: color channels, dimmer, strobe and layout metadata
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureRecord {
    /// Red channel, [0,1]
    pub red: f32,
    /// Green channel, [0,1]
    pub green: f32,
    /// Blue channel, [0,1]
    pub blue: f32,
    /// Amber channel, [0,1]
    pub amber: f32,
    /// White channel, [0,1]
    pub white: f32,
    /// Master dimmer, [0,1]
    pub dimmer: f32,
    /// Strobe rate, [0,1]
    pub strobe: f32,

    /// Normalized horizontal canvas position
    pub x: f32,
    /// Normalized vertical canvas position
    pub y: f32,
    /// Preview shape
    pub shape: FixtureShape,
    /// Circle radius relative to the smaller canvas dimension
    pub circle_size: f32,
    /// Beam length, relative
    pub beam_length: f32,
    /// Beam width, relative
    pub beam_width: f32,
    /// Beam angle in degrees
    pub beam_angle_deg: f32,
    /// Optional operator-facing label
    pub label: String,
}

impl Default for FixtureRecord {
    fn default() -> Self {
        Self {
            red: 0.0,
            green: 0.0,
            blue: 0.0,
            amber: 0.0,
            white: 0.0,
            dimmer: 0.0,
            strobe: 0.0,
            x: 0.5,
            y: 0.5,
            shape: FixtureShape::Circle,
            circle_size: 0.08,
            beam_length: 0.15,
            beam_width: 0.10,
            beam_angle_deg: 0.0,
            label: String::new(),
        }
    }
}

impl FixtureRecord {
    /// Set all five color channels at once
    pub fn set_color(&mut self, red: f32, green: f32, blue: f32, amber: f32, white: f32) {
        self.red = clamp_unit(red);
        self.green = clamp_unit(green);
        self.blue = clamp_unit(blue);
        self.amber = clamp_unit(amber);
        self.white = clamp_unit(white);
    }

    /// Set the master dimmer
    pub fn set_dimmer(&mut self, value: f32) {
        self.dimmer = clamp_unit(value);
    }

    /// Set the strobe rate
    pub fn set_strobe(&mut self, rate: f32) {
        self.strobe = clamp_unit(rate);
    }

    /// Set a single channel by its typed name
    pub fn set_channel(&mut self, channel: FixtureChannel, value: f32) {
        let value = clamp_unit(value);
        match channel {
            FixtureChannel::Red => self.red = value,
            FixtureChannel::Green => self.green = value,
            FixtureChannel::Blue => self.blue = value,
            FixtureChannel::Amber => self.amber = value,
            FixtureChannel::White => self.white = value,
            FixtureChannel::Dimmer => self.dimmer = value,
            FixtureChannel::Strobe => self.strobe = value,
        }
    }

    /// Read a single channel by its typed name
    pub fn channel(&self, channel: FixtureChannel) -> f32 {
        match channel {
            FixtureChannel::Red => self.red,
            FixtureChannel::Green => self.green,
            FixtureChannel::Blue => self.blue,
            FixtureChannel::Amber => self.amber,
            FixtureChannel::White => self.white,
            FixtureChannel::Dimmer => self.dimmer,
            FixtureChannel::Strobe => self.strobe,
        }
    }
}

/// Mapping from fixture id to fixture record.
///
/// Owned exclusively by the application state and mutated only from the
/// UI/tick thread. Records are created lazily on first reference and only
/// removed when the operator shrinks the configured fixture count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureTable {
    fixtures: HashMap<FixtureId, FixtureRecord>,
}

impl FixtureTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the record for `id`, creating it with defaults if absent
    pub fn ensure(&mut self, id: FixtureId) -> &mut FixtureRecord {
        self.fixtures.entry(id).or_default()
    }

    /// Get the record for `id` if present
    pub fn get(&self, id: FixtureId) -> Option<&FixtureRecord> {
        self.fixtures.get(&id)
    }

    /// Get the record for `id` mutably if present
    pub fn get_mut(&mut self, id: FixtureId) -> Option<&mut FixtureRecord> {
        self.fixtures.get_mut(&id)
    }

    /// Whether the table contains `id`
    pub fn contains(&self, id: FixtureId) -> bool {
        self.fixtures.contains_key(&id)
    }

    /// Number of fixtures in the table
    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    /// Resize the table to exactly `count` fixtures.
    ///
    /// `count` is clamped to `[min, max]`. Missing ids `1..=count` are
    /// created with defaults; ids above `count` are removed. Returns the
    /// clamped count.
    pub fn set_count(&mut self, count: u32, min: u32, max: u32) -> u32 {
        let count = count.clamp(min, max);
        for id in 1..=count {
            self.ensure(id);
        }
        self.fixtures.retain(|id, _| *id <= count);
        count
    }

    /// Fixture ids in ascending order, for deterministic outbound frames
    pub fn ids_sorted(&self) -> Vec<FixtureId> {
        let mut ids: Vec<FixtureId> = self.fixtures.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate over all (id, record) pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&FixtureId, &FixtureRecord)> {
        self.fixtures.iter()
    }
}
