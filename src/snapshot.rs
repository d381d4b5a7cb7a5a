//! Aggregated readings of one measurement.
//!
//! A [`Snapshot`] is produced once per completed measurement and replaced as a
//! whole by the next one. [`Snapshot::entries`] flattens it into key/value
//! pairs for writers that serialize to text, CSV, JSON or YAML.
//!
//! # Examples
//!
//! ```
//! use ms430::{Snapshot, Value};
//!
//! let snapshot = Snapshot::default();
//! for (key, value) in snapshot.entries() {
//!   match value {
//!     Value::Absent => println!("{key}: n/a"),
//!     v => println!("{key}: {v}"),
//!   }
//! }
//! ```

use heapless::Vec;

use crate::data::*;
use crate::defs::SOUND_FREQ_BANDS;

/// Number of entries produced by [`Snapshot::entries`].
pub const ENTRY_COUNT: usize = 21 + SOUND_FREQ_BANDS;

const BAND_KEYS: [&str; SOUND_FREQ_BANDS] =
  ["spl_band_125hz", "spl_band_250hz", "spl_band_500hz", "spl_band_1000hz", "spl_band_2000hz", "spl_band_4000hz"];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot {
  pub air: AirReading,
  pub air_quality: AirQualityReading,
  pub light: LightReading,
  pub sound: SoundReading,
  pub particulate: ParticulateReading,
  pub particle_sensor: ParticleSensor,
}

/// A single flattened value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Value {
  Float(f32),
  Unsigned(u32),
  Bool(bool),
  Text(&'static str),
  /// The quantity does not exist in this configuration.
  Absent,
}

impl core::fmt::Display for Value {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Value::Float(v) => write!(f, "{v}"),
      Value::Unsigned(v) => write!(f, "{v}"),
      Value::Bool(v) => write!(f, "{v}"),
      Value::Text(v) => f.write_str(v),
      Value::Absent => Ok(()),
    }
  }
}

impl From<Option<f32>> for Value {
  fn from(v: Option<f32>) -> Self {
    v.map_or(Value::Absent, Value::Float)
  }
}

impl From<Option<&'static str>> for Value {
  fn from(v: Option<&'static str>) -> Self {
    v.map_or(Value::Absent, Value::Text)
  }
}

impl Snapshot {
  /// Every quantity as a `(key, value)` pair, in a stable order.
  pub fn entries(&self) -> Vec<(&'static str, Value), ENTRY_COUNT> {
    let mut out = Vec::new();
    let mut push = |key, value| {
      // Capacity is exactly the number of keys below.
      let _ = out.push((key, value));
    };

    push("temp_c", Value::Float(self.air.temperature));
    push("temp_f", Value::Float(self.air.temperature_f()));
    push("pressure", Value::Unsigned(self.air.pressure));
    push("humidity", Value::Float(self.air.humidity));
    push("gas_sensor_resistance", Value::Unsigned(self.air.gas_resistance));

    push("aqi", Value::Float(self.air_quality.aqi));
    push("aqi_interpretation", Value::Text(self.air_quality.band().label()));
    push("co2e", Value::Float(self.air_quality.co2e));
    push("bvoc", Value::Float(self.air_quality.bvoc));
    push("aqi_accuracy", Value::Unsigned(self.air_quality.accuracy as u32));
    push("aqi_accuracy_interpretation", Value::Text(self.air_quality.accuracy_label()));

    push("lux", Value::Float(self.light.illuminance));
    push("white", Value::Unsigned(self.light.white as u32));

    push("spl_dba", Value::Float(self.sound.spl_dba));
    for (key, level) in BAND_KEYS.iter().zip(self.sound.bands) {
      push(key, Value::Float(level));
    }
    push("peak_amp", Value::Float(self.sound.peak_amplitude));
    push("stable", Value::Bool(self.sound.stable));

    push("particle_sensor", Value::Text(self.particle_sensor.name()));
    push("duty_cycle_pc", self.particulate.duty_cycle.into());
    push("concentration", self.particulate.concentration.into());
    push("conc_unit", self.particulate.unit.into());
    push("particle_data_valid", Value::Bool(self.particulate.valid));

    out
  }

  /// Look up a single entry by key.
  pub fn get(&self, key: &str) -> Option<Value> {
    self.entries().into_iter().find(|(k, _)| *k == key).map(|(_, v)| v)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn entries_are_complete_and_unique() {
    let entries = Snapshot::default().entries();
    assert_eq!(entries.len(), ENTRY_COUNT);
    for (i, (a, _)) in entries.iter().enumerate() {
      assert!(entries[i + 1..].iter().all(|(b, _)| a != b), "duplicate key {a}");
    }
  }

  #[test]
  fn absent_particulate_stays_absent() {
    let snapshot = Snapshot { particulate: ParticulateReading::absent(), ..Default::default() };
    assert_eq!(snapshot.get("duty_cycle_pc"), Some(Value::Absent));
    assert_eq!(snapshot.get("concentration"), Some(Value::Absent));
    assert_eq!(snapshot.get("conc_unit"), Some(Value::Absent));
    assert_eq!(snapshot.get("particle_data_valid"), Some(Value::Bool(false)));
    assert_eq!(snapshot.get("particle_sensor"), Some(Value::Text("off")));
  }

  #[test]
  fn values_and_interpretations() {
    let snapshot = Snapshot {
      air: AirReading { temperature: -5.5, pressure: 99_000, humidity: 40.0, gas_resistance: 5000 },
      air_quality: AirQualityReading { aqi: 120.0, co2e: 600.0, bvoc: 0.5, accuracy: 2 },
      particulate: ParticulateReading {
        duty_cycle: Some(1.5),
        concentration: Some(10.25),
        valid: true,
        unit: ParticleSensor::Ppd42.unit(),
      },
      particle_sensor: ParticleSensor::Ppd42,
      ..Default::default()
    };
    assert_eq!(snapshot.get("temp_c"), Some(Value::Float(-5.5)));
    assert_eq!(snapshot.get("pressure"), Some(Value::Unsigned(99_000)));
    assert_eq!(snapshot.get("aqi_interpretation"), Some(Value::Text("Substandard")));
    assert_eq!(
      snapshot.get("aqi_accuracy_interpretation"),
      Some(Value::Text("Medium accuracy, self-calibration ongoing"))
    );
    assert_eq!(snapshot.get("concentration"), Some(Value::Float(10.25)));
    assert_eq!(snapshot.get("conc_unit"), Some(Value::Text("ppL")));
    assert_eq!(snapshot.get("spl_band_1000hz"), Some(Value::Float(0.0)));
    assert_eq!(snapshot.get("missing"), None);
  }

  #[test]
  fn display() {
    assert_eq!(Value::Float(22.5).to_string(), "22.5");
    assert_eq!(Value::Text("ppL").to_string(), "ppL");
    assert_eq!(Value::Absent.to_string(), "");
  }
}
