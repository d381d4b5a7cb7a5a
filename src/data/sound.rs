use super::{block, hundredths, tenths, Category, LengthMismatch};
use crate::defs::*;

/// Centre frequency of each sound band, in Hz.
pub const SOUND_BAND_MIDS_HZ: [u16; SOUND_FREQ_BANDS] = [125, 250, 500, 1000, 2000, 4000];

/// Lower and upper edges of the sound bands, in Hz. Band `i` spans
/// `SOUND_BAND_EDGES_HZ[i]..SOUND_BAND_EDGES_HZ[i + 1]`.
pub const SOUND_BAND_EDGES_HZ: [u16; SOUND_FREQ_BANDS + 1] = [88, 177, 354, 707, 1414, 2828, 5657];

/// Sound data.
///
/// Block layout (18 bytes):
///
/// | bytes  | quantity                                      |
/// |--------|-----------------------------------------------|
/// | 0      | A-weighted SPL integer, dBA                   |
/// | 1      | A-weighted SPL tenths                         |
/// | 2..8   | per-band SPL integers, dB                     |
/// | 8..14  | per-band SPL tenths (band `i` at `8 + i`)     |
/// | 14..16 | peak amplitude, mPa (u16 LE)                  |
/// | 16     | peak amplitude hundredths                     |
/// | 17     | stable flag                                   |
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SoundReading {
  /// A-weighted sound pressure level, dBA.
  pub spl_dba: f32,
  /// Sound pressure level per band, dB. See [`SOUND_BAND_MIDS_HZ`].
  pub bands: [f32; SOUND_FREQ_BANDS],
  /// Peak sound amplitude, mPa.
  pub peak_amplitude: f32,
  /// False until the microphone has settled after a mode change.
  pub stable: bool,
}

const BAND_INT: usize = 2;
const BAND_FRAC: usize = BAND_INT + SOUND_FREQ_BANDS;
const PEAK: usize = BAND_FRAC + SOUND_FREQ_BANDS;
const STABLE: usize = PEAK + 3;

impl SoundReading {
  pub fn decode(bytes: &[u8]) -> Result<Self, LengthMismatch> {
    let b = block::<SOUND_DATA_BYTES>(Category::Sound, bytes)?;

    let mut bands = [0f32; SOUND_FREQ_BANDS];
    for (i, band) in bands.iter_mut().enumerate() {
      *band = tenths(b[BAND_INT + i] as u16, b[BAND_FRAC + i]);
    }

    Ok(SoundReading {
      spl_dba: tenths(b[0] as u16, b[1]),
      bands,
      peak_amplitude: hundredths(u16::from_le_bytes([b[PEAK], b[PEAK + 1]]), b[PEAK + 2]),
      stable: b[STABLE] != 0,
    })
  }
}
