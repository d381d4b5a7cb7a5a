#![allow(unused_macros)]

// Log through defmt or the log facade, whichever is enabled. Arguments must
// be plain integers or string slices so both backends accept `{}`.

macro_rules! trace {
  ($s:literal $(, $x:expr)* $(,)?) => {{
    #[cfg(feature = "defmt")]
    ::defmt::trace!($s $(, $x)*);
    #[cfg(feature = "log")]
    ::log::trace!($s $(, $x)*);
    #[cfg(not(any(feature = "defmt", feature = "log")))]
    let _ = ($(&$x),*);
  }};
}

macro_rules! debug {
  ($s:literal $(, $x:expr)* $(,)?) => {{
    #[cfg(feature = "defmt")]
    ::defmt::debug!($s $(, $x)*);
    #[cfg(feature = "log")]
    ::log::debug!($s $(, $x)*);
    #[cfg(not(any(feature = "defmt", feature = "log")))]
    let _ = ($(&$x),*);
  }};
}

macro_rules! warn {
  ($s:literal $(, $x:expr)* $(,)?) => {{
    #[cfg(feature = "defmt")]
    ::defmt::warn!($s $(, $x)*);
    #[cfg(feature = "log")]
    ::log::warn!($s $(, $x)*);
    #[cfg(not(any(feature = "defmt", feature = "log")))]
    let _ = ($(&$x),*);
  }};
}
