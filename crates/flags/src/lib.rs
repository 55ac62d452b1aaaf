//! # Flags
//!
//! A tiny ordered set of named booleans packed into the bits of a single
//! `u32`.
//!
//! Each flag type declares its members once (through the [`Flag`] trait) with
//! a fixed bit position. A [`FlagSet`] then stores any combination of them
//! and converts to and from the packed integer that ends up on disk.
//!
//! ## Usage in the fortune index
//!
//! The index header stores its four booleans (randomized, ordered, rotated,
//! comments) in bits 0..3 of one header field. The writer packs them with
//! [`FlagSet::bits`] and the reader unpacks them with [`FlagSet::from_bits`].
//!
//! ## Example
//!
//! ```rust
//! use flags::{Flag, FlagSet};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Light {
//!     Red,
//!     Green,
//! }
//!
//! impl Flag for Light {
//!     const ALL: &'static [Self] = &[Light::Red, Light::Green];
//!
//!     fn bit(self) -> u32 {
//!         match self {
//!             Light::Red => 0,
//!             Light::Green => 1,
//!         }
//!     }
//!
//!     fn name(self) -> &'static str {
//!         match self {
//!             Light::Red => "red",
//!             Light::Green => "green",
//!         }
//!     }
//! }
//!
//! let set = FlagSet::new().with(Light::Green, true);
//! assert_eq!(set.bits(), 0b10);
//! assert!(FlagSet::<Light>::from_bits(0b10).unwrap().get(Light::Green));
//! ```

use std::fmt;
use std::marker::PhantomData;

/// A member of a fixed, ordered family of boolean flags.
///
/// Implementors are usually fieldless enums. Every member must map to a
/// distinct bit position below 32.
pub trait Flag: Copy + 'static {
    /// Every member, in declaration (and serialization) order.
    const ALL: &'static [Self];

    /// Bit position of this flag inside the packed integer.
    fn bit(self) -> u32;

    /// Human-readable name, used by `Debug`.
    fn name(self) -> &'static str;
}

/// A set of [`Flag`]s backed by a `u32` bit field.
pub struct FlagSet<F: Flag> {
    bits: u32,
    _flags: PhantomData<F>,
}

impl<F: Flag> FlagSet<F> {
    /// Creates a set with every flag cleared.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bits: 0,
            _flags: PhantomData,
        }
    }

    /// Rebuilds a set from its packed form.
    ///
    /// Returns `None` if `bits` has any bit set that does not belong to a
    /// declared flag, so reserved bits stay detectably zero.
    #[must_use]
    pub fn from_bits(bits: u32) -> Option<Self> {
        if bits & !Self::known_mask() != 0 {
            return None;
        }
        Some(Self {
            bits,
            _flags: PhantomData,
        })
    }

    /// Returns whether `flag` is set.
    #[must_use]
    pub fn get(&self, flag: F) -> bool {
        (self.bits >> Self::position(flag)) & 1 == 1
    }

    /// Sets or clears `flag`.
    pub fn set(&mut self, flag: F, value: bool) {
        let mask = 1u32 << Self::position(flag);
        if value {
            self.bits |= mask;
        } else {
            self.bits &= !mask;
        }
    }

    /// Builder-style variant of [`set`](FlagSet::set).
    #[must_use]
    pub fn with(mut self, flag: F, value: bool) -> Self {
        self.set(flag, value);
        self
    }

    /// Returns the packed integer.
    #[must_use]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Iterates over `(flag, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (F, bool)> + '_ {
        F::ALL.iter().map(move |&f| (f, self.get(f)))
    }

    /// Returns `true` if no flag is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    // ---- Internal helpers ----

    fn position(flag: F) -> u32 {
        let bit = flag.bit();
        assert!(bit < 32, "flag bit position must be < 32");
        bit
    }

    fn known_mask() -> u32 {
        F::ALL.iter().fold(0u32, |mask, &f| mask | (1 << Self::position(f)))
    }
}

impl<F: Flag> Default for FlagSet<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Flag> Clone for FlagSet<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: Flag> Copy for FlagSet<F> {}

impl<F: Flag> PartialEq for FlagSet<F> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<F: Flag> Eq for FlagSet<F> {}

impl<F: Flag> fmt::Debug for FlagSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (flag, value) in self.iter() {
            map.entry(&flag.name(), &value);
        }
        map.finish()
    }
}
