//! Typeface loading.
//!
//! A card uses two weights of one family: Regular for the subtitle and
//! Extra-Bold for the site title and the headline. Both are read from disk
//! once at startup into a [`TypefaceSet`] that is then shared by reference
//! with every render call. There is no reload path; the fonts are build
//! assets, and a missing or unparsable file is a startup failure.

use crate::config::FontsConfig;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use ttf_parser::Face;

#[derive(Error, Debug)]
pub enum TypefaceError {
    #[error("Cannot read {weight} font {path}: {source}")]
    Read {
        weight: Weight,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid {weight} font data: {source}")]
    Parse {
        weight: Weight,
        source: ttf_parser::FaceParsingError,
    },
}

/// Named style variant of the card font family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weight {
    Regular,
    ExtraBold,
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weight::Regular => f.write_str("regular"),
            Weight::ExtraBold => f.write_str("extra-bold"),
        }
    }
}

/// An immutable, weight-tagged font file held in memory.
///
/// The raw bytes are validated on construction; [`Typeface::face`] re-borrows
/// them as a `ttf_parser::Face` (parsing is lazy and cheap).
pub struct Typeface {
    weight: Weight,
    data: Vec<u8>,
    units_per_em: u16,
}

impl Typeface {
    /// Load a font file from disk.
    pub fn load(path: &Path, weight: Weight) -> Result<Self, TypefaceError> {
        let data = std::fs::read(path).map_err(|source| TypefaceError::Read {
            weight,
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(weight, data)
    }

    /// Build a typeface from font bytes already in memory.
    pub fn from_bytes(weight: Weight, data: Vec<u8>) -> Result<Self, TypefaceError> {
        let units_per_em = Face::parse(&data, 0)
            .map_err(|source| TypefaceError::Parse { weight, source })?
            .units_per_em();
        Ok(Self {
            weight,
            data,
            units_per_em,
        })
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn face(&self) -> Result<Face<'_>, TypefaceError> {
        Face::parse(&self.data, 0).map_err(|source| TypefaceError::Parse {
            weight: self.weight,
            source,
        })
    }
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typeface")
            .field("weight", &self.weight)
            .field("bytes", &self.data.len())
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

/// Both weights of the card font, loaded once per process.
#[derive(Debug)]
pub struct TypefaceSet {
    regular: Typeface,
    extra_bold: Typeface,
}

impl TypefaceSet {
    pub fn new(regular: Typeface, extra_bold: Typeface) -> Self {
        Self {
            regular,
            extra_bold,
        }
    }

    /// Load the configured font files. Either one failing is fatal for the run.
    pub fn load(fonts: &FontsConfig) -> Result<Self, TypefaceError> {
        Ok(Self::new(
            Typeface::load(Path::new(&fonts.regular), Weight::Regular)?,
            Typeface::load(Path::new(&fonts.extra_bold), Weight::ExtraBold)?,
        ))
    }

    pub fn get(&self, weight: Weight) -> &Typeface {
        match weight {
            Weight::Regular => &self.regular,
            Weight::ExtraBold => &self.extra_bold,
        }
    }
}
