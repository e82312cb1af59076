#![forbid(unsafe_code)]

//! Font store and face resolution.
//!
//! The store maps `(family, weight)` keys to loaded faces. Resolution
//! degrades instead of failing: when the exact face is missing the ladder
//! tries the same family at the nearest weight, then the store default,
//! then any loaded face, each step logged as a degraded guarantee. Only
//! a completely empty store is a hard error; in that case the caller
//! renders nothing.
//!
//! [`Face`] is the seam between measurement/rasterization and the actual
//! font backend: production code goes through [`FontdueFace`], tests use
//! the deterministic synthetic face in `testing`.

use std::fmt;

use fontdue::{Font, FontSettings};

/// A rasterized glyph: coverage bitmap plus placement metrics.
///
/// `xmin`/`ymin` follow the font coordinate convention: `xmin` offsets the
/// bitmap right of the pen position, `ymin` is the signed distance from the
/// baseline up to the bitmap's bottom edge (negative for descenders).
#[derive(Debug, Clone, PartialEq)]
pub struct RasterGlyph {
    pub width: usize,
    pub height: usize,
    pub xmin: i32,
    pub ymin: i32,
    /// Row-major alpha coverage, `width * height` bytes.
    pub coverage: Vec<u8>,
}

/// A font face the rasterizer can measure and draw with.
pub trait Face {
    /// Horizontal advance of `ch` at `px` pixels.
    fn advance(&self, ch: char, px: f32) -> f32;

    /// Kerning adjustment between `left` and `right`, when the face has
    /// a kerning table.
    fn kern(&self, left: char, right: char, px: f32) -> Option<f32>;

    /// `(ascent, descent)` at `px` pixels, both positive, when the face
    /// carries horizontal line metrics.
    fn line_metrics(&self, px: f32) -> Option<(f32, f32)>;

    /// Rasterize `ch` at `px` pixels.
    fn rasterize(&self, ch: char, px: f32) -> RasterGlyph;
}

/// [`Face`] backed by a parsed fontdue font.
pub struct FontdueFace {
    font: Font,
}

impl FontdueFace {
    /// Parse a font from its raw bytes (TTF/OTF).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FontError> {
        let font =
            Font::from_bytes(bytes, FontSettings::default()).map_err(FontError::Parse)?;
        Ok(Self { font })
    }
}

impl fmt::Debug for FontdueFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontdueFace").finish_non_exhaustive()
    }
}

impl Face for FontdueFace {
    fn advance(&self, ch: char, px: f32) -> f32 {
        self.font.metrics(ch, px).advance_width
    }

    fn kern(&self, left: char, right: char, px: f32) -> Option<f32> {
        self.font.horizontal_kern(left, right, px)
    }

    fn line_metrics(&self, px: f32) -> Option<(f32, f32)> {
        // fontdue reports descent as a negative offset below the baseline.
        self.font
            .horizontal_line_metrics(px)
            .map(|m| (m.ascent, -m.descent))
    }

    fn rasterize(&self, ch: char, px: f32) -> RasterGlyph {
        let (metrics, coverage) = self.font.rasterize(ch, px);
        RasterGlyph {
            width: metrics.width,
            height: metrics.height,
            xmin: metrics.xmin,
            ymin: metrics.ymin,
            coverage,
        }
    }
}

/// Font loading/resolution errors.
#[derive(Debug)]
pub enum FontError {
    /// The store holds no faces at all.
    Empty,
    /// The font bytes could not be parsed.
    Parse(&'static str),
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "font store is empty"),
            Self::Parse(msg) => write!(f, "font parse error: {msg}"),
        }
    }
}

impl std::error::Error for FontError {}

struct FaceEntry {
    family: String,
    weight: u16,
    face: Box<dyn Face>,
}

/// A resolved face plus how exact the match was.
pub struct ResolvedFace<'a> {
    pub face: &'a dyn Face,
    /// True when the requested `(family, weight)` matched exactly.
    pub exact: bool,
}

/// Registry of loaded font faces keyed by `(family, weight)`.
pub struct FontStore {
    faces: Vec<FaceEntry>,
    default_face: Option<usize>,
}

impl FontStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            faces: Vec::new(),
            default_face: None,
        }
    }

    /// Number of loaded faces.
    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Whether no faces are loaded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Parse and register a face from raw font bytes.
    ///
    /// The first face loaded becomes the store default until
    /// [`set_default`](Self::set_default) picks another.
    pub fn load(
        &mut self,
        family: impl Into<String>,
        weight: u16,
        bytes: &[u8],
    ) -> Result<(), FontError> {
        let face = FontdueFace::from_bytes(bytes)?;
        self.insert_face(family, weight, Box::new(face));
        Ok(())
    }

    /// Register an already-constructed face.
    pub fn insert_face(&mut self, family: impl Into<String>, weight: u16, face: Box<dyn Face>) {
        self.faces.push(FaceEntry {
            family: family.into(),
            weight,
            face,
        });
        if self.default_face.is_none() {
            self.default_face = Some(self.faces.len() - 1);
        }
    }

    /// Mark a loaded `(family, weight)` as the store default.
    ///
    /// Returns false (and leaves the default unchanged) when no such face
    /// is loaded.
    pub fn set_default(&mut self, family: &str, weight: u16) -> bool {
        match self.find_exact(family, weight) {
            Some(idx) => {
                self.default_face = Some(idx);
                true
            }
            None => false,
        }
    }

    fn find_exact(&self, family: &str, weight: u16) -> Option<usize> {
        self.faces
            .iter()
            .position(|e| e.weight == weight && e.family.eq_ignore_ascii_case(family))
    }

    fn find_family_nearest_weight(&self, family: &str, weight: u16) -> Option<usize> {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, e)| e.family.eq_ignore_ascii_case(family))
            .min_by_key(|(_, e)| e.weight.abs_diff(weight))
            .map(|(i, _)| i)
    }

    /// Resolve `(family, weight)` through the degradation ladder:
    /// exact match, same family at the nearest weight, the store default,
    /// any loaded face. `Err(FontError::Empty)` only when the store holds
    /// nothing.
    pub fn resolve(&self, family: &str, weight: u16) -> Result<ResolvedFace<'_>, FontError> {
        if let Some(idx) = self.find_exact(family, weight) {
            return Ok(ResolvedFace {
                face: self.faces[idx].face.as_ref(),
                exact: true,
            });
        }

        if let Some(idx) = self.find_family_nearest_weight(family, weight) {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                family,
                requested = weight,
                resolved = self.faces[idx].weight,
                "exact font weight unavailable, using nearest in family"
            );
            return Ok(ResolvedFace {
                face: self.faces[idx].face.as_ref(),
                exact: false,
            });
        }

        if let Some(idx) = self.default_face {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                family,
                fallback = %self.faces[idx].family,
                "requested family unavailable, using store default"
            );
            return Ok(ResolvedFace {
                face: self.faces[idx].face.as_ref(),
                exact: false,
            });
        }

        if let Some(entry) = self.faces.first() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                family,
                fallback = %entry.family,
                "requested family unavailable, using first loaded face"
            );
            return Ok(ResolvedFace {
                face: entry.face.as_ref(),
                exact: false,
            });
        }

        Err(FontError::Empty)
    }
}

impl Default for FontStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FontStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontStore")
            .field("faces", &self.faces.len())
            .field("default_face", &self.default_face)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::BlockFace;

    fn store_with(entries: &[(&str, u16)]) -> FontStore {
        let mut store = FontStore::new();
        for &(family, weight) in entries {
            store.insert_face(family, weight, Box::new(BlockFace::new()));
        }
        store
    }

    #[test]
    fn empty_store_is_a_hard_miss() {
        let store = FontStore::new();
        assert!(matches!(store.resolve("Mono", 400), Err(FontError::Empty)));
    }

    #[test]
    fn exact_match_resolves_exactly() {
        let store = store_with(&[("Mono", 400), ("Mono", 700)]);
        let resolved = store.resolve("Mono", 700).unwrap();
        assert!(resolved.exact);
    }

    #[test]
    fn family_match_is_case_insensitive() {
        let store = store_with(&[("Mono", 400)]);
        assert!(store.resolve("mono", 400).unwrap().exact);
    }

    #[test]
    fn missing_weight_falls_back_to_nearest_in_family() {
        let store = store_with(&[("Mono", 300), ("Mono", 800)]);
        let resolved = store.resolve("Mono", 700).unwrap();
        assert!(!resolved.exact);
    }

    #[test]
    fn missing_family_falls_back_to_default() {
        let mut store = store_with(&[("Serif", 400), ("Mono", 400)]);
        assert!(store.set_default("Mono", 400));
        let resolved = store.resolve("Nonexistent", 400).unwrap();
        assert!(!resolved.exact);
    }

    #[test]
    fn first_loaded_face_is_the_initial_default() {
        let store = store_with(&[("Serif", 400), ("Mono", 400)]);
        // No explicit default: the ladder still lands on a face.
        assert!(store.resolve("Nonexistent", 100).is_ok());
    }

    #[test]
    fn set_default_rejects_unknown_faces() {
        let mut store = store_with(&[("Serif", 400)]);
        assert!(!store.set_default("Mono", 400));
    }

    #[test]
    fn parse_error_reported() {
        let mut store = FontStore::new();
        let err = store.load("Broken", 400, &[0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, FontError::Parse(_)));
        assert!(store.is_empty());
    }
}
