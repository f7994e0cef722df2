//! Font registry for system font discovery and caching
//!
//! Uses fontdb to discover and load system fonts by name or generic category.
//!
//! Only known essential system fonts are loaded at startup (by path). The full
//! system font scan is deferred until a lookup misses.

use crate::descriptor::{FontDescriptor, FontFamily};
use crate::font::FontFace;
use crate::{Result, TextError};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rustc_hash::FxHashMap;
use std::path::Path;
use std::sync::Arc;

/// Generic font category for fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GenericFont {
    /// Default system UI font
    System,
    /// Monospace font for code
    #[default]
    Monospace,
    Serif,
    SansSerif,
    /// Emoji font (color emoji)
    Emoji,
}

/// Known system font paths for each platform
/// These are loaded directly without scanning all system fonts
#[cfg(target_os = "macos")]
const KNOWN_FONT_PATHS: &[&str] = &[
    "/System/Library/Fonts/SFNSMono.ttf",  // SF Mono
    "/System/Library/Fonts/Menlo.ttc",     // Menlo (Monospace with symbols)
    "/System/Library/Fonts/Monaco.ttf",    // Monaco (Monospace)
    "/System/Library/Fonts/SFNS.ttf",      // SF Pro (System)
    "/System/Library/Fonts/Helvetica.ttc", // Helvetica
    "/System/Library/Fonts/Times.ttc",     // Times (Serif)
];

#[cfg(target_os = "windows")]
const KNOWN_FONT_PATHS: &[&str] = &[
    "C:\\Windows\\Fonts\\consola.ttf",  // Consolas (Monospace)
    "C:\\Windows\\Fonts\\consolab.ttf", // Consolas Bold
    "C:\\Windows\\Fonts\\consolai.ttf", // Consolas Italic
    "C:\\Windows\\Fonts\\cour.ttf",     // Courier New (Monospace)
    "C:\\Windows\\Fonts\\segoeui.ttf",  // Segoe UI (System)
    "C:\\Windows\\Fonts\\times.ttf",    // Times New Roman (Serif)
];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const KNOWN_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono-Oblique.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono-BoldOblique.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansMono-Regular.ttf",
];

fn cache_key(name: &str, weight: u16, italic: bool) -> String {
    format!("{}:w{}:{}", name, weight, if italic { "i" } else { "n" })
}

/// Font registry that discovers and caches system fonts
pub struct FontRegistry {
    /// fontdb database containing system fonts
    db: Database,
    /// Cached FontFace instances (Some = found, None = not found)
    faces: FxHashMap<String, Option<Arc<FontFace>>>,
    /// Whether full system font scan has been performed
    system_fonts_loaded: bool,
}

impl FontRegistry {
    /// Create a new font registry with lazy loading
    pub fn new() -> Self {
        let mut db = Database::new();

        let mut loaded_count = 0;
        for path in KNOWN_FONT_PATHS {
            if Path::new(path).exists() && db.load_font_file(path).is_ok() {
                loaded_count += 1;
            }
        }
        tracing::debug!("Loaded {} known system fonts", loaded_count);

        Self {
            db,
            faces: FxHashMap::default(),
            system_fonts_loaded: false,
        }
    }

    /// Create a registry containing only the given font data
    ///
    /// No system fonts are consulted, not even lazily. Useful for
    /// reproducible output with a bundled font.
    pub fn with_font_data(data: Vec<u8>) -> Self {
        let mut registry = Self {
            db: Database::new(),
            faces: FxHashMap::default(),
            system_fonts_loaded: true,
        };
        registry.load_font_data(data);
        registry
    }

    /// Load a font from raw data (e.g., embedded or bundled fonts)
    ///
    /// Returns the number of font faces loaded from the data.
    pub fn load_font_data(&mut self, data: Vec<u8>) -> usize {
        let before = self.db.len();
        self.db.load_font_data(data);
        let loaded = self.db.len() - before;
        if loaded > 0 {
            tracing::debug!("Loaded {} font faces from data", loaded);
            // Earlier misses may now resolve
            self.faces.retain(|_, face| face.is_some());
        }
        loaded
    }

    /// Number of faces known to the database
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    fn ensure_system_fonts_loaded(&mut self) {
        if self.system_fonts_loaded {
            return;
        }

        tracing::debug!("Loading all system fonts (lazy scan)...");
        self.db.load_system_fonts();
        self.system_fonts_loaded = true;
        tracing::debug!("System fonts loaded: {} faces", self.db.len());
    }

    /// Load a font by name with specific weight and italic style
    ///
    /// # Arguments
    /// * `name` - Font family name (e.g., "Fira Code", "Menlo")
    /// * `weight` - Font weight (100-900, where 400 is normal, 700 is bold)
    /// * `italic` - Whether to load italic variant
    pub fn load_font_with_style(
        &mut self,
        name: &str,
        weight: u16,
        italic: bool,
    ) -> Result<Arc<FontFace>> {
        let key = cache_key(name, weight, italic);
        self.load_cached(key, |db| {
            find_by_families(db, &[Family::Name(name)], weight, italic)
        })
        .map_err(|cached| {
            TextError::FontLoadError(format!(
                "Font '{}' (weight={}, italic={}) not found{}",
                name,
                weight,
                italic,
                if cached { " (cached)" } else { "" }
            ))
        })
    }

    /// Load a generic font category with specific weight and italic style
    pub fn load_generic_with_style(
        &mut self,
        generic: GenericFont,
        weight: u16,
        italic: bool,
    ) -> Result<Arc<FontFace>> {
        let key = cache_key(&format!("__generic_{:?}", generic), weight, italic);
        self.load_cached(key, |db| find_generic(db, generic, weight, italic))
            .map_err(|cached| {
                TextError::FontLoadError(format!(
                    "Generic font {:?} (weight={}, italic={}) not found{}",
                    generic,
                    weight,
                    italic,
                    if cached { " (cached)" } else { "" }
                ))
            })
    }

    /// Load a generic font category at regular weight
    pub fn load_generic(&mut self, generic: GenericFont) -> Result<Arc<FontFace>> {
        self.load_generic_with_style(generic, 400, false)
    }

    /// Resolve a CSS font descriptor to a face
    ///
    /// Each family in the list is tried in order; if none matches, the
    /// generic monospace face is used. A bold or italic request that only
    /// finds the upright regular cut still succeeds with that cut.
    pub fn resolve(&mut self, font: &FontDescriptor) -> Result<Arc<FontFace>> {
        let weight = font.weight();
        let families = font.families();

        for family in &families {
            let found = match family {
                FontFamily::Named(name) => self.load_font_with_style(name, weight, font.italic),
                FontFamily::Generic(generic) => {
                    self.load_generic_with_style(*generic, weight, font.italic)
                }
            };
            if let Ok(face) = found {
                return Ok(face);
            }
        }

        let fallback = self
            .load_generic_with_style(GenericFont::Monospace, weight, font.italic)
            .or_else(|_| self.load_generic_with_style(GenericFont::Monospace, 400, false))?;

        if !families.contains(&FontFamily::Generic(GenericFont::Monospace)) {
            tracing::warn!(
                "No face for font '{}', falling back to '{}'",
                font,
                fallback.family_name()
            );
        }
        Ok(fallback)
    }

    /// Shared lookup path: cache hit, known-font query, lazy system scan, retry.
    /// `Err(true)` means the miss came from the cache.
    fn load_cached(
        &mut self,
        key: String,
        find: impl Fn(&Database) -> Option<fontdb::ID>,
    ) -> std::result::Result<Arc<FontFace>, bool> {
        if let Some(cached) = self.faces.get(&key) {
            return cached.clone().ok_or(true);
        }

        let id = match find(&self.db) {
            Some(id) => Some(id),
            None if !self.system_fonts_loaded => {
                self.ensure_system_fonts_loaded();
                find(&self.db)
            }
            None => None,
        };

        let face = id.and_then(|id| match self.load_face_by_id(id) {
            Ok(face) => Some(Arc::new(face)),
            Err(e) => {
                tracing::warn!("Failed to load font face {}: {}", key, e);
                None
            }
        });

        self.faces.insert(key, face.clone());
        face.ok_or(false)
    }

    fn load_face_by_id(&self, id: fontdb::ID) -> Result<FontFace> {
        self.db
            .with_face_data(id, |data, face_index| {
                FontFace::from_data_with_index(data.to_vec(), face_index)
            })
            .ok_or_else(|| TextError::FontLoadError("Font source not found".to_string()))?
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn find_by_families(
    db: &Database,
    families: &[Family<'_>],
    weight: u16,
    italic: bool,
) -> Option<fontdb::ID> {
    let query = Query {
        families,
        weight: Weight(weight),
        style: if italic { Style::Italic } else { Style::Normal },
        stretch: Stretch::Normal,
    };

    if let Some(id) = db.query(&query) {
        return Some(id);
    }

    // Try with Oblique if Italic wasn't found
    if italic {
        let oblique_query = Query {
            style: Style::Oblique,
            ..query
        };
        return db.query(&oblique_query);
    }

    None
}

fn find_generic(db: &Database, generic: GenericFont, weight: u16, italic: bool) -> Option<fontdb::ID> {
    let family = match generic {
        GenericFont::System | GenericFont::SansSerif => Some(Family::SansSerif),
        GenericFont::Monospace => Some(Family::Monospace),
        GenericFont::Serif => Some(Family::Serif),
        GenericFont::Emoji => None,
    };

    if let Some(family) = family {
        if let Some(id) = find_by_families(db, &[family], weight, italic) {
            return Some(id);
        }
    }

    // Generic family queries may not match fonts loaded by path
    let fallback_names: &[&str] = match generic {
        GenericFont::System | GenericFont::SansSerif => {
            &["SF Pro", "Helvetica", "Segoe UI", "Arial", "Noto Sans", "DejaVu Sans"]
        }
        GenericFont::Serif => &["Times", "Times New Roman", "Georgia", "DejaVu Serif"],
        GenericFont::Monospace => &[
            "SF Mono",
            "Menlo",
            "Monaco",
            "Consolas",
            "DejaVu Sans Mono",
            "Liberation Mono",
            "Noto Sans Mono",
            "Courier New",
        ],
        GenericFont::Emoji => &["Apple Color Emoji", "Segoe UI Emoji", "Noto Color Emoji"],
    };

    fallback_names
        .iter()
        .find_map(|name| find_by_families(db, &[Family::Name(name)], weight, italic))
}
