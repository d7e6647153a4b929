//! Font system management and font database access.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fontdb::ID as FontFaceId;
use tracing::{debug, warn};

use super::font::FontDescriptor;
use super::types::{FontMetrics, FontQuery, FontStretch, FontStyle, FontVariant, FontWeight};

/// Configuration for initializing the font system.
#[derive(Debug, Clone)]
pub struct FontSystemConfig {
    /// Whether to load system fonts on initialization.
    pub load_system_fonts: bool,
    /// Locale string for text shaping (e.g., "en-US").
    pub locale: String,
    /// Default serif font family name.
    pub serif_family: Option<String>,
    /// Default sans-serif font family name.
    pub sans_serif_family: Option<String>,
    /// Default monospace font family name.
    pub monospace_family: Option<String>,
    /// Extra directories scanned for fonts on initialization.
    pub font_dirs: Vec<PathBuf>,
    /// Extra font files loaded on initialization.
    pub font_files: Vec<PathBuf>,
}

impl Default for FontSystemConfig {
    fn default() -> Self {
        Self {
            load_system_fonts: true,
            locale: sys_locale::get_locale().unwrap_or_else(|| "en-US".to_string()),
            serif_family: None,
            sans_serif_family: None,
            monospace_family: None,
            font_dirs: Vec::new(),
            font_files: Vec::new(),
        }
    }
}

impl FontSystemConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to load system fonts on initialization.
    pub fn load_system_fonts(mut self, load: bool) -> Self {
        self.load_system_fonts = load;
        self
    }

    /// Set the locale for text shaping.
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set the default serif font family.
    pub fn serif_family(mut self, family: impl Into<String>) -> Self {
        self.serif_family = Some(family.into());
        self
    }

    /// Set the default sans-serif font family.
    pub fn sans_serif_family(mut self, family: impl Into<String>) -> Self {
        self.sans_serif_family = Some(family.into());
        self
    }

    /// Set the default monospace font family.
    pub fn monospace_family(mut self, family: impl Into<String>) -> Self {
        self.monospace_family = Some(family.into());
        self
    }

    /// Add a directory of fonts to load.
    pub fn font_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_dirs.push(path.into());
        self
    }

    /// Add a single font file to load.
    pub fn font_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_files.push(path.into());
        self
    }
}

/// Ink bounds of one glyph in font units (y grows upwards).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphBox {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

/// Glyph boxes of one face, keyed by glyph id.
#[derive(Debug, Clone, Default)]
pub struct FaceGlyphBoxes {
    pub units_per_em: u16,
    pub boxes: HashMap<u16, GlyphBox>,
}

impl FaceGlyphBoxes {
    /// Pixel scale for a glyph rendered at `font_size`.
    pub fn scale(&self, font_size: f32) -> f32 {
        if self.units_per_em == 0 {
            0.0
        } else {
            font_size / self.units_per_em as f32
        }
    }
}

/// Description of one face of a family, as listed to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct FontFaceDescription {
    /// Face name within the family (e.g. "Bold Italic").
    pub name: String,
    pub weight: FontWeight,
    pub style: FontStyle,
    pub stretch: FontStretch,
    pub variant: FontVariant,
    /// Whether this face is produced by skewing an upright face.
    pub synthesized: bool,
}

/// The font system manages font loading, enumeration, and matching.
///
/// It wraps cosmic-text's `FontSystem`, which owns the font database and
/// the shaping caches.
///
/// # Thread Safety
///
/// Shaping needs `&mut` access. Share one instance behind a mutex, or
/// [`fork`](FontSystem::fork) a private instance that reuses the already
/// scanned database.
///
/// # Example
///
/// ```no_run
/// use glyphpress_render::text::FontSystem;
///
/// let font_system = FontSystem::new();
/// for family in font_system.list_families() {
///     for face in font_system.list_faces(&family) {
///         println!("{family}: {} (synthesized: {})", face.name, face.synthesized);
///     }
/// }
/// ```
pub struct FontSystem {
    inner: cosmic_text::FontSystem,
}

impl FontSystem {
    /// Create a new font system with default configuration.
    ///
    /// This will automatically load all system fonts, which may take
    /// around 1 second depending on the number of fonts installed.
    pub fn new() -> Self {
        Self::with_config(FontSystemConfig::default())
    }

    /// Create a new font system with custom configuration.
    ///
    /// Font files that fail to load are skipped with a warning.
    pub fn with_config(config: FontSystemConfig) -> Self {
        let mut db = fontdb::Database::new();
        if config.load_system_fonts {
            db.load_system_fonts();
        }
        for dir in &config.font_dirs {
            db.load_fonts_dir(dir);
        }
        for file in &config.font_files {
            if let Err(err) = db.load_font_file(file) {
                warn!(
                    target: "glyphpress_render::fonts",
                    path = %file.display(),
                    error = %err,
                    "skipping font file"
                );
            }
        }

        if let Some(ref family) = config.serif_family {
            db.set_serif_family(family);
        }
        if let Some(ref family) = config.sans_serif_family {
            db.set_sans_serif_family(family);
        }
        if let Some(ref family) = config.monospace_family {
            db.set_monospace_family(family);
        }

        debug!(
            target: "glyphpress_render::fonts",
            faces = db.len(),
            locale = %config.locale,
            "font database ready"
        );

        Self {
            inner: cosmic_text::FontSystem::new_with_locale_and_db(config.locale, db),
        }
    }

    /// Create an independent font system sharing this one's font database.
    ///
    /// Face sources are reference counted, so this does not rescan or copy
    /// font files. Shaping caches start empty.
    pub fn fork(&self) -> Self {
        Self {
            inner: cosmic_text::FontSystem::new_with_locale_and_db(
                self.inner.locale().to_string(),
                self.inner.db().clone(),
            ),
        }
    }

    /// Get a reference to the underlying cosmic-text font system.
    pub fn inner(&self) -> &cosmic_text::FontSystem {
        &self.inner
    }

    /// Get a mutable reference to the underlying cosmic-text font system.
    pub fn inner_mut(&mut self) -> &mut cosmic_text::FontSystem {
        &mut self.inner
    }

    /// Get a reference to the font database.
    pub fn database(&self) -> &fontdb::Database {
        self.inner.db()
    }

    /// Load a font file from disk.
    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> Result<(), FontLoadError> {
        self.inner
            .db_mut()
            .load_font_file(path.as_ref())
            .map_err(|e| FontLoadError::IoError(e.to_string()))
    }

    /// Load font data from memory.
    ///
    /// The data should be the raw contents of a TTF, OTF, TTC, or OTC file.
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.inner.db_mut().load_font_data(data);
    }

    /// Load all fonts from a directory, recursively.
    pub fn load_fonts_dir(&mut self, path: impl AsRef<Path>) -> Result<(), FontLoadError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(FontLoadError::NotADirectory(path.display().to_string()));
        }
        let before = self.face_count();
        self.inner.db_mut().load_fonts_dir(path);
        debug!(
            target: "glyphpress_render::fonts",
            path = %path.display(),
            added = self.face_count() - before,
            "loaded font directory"
        );
        Ok(())
    }

    /// Query for a font matching the given criteria.
    ///
    /// Returns the ID of the best matching font face, or `None` if no match was found.
    pub fn query(&self, query: &FontQuery) -> Option<FontFaceId> {
        if query.families.is_empty() {
            return None;
        }

        let families: Vec<fontdb::Family<'_>> =
            query.families.iter().map(|f| f.to_fontdb()).collect();

        let fontdb_query = fontdb::Query {
            families: &families,
            weight: query.weight.to_fontdb(),
            stretch: query.stretch.to_fontdb(),
            style: query.style.to_fontdb(),
        };

        self.inner.db().query(&fontdb_query)
    }

    /// Get vertical metrics for a specific font face.
    pub fn face_metrics(&self, face_id: FontFaceId) -> Option<FontMetrics> {
        self.inner
            .db()
            .with_face_data(face_id, |data, face_index| {
                ttf_parser::Face::parse(data, face_index)
                    .ok()
                    .map(|face| FontMetrics {
                        units_per_em: face.units_per_em(),
                        ascent: face.ascender(),
                        descent: face.descender(),
                        line_gap: face.line_gap(),
                    })
            })
            .flatten()
    }

    /// Look up ink boxes for a set of glyphs of one face.
    ///
    /// The face is parsed once. Glyphs without outlines (spaces) are absent
    /// from the result.
    pub fn glyph_boxes(
        &self,
        face_id: FontFaceId,
        glyph_ids: impl IntoIterator<Item = u16>,
    ) -> Option<FaceGlyphBoxes> {
        self.inner
            .db()
            .with_face_data(face_id, |data, face_index| {
                let face = ttf_parser::Face::parse(data, face_index).ok()?;
                let mut boxes = HashMap::new();
                for id in glyph_ids {
                    if boxes.contains_key(&id) {
                        continue;
                    }
                    if let Some(rect) = face.glyph_bounding_box(ttf_parser::GlyphId(id)) {
                        boxes.insert(
                            id,
                            GlyphBox {
                                x_min: rect.x_min,
                                y_min: rect.y_min,
                                x_max: rect.x_max,
                                y_max: rect.y_max,
                            },
                        );
                    }
                }
                Some(FaceGlyphBoxes {
                    units_per_em: face.units_per_em(),
                    boxes,
                })
            })
            .flatten()
    }

    /// Get the number of loaded font faces.
    pub fn face_count(&self) -> usize {
        self.inner.db().len()
    }

    /// All family names in the database, sorted and deduplicated.
    ///
    /// Only the primary (first) name of each face is listed.
    pub fn list_families(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .db()
            .faces()
            .filter_map(|face| face.families.first().map(|(name, _)| name.clone()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Faces of a family, including synthesized italics.
    ///
    /// A family without any slanted face gets one synthesized "Italic"
    /// entry per upright face. Unknown families yield an empty list.
    pub fn list_faces(&self, family: &str) -> Vec<FontFaceDescription> {
        let mut faces: Vec<FontFaceDescription> = self
            .inner
            .db()
            .faces()
            .filter(|face| face.families.iter().any(|(name, _)| name == family))
            .map(|face| FontFaceDescription {
                name: self.face_name(face),
                weight: FontWeight::from_fontdb(face.weight),
                style: FontStyle::from_fontdb(face.style),
                stretch: FontStretch::from_fontdb(face.stretch),
                variant: FontVariant::Normal,
                synthesized: false,
            })
            .collect();

        if !faces.is_empty() && !faces.iter().any(|f| f.style.is_slanted()) {
            let synthesized: Vec<FontFaceDescription> = faces
                .iter()
                .map(|upright| FontFaceDescription {
                    name: synthesized_italic_name(&upright.name),
                    style: FontStyle::Italic,
                    synthesized: true,
                    ..upright.clone()
                })
                .collect();
            faces.extend(synthesized);
        }

        faces.dedup_by(|a, b| a.name == b.name && a.synthesized == b.synthesized);
        faces
    }

    /// Resolve a family and face name to a descriptor.
    ///
    /// Both names must match exactly. Returns `None` when either is empty or
    /// nothing matches; callers substitute a default description.
    pub fn resolve_font_description(&self, family: &str, face: &str) -> Option<FontDescriptor> {
        if family.is_empty() || face.is_empty() {
            return None;
        }
        self.list_faces(family)
            .into_iter()
            .find(|candidate| candidate.name == face)
            .map(|found| {
                FontDescriptor::for_face(
                    family,
                    found.name,
                    found.weight,
                    found.style,
                    found.stretch,
                    found.synthesized,
                )
            })
    }

    /// Access font data for a specific face.
    pub fn with_face_data<T>(
        &self,
        face_id: FontFaceId,
        f: impl FnOnce(&[u8], u32) -> T,
    ) -> Option<T> {
        self.inner.db().with_face_data(face_id, f)
    }

    /// Subfamily name of a face, from its name table or its attributes.
    fn face_name(&self, face: &fontdb::FaceInfo) -> String {
        self.inner
            .db()
            .with_face_data(face.id, |data, index| {
                let parsed = ttf_parser::Face::parse(data, index).ok()?;
                let names: Vec<_> = parsed.names().into_iter().collect();
                [
                    ttf_parser::name_id::TYPOGRAPHIC_SUBFAMILY,
                    ttf_parser::name_id::SUBFAMILY,
                ]
                .into_iter()
                .find_map(|id| {
                    names
                        .iter()
                        .filter(|name| name.name_id == id && name.is_unicode())
                        .find_map(|name| name.to_string())
                })
            })
            .flatten()
            .unwrap_or_else(|| {
                describe_attributes(
                    FontWeight::from_fontdb(face.weight),
                    FontStyle::from_fontdb(face.style),
                )
            })
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSystem")
            .field("face_count", &self.face_count())
            .field("locale", &self.inner.locale())
            .finish()
    }
}

fn synthesized_italic_name(upright: &str) -> String {
    match upright {
        "Regular" | "Normal" | "Book" | "Roman" => "Italic".to_string(),
        other => format!("{other} Italic"),
    }
}

/// Fallback face name built from weight and style.
fn describe_attributes(weight: FontWeight, style: FontStyle) -> String {
    let weight_name = match weight.value() {
        0..=149 => Some("Thin"),
        150..=249 => Some("Ultra-Light"),
        250..=349 => Some("Light"),
        350..=449 => None,
        450..=549 => Some("Medium"),
        550..=649 => Some("Semi-Bold"),
        650..=749 => Some("Bold"),
        750..=849 => Some("Ultra-Bold"),
        _ => Some("Heavy"),
    };
    let style_name = match style {
        FontStyle::Normal => None,
        FontStyle::Italic => Some("Italic"),
        FontStyle::Oblique => Some("Oblique"),
    };
    match (weight_name, style_name) {
        (None, None) => "Regular".to_string(),
        (Some(w), None) => w.to_string(),
        (None, Some(s)) => s.to_string(),
        (Some(w), Some(s)) => format!("{w} {s}"),
    }
}

/// Error type for font loading operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FontLoadError {
    /// An I/O error occurred while loading the font.
    #[error("I/O error: {0}")]
    IoError(String),
    /// The path given as a font directory is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),
}
