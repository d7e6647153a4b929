//! Resolved font descriptions.

use cosmic_text::{Attrs, CacheKeyFlags};

use super::types::{FontFamily, FontStretch, FontStyle, FontVariant, FontWeight};

/// A font description resolved against the font database.
///
/// A descriptor names a family plus the attributes that select one face in
/// it. It carries no size; the size is applied when the descriptor is turned
/// into shaping attributes.
///
/// # Example
///
/// ```
/// use glyphpress_render::text::{FontDescriptor, FontFamily, FontWeight};
///
/// let fallback = FontDescriptor::default_for(FontFamily::SansSerif);
/// assert_eq!(fallback.weight(), FontWeight::NORMAL);
/// assert!(!fallback.is_synthesized());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    family: FontFamily,
    face_name: Option<String>,
    weight: FontWeight,
    style: FontStyle,
    stretch: FontStretch,
    variant: FontVariant,
    synthesized: bool,
}

impl FontDescriptor {
    /// The descriptor used when a requested family/face cannot be found.
    pub fn default_for(family: FontFamily) -> Self {
        Self {
            family,
            face_name: None,
            weight: FontWeight::NORMAL,
            style: FontStyle::Normal,
            stretch: FontStretch::Normal,
            variant: FontVariant::Normal,
            synthesized: false,
        }
    }

    pub(crate) fn for_face(
        family: impl Into<String>,
        face_name: impl Into<String>,
        weight: FontWeight,
        style: FontStyle,
        stretch: FontStretch,
        synthesized: bool,
    ) -> Self {
        Self {
            family: FontFamily::Name(family.into()),
            face_name: Some(face_name.into()),
            weight,
            style,
            stretch,
            variant: FontVariant::Normal,
            synthesized,
        }
    }

    pub fn family(&self) -> &FontFamily {
        &self.family
    }

    /// Face name within the family, if the descriptor came from a lookup.
    pub fn face_name(&self) -> Option<&str> {
        self.face_name.as_deref()
    }

    pub fn weight(&self) -> FontWeight {
        self.weight
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn stretch(&self) -> FontStretch {
        self.stretch
    }

    pub fn variant(&self) -> FontVariant {
        self.variant
    }

    /// Whether the slant is produced by skewing an upright face.
    pub fn is_synthesized(&self) -> bool {
        self.synthesized
    }

    /// Return a copy with the given style.
    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    /// Return a copy using another family, keeping the other attributes.
    pub fn with_family(mut self, family: FontFamily) -> Self {
        self.family = family;
        self.face_name = None;
        self
    }

    /// Build cosmic-text attributes for this descriptor.
    pub(crate) fn to_attrs(&self) -> Attrs<'_> {
        let mut attrs = Attrs::new()
            .family(self.family.to_cosmic())
            .weight(self.weight.to_cosmic())
            .stretch(self.stretch.to_cosmic());

        if self.synthesized {
            // The matched face is upright; skew it at rasterization time.
            attrs = attrs
                .style(FontStyle::Normal.to_cosmic())
                .cache_key_flags(CacheKeyFlags::FAKE_ITALIC);
        } else {
            attrs = attrs.style(self.style.to_cosmic());
        }
        attrs
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::default_for(FontFamily::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_descriptor_is_sans() {
        let desc = FontDescriptor::default();
        assert_eq!(desc.family(), &FontFamily::SansSerif);
        assert_eq!(desc.face_name(), None);
        assert_eq!(desc.style(), FontStyle::Normal);
    }

    #[test]
    fn synthesized_descriptor_requests_fake_italic() {
        let desc = FontDescriptor::for_face(
            "Example",
            "Italic",
            FontWeight::NORMAL,
            FontStyle::Italic,
            FontStretch::Normal,
            true,
        );
        let attrs = desc.to_attrs();
        assert!(attrs.cache_key_flags.contains(CacheKeyFlags::FAKE_ITALIC));
        assert_eq!(attrs.style, cosmic_text::Style::Normal);
    }

    #[test]
    fn real_italic_keeps_style() {
        let desc = FontDescriptor::default().with_style(FontStyle::Italic);
        let attrs = desc.to_attrs();
        assert!(attrs.cache_key_flags.is_empty());
        assert_eq!(attrs.style, cosmic_text::Style::Italic);
    }

    #[test]
    fn with_family_clears_face() {
        let desc = FontDescriptor::for_face(
            "Example",
            "Bold",
            FontWeight::BOLD,
            FontStyle::Normal,
            FontStretch::Normal,
            false,
        )
        .with_family(FontFamily::Monospace);
        assert_eq!(desc.face_name(), None);
        assert_eq!(desc.weight(), FontWeight::BOLD);
    }
}
