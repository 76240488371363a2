use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{CityweaveError, CityweaveResult};

/// Raw font file plus the face index inside it.
#[derive(Clone, Debug)]
pub struct FontFace {
    pub bytes: Arc<Vec<u8>>,
    pub index: u32,
}

/// Pick the face used for labels and captions.
///
/// An explicit `path` must load. Without one the system sans-serif face is used; when the
/// system has none, `Ok(None)` is returned and text is skipped.
#[tracing::instrument]
pub fn resolve_font(path: Option<&Path>) -> CityweaveResult<Option<FontFace>> {
    if let Some(path) = path {
        if !path.is_file() {
            return Err(CityweaveError::input(format!(
                "font file '{}' does not exist",
                path.display()
            )));
        }
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        return Ok(Some(FontFace {
            bytes: Arc::new(bytes),
            index: 0,
        }));
    }

    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    let query = usvg::fontdb::Query {
        families: &[usvg::fontdb::Family::SansSerif, usvg::fontdb::Family::Serif],
        ..Default::default()
    };
    let face = db.query(&query).and_then(|id| {
        db.with_face_data(id, |data, index| FontFace {
            bytes: Arc::new(data.to_vec()),
            index,
        })
    });
    if face.is_none() {
        tracing::warn!("no system sans-serif font found; labels and captions will be skipped");
    }
    Ok(face)
}

/// Parley shaping state bound to one registered font family.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    family: String,
}

impl TextLayoutEngine {
    pub(crate) fn new(face: &FontFace) -> CityweaveResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CityweaveError::render("font file holds no usable face"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CityweaveError::render("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
        })
    }

    /// Shape a single unwrapped line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        color: Rgba8,
    ) -> CityweaveResult<parley::Layout<Rgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CityweaveError::render("text size must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(color));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}
