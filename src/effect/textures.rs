use tracing::debug;

use crate::{
    domain::style::RayStyle,
    host::{AssetError, ContentLoader, TextureHandle},
};

/// Files served for the two logical ray textures when the host asks for
/// them.
#[must_use]
pub fn bundled_file(asset_name: &str) -> Option<&'static str> {
    RayStyle::ALL
        .into_iter()
        .find(|style| asset_names_match(style.asset_name(), asset_name))
        .map(|style| match style {
            RayStyle::Standard => "assets/rays.png",
            RayStyle::HighDetail => "assets/rays_hd.png",
        })
}

fn normalize(name: &str) -> String {
    name.trim()
        .replace('\\', "/")
        .trim_matches('/')
        .to_ascii_lowercase()
}

/// Asset names compare case-insensitively with either slash direction.
#[must_use]
pub fn asset_names_match(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Texture handles resolved on first use and dropped when the host reports
/// the asset changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureCache {
    standard: Option<TextureHandle>,
    high_detail: Option<TextureHandle>,
}

impl TextureCache {
    fn slot(&mut self, style: RayStyle) -> &mut Option<TextureHandle> {
        match style {
            RayStyle::Standard => &mut self.standard,
            RayStyle::HighDetail => &mut self.high_detail,
        }
    }

    pub fn get(
        &mut self,
        loader: &mut dyn ContentLoader,
        style: RayStyle,
    ) -> Result<TextureHandle, AssetError> {
        let slot = self.slot(style);
        if let Some(handle) = *slot {
            return Ok(handle);
        }
        let handle = loader.load_texture(style.asset_name())?;
        debug!(asset = style.asset_name(), ?handle, "ray texture loaded");
        *slot = Some(handle);
        Ok(handle)
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn is_loaded(&self, style: RayStyle) -> bool {
        match style {
            RayStyle::Standard => self.standard.is_some(),
            RayStyle::HighDetail => self.high_detail.is_some(),
        }
    }

    /// Forgets every cached texture named in `names`. Returns whether any
    /// handle was dropped.
    pub fn invalidate<S: AsRef<str>>(&mut self, names: &[S]) -> bool {
        let mut dropped = false;
        for style in RayStyle::ALL {
            if names
                .iter()
                .any(|name| asset_names_match(name.as_ref(), style.asset_name()))
            {
                dropped |= self.slot(style).take().is_some();
            }
        }
        dropped
    }
}
