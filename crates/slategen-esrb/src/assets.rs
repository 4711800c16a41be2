//! Icon-asset acquisition from the ESRB CDN.

use std::path::Path;

use slategen_core::RatingCategory;

use crate::{Resolver, Result};

pub(crate) fn download_icons(resolver: &Resolver, asset_root: &Path) -> Result<()> {
    let icons_dir = asset_root.join("icons");
    std::fs::create_dir_all(&icons_dir)?;

    for category in RatingCategory::ALL {
        let stem = category.asset_stem();
        let target = icons_dir.join(format!("{stem}.svg"));
        if target.exists() {
            tracing::debug!(path = %target.display(), "icon already present, skipping");
            continue;
        }

        let url = format!("{}/{stem}.svg", resolver.cdn_base());
        tracing::info!(url, "downloading icon");
        match resolver.get_bytes(&url) {
            Ok(bytes) => {
                std::fs::write(&target, bytes)?;
                tracing::info!(path = %target.display(), "icon saved");
            }
            Err(err) => {
                // One missing icon should not block the rest of the set.
                tracing::warn!(url, error = %err, "failed to download icon");
            }
        }
    }
    Ok(())
}
