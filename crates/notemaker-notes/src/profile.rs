//! Profile picture removal.

use tracing::info;

use notemaker_core::{
    purge, AssetStore, MediaKind, MediaReference, ProfilePicture, PurgeOptions, PurgeReport,
};

/// Remove the user's profile picture.
///
/// The stored asset is deleted best-effort; the profile fields are cleared
/// whether or not the store call succeeds.
pub async fn clear_profile_picture(
    profile: &mut ProfilePicture,
    store: &dyn AssetStore,
    options: &PurgeOptions,
) -> PurgeReport {
    let references = if profile.asset_id.is_empty() {
        Vec::new()
    } else {
        vec![MediaReference::new(MediaKind::Image, profile.url.clone())
            .with_asset(profile.asset_id.clone(), MediaKind::Image.as_str())]
    };

    let report = purge(&references, store, options).await;

    info!(
        asset_id = %profile.asset_id,
        failure_count = report.failure_count(),
        "Profile picture cleared"
    );
    profile.url.clear();
    profile.asset_id.clear();
    report
}
