use anyhow::Context;
use rusqlite::Connection;

use crate::db::queries;
use crate::models::Screen;

static SEED_SCREENS: &str = include_str!("../../seed/screens.json");

pub fn seed_catalog() -> anyhow::Result<Vec<Screen>> {
    let screens: Vec<Screen> =
        serde_json::from_str(SEED_SCREENS).context("failed to parse seed screens")?;
    for screen in &screens {
        if let Some(packages) = &screen.packages {
            packages
                .validate()
                .with_context(|| format!("seed screen {} has an invalid catalog", screen.id))?;
        }
    }
    Ok(screens)
}

/// Populates the screens table on first start. Does nothing once any screen exists.
pub fn seed_screens(conn: &Connection) -> anyhow::Result<usize> {
    if queries::count_screens(conn)? > 0 {
        tracing::debug!("screens already populated, skipping seed");
        return Ok(0);
    }

    let screens = seed_catalog()?;
    for screen in &screens {
        queries::upsert_screen(conn, screen)?;
    }
    tracing::info!(count = screens.len(), "seeded screens");
    Ok(screens.len())
}

/// Re-applies the seed package catalogs to screens that already exist,
/// leaving every other screen field alone.
pub fn sync_packages(conn: &Connection) -> anyhow::Result<usize> {
    let mut updated = 0;
    for screen in seed_catalog()? {
        let Some(packages) = &screen.packages else {
            continue;
        };
        if queries::update_screen_packages(conn, &screen.id, packages)? {
            updated += 1;
        }
    }
    tracing::info!(updated, "synced screen packages from seed");
    Ok(updated)
}
