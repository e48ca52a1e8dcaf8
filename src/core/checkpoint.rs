use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::load_agent;
use crate::db::trail::insert_checkpoint;
use crate::errors::{AppError, AppResult};
use crate::media::{PhotoStore, PhotoUpload};
use crate::models::agent::Agent;
use crate::models::checkpoint::{Checkpoint, CheckpointDetail};
use crate::models::coordinate::Coordinate;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// A shop visit as submitted by the field app.
#[derive(Debug, Clone)]
pub struct ShopVisit {
    pub shop_name: String,
    pub position: Option<Coordinate>,
    pub note: Option<String>,
    pub photo: Option<PhotoUpload>,
}

pub struct CheckpointLogic;

impl CheckpointLogic {
    /// Validate, upload the photo, then append a SHOP_VISIT checkpoint.
    /// Nothing is written when validation or the upload fails.
    pub fn record_shop_visit(
        pool: &mut DbPool,
        store: &dyn PhotoStore,
        agent: &Agent,
        visit: ShopVisit,
        at: DateTime<Utc>,
    ) -> AppResult<Checkpoint> {
        let shop_name = visit.shop_name.trim().to_string();
        if shop_name.is_empty() {
            return Err(AppError::Validation("Shop name is required".into()));
        }
        let position = visit
            .position
            .ok_or_else(|| AppError::Validation("Coordinates are required".into()))?;
        let position = Coordinate::new(position.lat, position.lng)?;
        let photo = visit
            .photo
            .ok_or_else(|| AppError::Validation("A shop photo is required".into()))?;
        if photo.bytes.is_empty() {
            return Err(AppError::Validation("Shop photo is empty".into()));
        }
        let note = visit
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        // Fail fast on a missing agent before spending an upload.
        load_agent(&pool.conn, agent.id)?;

        let photo_url = store.upload(agent.id, &photo).inspect_err(|e| {
            warn!(agent_id = agent.id, error = %e, "shop photo upload failed");
        })?;

        let checkpoint = Checkpoint::new(
            agent.id,
            position,
            at,
            note,
            CheckpointDetail::ShopVisit {
                shop_name: shop_name.clone(),
                photo_url,
            },
        );

        let stored = pool.with_tx(|tx| {
            let stored = insert_checkpoint(tx, &checkpoint)?;
            audit(
                tx,
                "shop_visit",
                &agent.id.to_string(),
                &format!("Visited '{}'", shop_name),
            )?;
            Ok(stored)
        })?;

        info!(agent_id = agent.id, checkpoint_id = stored.id, "shop visit recorded");
        Ok(stored)
    }
}
