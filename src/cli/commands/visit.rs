use crate::cli::commands::{acting_agent, open_pool, request_time};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::checkpoint::{CheckpointLogic, ShopVisit};
use crate::errors::AppResult;
use crate::media::{DirPhotoStore, PhotoUpload};
use crate::models::coordinate::Coordinate;
use crate::ui::messages::success;
use std::path::Path;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Visit {
        shop,
        lat,
        lng,
        note,
        photo,
    } = &cli.command
    else {
        return Ok(());
    };

    let mut pool = open_pool(cfg)?;
    let agent = acting_agent(cli, &pool)?;

    let visit = ShopVisit {
        shop_name: shop.clone(),
        position: Some(Coordinate::parse(lat, lng)?),
        note: note.clone(),
        photo: photo
            .as_deref()
            .map(|p| PhotoUpload::from_path(Path::new(p)))
            .transpose()?,
    };

    let store = DirPhotoStore::new(&cfg.media_dir);
    let checkpoint =
        CheckpointLogic::record_shop_visit(&mut pool, &store, &agent, visit, request_time(cli)?)?;

    success(format!(
        "Shop visit '{}' recorded (checkpoint #{}).",
        checkpoint.shop_name().unwrap_or_default(),
        checkpoint.id
    ));
    if let Some(url) = checkpoint.photo_url() {
        println!("photo: {}", url);
    }
    Ok(())
}
