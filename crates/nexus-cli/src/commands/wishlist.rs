use super::context::AppContext;
use super::details::fetch_media;
use super::render::wishlist_table;
use crate::output::Output;
use crate::WishlistCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use nexus_core::WishlistStore;
use nexus_models::{NormalizedMedia, WishlistItem};
use nexus_sources::canonical_id;
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_wishlist(cmd: WishlistCommands, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut wishlist = ctx.wishlist()?;

    match cmd {
        WishlistCommands::Add { media_type, id, priority } => {
            if wishlist.is_in_wishlist(&canonical_id(media_type, &id), media_type) {
                output.info(format!("{} {} is already on your wishlist", media_type, id.trim()));
                return Ok(());
            }
            let media = fetch_media(&ctx.aggregator(), media_type, &id, output).await?;
            let (item, added) = add_item(&mut wishlist, media, priority)?;

            output.data(&item);
            if added {
                output.success(format!("Added '{}' to your wishlist", item.media.title.bold()));
            } else {
                output.info(format!("'{}' is already on your wishlist", item.media.title));
            }
            Ok(())
        }
        WishlistCommands::List { media_type } => {
            let items = match media_type {
                Some(media_type) => wishlist.filter_by_type(media_type),
                None => wishlist.list(),
            };
            output.data(&items);
            if output.shows_human() {
                if items.is_empty() {
                    output.info("Your wishlist is empty. Add something with: nexus wishlist add <type> <id>");
                } else {
                    output.table(&wishlist_table(&items, ctx.locale(None)?));
                }
            }
            Ok(())
        }
        WishlistCommands::Remove { id } => {
            let title = wishlist.get_by_id(&id).map(|item| item.media.title.clone());
            let removed = wishlist
                .remove(&id)
                .map_err(|e| eyre!("Failed to update wishlist: {:#}", e))?;
            if !removed {
                return Err(eyre!("No wishlist item with id {}", id));
            }
            output.success(format!("Removed '{}' from your wishlist", title.unwrap_or(id)));
            Ok(())
        }
        WishlistCommands::Check { media_type, id } => {
            let external_id = canonical_id(media_type, &id);
            let in_wishlist = wishlist.is_in_wishlist(&external_id, media_type);
            output.data(&json!({ "type": media_type, "externalId": external_id, "inWishlist": in_wishlist }));
            if output.shows_human() {
                if in_wishlist {
                    output.println(format!("{} {} {} is on your wishlist", "★".yellow(), media_type, external_id));
                } else {
                    output.println(format!("{} {} is not on your wishlist", media_type, external_id));
                }
            }
            Ok(())
        }
    }
}

/// Returns the stored item and whether it was newly added
fn add_item(wishlist: &mut WishlistStore, media: NormalizedMedia, priority: i32) -> Result<(WishlistItem, bool)> {
    let known = wishlist.is_in_wishlist(&media.external_id, media.media_type);
    let item = wishlist
        .add(media, priority)
        .map_err(|e| eyre!("Failed to update wishlist: {:#}", e))?;
    Ok((item, !known))
}
