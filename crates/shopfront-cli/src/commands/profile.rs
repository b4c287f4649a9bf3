//! Profile subcommand implementations.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use shopfront_core::profile::{Principal, ProfileUpdate};
use shopfront_core::traits::ProfileStore;
use shopfront_core::types::UserId;
use shopfront_file::FileProfiles;

use super::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileSubcommand {
    /// Print a profile
    Show(ShowArgs),

    /// Change profile fields
    Update(UpdateArgs),
}

/// Who is asking, and whose profile they name.
#[derive(Args, Debug)]
pub struct Identity {
    /// Authenticated user id to act as
    #[arg(long = "as", value_name = "UID")]
    pub principal: String,

    /// Profile to act on (defaults to your own)
    #[arg(long, value_name = "UID")]
    pub user: Option<String>,
}

impl Identity {
    fn resolve(&self) -> Result<(Principal, UserId)> {
        let principal = Principal::authenticated(
            UserId::new(self.principal.as_str()).context("Invalid principal id")?,
        );
        let target = match &self.user {
            Some(user) => UserId::new(user.as_str()).context("Invalid user id")?,
            None => principal.user().clone(),
        };
        Ok((principal, target))
    }
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub identity: Identity,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub identity: Identity,

    /// Display name (1-100 characters)
    #[arg(long)]
    pub display_name: Option<String>,

    /// Bio (up to 500 characters)
    #[arg(long)]
    pub bio: Option<String>,

    /// Avatar image URL
    #[arg(long)]
    pub avatar_url: Option<String>,

    /// Location (up to 100 characters)
    #[arg(long)]
    pub location: Option<String>,

    /// Website URL
    #[arg(long)]
    pub website: Option<String>,

    /// Full update as a JSON object, instead of the field flags
    #[arg(long, conflicts_with_all = ["display_name", "bio", "avatar_url", "location", "website"])]
    pub json: Option<String>,
}

pub async fn handle(ctx: &AppContext, cmd: ProfileCommand) -> Result<()> {
    let profiles = FileProfiles::new(ctx.store.clone());

    match cmd.command {
        ProfileSubcommand::Show(args) => {
            let (principal, target) = args.identity.resolve()?;
            let profile = profiles
                .get_profile_of(&principal, &target)
                .await
                .context("Failed to read profile")?;
            output::json_pretty(&profile)
        }
        ProfileSubcommand::Update(args) => {
            let (principal, target) = args.identity.resolve()?;

            let update = match &args.json {
                Some(body) => ProfileUpdate::from_json(body).context("Invalid profile update")?,
                None => {
                    let update = ProfileUpdate {
                        display_name: args.display_name,
                        bio: args.bio,
                        avatar_url: args.avatar_url,
                        location: args.location,
                        website: args.website,
                    };
                    update.validate().context("Invalid profile update")?;
                    update
                }
            };

            let profile = profiles
                .update_profile_of(&principal, &target, &update)
                .await
                .context("Failed to update profile")?;

            output::success("Profile updated");
            output::json_pretty(&profile)
        }
    }
}
