//! User profile commands for CLI.

use clap::Subcommand;
use wishdiary_core::storage::DiaryDb;
use wishdiary_core::{AuthService, Language, Theme};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the signed-in user's profile
    Show,
    /// Update profile fields
    Set {
        /// New nickname
        #[arg(long)]
        nickname: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// Theme: light or dark
        #[arg(long)]
        theme: Option<String>,
        /// Language: zh or en
        #[arg(long)]
        language: Option<String>,
    },
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = DiaryDb::open()?;
    let auth = AuthService::initialize(&db)?;
    let user = auth.require_user()?;

    match action {
        ProfileAction::Show => {
            let profile = db.get_or_create_profile(&user.uid, &user.display_name)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileAction::Set {
            nickname,
            description,
            theme,
            language,
        } => {
            let mut profile = db.get_or_create_profile(&user.uid, &user.display_name)?;

            if let Some(n) = nickname {
                profile.set_nickname(n);
            }
            if let Some(d) = description {
                profile.set_description(d);
            }
            if let Some(t) = theme {
                profile.set_theme(match t.as_str() {
                    "light" => Theme::Light,
                    "dark" => Theme::Dark,
                    other => return Err(format!("unknown theme: {other}").into()),
                });
            }
            if let Some(l) = language {
                profile.set_language(match l.as_str() {
                    "zh" => Language::Zh,
                    "en" => Language::En,
                    other => return Err(format!("unknown language: {other}").into()),
                });
            }

            db.save_profile(&profile)?;
            println!("Profile updated:");
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
    }
    Ok(())
}
