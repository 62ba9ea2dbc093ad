//! Admin channel: the only writer of categories and static pages.
//!
//! ```text
//! crowdfund-admin --create-category "Health care"
//! crowdfund-admin --rename-category 3 "Health"
//! crowdfund-admin --create-page "About us" "<p>Who we are</p>"
//! ```

use crowdfund::{config::Config, db, store};
use std::env;
use tracing::{error, info};

enum Command {
    CreateCategory { name: String },
    RenameCategory { id: i32, name: String },
    CreatePage { title: String, body: String },
}

fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    match args {
        [flag, name] if flag == "--create-category" => Ok(Command::CreateCategory { name: name.clone() }),
        [flag, id, name] if flag == "--rename-category" => Ok(Command::RenameCategory {
            id: id
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid category id {:?}: {}", id, e))?,
            name: name.clone(),
        }),
        [flag, title, body] if flag == "--create-page" => Ok(Command::CreatePage {
            title: title.clone(),
            body: body.clone(),
        }),
        _ => anyhow::bail!(
            "usage: crowdfund-admin --create-category <name> | --rename-category <id> <name> | --create-page <title> <body>"
        ),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            error!("{}", e);
            return Err(e);
        }
    };

    let db = db::connect(&config).await?;

    match command {
        Command::CreateCategory { name } => {
            let category = store::create_category(&db, &name).await?;
            info!(category = %category.label(), slug = %category.slug, "category created");
        }
        Command::RenameCategory { id, name } => {
            let category = store::rename_category(&db, id, &name).await?;
            info!(category = %category.label(), slug = %category.slug, "category renamed");
        }
        Command::CreatePage { title, body } => {
            let page = store::create_static_page(&db, &title, &body).await?;
            info!(page = %page.label(), slug = %page.slug, "static page created");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn recognises_each_command() {
        assert!(matches!(
            parse_args(&args(&["--create-category", "Health"])),
            Ok(Command::CreateCategory { .. })
        ));
        assert!(matches!(
            parse_args(&args(&["--rename-category", "3", "Health"])),
            Ok(Command::RenameCategory { id: 3, .. })
        ));
        assert!(matches!(
            parse_args(&args(&["--create-page", "About", "<p>Hi</p>"])),
            Ok(Command::CreatePage { .. })
        ));
    }

    #[test]
    fn rejects_unknown_or_incomplete_commands() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["--create-category"])).is_err());
        assert!(parse_args(&args(&["--rename-category", "three", "Health"])).is_err());
    }
}
