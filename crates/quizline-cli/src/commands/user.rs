//! The `quizline user` commands.

use std::path::PathBuf;

use anyhow::Result;

use quizline_core::auth::UserStore;
use quizline_core::config::load_config_from;

pub fn register(username: String, password: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = UserStore::new(config.users_path());

    if store.register(&username, &password)? {
        println!("Registered user {}", username.trim());
        Ok(())
    } else {
        anyhow::bail!("user {} already exists", username.trim())
    }
}

pub fn login(username: String, password: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = UserStore::new(config.users_path());

    anyhow::ensure!(
        store.authenticate(&username, &password)?,
        "invalid username or password"
    );
    println!("Login successful for {}", username.trim());
    Ok(())
}
