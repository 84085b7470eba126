use std::{fs, path::Path};
use util::config::AppConfig;

#[tokio::main]
async fn main() {
    let config = AppConfig::global();
    let db_path = config.database_path.clone();
    let url = format!("sqlite://{}?mode=rwc", db_path);
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("clean") => {
            remove_db_file(&db_path);
            remove_media(&config);
        }
        Some("fresh") => {
            remove_db_file(&db_path);
            remove_media(&config);
            create_db_dir(&db_path);
            migration::runner::run_all_migrations(&url).await;
        }
        _ => {
            create_db_dir(&db_path);
            migration::runner::run_all_migrations(&url).await;
        }
    }
}

fn remove_db_file(path: &str) {
    let db_path = Path::new(path);
    if db_path.exists() {
        match fs::remove_file(db_path) {
            Ok(()) => println!("Deleted DB: {}", db_path.display()),
            Err(e) => eprintln!("Failed to delete DB {}: {e}", db_path.display()),
        }
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }
}

fn remove_media(config: &AppConfig) {
    let media = config.media_root();
    if media.exists() {
        match fs::remove_dir_all(&media) {
            Ok(()) => println!("Deleted media storage: {}", media.display()),
            Err(e) => eprintln!("Failed to delete media storage {}: {e}", media.display()),
        }
    } else {
        println!("Media storage does not exist: {}", media.display());
    }
}

fn create_db_dir(path: &str) {
    if let Some(parent) = Path::new(path).parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Failed to create DB directory: {e}");
            std::process::exit(1);
        }
    }
}
