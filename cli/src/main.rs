use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(
    name = "courseboard-sync",
    about = "Sync local course materials to a Courseboard instance"
)]
struct Cli {
    /// Base URL of the Courseboard server
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server: String,

    /// Account username (demo login)
    #[arg(long)]
    username: String,

    /// Account password (demo login)
    #[arg(long)]
    password: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload every file under a directory
    Upload {
        /// Directory to walk
        dir: PathBuf,

        /// Target category: slides or assignments
        #[arg(long, default_value = "slides")]
        category: String,

        /// Due date (YYYY-MM-DD), for assignments
        #[arg(long)]
        due_date: Option<String>,
    },
    /// Add an external link
    Link {
        title: String,
        url: String,

        #[arg(long)]
        description: Option<String>,
    },
    /// Post an announcement
    Announce { title: String, content: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .context("Failed to build HTTP client")?;

    login(&client, &cli.server, &cli.username, &cli.password).await?;

    match cli.command {
        Command::Upload {
            dir,
            category,
            due_date,
        } => upload_dir(&client, &cli.server, &dir, &category, due_date.as_deref()).await?,
        Command::Link {
            title,
            url,
            description,
        } => add_link(&client, &cli.server, &title, &url, description.as_deref()).await?,
        Command::Announce { title, content } => {
            announce(&client, &cli.server, &title, &content).await?
        }
    }

    Ok(())
}

/// Sign in and keep the session cookie on the client.
async fn login(client: &reqwest::Client, server: &str, username: &str, password: &str) -> Result<()> {
    let response = client
        .post(format!("{}/api/auth/demo-login", server))
        .json(&serde_json::json!({ "username": username, "password": password }))
        .send()
        .await
        .context("Login request failed")?;

    ensure_success(response, "login").await?;
    Ok(())
}

async fn upload_dir(
    client: &reqwest::Client,
    server: &str,
    dir: &Path,
    category: &str,
    due_date: Option<&str>,
) -> Result<()> {
    let mut uploaded = 0usize;

    for entry in WalkDir::new(dir) {
        let entry = entry.context("Failed to walk directory")?;
        if !entry.file_type().is_file() || is_hidden(entry.path()) {
            continue;
        }

        let path = entry.path();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .context("Non-UTF8 file name")?
            .to_string();
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let mut form = reqwest::multipart::Form::new()
            .text("category", category.to_string())
            .text("title", title_for(path))
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes)
                    .file_name(file_name.clone())
                    .mime_str(mime.as_ref())
                    .context("Invalid mime type")?,
            );
        if let Some(due) = due_date {
            form = form.text("dueDate", due.to_string());
        }

        let response = client
            .post(format!("{}/api/v1/upload", server))
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("Upload request failed for {}", file_name))?;

        ensure_success(response, &file_name).await?;
        println!("uploaded {}", file_name);
        uploaded += 1;
    }

    println!("done: {} file(s) uploaded to {}", uploaded, category);
    Ok(())
}

async fn add_link(
    client: &reqwest::Client,
    server: &str,
    title: &str,
    url: &str,
    description: Option<&str>,
) -> Result<()> {
    let response = client
        .post(format!("{}/api/v1/links", server))
        .json(&serde_json::json!({
            "title": title,
            "url": url,
            "description": description,
        }))
        .send()
        .await
        .context("Link request failed")?;

    ensure_success(response, title).await?;
    println!("link added: {}", title);
    Ok(())
}

async fn announce(client: &reqwest::Client, server: &str, title: &str, content: &str) -> Result<()> {
    let response = client
        .post(format!("{}/api/v1/announcements", server))
        .json(&serde_json::json!({ "title": title, "content": content }))
        .send()
        .await
        .context("Announcement request failed")?;

    ensure_success(response, title).await?;
    println!("announcement posted: {}", title);
    Ok(())
}

/// Fail with the server's error message on a non-success status.
async fn ensure_success(response: reqwest::Response, what: &str) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"].as_str().map(String::from))
        .unwrap_or(body);
    bail!("{} failed ({}): {}", what, status, detail);
}

/// A human title from a file path: the stem, with separators as spaces.
fn title_for(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled")
        .replace(['_', '-'], " ")
        .trim()
        .to_string()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_for() {
        assert_eq!(title_for(Path::new("week_3-slides.pdf")), "week 3 slides");
        assert_eq!(title_for(Path::new("dir/pset1.pdf")), "pset1");
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(Path::new("dir/.DS_Store")));
        assert!(!is_hidden(Path::new("dir/notes.md")));
    }

    #[test]
    fn test_walks_only_visible_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join(".hidden"), b"x").unwrap();

        let visible: Vec<_> = WalkDir::new(dir.path())
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && !is_hidden(e.path()))
            .collect();
        assert_eq!(visible.len(), 1);
    }
}
