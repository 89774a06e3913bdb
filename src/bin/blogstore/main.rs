use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::Local;
use clap::{Args as ClapArgs, Parser, Subcommand};
use spdlog::{info, warn};
use uuid::Uuid;

use blogstore::logger::configure_logger;
use blogstore::text_utils::{format_date_time, slug_from_title};
use blogstore::util::os_helper::{get_email, get_name};
use blogstore::{Comment, DiskFs, Post, PostStore, StoreOptions};

use crate::config::{generate_cfg, open_config};

mod config;
mod config_data;

const CFG_FILE_NAME: &str = "blogstore.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Writes a sample configuration file
    Init,
    /// Lists the stored posts
    List,
    /// Prints a post as JSON
    Show { id: i64 },
    /// Creates a new post
    New(NewArgs),
    /// Deletes a post
    Delete { id: i64 },
    /// Adds a comment to a post
    Comment(CommentArgs),
    /// Lists the comments of a post
    Comments { id: i64 },
}

#[derive(ClapArgs, Debug)]
struct NewArgs {
    /// Title of the post. The slug is generated from it
    #[arg(short, long)]
    title: String,

    #[arg(short, long)]
    body: String,

    /// Defaults to the highest stored id plus one
    #[arg(short, long)]
    id: Option<i64>,

    /// Defaults to the first line of the body
    #[arg(short, long)]
    excerpt: Option<String>,

    /// Can be repeated. Order is kept
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Creates the post hidden
    #[arg(long)]
    private: bool,
}

#[derive(ClapArgs, Debug)]
struct CommentArgs {
    id: i64,

    #[arg(short, long)]
    body: String,

    /// Name of the author. If empty, OS user real name is being used
    #[arg(short, long)]
    name: Option<String>,

    #[arg(short, long)]
    email: Option<String>,
}

/// One past the highest id, or 1 when there are none.
fn next_post_id(ids: impl Iterator<Item = i64>) -> Result<i64> {
    let max = ids.max().unwrap_or(0);
    match max.checked_add(1) {
        Some(id) => Ok(id),
        None => bail!("No post id left after {}. Pass one with --id", max),
    }
}

fn new_post(store: &PostStore<DiskFs>, args: NewArgs) -> Result<()> {
    let id = match args.id {
        Some(id) => id,
        None => next_post_id(store.get_all()?.iter().map(|p| p.id))?,
    };

    if store.get(id)?.is_some() {
        bail!("Post {} already exists", id);
    }

    let now = Local::now().naive_local();
    let excerpt = args.excerpt
        .unwrap_or_else(|| args.body.lines().next().unwrap_or_default().to_string());
    let post = Post {
        id,
        slug: slug_from_title(&args.title),
        title: args.title,
        body: args.body,
        pub_date: now,
        last_modified: now,
        is_public: !args.private,
        excerpt,
        tags: args.tags,
        comments: vec![],
    };

    store.save(&post)?;
    println!("Created post {} at {}", post.id, store.post_path(post.id).display());
    Ok(())
}

fn add_comment(store: &PostStore<DiskFs>, args: CommentArgs) -> Result<()> {
    let comment = Comment {
        author_name: args.name.unwrap_or_else(get_name),
        author_email: args.email.unwrap_or_else(get_email),
        pub_date: Local::now().naive_local(),
        body: args.body,
        is_public: true,
        unique_id: Uuid::new_v4(),
    };
    let unique_id = comment.unique_id;

    if !store.add_comment(args.id, comment)? {
        bail!("Post {} not found", args.id);
    }
    println!("Added comment {} to post {}", unique_id, args.id);
    Ok(())
}

fn run(store: &PostStore<DiskFs>, command: Command) -> Result<()> {
    match command {
        // Written before the store is opened
        Command::Init => {}
        Command::List => {
            for post in store.get_all()? {
                let visibility = if post.is_public { "public" } else { "private" };
                println!("{}\t{}\t{}\t{}", post.id, format_date_time(&post.pub_date), visibility, post.title);
            }
        }
        Command::Show { id } => {
            let Some(post) = store.get(id)? else {
                bail!("Post {} not found", id);
            };
            println!("{}", serde_json::to_string_pretty(&post)?);
        }
        Command::New(args) => new_post(store, args)?,
        Command::Delete { id } => {
            store.delete(id)?;
            println!("Deleted post {}", id);
        }
        Command::Comment(args) => add_comment(store, args)?,
        Command::Comments { id } => {
            let Some(comments) = store.get_comments(id)? else {
                bail!("Post {} not found", id);
            };
            for c in comments {
                println!("{}\t{}\t{} <{}>\n{}\n", c.unique_id, format_date_time(&c.pub_date), c.author_name, c.author_email, c.body);
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config_path.map(PathBuf::from);

    if let Command::Init = args.command {
        let path = generate_cfg(config_path).map_err(anyhow::Error::msg)?;
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    let config = match open_config(config_path) {
        Ok(config) => config,
        Err(err) => bail!("{}. Please run blogstore --help", err),
    };

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    let options = StoreOptions::from(&config.storage);
    info!("Opening post storage in {}", options.storage_dir.display());
    let store = PostStore::new(DiskFs::new(), options)?;

    run(&store, args.command)
}
