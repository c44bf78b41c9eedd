use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use blog_client::draft;
use blog_client::editor::{Editor, Format};
use blog_client::session::{AdminAllowList, Gate, IdentityProvider, SessionGate, StaticIdentity};
use blog_client::storage::{FileStorage, LocalStorage};
use blog_client::views::{DetailView, LatestPostView, ListView};
use blog_client::{PostApi, PostClient};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Terminal front-end for the blog API.
///
/// Views fetch once and print their settled state. Editor commands act on the
/// locally saved draft and require a signed-in session.
#[derive(Parser, Debug)]
#[command(name = "blog", version, about)]
struct Args {
    /// Base URL of the API (without the /api prefix)
    #[arg(long, env = "API_BASE", default_value = "http://localhost:5000")]
    api_base: String,

    /// Bearer token attached to every request
    #[arg(long, env = "BLOG_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// JSON file used as local storage for the draft
    #[arg(long, env = "BLOG_STORAGE", value_name = "FILE", default_value = ".blog-storage.json")]
    storage: PathBuf,

    /// Email of the signed-in user. Unset means signed out.
    #[arg(long, env = "BLOG_SESSION_EMAIL")]
    session_email: Option<String>,

    /// Where a signed-out user is sent to log in
    #[arg(long, env = "BLOG_LOGIN_URL", default_value = "http://localhost:5000/login")]
    login_url: String,

    /// Comma separated admin emails (controls the "New Post" link)
    #[arg(long, env = "ADMIN_EMAILS", value_delimiter = ',')]
    admin_emails: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// All posts, newest first
    List,
    /// One post by id
    Show { id: String },
    /// Teaser of the newest post
    Latest,
    /// Reset the store to the example posts (development servers only)
    Seed,
    /// Navigation bar for the current session
    Nav,
    /// Send a signed-out user to the login page
    Login,
    /// End the session and return to the site
    Logout,
    /// Work on the new-post draft
    Editor {
        #[command(subcommand)]
        action: EditorAction,
    },
}

#[derive(Subcommand, Debug)]
enum EditorAction {
    /// Print the current draft
    Show,
    /// Replace the draft title
    Title { text: String },
    /// Replace the draft content
    Content { text: String },
    /// Wrap a character range of the content
    Format {
        #[arg(value_enum)]
        kind: FormatArg,
        #[arg(long, default_value_t = 0)]
        start: usize,
        #[arg(long, default_value_t = 0)]
        end: usize,
    },
    /// Render the content as sanitized HTML
    Preview,
    /// Create the post from the draft
    Publish,
    /// Forget the saved draft
    Discard,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Bold,
    Italic,
    Heading,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Bold => Format::Bold,
            FormatArg::Italic => Format::Italic,
            FormatArg::Heading => Format::Heading,
        }
    }
}

fn init_tracing() {
    // stdout is for rendered views; logs go to stderr
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let client = PostClient::new(&args.api_base, args.token.clone())
        .with_context(|| format!("invalid API base {}", args.api_base))?;
    let site = client.base().clone();
    let api: Arc<dyn PostApi> = Arc::new(client);
    let identity = StaticIdentity::new(args.session_email.clone(), args.login_url.clone());

    match args.command {
        Command::List => {
            let view = ListView::mount(api);
            view.settled().await;
            println!("{}", view.render());
        }
        Command::Show { id } => {
            let view = DetailView::mount(api, id);
            view.settled().await;
            println!("{}", view.render());
        }
        Command::Latest => {
            let view = LatestPostView::mount(api);
            view.settled().await;
            println!("{}", view.render());
        }
        Command::Seed => {
            let posts = api.seed().await?;
            println!("Seeded {} blog posts.", posts.len());
        }
        Command::Nav => {
            let admins = AdminAllowList::new(&args.admin_emails);
            println!(
                "{}",
                blog_client::session::render_nav(&identity.state(), &admins)
            );
        }
        Command::Login => {
            if SessionGate::new(&identity).login() {
                println!("Login: {}", args.login_url);
            } else {
                println!("Already signed in.");
            }
        }
        Command::Logout => match SessionGate::new(&identity).logout(&site) {
            Some(return_to) => println!("Logged out. Returning to {return_to}"),
            None => println!("Not signed in."),
        },
        Command::Editor { action } => {
            let gate = SessionGate::new(&identity);
            match gate.guard(|user| user.clone()) {
                Gate::Placeholder(text) => println!("{text}"),
                Gate::Redirected => {
                    eprintln!("Login required: {}", args.login_url);
                }
                Gate::Render(user) => {
                    tracing::debug!(email = %user.email, "editor session");
                    let file = FileStorage::new(&args.storage);
                    tracing::debug!(path = %file.path().display(), "draft storage");
                    let storage: Arc<dyn LocalStorage> = Arc::new(file);
                    run_editor(action, storage, api.as_ref()).await?;
                }
            }
        }
    }

    Ok(())
}

async fn run_editor(
    action: EditorAction,
    storage: Arc<dyn LocalStorage>,
    api: &dyn PostApi,
) -> Result<()> {
    if let EditorAction::Discard = action {
        draft::clear(storage.as_ref()).context("failed to discard draft")?;
        println!("Draft discarded.");
        return Ok(());
    }

    let mut editor = Editor::mount(storage);
    match action {
        EditorAction::Show => print_draft(&editor),
        EditorAction::Title { text } => {
            editor.set_title(text);
            print_draft(&editor);
        }
        EditorAction::Content { text } => {
            editor.set_content(text);
            print_draft(&editor);
        }
        EditorAction::Format { kind, start, end } => {
            let cursor = editor.apply(kind.into(), start..end);
            println!("{}", editor.content());
            println!("(cursor at {cursor})");
        }
        EditorAction::Preview => {
            editor.toggle_preview();
            println!("{}", editor.preview_html());
        }
        EditorAction::Publish => {
            let created = editor.submit(api).await;
            if let Some(feedback) = editor.feedback() {
                println!("{}", feedback.message);
            }
            if let Some(post) = created {
                println!("/blog/{}", post.id);
            }
        }
        EditorAction::Discard => {}
    }
    Ok(())
}

fn print_draft(editor: &Editor) {
    println!("Title: {}", editor.title());
    println!();
    println!("{}", editor.content());
}
