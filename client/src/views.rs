/*
 * Responsibility
 * - 一覧 / 詳細 / 最新 post の view state (Loading → Failed | Ready)
 * - mount ごとに 1 回だけ fetch する。詳細は id が変わるたびに再 fetch
 * - in-flight request は view が所有し、drop / id 変更で cancel する
 *
 * Notes
 * - 状態は watch channel に載せ、描画側は state() / settled() で読む
 * - cancel 済みの request が後から書き込まないよう generation で保護する
 */
use std::fmt::Write as _;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::api::{PostApi, Pending};
use crate::error::ClientError;
use crate::model::Post;

const TEASER_CHARS: usize = 150;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u64,
    state: ViewState<T>,
}

/// One in-flight fetch at a time, published through a watch channel.
#[derive(Debug)]
struct Loader<T> {
    tx: Arc<watch::Sender<Slot<T>>>,
    rx: watch::Receiver<Slot<T>>,
    pending: Option<Pending<()>>,
}

impl<T> Loader<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn new() -> Self {
        let (tx, rx) = watch::channel(Slot {
            generation: 0,
            state: ViewState::Loading,
        });
        Self {
            tx: Arc::new(tx),
            rx,
            pending: None,
        }
    }

    fn load<F>(&mut self, fut: F)
    where
        F: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }

        let mut generation = 0;
        self.tx.send_modify(|slot| {
            slot.generation += 1;
            slot.state = ViewState::Loading;
            generation = slot.generation;
        });

        let tx = Arc::clone(&self.tx);
        self.pending = Some(Pending::spawn(async move {
            let state = match fut.await {
                Ok(data) => ViewState::Ready(data),
                Err(err) => {
                    tracing::error!(error = %err, "failed to load view data");
                    ViewState::Failed(err.to_string())
                }
            };
            // a newer load owns the slot now
            tx.send_if_modified(|slot| {
                if slot.generation != generation {
                    return false;
                }
                slot.state = state;
                true
            });
        }));
    }

    fn state(&self) -> ViewState<T> {
        self.rx.borrow().state.clone()
    }

    async fn settled(&self) -> ViewState<T> {
        let mut rx = self.rx.clone();
        match rx.wait_for(|slot| !slot.state.is_loading()).await {
            Ok(slot) => slot.state.clone(),
            Err(_) => self.state(),
        }
    }
}

fn render_post(out: &mut String, post: &Post) {
    let _ = writeln!(out, "{}", post.title);
    let _ = writeln!(out, "{}", post.date_label());
    let _ = writeln!(out);
    let _ = write!(out, "{}", post.content);
}

/// All posts, newest first.
#[derive(Debug)]
pub struct ListView {
    loader: Loader<Vec<Post>>,
}

impl ListView {
    pub fn mount(api: Arc<dyn PostApi>) -> Self {
        let mut loader = Loader::new();
        loader.load(async move { api.list().await });
        Self { loader }
    }

    pub fn state(&self) -> ViewState<Vec<Post>> {
        self.loader.state()
    }

    pub async fn settled(&self) -> ViewState<Vec<Post>> {
        self.loader.settled().await
    }

    pub fn render(&self) -> String {
        render_list(&self.state())
    }
}

pub fn render_list(state: &ViewState<Vec<Post>>) -> String {
    match state {
        ViewState::Loading => "Loading blog posts...".to_string(),
        ViewState::Failed(message) => format!("Error: {message}"),
        ViewState::Ready(posts) if posts.is_empty() => "No blog posts found.".to_string(),
        ViewState::Ready(posts) => {
            let mut out = String::new();
            for post in posts {
                let _ = writeln!(out, "{}", post.title);
                let _ = writeln!(out, "  {}  /blog/{}", post.date_label(), post.id);
            }
            out
        }
    }
}

/// A single post. `Ready(None)` means the server reported it absent.
pub struct DetailView {
    api: Arc<dyn PostApi>,
    id: String,
    loader: Loader<Option<Post>>,
}

impl DetailView {
    pub fn mount(api: Arc<dyn PostApi>, id: impl Into<String>) -> Self {
        let mut view = Self {
            api,
            id: id.into(),
            loader: Loader::new(),
        };
        view.fetch();
        view
    }

    fn fetch(&mut self) {
        let api = Arc::clone(&self.api);
        let id = self.id.clone();
        self.loader.load(async move { api.get(&id).await });
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Navigate to another post: the previous request is cancelled.
    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        if id == self.id {
            return;
        }
        self.id = id;
        self.fetch();
    }

    pub fn state(&self) -> ViewState<Option<Post>> {
        self.loader.state()
    }

    pub async fn settled(&self) -> ViewState<Option<Post>> {
        self.loader.settled().await
    }

    pub fn render(&self) -> String {
        render_detail(&self.state())
    }
}

pub fn render_detail(state: &ViewState<Option<Post>>) -> String {
    match state {
        ViewState::Loading => "Loading blog post...".to_string(),
        ViewState::Failed(message) => format!("Error: {message}"),
        ViewState::Ready(None) => String::new(),
        ViewState::Ready(Some(post)) => {
            let mut out = String::new();
            render_post(&mut out, post);
            out
        }
    }
}

/// Newest post as a teaser for the landing page.
#[derive(Debug)]
pub struct LatestPostView {
    loader: Loader<Vec<Post>>,
}

impl LatestPostView {
    pub fn mount(api: Arc<dyn PostApi>) -> Self {
        let mut loader = Loader::new();
        loader.load(async move { api.list().await });
        Self { loader }
    }

    pub fn state(&self) -> ViewState<Option<Post>> {
        latest(self.loader.state())
    }

    pub async fn settled(&self) -> ViewState<Option<Post>> {
        latest(self.loader.settled().await)
    }

    pub fn render(&self) -> String {
        match self.state() {
            ViewState::Loading => "Loading blog posts...".to_string(),
            ViewState::Failed(message) => format!("Error: {message}"),
            ViewState::Ready(None) => "No blog posts found.".to_string(),
            ViewState::Ready(Some(post)) => {
                let mut out = String::new();
                let _ = writeln!(out, "{}", post.title);
                let _ = writeln!(out, "{}", post.date_label());
                let _ = writeln!(out);
                let _ = writeln!(out, "{}", teaser(&post.content));
                let _ = write!(out, "Read more: /blog/{}", post.id);
                out
            }
        }
    }
}

fn latest(state: ViewState<Vec<Post>>) -> ViewState<Option<Post>> {
    match state {
        ViewState::Loading => ViewState::Loading,
        ViewState::Failed(message) => ViewState::Failed(message),
        ViewState::Ready(posts) => ViewState::Ready(posts.into_iter().next()),
    }
}

/// First 150 characters followed by `...`.
pub fn teaser(content: &str) -> String {
    let head: String = content.chars().take(TEASER_CHARS).collect();
    format!("{head}...")
}
