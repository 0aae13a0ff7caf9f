//! Test data builders.

use crate::api::{Comment, HnClient, Story};
use crate::app::App;
use crate::theme::{ResolvedTheme, ThemeVariant, default_for_variant};

/// Base URL that nothing listens on; apps built for rendering never fetch.
pub const UNROUTABLE_API: &str = "http://127.0.0.1:9/v0";

#[allow(dead_code)]
pub struct StoryBuilder {
    id: u64,
    title: String,
    url: Option<String>,
    score: u32,
    by: String,
    time: u64,
    kind: String,
    descendants: Option<u32>,
    kids: Vec<u64>,
}

impl Default for StoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl StoryBuilder {
    pub fn new() -> Self {
        Self {
            id: 1,
            title: "Test Story".to_string(),
            url: Some("https://example.com".to_string()),
            score: 100,
            by: "testuser".to_string(),
            time: 1700000000,
            kind: "story".to_string(),
            descendants: Some(10),
            kids: vec![],
        }
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn no_url(mut self) -> Self {
        self.url = None;
        self
    }

    pub fn score(mut self, score: u32) -> Self {
        self.score = score;
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.by = author.to_string();
        self
    }

    pub fn time(mut self, time: u64) -> Self {
        self.time = time;
        self
    }

    pub fn kind(mut self, kind: &str) -> Self {
        self.kind = kind.to_string();
        self
    }

    pub fn descendants(mut self, count: u32) -> Self {
        self.descendants = Some(count);
        self
    }

    pub fn no_descendants(mut self) -> Self {
        self.descendants = None;
        self
    }

    pub fn kids(mut self, kids: Vec<u64>) -> Self {
        self.kids = kids;
        self
    }

    pub fn build(self) -> Story {
        Story {
            id: self.id,
            title: self.title,
            url: self.url,
            score: self.score,
            by: self.by,
            time: self.time,
            kind: self.kind,
            descendants: self.descendants,
            kids: self.kids,
        }
    }
}

#[allow(dead_code)]
pub struct CommentBuilder {
    id: u64,
    by: Option<String>,
    time: u64,
    text: Option<String>,
    parent: Option<u64>,
    kids: Vec<u64>,
}

impl Default for CommentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl CommentBuilder {
    pub fn new() -> Self {
        Self {
            id: 1,
            by: Some("commenter".to_string()),
            time: 1700000000,
            text: Some("Test comment".to_string()),
            parent: Some(1),
            kids: vec![],
        }
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.by = Some(author.to_string());
        self
    }

    pub fn deleted(mut self) -> Self {
        self.by = None;
        self.text = None;
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn time(mut self, time: u64) -> Self {
        self.time = time;
        self
    }

    pub fn parent(mut self, parent: u64) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn no_parent(mut self) -> Self {
        self.parent = None;
        self
    }

    pub fn kids(mut self, kids: Vec<u64>) -> Self {
        self.kids = kids;
        self
    }

    pub fn build(self) -> Comment {
        Comment {
            id: self.id,
            by: self.by,
            time: self.time,
            text: self.text,
            kind: "comment".to_string(),
            parent: self.parent,
            kids: self.kids,
        }
    }
}

/// Builds an `App` whose feed already holds the given stories, without
/// touching the network.
#[allow(dead_code)]
pub struct TestAppBuilder {
    stories: Vec<Story>,
    extra_ids: Vec<u64>,
    size: (u16, u16),
    theme: ResolvedTheme,
    show_help: bool,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            stories: Vec::new(),
            extra_ids: Vec::new(),
            size: (80, 24),
            theme: default_for_variant(ThemeVariant::Dark),
            show_help: false,
        }
    }

    pub fn with_stories(mut self, stories: Vec<Story>) -> Self {
        self.stories = stories;
        self
    }

    /// Ranked ids that follow the loaded stories and have not been
    /// requested yet.
    pub fn unloaded_ids(mut self, ids: Vec<u64>) -> Self {
        self.extra_ids = ids;
        self
    }

    pub fn size(mut self, width: u16, height: u16) -> Self {
        self.size = (width, height);
        self
    }

    pub fn theme(mut self, theme: ResolvedTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn show_help(mut self) -> Self {
        self.show_help = true;
        self
    }

    pub fn build(self) -> App {
        let client = HnClient::new(UNROUTABLE_API).unwrap();
        let mut app = App::new(self.theme, client);
        app.size = self.size;
        app.show_help = self.show_help;

        let loaded = self.stories.len();
        let mut ids: Vec<u64> = self.stories.iter().map(|s| s.id).collect();
        ids.extend(self.extra_ids);

        let mut stories = self.stories.into_iter();
        let mut request = app.feed.set_ids(ids);
        while let Some(req) = request.take() {
            let results = stories
                .by_ref()
                .take(req.ids.len())
                .map(|s| (s.id, Ok(Some(s))))
                .collect();
            app.feed.complete_batch(req.end, results);
            if app.feed.cursor() < loaded {
                request = app.feed.begin_batch();
            }
        }
        app
    }
}

pub fn sample_stories() -> Vec<Story> {
    vec![
        StoryBuilder::new()
            .id(8863)
            .title("My YC app: Dropbox - Throw away your USB drive")
            .url("http://www.getdropbox.com/u/2/screencast.html")
            .score(111)
            .author("dhouston")
            .descendants(71)
            .kids(vec![9224, 8917])
            .time(1175714200)
            .build(),
        StoryBuilder::new()
            .id(121003)
            .title("Ask HN: The Arc Effect")
            .no_url()
            .score(25)
            .author("tel")
            .kind("ask")
            .descendants(16)
            .kids(vec![121016])
            .time(1203647620)
            .build(),
        StoryBuilder::new()
            .id(192327)
            .title("Justin.tv is looking for a Lead Flash Engineer!")
            .url("http://justin.tv")
            .score(6)
            .author("justin")
            .kind("job")
            .no_descendants()
            .time(1210981217)
            .build(),
    ]
}
