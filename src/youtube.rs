use regex::Regex;
use std::sync::LazyLock;

// The leading `.*` is greedy, so the id after the last recognized marker wins
static YOUTUBE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu.be/|v/|u/[A-Za-z0-9_]/|embed/|watch\?v=|&v=)([^#&?]*).*")
        .expect("valid youtube regex")
});

const VIDEO_ID_LEN: usize = 11;

/// Extract the video id from a YouTube URL.
///
/// Returns `None` for anything that is not a recognized YouTube link or whose
/// id is not exactly 11 characters long.
pub fn resolve_video_id(url: &str) -> Option<String> {
    let caps = YOUTUBE_RE.captures(url)?;
    let id = caps.get(2)?.as_str();
    (id.chars().count() == VIDEO_ID_LEN).then(|| id.to_string())
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/maxresdefault.jpg")
}

pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{video_id}")
}

/// Display name given to media items created from a link
pub fn link_name(video_id: &str) -> String {
    format!("YouTube video {video_id}")
}
