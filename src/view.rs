//! View models derived from cached data.
//!
//! Nothing in here knows about the terminal. A [`Surface`] bundles the three
//! things that must always agree with each other for one view: the rendered
//! list, the "N of M" counter and the selector options.

use crate::types::{Episode, EpisodeId, Show, ShowId};
use regex::{Captures, Regex};
use std::fmt;
use std::sync::LazyLock;

pub const NO_SUMMARY: &str = "No summary available.";
pub const NOT_AVAILABLE: &str = "N/A";
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "placeholder.jpg";

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));
static BLOCK_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|</p>").expect("break pattern"));
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").expect("space pattern"));
static NUMERIC_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&#(?:([0-9]{1,7})|[xX]([0-9a-fA-F]{1,6}));").expect("entity pattern")
});

/// Fallback references used when a record has no image.
#[derive(Clone, Debug, PartialEq)]
pub struct Placeholders {
    pub image: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

/// One rendered item.
#[derive(Clone, Debug, PartialEq)]
pub struct Card<Id> {
    /// Item the card was rendered from; clicking the title targets it.
    pub id: Id,
    pub title: String,
    pub image: String,
    /// Plain-text summary.
    pub summary: String,
    /// Label/value rows shown under the title.
    pub details: Vec<(&'static str, String)>,
}

/// The rendered list: either cards or a single message in their place.
#[derive(Clone, Debug, PartialEq)]
pub enum ListBody<Id> {
    Cards(Vec<Card<Id>>),
    Message(String),
}

impl<Id> ListBody<Id> {
    pub fn cards(&self) -> &[Card<Id>] {
        match self {
            ListBody::Cards(cards) => cards.as_slice(),
            ListBody::Message(_) => &[],
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ListBody::Cards(_) => None,
            ListBody::Message(msg) => Some(msg.as_str()),
        }
    }
}

/// "shown of total" counter. Each count carries its own noun.
///
/// # Examples
///
/// ```
/// use show_browser::view::CountLabel;
///
/// assert_eq!(CountLabel::new(1, 2, "show", "shows").to_string(), "1 show of 2 shows");
/// assert_eq!(CountLabel::new(0, 1, "episode", "episodes").to_string(), "0 episodes of 1 episode");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountLabel {
    pub shown: usize,
    pub total: usize,
    singular: &'static str,
    plural: &'static str,
}

impl CountLabel {
    pub fn new(shown: usize, total: usize, singular: &'static str, plural: &'static str) -> Self {
        Self {
            shown,
            total,
            singular,
            plural,
        }
    }

    pub fn shown_noun(&self) -> &'static str {
        pluralize(self.shown, self.singular, self.plural)
    }

    pub fn total_noun(&self) -> &'static str {
        pluralize(self.total, self.singular, self.plural)
    }
}

impl fmt::Display for CountLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} of {} {}",
            self.shown,
            self.shown_noun(),
            self.total,
            self.total_noun()
        )
    }
}

/// Singular form for exactly one, plural otherwise (including zero).
pub fn pluralize(count: usize, singular: &'static str, plural: &'static str) -> &'static str {
    if count == 1 { singular } else { plural }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectorOption<Id> {
    pub value: Id,
    pub label: String,
}

/// Dropdown-style control: a sentinel followed by one option per item of the
/// full, unfiltered collection.
#[derive(Clone, Debug, PartialEq)]
pub struct Selector<Id> {
    pub sentinel: &'static str,
    pub options: Vec<SelectorOption<Id>>,
    /// `None` means the sentinel is selected.
    pub selected: Option<Id>,
}

impl<Id: PartialEq + Copy> Selector<Id> {
    /// Number of entries including the sentinel.
    pub fn len(&self) -> usize {
        self.options.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Label at `index`, where 0 is the sentinel.
    pub fn label(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(self.sentinel),
            i => self.options.get(i - 1).map(|o| o.label.as_str()),
        }
    }

    /// Value at `index`; `Some(None)` is the sentinel.
    pub fn value_at(&self, index: usize) -> Option<Option<Id>> {
        match index {
            0 => Some(None),
            i => self.options.get(i - 1).map(|o| Some(o.value)),
        }
    }

    /// Index of the current selection, counting the sentinel.
    pub fn selected_index(&self) -> usize {
        self.selected
            .and_then(|id| self.options.iter().position(|o| o.value == id))
            .map(|i| i + 1)
            .unwrap_or(0)
    }
}

/// Everything one view displays.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface<Id> {
    pub list: ListBody<Id>,
    pub count: CountLabel,
    pub selector: Selector<Id>,
    /// Current search text as typed.
    pub query: String,
}

/// A record the view layer knows how to render.
pub trait Renderable {
    type Id: Copy + PartialEq;

    const SINGULAR: &'static str;
    const PLURAL: &'static str;
    /// Shown instead of cards when nothing matches.
    const EMPTY_MESSAGE: &'static str;
    const SENTINEL: &'static str;

    fn id(&self) -> Self::Id;

    fn card(&self, placeholders: &Placeholders) -> Card<Self::Id>;

    fn option_label(&self) -> String;
}

impl Renderable for Show {
    type Id = ShowId;

    const SINGULAR: &'static str = "show";
    const PLURAL: &'static str = "shows";
    const EMPTY_MESSAGE: &'static str = "No shows found.";
    const SENTINEL: &'static str = "Select a show...";

    fn id(&self) -> ShowId {
        self.id
    }

    fn card(&self, placeholders: &Placeholders) -> Card<ShowId> {
        render_show(self, placeholders)
    }

    fn option_label(&self) -> String {
        self.name.clone()
    }
}

impl Renderable for Episode {
    type Id = EpisodeId;

    const SINGULAR: &'static str = "episode";
    const PLURAL: &'static str = "episodes";
    const EMPTY_MESSAGE: &'static str = "No episodes available.";
    const SENTINEL: &'static str = "Select an episode...";

    fn id(&self) -> EpisodeId {
        self.id
    }

    fn card(&self, placeholders: &Placeholders) -> Card<EpisodeId> {
        render_episode(self, placeholders)
    }

    fn option_label(&self) -> String {
        self.label()
    }
}

pub fn render_show(show: &Show, placeholders: &Placeholders) -> Card<ShowId> {
    let rating = show
        .rating
        .average
        .map(|r| r.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Card {
        id: show.id,
        title: show.name.clone(),
        image: image_or(show.image_url(), placeholders),
        summary: summary_text(show.summary.as_deref()),
        details: vec![
            ("Genres", show.genres.join(", ")),
            ("Status", show.status.clone()),
            ("Rating", rating),
            ("Runtime", runtime_text(show.runtime)),
        ],
    }
}

pub fn render_episode(episode: &Episode, placeholders: &Placeholders) -> Card<EpisodeId> {
    Card {
        id: episode.id,
        title: episode.label(),
        image: image_or(episode.image_url(), placeholders),
        summary: summary_text(episode.summary.as_deref()),
        details: vec![("Runtime", runtime_text(episode.runtime))],
    }
}

/// Derive a full surface from the complete collection and the visible subset.
pub fn surface<T: Renderable>(
    all: &[T],
    visible: &[&T],
    query: &str,
    selected: Option<T::Id>,
    placeholders: &Placeholders,
) -> Surface<T::Id> {
    let list = if visible.is_empty() {
        ListBody::Message(T::EMPTY_MESSAGE.to_string())
    } else {
        ListBody::Cards(visible.iter().map(|item| item.card(placeholders)).collect())
    };

    Surface {
        list,
        count: CountLabel::new(visible.len(), all.len(), T::SINGULAR, T::PLURAL),
        selector: selector(all, selected),
        query: query.to_string(),
    }
}

/// A surface whose list is replaced by `message`, e.g. while loading or after
/// a failed fetch.
pub fn message_surface<T: Renderable>(all: &[T], message: &str, query: &str) -> Surface<T::Id> {
    Surface {
        list: ListBody::Message(message.to_string()),
        count: CountLabel::new(0, all.len(), T::SINGULAR, T::PLURAL),
        selector: selector(all, None),
        query: query.to_string(),
    }
}

pub fn selector<T: Renderable>(all: &[T], selected: Option<T::Id>) -> Selector<T::Id> {
    Selector {
        sentinel: T::SENTINEL,
        options: all
            .iter()
            .map(|item| SelectorOption {
                value: item.id(),
                label: item.option_label(),
            })
            .collect(),
        selected,
    }
}

fn image_or(url: Option<&str>, placeholders: &Placeholders) -> String {
    url.unwrap_or(&placeholders.image).to_string()
}

fn runtime_text(runtime: Option<u32>) -> String {
    runtime
        .map(|m| format!("{} min", m))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn summary_text(summary: Option<&str>) -> String {
    let text = summary.map(html_to_text).unwrap_or_default();
    if text.is_empty() {
        NO_SUMMARY.to_string()
    } else {
        text
    }
}

/// Flatten TVmaze's summary markup to plain text.
///
/// # Examples
///
/// ```
/// use show_browser::view::html_to_text;
///
/// assert_eq!(html_to_text("<p>Tom &amp; <b>Jerry</b></p>"), "Tom & Jerry");
/// assert_eq!(html_to_text("<p>It&#8217;s Jerry&#x27;s</p>"), "It\u{2019}s Jerry's");
/// ```
pub fn html_to_text(html: &str) -> String {
    let broken = BLOCK_BREAK.replace_all(html, "\n");
    let stripped = TAG.replace_all(&broken, "");
    let named = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"");
    // &amp; last, so "&amp;#39;" stays literal.
    let decoded = decode_numeric_entities(&named).replace("&amp;", "&");

    decoded
        .lines()
        .map(|line| SPACES.replace_all(line.trim(), " ").into_owned())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decode `&#NNN;` and `&#xHH;`. Invalid code points are left as written.
fn decode_numeric_entities(text: &str) -> String {
    NUMERIC_ENTITY
        .replace_all(text, |caps: &Captures| {
            let code = match (caps.get(1), caps.get(2)) {
                (Some(dec), _) => dec.as_str().parse::<u32>().ok(),
                (None, Some(hex)) => u32::from_str_radix(hex.as_str(), 16).ok(),
                (None, None) => None,
            };
            match code.and_then(char::from_u32) {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Image, Rating};

    fn show(id: u64, name: &str) -> Show {
        Show {
            id: ShowId(id),
            name: name.to_string(),
            summary: Some("<p>A <i>very</i> good show.</p>".to_string()),
            genres: vec!["Drama".to_string(), "Crime".to_string()],
            status: "Ended".to_string(),
            rating: Rating { average: Some(9.2) },
            runtime: Some(60),
            image: Some(Image {
                medium: Some("https://img/medium.jpg".to_string()),
                original: None,
            }),
        }
    }

    fn bare_episode(id: u64) -> Episode {
        Episode {
            id: EpisodeId(id),
            name: "Pilot".to_string(),
            season: 1,
            number: 3,
            summary: Some("".to_string()),
            runtime: None,
            image: None,
        }
    }

    #[test]
    fn test_render_show_card() {
        let card = render_show(&show(1, "Breaking Bad"), &Placeholders::default());
        assert_eq!(card.title, "Breaking Bad");
        assert_eq!(card.image, "https://img/medium.jpg");
        assert_eq!(card.summary, "A very good show.");
        assert_eq!(card.details[0], ("Genres", "Drama, Crime".to_string()));
        assert_eq!(card.details[2], ("Rating", "9.2".to_string()));
        assert_eq!(card.details[3], ("Runtime", "60 min".to_string()));
    }

    #[test]
    fn test_render_episode_fallbacks() {
        let placeholders = Placeholders {
            image: "none.png".to_string(),
        };
        let card = render_episode(&bare_episode(1), &placeholders);
        assert_eq!(card.title, "Pilot - S01E03");
        assert_eq!(card.image, "none.png");
        assert_eq!(card.summary, NO_SUMMARY);
        assert_eq!(card.details, vec![("Runtime", NOT_AVAILABLE.to_string())]);
    }

    #[test]
    fn test_missing_rating_is_not_available() {
        let mut s = show(1, "X");
        s.rating = Rating::default();
        s.runtime = None;
        let card = render_show(&s, &Placeholders::default());
        assert_eq!(card.details[2].1, NOT_AVAILABLE);
        assert_eq!(card.details[3].1, NOT_AVAILABLE);
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(0, "episode", "episodes"), "episodes");
        assert_eq!(pluralize(1, "episode", "episodes"), "episode");
        assert_eq!(pluralize(2, "episode", "episodes"), "episodes");
    }

    #[test]
    fn test_count_label_zero() {
        let label = CountLabel::new(0, 0, "episode", "episodes");
        assert_eq!(label.to_string(), "0 episodes of 0 episodes");
    }

    #[test]
    fn test_count_label_nouns_follow_their_counts() {
        assert_eq!(
            CountLabel::new(1, 5, "episode", "episodes").to_string(),
            "1 episode of 5 episodes"
        );
        assert_eq!(
            CountLabel::new(2, 1, "show", "shows").to_string(),
            "2 shows of 1 show"
        );
    }

    #[test]
    fn test_empty_visible_renders_message() {
        let all = vec![show(1, "A")];
        let s = surface::<Show>(&all, &[], "zzz", None, &Placeholders::default());
        assert_eq!(s.list.message(), Some("No shows found."));
        assert_eq!(s.count.to_string(), "0 shows of 1 show");
        assert_eq!(s.selector.options.len(), 1);
        assert_eq!(s.query, "zzz");
    }

    #[test]
    fn test_selector_tracks_full_collection() {
        let all = vec![show(1, "A"), show(2, "B")];
        let visible = vec![&all[1]];
        let s = surface(&all, &visible, "", Some(ShowId(2)), &Placeholders::default());

        assert_eq!(s.list.cards().len(), 1);
        assert_eq!(s.selector.len(), 3);
        assert_eq!(s.selector.label(0), Some("Select a show..."));
        assert_eq!(s.selector.label(2), Some("B"));
        assert_eq!(s.selector.selected_index(), 2);
        assert_eq!(s.selector.value_at(0), Some(None));
        assert_eq!(s.selector.value_at(1), Some(Some(ShowId(1))));
        assert_eq!(s.selector.value_at(3), None);
    }

    #[test]
    fn test_episode_selector_labels_use_code() {
        let eps = vec![bare_episode(10)];
        let sel = selector(&eps, None);
        assert_eq!(sel.sentinel, "Select an episode...");
        assert_eq!(sel.options[0].label, "Pilot - S01E03");
        assert_eq!(sel.selected_index(), 0);
    }

    #[test]
    fn test_html_to_text_breaks_paragraphs() {
        let text = html_to_text("<p>First  line.</p><p>Second&nbsp;line<br/>third</p>");
        assert_eq!(text, "First line.\nSecond line\nthird");
    }

    #[test]
    fn test_html_to_text_numeric_entities() {
        assert_eq!(
            html_to_text("<p>Don&#8217;t &#x201C;panic&#X201D; &#39;now&#39;</p>"),
            "Don\u{2019}t \u{201C}panic\u{201D} 'now'"
        );
        assert_eq!(html_to_text("&amp;#39; stays"), "&#39; stays");
        assert_eq!(html_to_text("bad &#xD800; kept"), "bad &#xD800; kept");
    }

    #[test]
    fn test_html_only_markup_is_empty() {
        assert_eq!(summary_text(Some("<p></p>")), NO_SUMMARY);
        assert_eq!(summary_text(None), NO_SUMMARY);
    }
}
