use serde::{Deserialize, Serialize};

use crate::foundation::error::{SlideError, SlideResult};

/// Narrative role of a slide within a story.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    Hook,
    Problem,
    Solution,
    Cta,
}

impl SlideKind {
    /// Canonical story order.
    pub const CANONICAL: [SlideKind; 4] = [
        SlideKind::Hook,
        SlideKind::Problem,
        SlideKind::Solution,
        SlideKind::Cta,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SlideKind::Hook => "hook",
            SlideKind::Problem => "problem",
            SlideKind::Solution => "solution",
            SlideKind::Cta => "cta",
        }
    }

    /// Archive base name for this kind (`hook-slide`, ...).
    pub fn base_filename(self) -> &'static str {
        match self {
            SlideKind::Hook => "hook-slide",
            SlideKind::Problem => "problem-slide",
            SlideKind::Solution => "solution-slide",
            SlideKind::Cta => "cta-slide",
        }
    }
}

impl std::fmt::Display for SlideKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One slide's copy. Immutable once produced by the copy generator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlideContent {
    #[serde(rename = "type")]
    pub kind: SlideKind,
    pub text: String,
}

impl SlideContent {
    pub fn new(kind: SlideKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// The four-slide sequence hook → problem → solution → cta.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SlideContent>", into = "Vec<SlideContent>")]
pub struct Story {
    slides: Vec<SlideContent>,
}

impl Story {
    pub const LEN: usize = 4;

    /// Build a story from exactly four slides. Order is not enforced here; see
    /// [`Story::is_canonical_order`].
    pub fn new(slides: Vec<SlideContent>) -> SlideResult<Self> {
        if slides.len() != Self::LEN {
            return Err(SlideError::validation(format!(
                "a story has exactly {} slides, got {}",
                Self::LEN,
                slides.len()
            )));
        }
        Ok(Self { slides })
    }

    /// Content used when the copy generator is unavailable.
    pub fn fallback(app_name: &str, hook: &str) -> Self {
        Self {
            slides: vec![
                SlideContent::new(SlideKind::Hook, hook),
                SlideContent::new(SlideKind::Problem, "Tired of complicated solutions?"),
                SlideContent::new(
                    SlideKind::Solution,
                    format!("{app_name} makes it simple and fast"),
                ),
                SlideContent::new(SlideKind::Cta, format!("Download {app_name} today")),
            ],
        }
    }

    pub fn slides(&self) -> &[SlideContent] {
        &self.slides
    }

    pub fn is_canonical_order(&self) -> bool {
        self.slides
            .iter()
            .map(|s| s.kind)
            .eq(SlideKind::CANONICAL.iter().copied())
    }
}

impl TryFrom<Vec<SlideContent>> for Story {
    type Error = SlideError;

    fn try_from(slides: Vec<SlideContent>) -> Result<Self, Self::Error> {
        Self::new(slides)
    }
}

impl From<Story> for Vec<SlideContent> {
    fn from(story: Story) -> Self {
        story.slides
    }
}
