//! Event model - a hosted tournament

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A closed set of form choices stored by their label
pub trait Choice: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == value)
    }
}

/// Tier of a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Community,
    Amateur,
    College,
    Pro,
}

impl Choice for Category {
    const ALL: &'static [Self] = &[
        Category::Community,
        Category::Amateur,
        Category::College,
        Category::Pro,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Category::Community => "Community",
            Category::Amateur => "Amateur",
            Category::College => "College",
            Category::Pro => "Pro",
        }
    }
}

/// Server region or venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "OCE")]
    Oce,
    #[serde(rename = "NA-Central")]
    NaCentral,
    #[serde(rename = "NA-East")]
    NaEast,
    #[serde(rename = "EU")]
    Eu,
    #[serde(rename = "ASIA")]
    Asia,
    /// In-person
    #[serde(rename = "LAN")]
    Lan,
}

impl Choice for Region {
    const ALL: &'static [Self] = &[
        Region::Oce,
        Region::NaCentral,
        Region::NaEast,
        Region::Eu,
        Region::Asia,
        Region::Lan,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Region::Oce => "OCE",
            Region::NaCentral => "NA-Central",
            Region::NaEast => "NA-East",
            Region::Eu => "EU",
            Region::Asia => "ASIA",
            Region::Lan => "LAN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSize {
    Solo,
    Duo,
    Trio,
    Squad,
}

impl Choice for TeamSize {
    const ALL: &'static [Self] = &[TeamSize::Solo, TeamSize::Duo, TeamSize::Trio, TeamSize::Squad];

    fn as_str(&self) -> &'static str {
        match self {
            TeamSize::Solo => "Solo",
            TeamSize::Duo => "Duo",
            TeamSize::Trio => "Trio",
            TeamSize::Squad => "Squad",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    #[serde(rename = "Battle Royale")]
    BattleRoyale,
    #[serde(rename = "Zero Build")]
    ZeroBuild,
    Reload,
    Creative,
}

impl Choice for GameMode {
    const ALL: &'static [Self] = &[
        GameMode::BattleRoyale,
        GameMode::ZeroBuild,
        GameMode::Reload,
        GameMode::Creative,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            GameMode::BattleRoyale => "Battle Royale",
            GameMode::ZeroBuild => "Zero Build",
            GameMode::Reload => "Reload",
            GameMode::Creative => "Creative",
        }
    }
}

/// Lifecycle status. Only cancel and reopen move between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventStatus {
    Open,
    Cancelled,
}

impl Choice for EventStatus {
    const ALL: &'static [Self] = &[EventStatus::Open, EventStatus::Cancelled];

    fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Open => "Open",
            EventStatus::Cancelled => "Cancelled",
        }
    }
}

/// Raw event form input, exactly as submitted
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventForm {
    pub title: String,
    pub category: String,
    pub region: String,
    pub date: String,
    pub time: String,
    pub team_size: String,
    pub mode: String,
    pub prize: String,
    pub description: String,
    pub banner_url: String,
}

/// Validated event fields, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub category: Category,
    pub region: Region,
    pub team_size: TeamSize,
    pub mode: GameMode,
    pub prize: Option<String>,
    pub description: Option<String>,
    /// External banner link; an uploaded file takes precedence
    pub banner_url: Option<String>,
    pub start_at: NaiveDateTime,
}

/// A tournament hosted by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub host_id: Uuid,
    pub title: String,
    pub category: Category,
    pub region: Region,
    pub team_size: TeamSize,
    pub mode: GameMode,
    pub prize: Option<String>,
    pub description: Option<String>,
    /// Relative path under the uploads directory, or an external URL
    pub banner: Option<String>,
    pub start_at: NaiveDateTime,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(host_id: Uuid, draft: EventDraft, banner: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            host_id,
            title: draft.title,
            category: draft.category,
            region: draft.region,
            team_size: draft.team_size,
            mode: draft.mode,
            prize: draft.prize,
            description: draft.description,
            banner,
            start_at: draft.start_at,
            status: EventStatus::Open,
            created_at: Utc::now(),
        }
    }

    /// Overwrite the editable fields. Status and host are untouched.
    pub fn apply(&mut self, draft: EventDraft) {
        self.title = draft.title;
        self.category = draft.category;
        self.region = draft.region;
        self.team_size = draft.team_size;
        self.mode = draft.mode;
        self.prize = draft.prize;
        self.description = draft.description;
        self.start_at = draft.start_at;
    }

    pub fn is_hosted_by(&self, user_id: Uuid) -> bool {
        self.host_id == user_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == EventStatus::Cancelled
    }
}

/// Path of the public details page for an event id
pub fn details_path(event_id: Uuid) -> String {
    format!("/events/{}", event_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choices_parse_by_label() {
        assert_eq!(Region::parse("NA-Central"), Some(Region::NaCentral));
        assert_eq!(GameMode::parse("Zero Build"), Some(GameMode::ZeroBuild));
        assert_eq!(Category::parse("Professional"), None);
        assert_eq!(TeamSize::parse("duo"), None);
    }

    #[test]
    fn test_serde_names_match_labels() {
        use serde::de::value::{Error as DeError, StrDeserializer};
        use serde::de::IntoDeserializer;

        for region in Region::ALL {
            let de: StrDeserializer<'_, DeError> = region.as_str().into_deserializer();
            assert_eq!(Region::deserialize(de).unwrap(), *region);
        }
        for mode in GameMode::ALL {
            let de: StrDeserializer<'_, DeError> = mode.as_str().into_deserializer();
            assert_eq!(GameMode::deserialize(de).unwrap(), *mode);
        }
    }
}
