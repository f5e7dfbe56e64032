//! Declarative NPC definitions, one document per NPC.
//!
//! The definition name doubles as the file stem and the registry key; the
//! loader sets it from the path after deserializing, so the three are always
//! consistent.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Length of one server tick.
pub const TICK_DURATION: Duration = Duration::from_millis(50);

/// Everything needed to materialize and interact with one NPC.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NpcDefinition {
    /// Unique name; always the file stem, never stored inside the document.
    #[serde(skip)]
    pub name: String,
    /// Name-tag template, supports color codes and placeholders.
    #[serde(default = "defaults::display_name")]
    pub display_name: String,
    #[serde(default = "defaults::enabled")]
    pub show_name_tag: bool,
    /// Skin name; empty means the built-in default skin.
    #[serde(default)]
    pub skin: String,
    /// Cape name; empty means no cape.
    #[serde(default)]
    pub cape: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub held_item: Option<String>,
    #[serde(default = "defaults::enabled")]
    pub look_at_viewer: bool,
    #[serde(default = "defaults::scale")]
    pub scale: f64,
    /// Template shown below the name tag, refreshed periodically.
    #[serde(default)]
    pub score_tag: String,
    #[serde(default = "defaults::click_cooldown", rename = "click_cooldown")]
    pub click_cooldown_ticks: u32,
    // Tables last so the serialized document keeps scalar keys at the top.
    pub position: Anchor,
    #[serde(default)]
    pub armor: ArmorSlots,
    #[serde(default)]
    pub emote: EmoteSpec,
    /// Click actions, executed in order on every accepted interaction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionDefinition>,
}

impl NpcDefinition {
    /// Definition with defaults for everything but name and position.
    pub fn new(name: impl Into<String>, position: Anchor) -> Self {
        Self {
            name: name.into(),
            display_name: defaults::display_name(),
            show_name_tag: true,
            skin: String::new(),
            cape: String::new(),
            held_item: None,
            armor: ArmorSlots::default(),
            position,
            look_at_viewer: true,
            scale: defaults::scale(),
            score_tag: String::new(),
            emote: EmoteSpec::default(),
            click_cooldown_ticks: defaults::click_cooldown(),
            actions: Vec::new(),
        }
    }

    /// Click cooldown converted from ticks to wall-clock time.
    pub fn click_cooldown(&self) -> Duration {
        TICK_DURATION * self.click_cooldown_ticks
    }
}

/// Where an NPC stands: world name, position, and rotation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub world: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

/// Optional armor item references, one per slot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmorSlots {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helmet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chestplate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leggings: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boots: Option<String>,
}

impl ArmorSlots {
    pub fn is_empty(&self) -> bool {
        self.helmet.is_none()
            && self.chestplate.is_none()
            && self.leggings.is_none()
            && self.boots.is_none()
    }
}

/// Idle emote played on an interval while the NPC is spawned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmoteSpec {
    /// Emote identifier; empty disables the emote.
    #[serde(default)]
    pub id: String,
    #[serde(default = "defaults::emote_interval", rename = "interval")]
    pub interval_ticks: u64,
}

impl EmoteSpec {
    pub fn is_enabled(&self) -> bool {
        !self.id.is_empty() && self.interval_ticks > 0
    }
}

impl Default for EmoteSpec {
    fn default() -> Self {
        Self {
            id: String::new(),
            interval_ticks: defaults::emote_interval(),
        }
    }
}

/// One click action: what to do and on whose behalf.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub kind: ActionKind,
    /// Command template, dialog name, or message template depending on kind.
    #[serde(default)]
    pub value: String,
    /// Execute as the clicking actor instead of the server (commands only).
    #[serde(default)]
    pub as_actor: bool,
}

/// The three executable behaviors a click action can resolve to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActionKind {
    Command,
    Dialog,
    Message,
}

mod defaults {
    pub(super) fn display_name() -> String {
        "NPC".to_owned()
    }

    pub(super) fn enabled() -> bool {
        true
    }

    pub(super) fn scale() -> f64 {
        1.0
    }

    pub(super) fn click_cooldown() -> u32 {
        20
    }

    pub(super) fn emote_interval() -> u64 {
        100
    }
}
