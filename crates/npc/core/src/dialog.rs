//! Dialog documents shown when a click action opens a menu.
//!
//! Title, body, and button labels are templates: placeholder tokens are
//! resolved at send time against the viewing actor, never at load time.

use serde::{Deserialize, Serialize};

/// A named dialog loaded from one document in the dialogs directory.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogDescriptor {
    /// Dialog name; always the file stem, never stored inside the document.
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<ButtonDescriptor>,
}

impl DialogDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One dialog button: a label template plus what happens when it is pressed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonDescriptor {
    #[serde(default)]
    pub label: String,
    /// Command templates run in order when the button is pressed.
    #[serde(default)]
    pub commands: Vec<String>,
    /// Optional message template sent after the commands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Run the button's commands as the pressing actor instead of the server.
    #[serde(default)]
    pub as_actor: bool,
}
