use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of actions the assistant is allowed to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    FileOpen,
    FileRename,
    FileMove,
    FileDelete,
    FileCreateFolder,
    SystemLaunch,
    SystemOpenPath,
    SystemOpenUrl,
}

impl ActionKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "file.open" => Some(Self::FileOpen),
            "file.rename" => Some(Self::FileRename),
            "file.move" => Some(Self::FileMove),
            "file.delete" => Some(Self::FileDelete),
            "file.create_folder" => Some(Self::FileCreateFolder),
            "system.launch" => Some(Self::SystemLaunch),
            "system.open_path" => Some(Self::SystemOpenPath),
            "system.open_url" => Some(Self::SystemOpenUrl),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::FileOpen => "file.open",
            Self::FileRename => "file.rename",
            Self::FileMove => "file.move",
            Self::FileDelete => "file.delete",
            Self::FileCreateFolder => "file.create_folder",
            Self::SystemLaunch => "system.launch",
            Self::SystemOpenPath => "system.open_path",
            Self::SystemOpenUrl => "system.open_url",
        }
    }

    pub fn all() -> &'static [ActionKind] {
        &[
            Self::FileOpen,
            Self::FileRename,
            Self::FileMove,
            Self::FileDelete,
            Self::FileCreateFolder,
            Self::SystemLaunch,
            Self::SystemOpenPath,
            Self::SystemOpenUrl,
        ]
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Map the loose action names models actually emit onto the canonical
/// dotted names. Unrecognized names pass through lower-cased; the
/// safety gate denies them later.
pub fn canonical_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let mapped = match lowered.as_str() {
        "openurl" | "open-web" | "open_url" | "browser.open" | "web.open" => "system.open_url",
        "launch" | "start_app" | "run" | "open_app" => "system.launch",
        "open" | "openfile" => "file.open",
        "delete" | "remove" | "file.remove" => "file.delete",
        "rename" => "file.rename",
        "move" => "file.move",
        "mkdir" | "create_folder" | "new_folder" => "file.create_folder",
        "open_path" | "open_folder" => "system.open_path",
        other => other,
    };
    mapped.to_string()
}
