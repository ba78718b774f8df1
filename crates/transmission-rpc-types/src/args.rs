//! Argument and field names understood by the daemon, with the JSON type each one expects.
//!
//! The tables here are used by the per-method client wrappers to reject bad arguments before a
//! request is sent. The session engine itself never looks at them.

use std::fmt;

use serde_json::Value;

/// JSON type of an argument value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean,
    /// A number without a fractional part.
    Integer,
    /// Any number. An expected `Number` also accepts integers.
    Number,
    /// A string.
    String,
    /// An array.
    Array,
    /// An object.
    Object,
}

impl ValueKind {
    /// Classifies a JSON value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Whether a value of this kind is acceptable where `self` is expected.
    pub fn accepts(self, value: &Value) -> bool {
        let actual = Self::of(value);
        actual == self || (self == Self::Number && actual == Self::Integer)
    }

    /// Lowercase name, as used in error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed argument descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArgumentSpec {
    /// Wire name.
    pub name: &'static str,
    /// Expected JSON type.
    pub kind: ValueKind,
}

impl ArgumentSpec {
    const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self { name, kind }
    }

    /// Whether `value` has the expected type.
    pub fn accepts(&self, value: &Value) -> bool {
        self.kind.accepts(value)
    }
}

/// Looks up an argument by wire name.
pub fn find(table: &[ArgumentSpec], name: &str) -> Option<ArgumentSpec> {
    table.iter().find(|spec| spec.name == name).copied()
}

use ValueKind::{Array, Boolean, Integer, Number, Object, String};

/// Argument common to most torrent methods.
pub const IDS: &str = "ids";

/// `torrent-add` arguments.
pub mod torrent_add {
    use super::*;

    #[allow(missing_docs)]
    pub const COOKIES: &str = "cookies";
    #[allow(missing_docs)]
    pub const DOWNLOAD_DIR: &str = "download-dir";
    #[allow(missing_docs)]
    pub const FILENAME: &str = "filename";
    #[allow(missing_docs)]
    pub const METAINFO: &str = "metainfo";
    #[allow(missing_docs)]
    pub const PAUSED: &str = "paused";
    #[allow(missing_docs)]
    pub const PEER_LIMIT: &str = "peer-limit";
    #[allow(missing_docs)]
    pub const BANDWIDTH_PRIORITY: &str = "bandwidthPriority";
    #[allow(missing_docs)]
    pub const FILES_WANTED: &str = "files-wanted";
    #[allow(missing_docs)]
    pub const FILES_UNWANTED: &str = "files-unwanted";
    #[allow(missing_docs)]
    pub const PRIORITY_HIGH: &str = "priority-high";
    #[allow(missing_docs)]
    pub const PRIORITY_LOW: &str = "priority-low";
    #[allow(missing_docs)]
    pub const PRIORITY_NORMAL: &str = "priority-normal";

    /// Response field holding the newly added torrent.
    pub const TORRENT_ADDED: &str = "torrent-added";
    /// Response field holding the already present torrent.
    pub const TORRENT_DUPLICATE: &str = "torrent-duplicate";

    /// One of these must be present.
    pub const SOURCES: &[&str] = &[FILENAME, METAINFO];

    /// Every accepted argument.
    pub const ARGUMENTS: &[ArgumentSpec] = &[
        ArgumentSpec::new(COOKIES, String),
        ArgumentSpec::new(DOWNLOAD_DIR, String),
        ArgumentSpec::new(FILENAME, String),
        ArgumentSpec::new(METAINFO, String),
        ArgumentSpec::new(PAUSED, Boolean),
        ArgumentSpec::new(PEER_LIMIT, Integer),
        ArgumentSpec::new(BANDWIDTH_PRIORITY, Integer),
        ArgumentSpec::new(FILES_WANTED, Array),
        ArgumentSpec::new(FILES_UNWANTED, Array),
        ArgumentSpec::new(PRIORITY_HIGH, Array),
        ArgumentSpec::new(PRIORITY_LOW, Array),
        ArgumentSpec::new(PRIORITY_NORMAL, Array),
    ];
}

/// `torrent-set` arguments. `ids` is passed separately.
///
/// An empty array for `files-wanted`, `files-unwanted` or the `priority-*` arguments means
/// "all files".
pub mod torrent_set {
    use super::*;

    #[allow(missing_docs)]
    pub const BANDWIDTH_PRIORITY: &str = "bandwidthPriority";
    #[allow(missing_docs)]
    pub const DOWNLOAD_LIMIT: &str = "downloadLimit";
    #[allow(missing_docs)]
    pub const DOWNLOAD_LIMITED: &str = "downloadLimited";
    #[allow(missing_docs)]
    pub const FILES_WANTED: &str = "files-wanted";
    #[allow(missing_docs)]
    pub const FILES_UNWANTED: &str = "files-unwanted";
    #[allow(missing_docs)]
    pub const HONORS_SESSION_LIMITS: &str = "honorsSessionLimits";
    #[allow(missing_docs)]
    pub const LOCATION: &str = "location";
    #[allow(missing_docs)]
    pub const PEER_LIMIT: &str = "peer-limit";
    #[allow(missing_docs)]
    pub const PRIORITY_HIGH: &str = "priority-high";
    #[allow(missing_docs)]
    pub const PRIORITY_LOW: &str = "priority-low";
    #[allow(missing_docs)]
    pub const PRIORITY_NORMAL: &str = "priority-normal";
    #[allow(missing_docs)]
    pub const QUEUE_POSITION: &str = "queuePosition";
    #[allow(missing_docs)]
    pub const SEED_IDLE_LIMIT: &str = "seedIdleLimit";
    #[allow(missing_docs)]
    pub const SEED_IDLE_MODE: &str = "seedIdleMode";
    #[allow(missing_docs)]
    pub const SEED_RATIO_LIMIT: &str = "seedRatioLimit";
    #[allow(missing_docs)]
    pub const SEED_RATIO_MODE: &str = "seedRatioMode";
    #[allow(missing_docs)]
    pub const TRACKER_ADD: &str = "trackerAdd";
    #[allow(missing_docs)]
    pub const TRACKER_REMOVE: &str = "trackerRemove";
    #[allow(missing_docs)]
    pub const TRACKER_REPLACE: &str = "trackerReplace";
    #[allow(missing_docs)]
    pub const UPLOAD_LIMIT: &str = "uploadLimit";
    #[allow(missing_docs)]
    pub const UPLOAD_LIMITED: &str = "uploadLimited";

    /// Every accepted argument.
    pub const ARGUMENTS: &[ArgumentSpec] = &[
        ArgumentSpec::new(BANDWIDTH_PRIORITY, Integer),
        ArgumentSpec::new(DOWNLOAD_LIMIT, Integer),
        ArgumentSpec::new(DOWNLOAD_LIMITED, Boolean),
        ArgumentSpec::new(FILES_WANTED, Array),
        ArgumentSpec::new(FILES_UNWANTED, Array),
        ArgumentSpec::new(HONORS_SESSION_LIMITS, Boolean),
        ArgumentSpec::new(LOCATION, String),
        ArgumentSpec::new(PEER_LIMIT, Integer),
        ArgumentSpec::new(PRIORITY_HIGH, Array),
        ArgumentSpec::new(PRIORITY_LOW, Array),
        ArgumentSpec::new(PRIORITY_NORMAL, Array),
        ArgumentSpec::new(QUEUE_POSITION, Integer),
        ArgumentSpec::new(SEED_IDLE_LIMIT, Integer),
        ArgumentSpec::new(SEED_IDLE_MODE, Integer),
        ArgumentSpec::new(SEED_RATIO_LIMIT, Number),
        ArgumentSpec::new(SEED_RATIO_MODE, Integer),
        ArgumentSpec::new(TRACKER_ADD, Array),
        ArgumentSpec::new(TRACKER_REMOVE, Array),
        ArgumentSpec::new(TRACKER_REPLACE, Array),
        ArgumentSpec::new(UPLOAD_LIMIT, Integer),
        ArgumentSpec::new(UPLOAD_LIMITED, Boolean),
    ];
}

/// `torrent-get` field names and response keys.
pub mod torrent_get {
    #[allow(missing_docs)]
    pub const ID: &str = "id";
    #[allow(missing_docs)]
    pub const NAME: &str = "name";
    #[allow(missing_docs)]
    pub const STATUS: &str = "status";
    #[allow(missing_docs)]
    pub const HASH_STRING: &str = "hashString";
    #[allow(missing_docs)]
    pub const TOTAL_SIZE: &str = "totalSize";
    #[allow(missing_docs)]
    pub const PERCENT_DONE: &str = "percentDone";
    #[allow(missing_docs)]
    pub const DOWNLOAD_DIR: &str = "downloadDir";
    #[allow(missing_docs)]
    pub const ERROR_STRING: &str = "errorString";

    /// Request argument listing the wanted fields.
    pub const FIELDS: &str = "fields";
    /// Response field holding the torrent list.
    pub const TORRENTS: &str = "torrents";
}

/// `torrent-remove` arguments.
pub mod torrent_remove {
    #[allow(missing_docs)]
    pub const DELETE_LOCAL_DATA: &str = "delete-local-data";
}

/// `torrent-set-location` arguments.
pub mod torrent_set_location {
    #[allow(missing_docs)]
    pub const LOCATION: &str = "location";
    #[allow(missing_docs)]
    pub const MOVE: &str = "move";
}

/// `torrent-rename-path` arguments.
pub mod torrent_rename_path {
    #[allow(missing_docs)]
    pub const PATH: &str = "path";
    #[allow(missing_docs)]
    pub const NAME: &str = "name";
}

/// Session settings, as read by `session-get` and written by `session-set`.
pub mod session {
    use super::*;

    /// Settings that `session-set` accepts.
    pub const SETTINGS: &[ArgumentSpec] = &[
        ArgumentSpec::new("alt-speed-down", Integer),
        ArgumentSpec::new("alt-speed-enabled", Boolean),
        ArgumentSpec::new("alt-speed-time-begin", Integer),
        ArgumentSpec::new("alt-speed-time-enabled", Boolean),
        ArgumentSpec::new("alt-speed-time-end", Integer),
        ArgumentSpec::new("alt-speed-time-day", Integer),
        ArgumentSpec::new("alt-speed-up", Integer),
        ArgumentSpec::new("blocklist-url", String),
        ArgumentSpec::new("blocklist-enabled", Boolean),
        ArgumentSpec::new("cache-size-mb", Integer),
        ArgumentSpec::new("download-dir", String),
        ArgumentSpec::new("download-queue-size", Integer),
        ArgumentSpec::new("download-queue-enabled", Boolean),
        ArgumentSpec::new("dht-enabled", Boolean),
        ArgumentSpec::new("encryption", String),
        ArgumentSpec::new("idle-seeding-limit", Integer),
        ArgumentSpec::new("idle-seeding-limit-enabled", Boolean),
        ArgumentSpec::new("incomplete-dir", String),
        ArgumentSpec::new("incomplete-dir-enabled", Boolean),
        ArgumentSpec::new("lpd-enabled", Boolean),
        ArgumentSpec::new("peer-limit-global", Integer),
        ArgumentSpec::new("peer-limit-per-torrent", Integer),
        ArgumentSpec::new("pex-enabled", Boolean),
        ArgumentSpec::new("peer-port", Integer),
        ArgumentSpec::new("peer-port-random-on-start", Boolean),
        ArgumentSpec::new("port-forwarding-enabled", Boolean),
        ArgumentSpec::new("queue-stalled-enabled", Boolean),
        ArgumentSpec::new("queue-stalled-minutes", Integer),
        ArgumentSpec::new("rename-partial-files", Boolean),
        ArgumentSpec::new("script-torrent-done-filename", String),
        ArgumentSpec::new("script-torrent-done-enabled", Boolean),
        ArgumentSpec::new("seedRatioLimit", Number),
        ArgumentSpec::new("seedRatioLimited", Boolean),
        ArgumentSpec::new("seed-queue-size", Integer),
        ArgumentSpec::new("seed-queue-enabled", Boolean),
        ArgumentSpec::new("speed-limit-down", Integer),
        ArgumentSpec::new("speed-limit-down-enabled", Boolean),
        ArgumentSpec::new("speed-limit-up", Integer),
        ArgumentSpec::new("speed-limit-up-enabled", Boolean),
        ArgumentSpec::new("start-added-torrents", Boolean),
        ArgumentSpec::new("trash-original-torrent-files", Boolean),
        ArgumentSpec::new("utp-enabled", Boolean),
    ];

    /// Settings `session-get` reports but `session-set` rejects.
    pub const READ_ONLY: &[ArgumentSpec] = &[
        ArgumentSpec::new(BLOCKLIST_SIZE, Integer),
        ArgumentSpec::new("config-dir", String),
        ArgumentSpec::new("rpc-version", Integer),
        ArgumentSpec::new("rpc-version-minimum", Integer),
        ArgumentSpec::new("version", String),
        ArgumentSpec::new("units", Object),
    ];

    /// Size of the blocklist, also the payload of `blocklist-update`.
    pub const BLOCKLIST_SIZE: &str = "blocklist-size";
    /// `port-test` response field.
    pub const PORT_IS_OPEN: &str = "port-is-open";
}

/// `session-stats` response keys.
pub mod session_stats {
    #[allow(missing_docs)]
    pub const ACTIVE_TORRENT_COUNT: &str = "activeTorrentCount";
    #[allow(missing_docs)]
    pub const DOWNLOAD_SPEED: &str = "downloadSpeed";
    #[allow(missing_docs)]
    pub const PAUSED_TORRENT_COUNT: &str = "pausedTorrentCount";
    #[allow(missing_docs)]
    pub const TORRENT_COUNT: &str = "torrentCount";
    #[allow(missing_docs)]
    pub const UPLOAD_SPEED: &str = "uploadSpeed";
    #[allow(missing_docs)]
    pub const CUMULATIVE_STATS: &str = "cumulative-stats";
    #[allow(missing_docs)]
    pub const CURRENT_STATS: &str = "current-stats";
}

/// `free-space` arguments and response keys.
pub mod free_space {
    #[allow(missing_docs)]
    pub const PATH: &str = "path";
    #[allow(missing_docs)]
    pub const SIZE_BYTES: &str = "size-bytes";
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn number_accepts_integers_but_not_the_reverse() {
        assert!(Number.accepts(&json!(2)));
        assert!(Number.accepts(&json!(2.5)));
        assert!(Integer.accepts(&json!(2)));
        assert!(!Integer.accepts(&json!(2.5)));
    }

    #[test]
    fn lookup_by_name() {
        let spec = find(torrent_set::ARGUMENTS, "downloadLimit").unwrap();
        assert_eq!(spec.kind, Integer);
        assert!(spec.accepts(&json!(200)));
        assert!(!spec.accepts(&json!("200")));
        assert!(find(torrent_set::ARGUMENTS, "ids").is_none());
    }

    #[test]
    fn read_only_settings_are_not_settable() {
        for spec in session::READ_ONLY {
            assert!(find(session::SETTINGS, spec.name).is_none(), "{}", spec.name);
        }
    }

    #[test]
    fn kinds_of_values() {
        assert_eq!(ValueKind::of(&json!(null)), ValueKind::Null);
        assert_eq!(ValueKind::of(&json!(true)), Boolean);
        assert_eq!(ValueKind::of(&json!({})), Object);
        assert_eq!(ValueKind::of(&json!([])), Array);
        assert_eq!(ValueKind::of(&json!("a")), String);
    }
}
