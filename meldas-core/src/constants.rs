//! Protocol selector constants
//!
//! Raw argument values the driver's remote calls expect. Grouped by the
//! call family they belong to.

/// Machine type selector for `open_unit`: machining-center MELDAS
/// 700-series (M700/M700V/M70/M70V).
pub const MACHINE_TYPE_MACHINING_CENTER: i32 = 6;

/// Timeout argument for `open_unit`, in 100 ms units.
pub const OPEN_TIMEOUT: i32 = 30;

/// Host-name token the driver expects for a local automation connection.
pub const LOCAL_HOST_NAME: &str = "EZNC_LOCALHOST";

/// Bytes requested per chunk when reading NC program files. A chunk
/// shorter than this (zero included) marks end of file.
pub const FILE_CHUNK_SIZE: usize = 256;

/// Number of unit-number slots; valid unit numbers are 1..=255.
pub const UNIT_POOL_SIZE: usize = 255;

/// Drive token a caller may use to refer to the session's own unit.
/// Rewritten to `M<unit in 2-digit hex>:` before directory scans.
pub const OWN_UNIT_PREFIX: &str = "M01:";

/// Run-status query kind: "is automatic operation in progress"
pub const RUN_STATUS_AUTO_QUERY: i32 = 1;

/// Spindle monitor selectors
pub mod spindle {
    /// Rotation speed (SR/SF), rpm
    pub const SPEED: i32 = 2;

    /// Motor load, percent
    pub const LOAD: i32 = 3;

    /// The first (and only queried) spindle
    pub const SPINDLE_NO: i32 = 1;
}

/// Tool-offset selectors
pub mod tool_offset {
    /// Machining-center type II offset layout
    pub const TYPE_2: i32 = 4;

    /// Length offset
    pub const LENGTH: i32 = 0;

    /// Length wear offset
    pub const LENGTH_WEAR: i32 = 1;

    /// Radius offset
    pub const RADIUS: i32 = 2;

    /// Radius wear offset
    pub const RADIUS_WEAR: i32 = 3;
}

/// Magazine query selectors
pub mod magazine {
    /// Magazine number; ignored by 700/800-series but still required
    pub const MAGAZINE_NO: i32 = 1;

    /// Standby selector 0: the mounted tool
    pub const MOUNTED: i32 = 0;
}

/// Directory scan field selectors
pub mod find_fields {
    /// Folder scan: `name\tsize` records
    pub const NAME_SIZE: i32 = -1;

    /// File scan: `name\tsize\tcomment` records
    pub const FULL: i32 = 5;
}

/// Alarm query selectors
pub mod alarm {
    /// Message lines to fetch (1..=10)
    pub const LINES: i32 = 3;

    /// Alarm type 0: all alarms
    pub const TYPE_ALL: i32 = 0;
}

/// Version query selectors
pub mod version {
    /// Version of the NC system proper
    pub const KIND_NC: i32 = 1;

    /// Main unit
    pub const UNIT_MAIN: i32 = 0;
}
