// DOM and logging constants for the web front-end.

// Canvas overlay appended to the attachment element
pub const CANVAS_CLASS: &str = "audio_spectrum";
pub const CANVAS_STYLE: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("top", "0px"),
    ("left", "0px"),
    ("width", "100%"),
    ("height", "100%"),
    ("border-radius", "inherit"),
    ("z-index", "0"),
    ("pointer-events", "none"),
];

// Host controls stay clickable above the canvas
pub const CONTROL_Z_INDEX: &str = "1";

// Smallest backing store we will allocate, in device pixels
pub const MIN_CANVAS_PX: u32 = 1;

pub const LOG_LEVEL: log::Level = log::Level::Info;
