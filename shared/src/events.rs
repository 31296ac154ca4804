use crate::coordinate::Coordinate;

/// Browser and map events the adapter reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiEvent {
    MarkerDragEnd(Coordinate),
    MapClick(Coordinate),
    FullscreenToggle,
    FullscreenChanged,
    DomReady,
}

/// Document-level fullscreen change events. Engines fire different names and
/// resize the viewport asynchronously, so every alias maps to the same event.
pub const FULLSCREEN_EVENTS: &[(&str, UiEvent)] = &[
    ("fullscreenchange", UiEvent::FullscreenChanged),
    ("webkitfullscreenchange", UiEvent::FullscreenChanged),
    ("mozfullscreenchange", UiEvent::FullscreenChanged),
    ("MSFullscreenChange", UiEvent::FullscreenChanged),
];

/// Element methods tried in order when entering fullscreen.
pub const REQUEST_FULLSCREEN_METHODS: &[&str] = &[
    "requestFullscreen",
    "webkitRequestFullscreen",
    "mozRequestFullScreen",
    "msRequestFullscreen",
];

/// Document methods tried in order when leaving fullscreen.
pub const EXIT_FULLSCREEN_METHODS: &[&str] = &[
    "exitFullscreen",
    "webkitExitFullscreen",
    "mozCancelFullScreen",
    "msExitFullscreen",
];

/// Document properties holding the current fullscreen element.
pub const FULLSCREEN_ELEMENT_PROPS: &[&str] = &[
    "fullscreenElement",
    "webkitFullscreenElement",
    "mozFullScreenElement",
    "msFullscreenElement",
];
