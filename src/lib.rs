//! Chainable convenience layer over a deterministic in-process document host.
//!
//! [`Host`] owns a lightweight document environment: an arena DOM, a CSS
//! selector engine, listener dispatch with capture and bubble phases, batched
//! mutation observation, an explicitly pumped animation-frame queue, and a
//! mock-handler-backed network layer. [`ElementHandle`] wraps exactly one
//! node of one host and exposes the fluent surface: chainable mutators return
//! `&Self`, node-producing methods return new handles or raw [`NodeId`]s.
//!
//! Nothing runs on wall-clock time. Frames, observer deliveries, and pending
//! requests advance only when pumped through [`Host::run_frame`],
//! [`Host::deliver_mutations`], [`Host::run_pending_requests`], or
//! [`Host::flush`].
//!
//! ```
//! use domglue::Host;
//!
//! let host = Host::from_html("<div id='panel' class='box'>hi</div>")?;
//! let panel = host.select("#panel")?;
//! panel.add_class("open").css("color: red; font-size: 1em;");
//! assert!(panel.has_class("open"));
//! assert_eq!(panel.style("color"), "red");
//! # Ok::<(), domglue::Error>(())
//! ```

use std::error::Error as StdError;
use std::fmt;

mod anim;
mod dom;
mod events;
mod handle;
mod host;
mod html;
mod net;
mod observer;
mod selector;

pub use anim::{AnimationHandle, Collapsible, CollapsibleOptions, FadePhase};
pub use dom::NodeId;
pub use events::{Event, EventCallback, SwipeDirection, TouchPoint, callback};
pub use handle::ElementHandle;
pub use host::Host;
pub use net::{
    AjaxBody, AjaxError, AjaxOptions, AjaxRequest, AjaxResponse, AjaxResult, ReadyState,
};
pub use observer::{
    MutationKind, MutationRecord, ObserveOptions, ObserverCallback, observer_callback,
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    InvalidSelector(String),
    UnsupportedSelector(String),
    UnsupportedCheck(String),
    SelectorNotFound(String),
    Structure(String),
    Regex(String),
    FlushStepLimit {
        limit: usize,
        steps: usize,
        pending: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::InvalidSelector(msg) => write!(f, "invalid selector: {msg}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::UnsupportedCheck(name) => write!(f, "unsupported check: {name}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::Structure(msg) => write!(f, "structure error: {msg}"),
            Self::Regex(msg) => write!(f, "regex error: {msg}"),
            Self::FlushStepLimit {
                limit,
                steps,
                pending,
            } => write!(
                f,
                "flush exceeded max steps (possible unstopped animation or observer loop): limit={limit}, steps={steps}, pending={pending}"
            ),
        }
    }
}

impl StdError for Error {}
