//! fOS i18n - In-context translation overlay
//!
//! Keeps a live index from document elements to the translation keys bound
//! to their text and attribute nodes, so an overlay can highlight
//! translatable regions and report clicks on them.
//!
//! Features:
//! - Element registry with incremental cleanup on mutation batches
//! - Sweep for detached key-only attribute markers
//! - Key/namespace lookup across tracked elements
//! - Outline highlighting and modifier-key click handling

pub mod descriptor;
pub mod highlighter;
pub mod meta;
pub mod mouse;
pub mod options;
pub mod registry;
pub mod store;

pub use descriptor::{compare_descriptors, resolve_ns, KeyDescriptor, NsFallback};
pub use highlighter::ElementHighlighter;
pub use meta::{ActiveHighlight, ElementMeta, HighlightStyle, KeyBinding, NodeMeta};
pub use mouse::MouseEventHandler;
pub use options::{ModifierKey, ObserverOptions};
pub use registry::{removed_nodes, ElementRegistry, TranslationClick};
pub use store::ElementStore;

use fos_dom::{DomError, NodeId};

/// Marker written on every tracked element
pub const I18N_ATTRIBUTE_NAME: &str = "_i18n";

/// Synthetic attribute carrying key-only bindings, tracked as its own node
pub const I18N_WRAPPED_ONLY_DATA_ATTRIBUTE: &str = "data-i18n-key-only";

/// Elements inside a subtree carrying this attribute are never tracked
pub const I18N_RESTRICT_ATTRIBUTE: &str = "data-i18n-restricted";

/// Marks highlight overlay elements
pub const I18N_HIGHLIGHTER_ATTRIBUTE: &str = "data-i18n-highlighter";

/// i18n overlay error
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    #[error("Element {0} carries the tracking marker but has no metadata")]
    UntrackedElement(NodeId),

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}
