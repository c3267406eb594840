//! Focus and selection models for item views.
//!
//! Models hold which items are focused or selected and nothing else: they
//! read items through an [`ItemSource`] owned by the control and publish
//! their state through observable properties, so skins can render it and
//! behaviors can drive it.
//!
//! # Key Types
//!
//! - [`FocusModel`] - the focused index and item
//! - [`SingleSelectionModel`] - at most one selected index
//! - [`MultipleSelectionModel`] - any number of selected indices, with a
//!   [`SelectionMode`] switch
//! - [`TablePosition`] / [`TreeTablePosition`] - cell positions resolved
//!   through a [`PositionResolver`]

mod focus;
mod multiple_selection;
mod position;
mod single_selection;
mod source;

pub use focus::FocusModel;
pub use multiple_selection::{MultipleSelectionModel, SelectionMode};
pub use position::{ColumnId, PositionResolver, TablePosition, TableRegistry, TreeTablePosition, ViewId};
pub use single_selection::SingleSelectionModel;
pub use source::ItemSource;
