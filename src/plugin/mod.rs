//! Cell plugins: renderers, editors and value transformers.
//!
//! Columns refer to plugins by name. The [`PluginRegistry`] maps names to
//! factories; every mounted cell gets fresh renderer and editor instances,
//! while transformers are stateless and shared.

mod element;
mod transform;

pub use element::Element;
pub use transform::{
    coerce_text, display_text, BooleanTransformer, SelectionOptions, SelectionTransformer,
};

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::types::{CellPosition, ColumnOptions};

/// Arguments handed to a renderer or editor before it builds its output.
#[derive(Debug, Clone, Copy)]
pub struct PluginParams<'a> {
    pub position: &'a CellPosition,
    pub column: &'a ColumnOptions,
    /// The column's `cellParams`.
    pub params: &'a Value,
    /// Raw cell value, before any transformer.
    pub value: &'a Value,
}

pub trait CellRenderer {
    fn init(&mut self, _params: PluginParams<'_>) {}

    /// Build the element to show in the cell.
    fn gui(&self) -> Element;

    /// Called once the element is in place.
    fn after_attached(&mut self) {}
}

pub trait CellEditor: CellRenderer {
    /// Popup editors float above the cell instead of replacing its content.
    fn is_popup(&self) -> bool {
        false
    }

    /// Value to write back when editing stops.
    fn value(&self) -> Value;
}

pub trait Transformer {
    /// Stored value to the value shown and copied.
    fn read(&self, raw: &Value) -> Value;

    /// Typed or pasted value to the value stored.
    fn write(&self, value: &Value) -> Value;
}

pub type RendererFactory = Rc<dyn Fn() -> Box<dyn CellRenderer>>;
pub type EditorFactory = Rc<dyn Fn() -> Box<dyn CellEditor>>;

/// Name-keyed plugin factories for one grid.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    renderers: HashMap<String, RendererFactory>,
    editors: HashMap<String, EditorFactory>,
    transformers: HashMap<String, Rc<dyn Transformer>>,
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("renderers", &self.renderers.keys().collect::<Vec<_>>())
            .field("editors", &self.editors.keys().collect::<Vec<_>>())
            .field("transformers", &self.transformers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `boolean` transformer.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_transformer("boolean", BooleanTransformer);
        registry
    }

    pub fn register_renderer<R, F>(&mut self, name: impl Into<String>, factory: F)
    where
        R: CellRenderer + 'static,
        F: Fn() -> R + 'static,
    {
        self.renderers.insert(
            name.into(),
            Rc::new(move || Box::new(factory()) as Box<dyn CellRenderer>),
        );
    }

    pub fn register_editor<E, F>(&mut self, name: impl Into<String>, factory: F)
    where
        E: CellEditor + 'static,
        F: Fn() -> E + 'static,
    {
        self.editors.insert(
            name.into(),
            Rc::new(move || Box::new(factory()) as Box<dyn CellEditor>),
        );
    }

    pub fn register_transformer(
        &mut self,
        name: impl Into<String>,
        transformer: impl Transformer + 'static,
    ) {
        self.transformers.insert(name.into(), Rc::new(transformer));
    }

    pub fn create_renderer(&self, name: &str) -> Option<Box<dyn CellRenderer>> {
        self.renderers.get(name).map(|factory| factory())
    }

    pub fn create_editor(&self, name: &str) -> Option<Box<dyn CellEditor>> {
        self.editors.get(name).map(|factory| factory())
    }

    pub fn transformer(&self, name: &str) -> Option<Rc<dyn Transformer>> {
        self.transformers.get(name).cloned()
    }

    pub fn has_editor(&self, name: &str) -> bool {
        self.editors.contains_key(name)
    }
}
