use std::fmt;
use std::rc::Rc;

/// Callback attached to a menu entry.
pub type MenuAction = Rc<dyn Fn()>;

/// One entry of a context or column menu.
#[derive(Clone)]
pub enum MenuItem {
    Separator,
    Entry(MenuEntry),
}

#[derive(Clone, Default)]
pub struct MenuEntry {
    pub name: String,
    pub icon: Option<String>,
    pub disabled: bool,
    pub action: Option<MenuAction>,
    pub sub_menus: Vec<MenuItem>,
}

impl MenuItem {
    pub fn entry(name: impl Into<String>) -> MenuEntry {
        MenuEntry {
            name: name.into(),
            ..MenuEntry::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Separator => None,
            Self::Entry(entry) => Some(&entry.name),
        }
    }

    /// Run the entry's action. Separators, disabled entries and entries
    /// without an action do nothing and return `false`.
    pub fn activate(&self) -> bool {
        match self {
            Self::Entry(MenuEntry {
                disabled: false,
                action: Some(action),
                ..
            }) => {
                action();
                true
            }
            _ => false,
        }
    }
}

impl MenuEntry {
    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn action(mut self, action: impl Fn() + 'static) -> Self {
        self.action = Some(Rc::new(action));
        self
    }

    #[must_use]
    pub fn sub_menus(mut self, items: Vec<MenuItem>) -> Self {
        self.sub_menus = items;
        self
    }

    pub fn build(self) -> MenuItem {
        MenuItem::Entry(self)
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Separator => f.write_str("Separator"),
            Self::Entry(entry) => entry.fmt(f),
        }
    }
}

impl fmt::Debug for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuEntry")
            .field("name", &self.name)
            .field("icon", &self.icon)
            .field("disabled", &self.disabled)
            .field("has_action", &self.action.is_some())
            .field("sub_menus", &self.sub_menus)
            .finish()
    }
}

/// Arguments handed to a context-menu provider.
#[derive(Debug, Clone)]
pub struct ContextMenuParams {
    pub row: String,
    /// The column that was clicked.
    pub column: String,
}

/// Arguments handed to a column-menu provider.
#[derive(Debug, Clone)]
pub struct ColumnMenuParams {
    pub column: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn disabled_entries_do_not_fire() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let item = MenuItem::entry("Delete")
            .disabled(true)
            .action(move || counter.set(counter.get() + 1))
            .build();
        assert!(!item.activate());
        assert_eq!(hits.get(), 0);
        assert!(!MenuItem::Separator.activate());
    }

    #[test]
    fn enabled_entry_runs_action() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let item = MenuItem::entry("Copy")
            .action(move || counter.set(counter.get() + 1))
            .build();
        assert!(item.activate());
        assert_eq!(hits.get(), 1);
        assert_eq!(item.name(), Some("Copy"));
    }
}
